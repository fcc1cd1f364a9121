use thiserror::Error;

/// Top-level error type for the cogs workspace.
#[derive(Debug, Error)]
pub enum CogsError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("Simulation error: {0}")]
    Simulation(#[from] SimError),
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Invalid gear count bounds: min={min}, max={max} (need 2 <= min <= max)")]
    GearCountBounds { min: usize, max: usize },
}

/// Layout builder errors.
///
/// Copy + static payloads for cheap propagation out of the refinement loop.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum LayoutError {
    #[error("Layout infeasible: adjacent pair {pair_index} still colliding after {iterations} refinement iterations")]
    Infeasible { pair_index: usize, iterations: u32 },

    #[error("Chain needs at least 2 gears, got {0}")]
    TooFewGears(usize),

    #[error("Gear spacing must be positive, got {spacing} (centers would coincide or cross)")]
    NonPositiveSpacing { spacing: f64 },
}

/// Rotation simulator errors.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SimError {
    #[error("Invalid simulation parameter {field}: must be a positive finite value, got {value}")]
    InvalidParams { field: &'static str, value: f64 },

    #[error("Gear {index} rotates in the same direction as its predecessor (meshed gears must alternate)")]
    NonAlternating { index: usize },

    #[error("Zero relative angular velocity between the last two gears")]
    ZeroRelativeVelocity,

    #[error("Stop condition not reached within {horizon_secs} s horizon")]
    Unreachable { horizon_secs: f64 },
}
