use std::f64::consts::FRAC_PI_4;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::GearGeometry;

// ---------------------------------------------------------------------------
// Serde default functions
// ---------------------------------------------------------------------------

const fn default_min_gears() -> usize {
    3
}
const fn default_max_gears() -> usize {
    6
}
const fn default_gear_radius() -> f64 {
    40.0
}
const fn default_gear_gap() -> f64 {
    -8.0
}
const fn default_tooth_count() -> usize {
    12
}
const fn default_tooth_length() -> f64 {
    15.0
}
const fn default_angular_speed() -> f64 {
    FRAC_PI_4
}
const fn default_frame_rate() -> f64 {
    10.0
}
const fn default_max_layout_attempts() -> u32 {
    5
}
const fn default_max_sim_horizon() -> f64 {
    60.0
}

// ---------------------------------------------------------------------------
// GenerationConfig
// ---------------------------------------------------------------------------

/// Sample generation configuration.
///
/// Loadable from TOML; every field has a default matching the reference
/// geometry (40 px radius, 12 teeth, 15 px tooth length, -8 px gap).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Minimum chain length (default: 3).
    #[serde(default = "default_min_gears")]
    pub min_gears: usize,

    /// Maximum chain length (default: 6).
    #[serde(default = "default_max_gears")]
    pub max_gears: usize,

    /// Gear body radius in px (default: 40).
    #[serde(default = "default_gear_radius")]
    pub gear_radius: f64,

    /// Gap between adjacent gears in px (default: -8; negative values create
    /// the meshed appearance).
    #[serde(default = "default_gear_gap")]
    pub gear_gap: f64,

    /// Teeth per gear (default: 12).
    #[serde(default = "default_tooth_count")]
    pub tooth_count: usize,

    /// Radial tooth length in px (default: 15).
    #[serde(default = "default_tooth_length")]
    pub tooth_length: f64,

    /// Uniform angular speed in rad/s (default: pi/4).
    #[serde(default = "default_angular_speed")]
    pub angular_speed: f64,

    /// Frame sampling rate in frames per second (default: 10).
    #[serde(default = "default_frame_rate")]
    pub frame_rate: f64,

    /// Master random seed (default: 0).
    #[serde(default)]
    pub seed: u64,

    /// Layout retries with fresh derived seeds before a sample fails
    /// (default: 5).
    #[serde(default = "default_max_layout_attempts")]
    pub max_layout_attempts: u32,

    /// Simulation time horizon in seconds (default: 60). The closed-form
    /// stop solve always lands within one relative-rotation period; the
    /// horizon guards the invariant.
    #[serde(default = "default_max_sim_horizon")]
    pub max_sim_horizon: f64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            min_gears: default_min_gears(),
            max_gears: default_max_gears(),
            gear_radius: default_gear_radius(),
            gear_gap: default_gear_gap(),
            tooth_count: default_tooth_count(),
            tooth_length: default_tooth_length(),
            angular_speed: default_angular_speed(),
            frame_rate: default_frame_rate(),
            seed: 0,
            max_layout_attempts: default_max_layout_attempts(),
            max_sim_horizon: default_max_sim_horizon(),
        }
    }
}

impl GenerationConfig {
    /// Validate configuration. Returns Err on invalid values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_gears < 2 || self.max_gears < self.min_gears {
            return Err(ConfigError::GearCountBounds {
                min: self.min_gears,
                max: self.max_gears,
            });
        }
        let positive: [(&str, f64); 5] = [
            ("gear_radius", self.gear_radius),
            ("tooth_length", self.tooth_length),
            ("angular_speed", self.angular_speed),
            ("frame_rate", self.frame_rate),
            ("max_sim_horizon", self.max_sim_horizon),
        ];
        for (field, value) in positive {
            if value <= 0.0 {
                return Err(ConfigError::InvalidValue {
                    field: field.into(),
                    message: format!("must be > 0, got {value}"),
                });
            }
        }
        if self.tooth_count < 3 {
            return Err(ConfigError::InvalidValue {
                field: "tooth_count".into(),
                message: format!("must be >= 3, got {}", self.tooth_count),
            });
        }
        if self.max_layout_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_layout_attempts".into(),
                message: "must be >= 1".into(),
            });
        }
        // Teeth must still clear each other at the configured spacing.
        if self.geometry().spacing() <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "gear_gap".into(),
                message: "gear centers would coincide or cross".into(),
            });
        }
        Ok(())
    }

    /// Gear geometry shared by every gear in a generated chain.
    #[must_use]
    pub fn geometry(&self) -> GearGeometry {
        GearGeometry {
            radius: self.gear_radius,
            tooth_count: self.tooth_count,
            tooth_length: self.tooth_length,
            gear_gap: self.gear_gap,
        }
    }

    /// Load from TOML file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
