// cogs-core: Types, config, errors, seeds, and sim clock for the cogs gear-chain engine.

pub mod angles;
pub mod config;
pub mod error;
pub mod seed;
pub mod time;
pub mod types;

pub mod prelude {
    pub use crate::angles::{separation, wrap_positive, wrap_signed};
    pub use crate::config::GenerationConfig;
    pub use crate::error::{CogsError, ConfigError, LayoutError, SimError};
    pub use crate::seed::SeedHierarchy;
    pub use crate::time::SimTime;
    pub use crate::types::{Axis, Chain, Direction, Gear, GearGeometry, GearPlacement};
}
