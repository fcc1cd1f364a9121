//! Task sample assembly for gear-chain direction questions.
//!
//! Builds on `cogs-layout` and `cogs-sim`: draws randomized task parameters,
//! lays out and simulates a chain, and packages the result as a serializable
//! [`TaskSample`] with question text, chain snapshots, and motion frames.
//! Rasterization and video encoding are left to external consumers.

pub mod generator;
pub mod prompt;
pub mod sample;

pub use generator::SampleGenerator;
pub use prompt::render_prompt;
pub use sample::{ChainSnapshot, GearState, TaskFacts, TaskSample};
