//! Meshing-rotation simulator for gear chains.
//!
//! Rotation here is closed-form: every gear's angle is a linear function of
//! time, so the stop condition (reference teeth of the last two gears exactly
//! opposed) is solved analytically rather than stepped. Frame sampling then
//! just evaluates poses at the configured rate up to the stop instant.

pub mod simulate;
pub mod stop;

pub use simulate::{simulate, FramePose, SimParams, Simulation};
pub use stop::first_opposition_time;
