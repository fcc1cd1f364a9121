//! Closed-form solve for the rotation stop condition.
//!
//! Both marker angles are linear in t with a constant relative angular
//! velocity, so the first instant at which they point in exactly opposite
//! directions is the first non-negative root of a linear congruence. No
//! numeric root search is involved.

use std::f64::consts::{PI, TAU};

use cogs_core::angles::wrap_positive;
use cogs_core::error::SimError;

/// Relative speeds below this magnitude are treated as zero.
const MIN_RELATIVE_SPEED: f64 = 1e-12;

/// Earliest `t >= 0` at which two angles separated by `delta0` at t = 0 and
/// diverging at `relative_speed` rad/s reach a separation of exactly PI.
///
/// Solves `relative_speed * t = PI - delta0 (mod TAU)` for the minimal
/// non-negative root. The solution always lies within one relative-rotation
/// period `TAU / |relative_speed|`.
///
/// # Errors
///
/// [`SimError::ZeroRelativeVelocity`] when `relative_speed` vanishes: the
/// separation is then frozen and the condition is either unreachable or
/// trivially pre-satisfied, neither of which is a meaningful stop time.
pub fn first_opposition_time(delta0: f64, relative_speed: f64) -> Result<f64, SimError> {
    if relative_speed.abs() < MIN_RELATIVE_SPEED {
        return Err(SimError::ZeroRelativeVelocity);
    }
    let target = wrap_positive(PI - delta0);
    let period = TAU / relative_speed.abs();
    Ok((target / relative_speed).rem_euclid(period))
}
