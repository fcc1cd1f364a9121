//! Synchronized rotation of a laid-out chain up to the stop instant.
//!
//! Every gear turns at the same angular speed, senses strictly alternating.
//! The simulator solves for the earliest time at which the reference teeth
//! of the last two gears point in exactly opposite directions and samples
//! pose snapshots at the configured frame rate up to and including that
//! instant.

use serde::{Deserialize, Serialize};

use cogs_core::config::GenerationConfig;
use cogs_core::error::SimError;
use cogs_core::time::SimTime;
use cogs_core::types::Chain;

use crate::stop::first_opposition_time;

/// Slack when deciding whether a sampled frame time has reached the stop
/// instant, so an exact multiple of the frame interval is not emitted twice.
const FRAME_TIME_EPS: f64 = 1e-9;

// ---------------------------------------------------------------------------
// SimParams
// ---------------------------------------------------------------------------

/// Inputs to [`simulate`] beyond the chain itself.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimParams {
    /// Uniform angular speed in rad/s (identical magnitude for all gears;
    /// no gear ratio modeling).
    pub angular_speed: f64,
    /// Pose sampling rate in frames per second.
    pub frame_rate: f64,
    /// Time horizon guarding the stop solve, seconds.
    pub max_horizon_secs: f64,
}

impl SimParams {
    #[must_use]
    pub fn from_config(config: &GenerationConfig) -> Self {
        Self {
            angular_speed: config.angular_speed,
            frame_rate: config.frame_rate,
            max_horizon_secs: config.max_sim_horizon,
        }
    }

    /// Check that every parameter is positive and finite.
    ///
    /// `simulate` runs this up front: a zero or negative frame rate would
    /// otherwise derail the sampling loop, and a non-finite speed poisons
    /// every angle.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidParams`] naming the offending field.
    pub fn validate(&self) -> Result<(), SimError> {
        let fields = [
            ("angular_speed", self.angular_speed),
            ("frame_rate", self.frame_rate),
            ("max_horizon_secs", self.max_horizon_secs),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(SimError::InvalidParams { field, value });
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FramePose / Simulation
// ---------------------------------------------------------------------------

/// Pose snapshot of every gear at one sampled instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(clippy::derive_partial_eq_without_eq)] // f64 fields prevent Eq
pub struct FramePose {
    /// Simulation timestamp in nanoseconds.
    pub timestamp_ns: u64,
    /// Simulation timestamp in seconds.
    pub time_secs: f64,
    /// Absolute rotation angle per gear, chain order, radians.
    pub angles: Vec<f64>,
}

/// Result of simulating a chain to its stop condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(clippy::derive_partial_eq_without_eq)] // f64 fields prevent Eq
pub struct Simulation {
    /// Earliest instant satisfying the stop predicate, seconds.
    pub stop_time_secs: f64,
    /// Pose snapshots from t = 0 to the stop instant inclusive.
    pub frames: Vec<FramePose>,
}

impl Simulation {
    /// The final frame, sampled exactly at the stop instant.
    #[must_use]
    pub fn final_frame(&self) -> &FramePose {
        // frames is never empty: the t = 0 snapshot always exists.
        &self.frames[self.frames.len() - 1]
    }
}

// ---------------------------------------------------------------------------
// simulate
// ---------------------------------------------------------------------------

/// Simulate synchronized rotation of `chain` until the reference teeth of
/// its last two gears are exactly PI apart.
///
/// # Errors
///
/// - [`SimError::InvalidParams`] if a parameter is zero, negative, or not
///   finite.
/// - [`SimError::NonAlternating`] if adjacent gears share a rotation sense.
/// - [`SimError::ZeroRelativeVelocity`] if the last two gears have no
///   relative motion (unreachable given alternation, still validated).
/// - [`SimError::Unreachable`] if the solved stop time exceeds the horizon.
pub fn simulate(chain: &Chain, params: &SimParams) -> Result<Simulation, SimError> {
    params.validate()?;
    chain.validate_alternation()?;

    let geometry = chain.geometry();
    let speed = params.angular_speed;
    let (second_last, last) = chain.last_pair();

    let delta0 = last.marker_angle_at(geometry, 0.0, speed)
        - second_last.marker_angle_at(geometry, 0.0, speed);
    let relative_speed = (last.direction.sign() - second_last.direction.sign()) * speed;

    let stop_time = first_opposition_time(delta0, relative_speed)?;
    if stop_time > params.max_horizon_secs {
        return Err(SimError::Unreachable {
            horizon_secs: params.max_horizon_secs,
        });
    }

    let frame_interval = 1.0 / params.frame_rate;
    let mut frames = Vec::new();
    let mut k = 0u32;
    loop {
        let t = f64::from(k) * frame_interval;
        if t >= stop_time - FRAME_TIME_EPS {
            break;
        }
        frames.push(frame_at(chain, t, speed));
        k += 1;
    }
    frames.push(frame_at(chain, stop_time, speed));

    Ok(Simulation {
        stop_time_secs: stop_time,
        frames,
    })
}

fn frame_at(chain: &Chain, t: f64, speed: f64) -> FramePose {
    FramePose {
        timestamp_ns: SimTime::from_secs(t).nanos(),
        time_secs: t,
        angles: chain.angles_at(t, speed),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
