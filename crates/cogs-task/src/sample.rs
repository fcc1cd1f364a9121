//! Serializable task sample data: chain snapshots, derived facts, and the
//! assembled sample.
//!
//! Everything here is plain data for an external renderer or serializer.
//! Centers are `[x, y]` arrays in screen px (+y down); angles are radians.

use serde::{Deserialize, Serialize};

use cogs_core::types::{Axis, Chain, Direction, Gear};

// ---------------------------------------------------------------------------
// GearState / ChainSnapshot
// ---------------------------------------------------------------------------

/// One gear's pose within a snapshot.
///
/// `direction` is `None` when the snapshot withholds it (the initial frame
/// poses the last gear's sense as the question).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(clippy::derive_partial_eq_without_eq)] // f64 fields prevent Eq
pub struct GearState {
    /// 1-based position in the chain.
    pub index: usize,
    /// Center in px, `[x, y]`.
    pub center: [f64; 2],
    /// Absolute rotation angle, radians.
    pub angle: f64,
    /// Index of the reference ("green") tooth.
    pub marker_tooth: usize,
    /// Rotation sense, withheld on the last gear of a question snapshot.
    pub direction: Option<Direction>,
}

/// Full chain pose at one instant, ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(clippy::derive_partial_eq_without_eq)] // f64 fields prevent Eq
pub struct ChainSnapshot {
    /// Snapshot time in seconds.
    pub time_secs: f64,
    /// Placement axis of the chain.
    pub axis: Axis,
    /// Whether the last gear's direction is included. The initial snapshot
    /// hides it; the final snapshot reveals the answer.
    pub reveal_last: bool,
    /// Per-gear states in chain order.
    pub gears: Vec<GearState>,
}

impl ChainSnapshot {
    /// Capture the chain's pose at time `t`.
    #[must_use]
    pub fn capture(chain: &Chain, t: f64, angular_speed: f64, reveal_last: bool) -> Self {
        let last_index = chain.len();
        let gears = chain
            .gears()
            .iter()
            .map(|gear| {
                let hidden = !reveal_last && gear.index == last_index;
                gear_state(gear, t, angular_speed, hidden)
            })
            .collect();
        Self {
            time_secs: t,
            axis: chain.axis(),
            reveal_last,
            gears,
        }
    }
}

fn gear_state(gear: &Gear, t: f64, angular_speed: f64, hidden: bool) -> GearState {
    GearState {
        index: gear.index,
        center: [gear.center.x, gear.center.y],
        angle: gear.angle_at(t, angular_speed),
        marker_tooth: gear.marker_tooth,
        direction: if hidden { None } else { Some(gear.direction) },
    }
}

// ---------------------------------------------------------------------------
// TaskFacts
// ---------------------------------------------------------------------------

/// Scalars derived from a chain, consumed by prompt templating and label
/// emission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFacts {
    /// Number of gears in the chain.
    pub gear_count: usize,
    /// Rotation sense of gear 1.
    pub root_direction: Direction,
    /// Rotation sense of the last gear (the answer to the question).
    pub last_direction: Direction,
    /// Per-gear senses in chain order.
    pub directions: Vec<Direction>,
    /// Placement axis.
    pub axis: Axis,
}

impl TaskFacts {
    #[must_use]
    pub fn from_chain(chain: &Chain) -> Self {
        Self {
            gear_count: chain.len(),
            root_direction: chain.root_direction(),
            last_direction: chain.last_direction(),
            directions: chain.gears().iter().map(|g| g.direction).collect(),
            axis: chain.axis(),
        }
    }
}

// ---------------------------------------------------------------------------
// TaskSample
// ---------------------------------------------------------------------------

/// A complete generated sample.
///
/// `initial` is the question pose (t = 0, last direction hidden);
/// `final_state` is the answer pose at the stop instant with every direction
/// revealed. `frames` carries the full motion between them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(clippy::derive_partial_eq_without_eq)] // f64 fields prevent Eq
pub struct TaskSample {
    /// Index of this sample within the run.
    pub sample_index: u64,
    /// Sample-level seed derived from the run seed.
    pub seed: u64,
    /// Derived facts, including the ground-truth answer.
    pub facts: TaskFacts,
    /// Question text.
    pub prompt: String,
    /// Chain pose at t = 0, last gear's direction withheld.
    pub initial: ChainSnapshot,
    /// Chain pose at the stop instant, all directions revealed.
    pub final_state: ChainSnapshot,
    /// Earliest instant where the two final markers exactly oppose, seconds.
    pub stop_time_secs: f64,
    /// Per-gear angles sampled at the frame rate, t = 0 to stop inclusive.
    pub frames: Vec<cogs_sim::FramePose>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point2;

    use cogs_core::types::{GearGeometry, GearPlacement};

    fn test_chain(n: usize) -> Chain {
        let geometry = GearGeometry {
            radius: 40.0,
            tooth_count: 12,
            tooth_length: 15.0,
            gear_gap: -8.0,
        };
        let placements = (1..=n)
            .map(|i| GearPlacement {
                index: i,
                center: Point2::new((i - 1) as f64 * 102.0, 0.0),
                base_angle: 0.25,
                marker_tooth: i % 12,
            })
            .collect();
        Chain::new(geometry, Axis::Horizontal, placements, Direction::Clockwise).unwrap()
    }

    #[test]
    fn snapshot_hides_last_direction_when_unrevealed() {
        let chain = test_chain(4);
        let snap = ChainSnapshot::capture(&chain, 0.0, 1.0, false);
        assert!(!snap.reveal_last);
        assert_eq!(snap.gears.len(), 4);
        for state in &snap.gears[..3] {
            assert!(state.direction.is_some());
        }
        assert_eq!(snap.gears[3].direction, None);
    }

    #[test]
    fn snapshot_reveals_all_directions() {
        let chain = test_chain(3);
        let snap = ChainSnapshot::capture(&chain, 1.5, 1.0, true);
        assert!(snap.gears.iter().all(|g| g.direction.is_some()));
        assert_eq!(snap.gears[2].direction, Some(Direction::Clockwise));
    }

    #[test]
    fn snapshot_angles_match_chain() {
        let chain = test_chain(3);
        let snap = ChainSnapshot::capture(&chain, 2.0, 0.5, true);
        let expected = chain.angles_at(2.0, 0.5);
        for (state, angle) in snap.gears.iter().zip(expected) {
            assert!((state.angle - angle).abs() < 1e-12);
        }
    }

    #[test]
    fn snapshot_carries_centers_and_markers() {
        let chain = test_chain(2);
        let snap = ChainSnapshot::capture(&chain, 0.0, 1.0, true);
        assert!((snap.gears[1].center[0] - 102.0).abs() < f64::EPSILON);
        assert!(snap.gears[1].center[1].abs() < f64::EPSILON);
        assert_eq!(snap.gears[0].marker_tooth, 1);
        assert_eq!(snap.gears[1].marker_tooth, 2);
    }

    #[test]
    fn facts_from_chain() {
        let chain = test_chain(4);
        let facts = TaskFacts::from_chain(&chain);
        assert_eq!(facts.gear_count, 4);
        assert_eq!(facts.root_direction, Direction::Clockwise);
        assert_eq!(facts.last_direction, Direction::CounterClockwise);
        assert_eq!(facts.axis, Axis::Horizontal);
        assert_eq!(facts.directions.len(), 4);
        assert_eq!(facts.directions[0], Direction::Clockwise);
        assert_eq!(facts.directions[1], Direction::CounterClockwise);
    }

    #[test]
    fn hidden_direction_serializes_as_null() {
        let chain = test_chain(2);
        let snap = ChainSnapshot::capture(&chain, 0.0, 1.0, false);
        let json = serde_json::to_value(&snap).unwrap();
        assert!(json["gears"][1]["direction"].is_null());
        assert_eq!(json["gears"][0]["direction"], "clockwise");
    }

    #[test]
    fn snapshot_serde_roundtrip() {
        let chain = test_chain(3);
        let snap = ChainSnapshot::capture(&chain, 0.7, 1.0, true);
        let json = serde_json::to_string(&snap).unwrap();
        let back: ChainSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snap, back);
    }
}
