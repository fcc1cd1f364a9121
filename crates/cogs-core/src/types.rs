//! Core data model: directions, axes, gear geometry, gears, and chains.
//!
//! A [`Chain`] owns its [`Gear`]s. Gear geometry (radius, tooth count,
//! spacing) is immutable after layout; only the rotation angle varies, and
//! it is a pure function of elapsed time, direction, and base angle.

use std::f64::consts::TAU;
use std::fmt;

use nalgebra::{Point2, Vector2};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, SimError};

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// Rotation sense of a gear.
///
/// Screen coordinates (+y down): clockwise rotation increases the angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Clockwise,
    CounterClockwise,
}

impl Direction {
    /// The opposite rotation sense.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Clockwise => Self::CounterClockwise,
            Self::CounterClockwise => Self::Clockwise,
        }
    }

    /// Sign applied to the angular speed: +1 clockwise, -1 counterclockwise.
    #[must_use]
    pub const fn sign(self) -> f64 {
        match self {
            Self::Clockwise => 1.0,
            Self::CounterClockwise => -1.0,
        }
    }

    /// Draw a direction uniformly at random.
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.gen::<bool>() {
            Self::Clockwise
        } else {
            Self::CounterClockwise
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clockwise => write!(f, "clockwise"),
            Self::CounterClockwise => write!(f, "counterclockwise"),
        }
    }
}

/// Direction of the last gear in a chain of `n` gears rooted at `root`.
///
/// Strict alternation means the last gear matches the root iff `n` is odd.
#[must_use]
pub const fn final_direction(n: usize, root: Direction) -> Direction {
    if n % 2 == 1 {
        root
    } else {
        root.opposite()
    }
}

// ---------------------------------------------------------------------------
// Axis
// ---------------------------------------------------------------------------

/// Placement axis of a chain: the line along which gear centers sit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Horizontal,
    Vertical,
    DiagonalDown,
    DiagonalUp,
}

impl Axis {
    pub const ALL: [Self; 4] = [
        Self::Horizontal,
        Self::Vertical,
        Self::DiagonalDown,
        Self::DiagonalUp,
    ];

    /// Unit vector along the axis, in screen coordinates (+y down).
    #[must_use]
    pub fn unit_vector(self) -> Vector2<f64> {
        let h = std::f64::consts::FRAC_1_SQRT_2;
        match self {
            Self::Horizontal => Vector2::new(1.0, 0.0),
            Self::Vertical => Vector2::new(0.0, 1.0),
            Self::DiagonalDown => Vector2::new(h, h),
            Self::DiagonalUp => Vector2::new(h, -h),
        }
    }

    /// Human-readable arrangement phrase used in prompt text.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Horizontal => "arranged horizontally in a row",
            Self::Vertical => "arranged vertically in a column",
            Self::DiagonalDown => "arranged diagonally from top-left to bottom-right",
            Self::DiagonalUp => "arranged diagonally from bottom-left to top-right",
        }
    }

    /// Draw an axis uniformly at random.
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

// ---------------------------------------------------------------------------
// GearGeometry
// ---------------------------------------------------------------------------

/// Tooth width as a fraction of the per-tooth arc of the circumference.
const TOOTH_WIDTH_FRACTION: f64 = 0.38;

/// Shared geometry of every gear in a chain.
///
/// Meshing assumes uniform gear size: all gears in one chain share the same
/// radius, tooth count, and tooth length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GearGeometry {
    /// Body radius in px.
    pub radius: f64,
    /// Number of evenly spaced teeth.
    pub tooth_count: usize,
    /// Radial tooth length in px.
    pub tooth_length: f64,
    /// Gap between adjacent gears in px. Negative values pull gears together
    /// for a meshed appearance while teeth remain non-colliding.
    pub gear_gap: f64,
}

impl GearGeometry {
    /// Center-to-center spacing of adjacent gears.
    ///
    /// May be less than `2 * radius` when `gear_gap` is negative.
    #[must_use]
    pub fn spacing(&self) -> f64 {
        2.0 * self.radius + 2.0 * self.tooth_length + self.gear_gap
    }

    /// Angular period of one tooth: `TAU / tooth_count`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn tooth_pitch(&self) -> f64 {
        TAU / self.tooth_count as f64
    }

    /// Linear tooth width: a fraction of the circumference per tooth.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn tooth_width(&self) -> f64 {
        TOOTH_WIDTH_FRACTION * TAU * self.radius / self.tooth_count as f64
    }

    /// Radius at the tooth tips.
    #[must_use]
    pub fn tip_radius(&self) -> f64 {
        self.radius + self.tooth_length
    }
}

// ---------------------------------------------------------------------------
// GearPlacement
// ---------------------------------------------------------------------------

/// A gear's pose as fixed by the layout builder, before a rotation sense is
/// assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct GearPlacement {
    /// 1-based position in the chain.
    pub index: usize,
    /// Center position in px.
    pub center: Point2<f64>,
    /// Rotation angle at t = 0, radians.
    pub base_angle: f64,
    /// Index of the reference ("green") tooth.
    pub marker_tooth: usize,
}

// ---------------------------------------------------------------------------
// Gear
// ---------------------------------------------------------------------------

/// A placed gear with an assigned rotation sense.
#[derive(Debug, Clone, PartialEq)]
pub struct Gear {
    /// 1-based position in the chain.
    pub index: usize,
    /// Center position in px.
    pub center: Point2<f64>,
    /// Rotation angle at t = 0, radians.
    pub base_angle: f64,
    /// Index of the reference ("green") tooth.
    pub marker_tooth: usize,
    /// Rotation sense.
    pub direction: Direction,
}

impl Gear {
    /// Absolute rotation angle at time `t` under uniform `angular_speed`.
    #[must_use]
    pub fn angle_at(&self, t: f64, angular_speed: f64) -> f64 {
        self.base_angle + self.direction.sign() * angular_speed * t
    }

    /// Absolute angle of tooth `tooth` at t = 0.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn tooth_angle(&self, geometry: &GearGeometry, tooth: usize) -> f64 {
        self.base_angle + tooth as f64 * geometry.tooth_pitch()
    }

    /// Absolute angle of the reference tooth at time `t`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn marker_angle_at(&self, geometry: &GearGeometry, t: f64, angular_speed: f64) -> f64 {
        self.angle_at(t, angular_speed) + self.marker_tooth as f64 * geometry.tooth_pitch()
    }

    /// Tip point of tooth `tooth` when the gear is rotated to `rotation`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn tooth_tip(&self, geometry: &GearGeometry, tooth: usize, rotation: f64) -> Point2<f64> {
        let angle = rotation + tooth as f64 * geometry.tooth_pitch();
        self.center + geometry.tip_radius() * Vector2::new(angle.cos(), angle.sin())
    }
}

// ---------------------------------------------------------------------------
// Chain
// ---------------------------------------------------------------------------

/// An ordered chain of meshed gears on an axis.
///
/// Constructed from layout placements plus a root direction; directions
/// strictly alternate down the chain (the central physical law: meshed gears
/// in contact rotate in opposing senses).
#[derive(Debug, Clone, PartialEq)]
pub struct Chain {
    geometry: GearGeometry,
    axis: Axis,
    gears: Vec<Gear>,
}

impl Chain {
    /// Build a chain from layout placements, assigning alternating directions
    /// starting at `root` for gear 1.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::TooFewGears`] for fewer than 2 placements.
    pub fn new(
        geometry: GearGeometry,
        axis: Axis,
        placements: Vec<GearPlacement>,
        root: Direction,
    ) -> Result<Self, LayoutError> {
        if placements.len() < 2 {
            return Err(LayoutError::TooFewGears(placements.len()));
        }
        let gears = placements
            .into_iter()
            .map(|p| {
                let direction = if p.index % 2 == 1 {
                    root
                } else {
                    root.opposite()
                };
                Gear {
                    index: p.index,
                    center: p.center,
                    base_angle: p.base_angle,
                    marker_tooth: p.marker_tooth,
                    direction,
                }
            })
            .collect();
        Ok(Self {
            geometry,
            axis,
            gears,
        })
    }

    /// Build a chain from pre-assembled gears without assigning directions.
    ///
    /// Directions are taken as-is; [`validate_alternation`](Self::validate_alternation)
    /// catches non-alternating assignments downstream.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::TooFewGears`] for fewer than 2 gears.
    pub fn from_gears(
        geometry: GearGeometry,
        axis: Axis,
        gears: Vec<Gear>,
    ) -> Result<Self, LayoutError> {
        if gears.len() < 2 {
            return Err(LayoutError::TooFewGears(gears.len()));
        }
        Ok(Self {
            geometry,
            axis,
            gears,
        })
    }

    /// Number of gears.
    #[must_use]
    pub fn len(&self) -> usize {
        self.gears.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.gears.is_empty()
    }

    #[must_use]
    pub fn geometry(&self) -> &GearGeometry {
        &self.geometry
    }

    #[must_use]
    pub fn axis(&self) -> Axis {
        self.axis
    }

    #[must_use]
    pub fn gears(&self) -> &[Gear] {
        &self.gears
    }

    /// The first gear's rotation sense.
    #[must_use]
    pub fn root_direction(&self) -> Direction {
        self.gears[0].direction
    }

    /// The last gear's rotation sense.
    #[must_use]
    pub fn last_direction(&self) -> Direction {
        self.gears[self.gears.len() - 1].direction
    }

    /// The last two gears, in chain order.
    #[must_use]
    pub fn last_pair(&self) -> (&Gear, &Gear) {
        let n = self.gears.len();
        (&self.gears[n - 2], &self.gears[n - 1])
    }

    /// Per-gear absolute rotation angles at time `t` (chain order).
    #[must_use]
    pub fn angles_at(&self, t: f64, angular_speed: f64) -> Vec<f64> {
        self.gears
            .iter()
            .map(|g| g.angle_at(t, angular_speed))
            .collect()
    }

    /// Check that adjacent gears rotate in opposing senses.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::NonAlternating`] naming the first offending gear.
    pub fn validate_alternation(&self) -> Result<(), SimError> {
        for pair in self.gears.windows(2) {
            if pair[1].direction == pair[0].direction {
                return Err(SimError::NonAlternating {
                    index: pair[1].index,
                });
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
