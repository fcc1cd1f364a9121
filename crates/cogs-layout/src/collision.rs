//! Tooth-tip collision detection between adjacent gears.
//!
//! Only teeth on the "facing" side of each gear (angular position within
//! 90 degrees of the inter-center direction) can plausibly touch the
//! neighbor, so the check is restricted to those. A pair collides when any
//! two facing tips come closer than the safety margin, which guards against
//! tangential proximity rather than just tip-to-tip contact.

use nalgebra::{Point2, Vector2};

use cogs_core::angles::wrap_signed;
use cogs_core::types::GearGeometry;

/// Safety factor applied to the tooth width to obtain the minimum allowed
/// tip-to-tip distance.
pub const SAFETY_FACTOR: f64 = 1.5;

/// Minimum allowed distance between facing tooth tips of adjacent gears.
#[must_use]
pub fn safety_margin(geometry: &GearGeometry) -> f64 {
    SAFETY_FACTOR * geometry.tooth_width()
}

/// Tip positions of the teeth of a gear at `center` rotated to `base_angle`
/// that point toward `target` (within 90 degrees of the inter-center
/// direction).
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn facing_tooth_tips(
    center: Point2<f64>,
    base_angle: f64,
    geometry: &GearGeometry,
    target: Point2<f64>,
) -> Vec<Point2<f64>> {
    let toward = target - center;
    let connection_angle = toward.y.atan2(toward.x);
    let pitch = geometry.tooth_pitch();
    let tip_radius = geometry.tip_radius();

    (0..geometry.tooth_count)
        .filter_map(|tooth| {
            let angle = base_angle + tooth as f64 * pitch;
            if wrap_signed(angle - connection_angle).abs() > std::f64::consts::FRAC_PI_2 {
                return None;
            }
            Some(center + tip_radius * Vector2::new(angle.cos(), angle.sin()))
        })
        .collect()
}

/// Smallest distance between any facing tooth tip of gear `a` and any facing
/// tooth tip of gear `b`, or `None` when either facing set is empty.
#[must_use]
pub fn min_facing_tip_distance(
    center_a: Point2<f64>,
    angle_a: f64,
    center_b: Point2<f64>,
    angle_b: f64,
    geometry: &GearGeometry,
) -> Option<f64> {
    let tips_a = facing_tooth_tips(center_a, angle_a, geometry, center_b);
    let tips_b = facing_tooth_tips(center_b, angle_b, geometry, center_a);

    let mut min: Option<f64> = None;
    for ta in &tips_a {
        for tb in &tips_b {
            let dist = (ta - tb).norm();
            min = Some(min.map_or(dist, |m: f64| m.min(dist)));
        }
    }
    min
}

/// Whether any facing tooth tips of the two gears violate the safety margin.
#[must_use]
pub fn tips_collide(
    center_a: Point2<f64>,
    angle_a: f64,
    center_b: Point2<f64>,
    angle_b: f64,
    geometry: &GearGeometry,
) -> bool {
    min_facing_tip_distance(center_a, angle_a, center_b, angle_b, geometry)
        .is_some_and(|dist| dist < safety_margin(geometry))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
