//! Chain layout construction.
//!
//! Places gear centers along the chain axis and searches for base angles
//! with realistic tooth interlock and zero tooth collision at t = 0:
//! a randomized seed angle for gear 1, the half-pitch meshing candidate for
//! each successor, then bounded iterative refinement when facing teeth land
//! too close. A closed-form non-overlap angle exists for uniform gears, but
//! the search keeps working unchanged if per-gear geometry ever varies.

use nalgebra::Point2;
use rand::Rng;

use cogs_core::error::LayoutError;
use cogs_core::types::{Axis, Chain, Direction, GearGeometry, GearPlacement};

use crate::collision::tips_collide;

/// Refinement iteration budget per adjacent pair.
pub const MAX_REFINE_ITERS: u32 = 200;

/// Predecessor perturbation budget when refinement alone fails.
pub const MAX_FALLBACK_RETRIES: u32 = 8;

// ---------------------------------------------------------------------------
// LayoutParams / ChainLayout
// ---------------------------------------------------------------------------

/// Inputs to [`build_layout`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    /// Number of gears in the chain (>= 2).
    pub gear_count: usize,
    /// Placement axis.
    pub axis: Axis,
    /// Geometry shared by every gear.
    pub geometry: GearGeometry,
}

/// A laid-out chain: centers, base angles, and marker teeth fixed, rotation
/// senses not yet assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainLayout {
    geometry: GearGeometry,
    axis: Axis,
    placements: Vec<GearPlacement>,
}

impl ChainLayout {
    #[must_use]
    pub fn geometry(&self) -> &GearGeometry {
        &self.geometry
    }

    #[must_use]
    pub fn axis(&self) -> Axis {
        self.axis
    }

    #[must_use]
    pub fn placements(&self) -> &[GearPlacement] {
        &self.placements
    }

    /// Turn the layout into a [`Chain`] with alternating directions rooted
    /// at `root`.
    ///
    /// # Errors
    ///
    /// Propagates [`LayoutError::TooFewGears`] (unreachable for layouts
    /// produced by [`build_layout`]).
    pub fn into_chain(self, root: Direction) -> Result<Chain, LayoutError> {
        Chain::new(self.geometry, self.axis, self.placements, root)
    }
}

// ---------------------------------------------------------------------------
// build_layout
// ---------------------------------------------------------------------------

/// Lay out a gear chain with collision-free tooth interlock at t = 0.
///
/// Gear `i`'s center sits at `origin + i * spacing * axis`. Gear 1 draws its
/// base angle uniformly from one tooth period (sufficient by rotational
/// symmetry); each later gear starts from the half-pitch meshing offset and
/// is refined until no facing tooth tips violate the safety margin.
///
/// # Errors
///
/// - [`LayoutError::TooFewGears`] when `gear_count < 2`.
/// - [`LayoutError::NonPositiveSpacing`] when the geometry puts adjacent
///   centers on top of each other (or past each other); the facing-teeth
///   filter is meaningless for coincident centers.
/// - [`LayoutError::Infeasible`] when a pair still collides after the
///   refinement and fallback budgets.
pub fn build_layout<R: Rng + ?Sized>(
    params: &LayoutParams,
    rng: &mut R,
) -> Result<ChainLayout, LayoutError> {
    if params.gear_count < 2 {
        return Err(LayoutError::TooFewGears(params.gear_count));
    }

    let geometry = params.geometry;
    let spacing = geometry.spacing();
    if spacing <= 0.0 {
        return Err(LayoutError::NonPositiveSpacing { spacing });
    }
    let axis_vec = params.axis.unit_vector();
    let pitch = geometry.tooth_pitch();

    #[allow(clippy::cast_precision_loss)]
    let mut placements: Vec<GearPlacement> = (0..params.gear_count)
        .map(|i| GearPlacement {
            index: i + 1,
            center: Point2::origin() + i as f64 * spacing * axis_vec,
            base_angle: 0.0,
            marker_tooth: 0,
        })
        .collect();

    placements[0].base_angle = rng.gen_range(0.0..pitch);

    for i in 1..placements.len() {
        let candidate = placements[i - 1].base_angle + pitch / 2.0;
        if let Some(angle) =
            refine_pair(&placements[i - 1], placements[i].center, candidate, &geometry)
        {
            placements[i].base_angle = angle;
        } else if !backtrack_pair(&mut placements, i, &geometry) {
            return Err(LayoutError::Infeasible {
                pair_index: i,
                iterations: MAX_REFINE_ITERS,
            });
        }
    }

    for placement in &mut placements {
        placement.marker_tooth = rng.gen_range(0..geometry.tooth_count);
    }

    Ok(ChainLayout {
        geometry,
        axis: params.axis,
        placements,
    })
}

/// Search for an angle of the gear at `center` that clears the safety margin
/// against `prev`, starting from `candidate`.
///
/// Nudges by eighth-of-a-pitch steps, alternating sign and growing
/// magnitude, within the iteration budget. Deterministic: no randomness, so
/// a fixed seed reproduces identical base angles.
fn refine_pair(
    prev: &GearPlacement,
    center: Point2<f64>,
    candidate: f64,
    geometry: &GearGeometry,
) -> Option<f64> {
    if !tips_collide(prev.center, prev.base_angle, center, candidate, geometry) {
        return Some(candidate);
    }

    let eighth = geometry.tooth_pitch() / 8.0;
    for iter in 1..=MAX_REFINE_ITERS {
        let magnitude = f64::from((iter + 1) / 2) * eighth;
        let sign = if iter % 2 == 1 { 1.0 } else { -1.0 };
        let angle = candidate + sign * magnitude;
        if !tips_collide(prev.center, prev.base_angle, center, angle, geometry) {
            return Some(angle);
        }
    }
    None
}

/// Fallback when refinement of pair (i-1, i) is exhausted: perturb gear
/// i-1's angle by small bounded steps and retry the pair.
///
/// A perturbation is rejected outright if it re-introduces a collision with
/// gear i-2, so earlier pairs stay valid. Returns false when every retry is
/// exhausted.
fn backtrack_pair(placements: &mut [GearPlacement], i: usize, geometry: &GearGeometry) -> bool {
    let sixteenth = geometry.tooth_pitch() / 16.0;
    let original = placements[i - 1].base_angle;

    for retry in 1..=MAX_FALLBACK_RETRIES {
        let magnitude = f64::from((retry + 1) / 2) * sixteenth;
        let sign = if retry % 2 == 1 { 1.0 } else { -1.0 };
        let perturbed = original + sign * magnitude;

        if i >= 2
            && tips_collide(
                placements[i - 2].center,
                placements[i - 2].base_angle,
                placements[i - 1].center,
                perturbed,
                geometry,
            )
        {
            continue;
        }

        let prev = GearPlacement {
            base_angle: perturbed,
            ..placements[i - 1].clone()
        };
        let candidate = perturbed + geometry.tooth_pitch() / 2.0;
        if let Some(angle) = refine_pair(&prev, placements[i].center, candidate, geometry) {
            placements[i - 1].base_angle = perturbed;
            placements[i].base_angle = angle;
            return true;
        }
    }
    false
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use crate::collision::{min_facing_tip_distance, safety_margin};

    fn test_geometry() -> GearGeometry {
        GearGeometry {
            radius: 40.0,
            tooth_count: 12,
            tooth_length: 15.0,
            gear_gap: -8.0,
        }
    }

    fn params(gear_count: usize, axis: Axis) -> LayoutParams {
        LayoutParams {
            gear_count,
            axis,
            geometry: test_geometry(),
        }
    }

    fn assert_no_margin_violation(layout: &ChainLayout) {
        let geom = layout.geometry();
        for pair in layout.placements().windows(2) {
            let dist = min_facing_tip_distance(
                pair[0].center,
                pair[0].base_angle,
                pair[1].center,
                pair[1].base_angle,
                geom,
            );
            if let Some(dist) = dist {
                assert!(
                    dist >= safety_margin(geom),
                    "pair ({}, {}) margin violated: {dist}",
                    pair[0].index,
                    pair[1].index
                );
            }
        }
    }

    // ---- center placement ----

    #[test]
    fn horizontal_centers_reference_scenario() {
        // radius=40, tooth_length=15, gap=-8 -> spacing 102: centers at
        // (0,0), (102,0), (204,0).
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let layout = build_layout(&params(3, Axis::Horizontal), &mut rng).unwrap();
        let centers: Vec<_> = layout.placements().iter().map(|p| p.center).collect();
        assert!((centers[0] - Point2::new(0.0, 0.0)).norm() < 1e-12);
        assert!((centers[1] - Point2::new(102.0, 0.0)).norm() < 1e-12);
        assert!((centers[2] - Point2::new(204.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn vertical_centers_step_in_y() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let layout = build_layout(&params(3, Axis::Vertical), &mut rng).unwrap();
        for (i, p) in layout.placements().iter().enumerate() {
            assert!(p.center.x.abs() < 1e-12);
            assert!((p.center.y - 102.0 * i as f64).abs() < 1e-12);
        }
    }

    #[test]
    fn diagonal_centers_preserve_spacing() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let layout = build_layout(&params(4, Axis::DiagonalDown), &mut rng).unwrap();
        for pair in layout.placements().windows(2) {
            let dist = (pair[1].center - pair[0].center).norm();
            assert!((dist - 102.0).abs() < 1e-9);
        }
    }

    // ---- randomized seeding ----

    #[test]
    fn first_gear_angle_within_one_tooth_period() {
        for seed in 0..50 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let layout = build_layout(&params(2, Axis::Horizontal), &mut rng).unwrap();
            let angle = layout.placements()[0].base_angle;
            assert!((0.0..test_geometry().tooth_pitch()).contains(&angle));
        }
    }

    #[test]
    fn layout_idempotent_for_fixed_seed() {
        let p = params(5, Axis::DiagonalUp);
        let mut rng1 = ChaCha8Rng::seed_from_u64(99);
        let mut rng2 = ChaCha8Rng::seed_from_u64(99);
        let a = build_layout(&p, &mut rng1).unwrap();
        let b = build_layout(&p, &mut rng2).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_differ() {
        let p = params(3, Axis::Horizontal);
        let mut rng1 = ChaCha8Rng::seed_from_u64(1);
        let mut rng2 = ChaCha8Rng::seed_from_u64(2);
        let a = build_layout(&p, &mut rng1).unwrap();
        let b = build_layout(&p, &mut rng2).unwrap();
        assert_ne!(
            a.placements()[0].base_angle,
            b.placements()[0].base_angle
        );
    }

    #[test]
    fn marker_teeth_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let layout = build_layout(&params(6, Axis::Vertical), &mut rng).unwrap();
        for p in layout.placements() {
            assert!(p.marker_tooth < test_geometry().tooth_count);
        }
    }

    #[test]
    fn indices_are_one_based_and_ordered() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let layout = build_layout(&params(5, Axis::Horizontal), &mut rng).unwrap();
        for (i, p) in layout.placements().iter().enumerate() {
            assert_eq!(p.index, i + 1);
        }
    }

    // ---- collision freedom ----

    #[test]
    fn no_margin_violation_across_seeds_axes_and_lengths() {
        for seed in 0..25 {
            for axis in Axis::ALL {
                for n in 2..=6 {
                    let mut rng = ChaCha8Rng::seed_from_u64(seed);
                    let layout = build_layout(&params(n, axis), &mut rng)
                        .unwrap_or_else(|e| panic!("seed={seed} axis={axis:?} n={n}: {e}"));
                    assert_no_margin_violation(&layout);
                }
            }
        }
    }

    #[test]
    fn no_margin_violation_with_odd_tooth_count() {
        // Odd tooth counts break the naive half-pitch candidate on some
        // axes, forcing the refinement loop to do the work.
        let geometry = GearGeometry {
            tooth_count: 9,
            ..test_geometry()
        };
        for seed in 0..25 {
            for axis in Axis::ALL {
                let p = LayoutParams {
                    gear_count: 4,
                    axis,
                    geometry,
                };
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                let layout = build_layout(&p, &mut rng)
                    .unwrap_or_else(|e| panic!("seed={seed} axis={axis:?}: {e}"));
                assert_no_margin_violation(&layout);
            }
        }
    }

    // ---- failure modes ----

    #[test]
    fn too_few_gears_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let err = build_layout(&params(1, Axis::Horizontal), &mut rng).unwrap_err();
        assert_eq!(err, LayoutError::TooFewGears(1));
    }

    #[test]
    fn coincident_centers_rejected() {
        // gear_gap = -110 cancels 2r + 2L exactly: spacing 0, every center
        // at the origin. Must fail loudly instead of emitting overlapping
        // gears.
        let geometry = GearGeometry {
            gear_gap: -110.0,
            ..test_geometry()
        };
        let p = LayoutParams {
            gear_count: 3,
            axis: Axis::Horizontal,
            geometry,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let err = build_layout(&p, &mut rng).unwrap_err();
        assert_eq!(err, LayoutError::NonPositiveSpacing { spacing: 0.0 });
    }

    #[test]
    fn crossed_centers_rejected() {
        let geometry = GearGeometry {
            gear_gap: -150.0,
            ..test_geometry()
        };
        let p = LayoutParams {
            gear_count: 2,
            axis: Axis::Vertical,
            geometry,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(matches!(
            build_layout(&p, &mut rng),
            Err(LayoutError::NonPositiveSpacing { .. })
        ));
    }

    #[test]
    fn impossible_margin_reports_infeasible() {
        // Tooth tips pulled inside the body: tip circles of radius 1 sit
        // 1 px apart, so every facing pair is within the 119 px safety
        // margin at any rotation. With 3 teeth each gear always has at
        // least one facing tooth, so no angle can ever clear.
        let geometry = GearGeometry {
            radius: 100.0,
            tooth_count: 3,
            tooth_length: -99.0,
            gear_gap: -1.0,
        };
        assert!(geometry.spacing() > 0.0);
        let p = LayoutParams {
            gear_count: 3,
            axis: Axis::Horizontal,
            geometry,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let err = build_layout(&p, &mut rng).unwrap_err();
        assert_eq!(
            err,
            LayoutError::Infeasible {
                pair_index: 1,
                iterations: MAX_REFINE_ITERS
            }
        );
    }

    // ---- into_chain ----

    #[test]
    fn into_chain_alternates_directions() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let layout = build_layout(&params(4, Axis::Horizontal), &mut rng).unwrap();
        let chain = layout.into_chain(Direction::Clockwise).unwrap();
        assert_eq!(chain.root_direction(), Direction::Clockwise);
        assert_eq!(chain.last_direction(), Direction::CounterClockwise);
        assert!(chain.validate_alternation().is_ok());
    }

    #[test]
    fn into_chain_preserves_placements() {
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        let layout = build_layout(&params(3, Axis::Vertical), &mut rng).unwrap();
        let placements = layout.placements().to_vec();
        let chain = layout.into_chain(Direction::CounterClockwise).unwrap();
        for (gear, placement) in chain.gears().iter().zip(&placements) {
            assert_eq!(gear.index, placement.index);
            assert_eq!(gear.center, placement.center);
            assert!((gear.base_angle - placement.base_angle).abs() < f64::EPSILON);
            assert_eq!(gear.marker_tooth, placement.marker_tooth);
        }
    }
}
