//! Angle wrapping helpers shared by the layout builder and the simulator.
//!
//! Screen convention throughout the workspace: +x right, +y down, angles in
//! radians increasing clockwise.

use std::f64::consts::{PI, TAU};

/// Wrap an angle into `[-PI, PI)`.
#[must_use]
pub fn wrap_signed(angle: f64) -> f64 {
    (angle + PI).rem_euclid(TAU) - PI
}

/// Wrap an angle into `[0, TAU)`.
#[must_use]
pub fn wrap_positive(angle: f64) -> f64 {
    angle.rem_euclid(TAU)
}

/// Angular separation between two absolute angles, mapped into `[0, PI]`.
///
/// This is the quantity the stop predicate compares against PI: two teeth
/// pointing in exactly opposite directions have separation PI.
#[must_use]
pub fn separation(a: f64, b: f64) -> f64 {
    wrap_signed(a - b).abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    const TOL: f64 = 1e-12;

    #[test]
    fn wrap_signed_identity_in_range() {
        assert!((wrap_signed(1.0) - 1.0).abs() < TOL);
        assert!((wrap_signed(-1.0) - (-1.0)).abs() < TOL);
    }

    #[test]
    fn wrap_signed_above_pi() {
        assert!((wrap_signed(PI + 0.5) - (-PI + 0.5)).abs() < TOL);
    }

    #[test]
    fn wrap_signed_below_minus_pi() {
        assert!((wrap_signed(-PI - 0.5) - (PI - 0.5)).abs() < TOL);
    }

    #[test]
    fn wrap_signed_multiple_turns() {
        assert!((wrap_signed(5.0 * TAU + 0.25) - 0.25).abs() < 1e-9);
    }

    #[test]
    fn wrap_signed_pi_maps_to_minus_pi() {
        assert!((wrap_signed(PI) - (-PI)).abs() < TOL);
    }

    #[test]
    fn wrap_positive_range() {
        assert!((wrap_positive(-0.5) - (TAU - 0.5)).abs() < TOL);
        assert!((wrap_positive(TAU + 0.5) - 0.5).abs() < TOL);
        assert!(wrap_positive(0.0).abs() < TOL);
    }

    #[test]
    fn separation_symmetric() {
        let s1 = separation(0.3, 2.1);
        let s2 = separation(2.1, 0.3);
        assert!((s1 - s2).abs() < TOL);
    }

    #[test]
    fn separation_opposite_is_pi() {
        assert!((separation(0.0, PI) - PI).abs() < TOL);
        assert!((separation(FRAC_PI_2, FRAC_PI_2 + PI) - PI).abs() < TOL);
    }

    #[test]
    fn separation_equal_is_zero() {
        assert!(separation(1.23, 1.23).abs() < TOL);
        assert!(separation(1.23, 1.23 + TAU).abs() < 1e-9);
    }

    #[test]
    fn separation_never_exceeds_pi() {
        for i in 0..100 {
            let a = f64::from(i) * 0.37;
            let b = f64::from(i) * -0.91;
            let s = separation(a, b);
            assert!((0.0..=PI + TOL).contains(&s));
        }
    }
}
