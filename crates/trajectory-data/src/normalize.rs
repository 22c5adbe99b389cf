//! Rescaling of raw simulation units into a rendering-friendly range
//!
//! Normalization is split into three phases so that no value is finalized
//! before the whole dataset has been seen:
//!
//! 1. [`NormalizationScalars::from_trajectory`] scans every mass and coordinate
//! 2. the scale factors are derived from the finished scan
//! 3. [`FrameBuffers::build`] (or [`NormalizationScalars::scale_in_place`])
//!    applies them
//!
//! Positions are divided by the mean absolute coordinate, masses by the
//! largest mass. A zero, negative or non-finite divisor falls back to a scale
//! of `1.0`, so a degenerate dataset renders at its raw scale instead of
//! filling the buffers with NaN.

use crate::layout::FrameBuffers;
use crate::parser::Trajectory;

/// Dataset-wide divisors, computed before any scaling is applied
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizationScalars {
    /// Largest body mass
    pub max_mass: f64,
    /// Mean of `|coordinate|` over every body, step and axis
    pub avg_pos: f64,
    /// Largest `|coordinate|` over every body, step and axis
    pub max_abs_coordinate: f64,
}

impl NormalizationScalars {
    /// Full scan over the raw trajectory
    pub fn from_trajectory(trajectory: &Trajectory) -> Self {
        let max_mass = trajectory
            .masses()
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);

        let mut abs_sum = 0.0;
        let mut max_abs_coordinate: f64 = 0.0;
        for position in trajectory.positions() {
            let abs = position.abs();
            abs_sum += abs.element_sum();
            max_abs_coordinate = max_abs_coordinate.max(abs.max_element());
        }
        let avg_pos = abs_sum / (3 * trajectory.sample_count()) as f64;

        Self {
            max_mass,
            avg_pos,
            max_abs_coordinate,
        }
    }

    /// Multiplier applied to every coordinate
    pub fn position_scale(&self) -> f64 {
        reciprocal_or_one(self.avg_pos)
    }

    /// Multiplier applied to every mass
    pub fn mass_scale(&self) -> f64 {
        reciprocal_or_one(self.max_mass)
    }

    /// True when either divisor could not be used
    pub fn is_degenerate(&self) -> bool {
        !usable_divisor(self.avg_pos) || !usable_divisor(self.max_mass)
    }

    /// Largest coordinate magnitude after scaling
    pub fn normalized_extent(&self) -> f64 {
        self.max_abs_coordinate * self.position_scale()
    }

    /// Scale the trajectory's positions and masses in place
    pub fn scale_in_place(&self, trajectory: &mut Trajectory) {
        let position_scale = self.position_scale();
        let mass_scale = self.mass_scale();

        for position in &mut trajectory.positions {
            *position *= position_scale;
        }
        for mass in &mut trajectory.masses {
            *mass *= mass_scale;
        }
    }
}

/// Normalized, render-ready trajectory
#[derive(Debug, Clone)]
pub struct NormalizedTrajectory {
    pub scalars: NormalizationScalars,
    pub buffers: FrameBuffers,
}

/// Scan, then emit both vertex layouts with the resulting scale applied
pub fn normalize(trajectory: &Trajectory) -> NormalizedTrajectory {
    let scalars = NormalizationScalars::from_trajectory(trajectory);

    if scalars.is_degenerate() {
        log::warn!(
            "Degenerate dataset (max_mass={}, avg_pos={}), using unit scale where needed",
            scalars.max_mass,
            scalars.avg_pos
        );
    }

    log::info!(
        "Normalization: max_mass={:.4e}, avg_pos={:.4e}, normalized extent={:.3}",
        scalars.max_mass,
        scalars.avg_pos,
        scalars.normalized_extent()
    );

    let buffers = FrameBuffers::build(trajectory, &scalars);

    NormalizedTrajectory { scalars, buffers }
}

fn usable_divisor(value: f64) -> bool {
    value > 0.0 && value.is_finite() && (1.0 / value).is_finite()
}

fn reciprocal_or_one(value: f64) -> f64 {
    if usable_divisor(value) {
        1.0 / value
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_trajectory;
    use glam::DVec3;

    const EPS: f64 = 1e-12;

    fn two_bodies() -> Trajectory {
        parse_trajectory("2\n3\n1.0\n2.0\n0 0 0\n1 0 0\n2 0 0\n0 1 0\n0 2 0\n0 3 0\n").unwrap()
    }

    #[test]
    fn test_scalars_two_bodies() {
        let scalars = NormalizationScalars::from_trajectory(&two_bodies());

        // 9 / 18 absolute coordinate sum over 18 values
        assert!((scalars.avg_pos - 0.5).abs() < EPS);
        assert_eq!(scalars.max_mass, 2.0);
        assert_eq!(scalars.max_abs_coordinate, 3.0);
        assert!(!scalars.is_degenerate());
        assert!((scalars.position_scale() - 2.0).abs() < EPS);
        assert!((scalars.mass_scale() - 0.5).abs() < EPS);
        assert!((scalars.normalized_extent() - 6.0).abs() < EPS);
    }

    #[test]
    fn test_negative_coordinates_use_magnitude() {
        let trajectory = Trajectory::from_parts(
            vec![1.0],
            vec![DVec3::new(-3.0, 0.0, 0.0), DVec3::new(0.0, 0.0, 3.0)],
            2,
        )
        .unwrap();
        let scalars = NormalizationScalars::from_trajectory(&trajectory);

        assert!((scalars.avg_pos - 1.0).abs() < EPS);
        assert_eq!(scalars.max_abs_coordinate, 3.0);
    }

    #[test]
    fn test_scale_in_place() {
        let mut trajectory = two_bodies();
        let scalars = NormalizationScalars::from_trajectory(&trajectory);
        scalars.scale_in_place(&mut trajectory);

        assert_eq!(trajectory.masses(), &[0.5, 1.0]);
        assert_eq!(trajectory.position(1, 2), DVec3::new(0.0, 6.0, 0.0));

        // Mean absolute coordinate is one after scaling
        let rescanned = NormalizationScalars::from_trajectory(&trajectory);
        assert!((rescanned.avg_pos - 1.0).abs() < EPS);
        assert!((rescanned.max_mass - 1.0).abs() < EPS);
    }

    #[test]
    fn test_all_bodies_at_origin_falls_back_to_unit_scale() {
        let trajectory = Trajectory::from_parts(vec![4.0, 8.0], vec![DVec3::ZERO; 4], 2).unwrap();
        let normalized = normalize(&trajectory);

        assert_eq!(normalized.scalars.avg_pos, 0.0);
        assert!(normalized.scalars.is_degenerate());
        assert_eq!(normalized.scalars.position_scale(), 1.0);
        assert_eq!(normalized.scalars.mass_scale(), 0.125);
        assert!(normalized
            .buffers
            .points()
            .iter()
            .all(|p| p.position == [0.0; 3] && p.mass.is_finite()));
    }

    #[test]
    fn test_massless_bodies_fall_back_to_unit_scale() {
        let trajectory = Trajectory::from_parts(
            vec![0.0, 0.0],
            vec![DVec3::ONE, DVec3::ONE, DVec3::ONE, DVec3::ONE],
            2,
        )
        .unwrap();
        let normalized = normalize(&trajectory);

        assert_eq!(normalized.scalars.mass_scale(), 1.0);
        assert!(normalized.buffers.points().iter().all(|p| p.mass == 0.0));
        assert!(normalized
            .buffers
            .orbits()
            .iter()
            .all(|v| v.position == [1.0; 3]));
    }

    #[test]
    fn test_negative_max_mass_is_degenerate() {
        let trajectory = Trajectory::from_parts(vec![-1.0, -2.0], vec![DVec3::ONE; 2], 1).unwrap();
        let scalars = NormalizationScalars::from_trajectory(&trajectory);

        assert_eq!(scalars.max_mass, -1.0);
        assert!(scalars.is_degenerate());
        assert_eq!(scalars.mass_scale(), 1.0);
    }

    #[test]
    fn test_subnormal_divisor_does_not_overflow() {
        let scalars = NormalizationScalars {
            max_mass: f64::MIN_POSITIVE / 1.0e4,
            avg_pos: 1.0,
            max_abs_coordinate: 1.0,
        };
        assert_eq!(scalars.mass_scale(), 1.0);
        assert!(scalars.is_degenerate());
    }
}
