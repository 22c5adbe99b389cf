//! Orbit camera tuning

use std::f32::consts::{FRAC_PI_2, PI};

pub const DEFAULT_RADIUS: f32 = 2.0;
pub const DEFAULT_FOV_DEGREES: f32 = 90.0;
pub const DEFAULT_NEAR: f32 = 0.1;
/// Normalized scenes sit within a few units of the origin
pub const DEFAULT_FAR: f32 = 10000.0;
pub const DEFAULT_DRAG_SPEED: f32 = 0.005;
pub const DEFAULT_SCROLL_SPEED: f32 = 1.05;
pub const DEFAULT_POLAR_EPSILON: f32 = 0.001;

/// How the polar angle is kept inside `[0, π]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PolarClamp {
    /// Clamp into `[epsilon, π - epsilon]`; the eye never reaches a pole,
    /// where it would be parallel to the up vector.
    Guarded { epsilon: f32 },
    /// Clamp into `[0, π]`. Reaching either bound produces a degenerate
    /// look-at matrix; kept only to reproduce older recordings.
    Legacy,
}

impl Default for PolarClamp {
    fn default() -> Self {
        PolarClamp::Guarded {
            epsilon: DEFAULT_POLAR_EPSILON,
        }
    }
}

impl PolarClamp {
    /// Inclusive `(min, max)` bounds of the polar angle
    pub fn bounds(&self) -> (f32, f32) {
        match *self {
            PolarClamp::Guarded { epsilon } => {
                let epsilon = if epsilon.is_finite() {
                    epsilon.clamp(0.0, FRAC_PI_2)
                } else {
                    DEFAULT_POLAR_EPSILON
                };
                (epsilon, (PI - epsilon).max(epsilon))
            }
            PolarClamp::Legacy => (0.0, PI),
        }
    }

    pub fn apply(&self, polar: f32) -> f32 {
        let (min, max) = self.bounds();
        polar.clamp(min, max)
    }
}

/// Startup values and input sensitivities of an [`OrbitCamera`](crate::OrbitCamera)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSettings {
    /// Initial distance from the origin
    pub radius: f32,
    /// Vertical field of view in radians
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    /// Radians of rotation per pixel of pointer travel
    pub drag_speed: f32,
    /// Multiplicative zoom factor per wheel notch
    pub scroll_speed: f32,
    pub polar_clamp: PolarClamp,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            radius: DEFAULT_RADIUS,
            fov_y: DEFAULT_FOV_DEGREES.to_radians(),
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
            drag_speed: DEFAULT_DRAG_SPEED,
            scroll_speed: DEFAULT_SCROLL_SPEED,
            polar_clamp: PolarClamp::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guarded_bounds() {
        let (min, max) = PolarClamp::default().bounds();
        assert_eq!(min, 0.001);
        assert_eq!(max, PI - 0.001);
    }

    #[test]
    fn test_guarded_epsilon_is_sanitized() {
        let (min, max) = PolarClamp::Guarded { epsilon: 10.0 }.bounds();
        assert!(min <= max);

        let (min, _) = PolarClamp::Guarded { epsilon: f32::NAN }.bounds();
        assert_eq!(min, DEFAULT_POLAR_EPSILON);

        let (min, _) = PolarClamp::Guarded { epsilon: -1.0 }.bounds();
        assert_eq!(min, 0.0);
    }

    #[test]
    fn test_legacy_allows_poles() {
        assert_eq!(PolarClamp::Legacy.apply(-0.5), 0.0);
        assert_eq!(PolarClamp::Legacy.apply(4.0), PI);
        assert_eq!(PolarClamp::default().apply(-0.5), 0.001);
    }

    #[test]
    fn test_default_settings() {
        let settings = CameraSettings::default();
        assert_eq!(settings.radius, 2.0);
        assert!((settings.fov_y - FRAC_PI_2).abs() < 1e-6);
        assert_eq!(settings.drag_speed, 0.005);
        assert_eq!(settings.scroll_speed, 1.05);
        assert!(settings.far > settings.near);
    }
}
