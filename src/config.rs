//! Viewer configuration: defaults, optional YAML file, command-line overrides
//!
//! ```yaml
//! data: data/output.txt
//! width: 1600
//! height: 900
//! camera:
//!   radius: 2.0
//!   fov_degrees: 90.0
//!   near: 0.1
//!   far: 10000.0
//!   drag_speed: 0.005
//!   scroll_speed: 1.05
//!   polar_epsilon: 0.001
//!   legacy_polar_clamp: false
//! render:
//!   draw_orbits: true
//!   relative_size: 0.8
//!   absolute_size: 1.5
//! ```
//!
//! Every key is optional.

use anyhow::{ensure, Context, Result};
use clap::Parser;
use orbit_camera::{
    CameraSettings, PolarClamp, DEFAULT_DRAG_SPEED, DEFAULT_FAR, DEFAULT_FOV_DEGREES,
    DEFAULT_NEAR, DEFAULT_POLAR_EPSILON, DEFAULT_RADIUS, DEFAULT_SCROLL_SPEED,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use trajectory_playback::{
    DisplayParams, PointScale, DEFAULT_ABSOLUTE_SIZE, DEFAULT_RELATIVE_SIZE,
};

#[derive(Parser, Debug)]
#[command(name = "nbody-viewer", version, about = "Play back precomputed N-body trajectories")]
pub struct Args {
    /// Trajectory file to play back
    #[arg(short, long)]
    pub data: Option<PathBuf>,

    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Start with orbit trails hidden
    #[arg(long)]
    pub no_orbits: bool,

    /// Vertical field of view in degrees
    #[arg(long)]
    pub fov: Option<f32>,

    /// Initial camera distance from the origin
    #[arg(long)]
    pub radius: Option<f32>,
}

impl Args {
    /// Defaults, then the config file, then flags
    pub fn resolve(&self) -> Result<ViewerConfig> {
        let mut config = match &self.config {
            Some(path) => ViewerConfig::load(path)?,
            None => ViewerConfig::default(),
        };

        if let Some(data) = &self.data {
            config.data = data.clone();
        }
        if self.no_orbits {
            config.render.draw_orbits = false;
        }
        if let Some(fov) = self.fov {
            config.camera.fov_degrees = fov;
        }
        if let Some(radius) = self.radius {
            config.camera.radius = radius;
        }

        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    /// Trajectory file
    pub data: PathBuf,
    /// Initial window size in logical pixels
    pub width: u32,
    pub height: u32,
    pub camera: CameraConfig,
    pub render: RenderConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            data: PathBuf::from("data/output.txt"),
            width: 1600,
            height: 900,
            camera: CameraConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraConfig {
    pub radius: f32,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub drag_speed: f32,
    pub scroll_speed: f32,
    pub polar_epsilon: f32,
    /// Clamp polar into [0, π] with no epsilon; degenerate at the poles
    pub legacy_polar_clamp: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            radius: DEFAULT_RADIUS,
            fov_degrees: DEFAULT_FOV_DEGREES,
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
            drag_speed: DEFAULT_DRAG_SPEED,
            scroll_speed: DEFAULT_SCROLL_SPEED,
            polar_epsilon: DEFAULT_POLAR_EPSILON,
            legacy_polar_clamp: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    pub draw_orbits: bool,
    pub relative_size: f32,
    pub absolute_size: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            draw_orbits: true,
            relative_size: DEFAULT_RELATIVE_SIZE,
            absolute_size: DEFAULT_ABSOLUTE_SIZE,
        }
    }
}

impl ViewerConfig {
    pub fn from_yaml(text: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(text)?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_yaml(&text).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        let camera = &self.camera;
        ensure!(
            camera.radius > 0.0 && camera.radius.is_finite(),
            "camera.radius must be positive, got {}",
            camera.radius
        );
        ensure!(
            camera.fov_degrees > 0.0 && camera.fov_degrees < 180.0,
            "camera.fov_degrees must be in (0, 180), got {}",
            camera.fov_degrees
        );
        ensure!(
            camera.near > 0.0,
            "camera.near must be positive, got {}",
            camera.near
        );
        ensure!(
            camera.far > camera.near && camera.far.is_finite(),
            "camera.far ({}) must exceed camera.near ({})",
            camera.far,
            camera.near
        );
        ensure!(
            camera.drag_speed.is_finite(),
            "camera.drag_speed must be finite"
        );
        ensure!(
            camera.scroll_speed > 1.0 && camera.scroll_speed.is_finite(),
            "camera.scroll_speed must be greater than 1, got {}",
            camera.scroll_speed
        );
        ensure!(
            (0.0..std::f32::consts::FRAC_PI_2).contains(&camera.polar_epsilon),
            "camera.polar_epsilon must be in [0, π/2), got {}",
            camera.polar_epsilon
        );
        ensure!(
            self.render.relative_size >= 0.0 && self.render.absolute_size >= 0.0,
            "render sizes must not be negative"
        );
        ensure!(
            self.width > 0 && self.height > 0,
            "window size must be non-zero"
        );
        Ok(())
    }

    pub fn camera_settings(&self) -> CameraSettings {
        let camera = &self.camera;
        let polar_clamp = if camera.legacy_polar_clamp {
            PolarClamp::Legacy
        } else {
            PolarClamp::Guarded {
                epsilon: camera.polar_epsilon,
            }
        };

        CameraSettings {
            radius: camera.radius,
            fov_y: camera.fov_degrees.to_radians(),
            near: camera.near,
            far: camera.far,
            drag_speed: camera.drag_speed,
            scroll_speed: camera.scroll_speed,
            polar_clamp,
        }
    }

    pub fn display_params(&self) -> DisplayParams {
        DisplayParams {
            draw_orbits: self.render.draw_orbits,
            point_scale: PointScale {
                relative: self.render.relative_size,
                absolute: self.render.absolute_size,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ViewerConfig::default();
        config.validate().unwrap();

        assert_eq!(config.camera_settings(), CameraSettings::default());
        assert_eq!(config.display_params(), DisplayParams::default());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = ViewerConfig::from_yaml(
            "data: runs/solar.txt\ncamera:\n  radius: 5.0\nrender:\n  draw_orbits: false\n",
        )
        .unwrap();

        assert_eq!(config.data, PathBuf::from("runs/solar.txt"));
        assert_eq!(config.camera.radius, 5.0);
        assert_eq!(config.camera.scroll_speed, DEFAULT_SCROLL_SPEED);
        assert!(!config.render.draw_orbits);
        assert_eq!(config.render.relative_size, DEFAULT_RELATIVE_SIZE);
    }

    #[test]
    fn test_example_config_parses() {
        let config = ViewerConfig::from_yaml(include_str!("../config/viewer.yaml")).unwrap();
        config.validate().unwrap();
        assert_eq!(config, ViewerConfig::default());
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(ViewerConfig::from_yaml("camera:\n  zoom: 3\n").is_err());
    }

    #[test]
    fn test_validation() {
        let mut config = ViewerConfig::default();
        config.camera.far = 0.05;
        assert!(config.validate().is_err());

        let mut config = ViewerConfig::default();
        config.camera.scroll_speed = 0.9;
        assert!(config.validate().is_err());

        let mut config = ViewerConfig::default();
        config.camera.fov_degrees = 180.0;
        assert!(config.validate().is_err());

        let mut config = ViewerConfig::default();
        config.camera.radius = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_legacy_clamp_setting() {
        let mut config = ViewerConfig::default();
        config.camera.legacy_polar_clamp = true;
        assert_eq!(config.camera_settings().polar_clamp, PolarClamp::Legacy);
    }

    #[test]
    fn test_flags_override_defaults() {
        let args = Args::try_parse_from([
            "nbody-viewer",
            "--data",
            "other.txt",
            "--no-orbits",
            "--fov",
            "60",
            "--radius",
            "3.5",
        ])
        .unwrap();
        let config = args.resolve().unwrap();

        assert_eq!(config.data, PathBuf::from("other.txt"));
        assert!(!config.render.draw_orbits);
        assert_eq!(config.camera.fov_degrees, 60.0);
        assert_eq!(config.camera.radius, 3.5);
    }

    #[test]
    fn test_invalid_flag_value_fails_resolve() {
        let args = Args::try_parse_from(["nbody-viewer", "--radius", "-1"]).unwrap();
        assert!(args.resolve().is_err());
    }
}
