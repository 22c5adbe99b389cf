//! Spherical orbit camera around the origin

use crate::settings::{CameraSettings, PolarClamp};
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3};
use std::f32::consts::{FRAC_PI_2, TAU};

/// Camera uniform for GPU
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct CameraUniform {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub view_proj: [[f32; 4]; 4],
    pub eye: [f32; 3],
    pub _padding: f32,
}

/// Input delivered by the host window
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraEvent {
    /// Pointer pressed at screen position
    BeginDrag { x: f32, y: f32 },
    /// Pointer moved; only rotates while a drag is active
    DragMove { x: f32, y: f32 },
    EndDrag,
    /// Wheel delta; positive zooms out, negative zooms in
    Scroll { delta_y: f32 },
    /// Viewport size in pixels
    Resize { width: u32, height: u32 },
}

/// Camera on a sphere of `radius` around the origin, looking at the origin
/// with +Y up.
///
/// Azimuth is kept in `[0, 2π)` and polar inside the bounds of the
/// configured [`PolarClamp`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    pub radius: f32,
    azimuth: f32,
    polar: f32,
    pub fov_y: f32,
    pub aspect: f32,
    pub znear: f32,
    pub zfar: f32,
    pub drag_speed: f32,
    pub scroll_speed: f32,
    polar_clamp: PolarClamp,
    drag_anchor: Option<Vec2>,
}

impl OrbitCamera {
    pub fn new(settings: CameraSettings, width: u32, height: u32) -> Self {
        let mut camera = Self {
            radius: settings.radius,
            azimuth: FRAC_PI_2,
            polar: settings.polar_clamp.apply(FRAC_PI_2),
            fov_y: settings.fov_y,
            aspect: 1.0,
            znear: settings.near,
            zfar: settings.far,
            drag_speed: settings.drag_speed,
            scroll_speed: settings.scroll_speed,
            polar_clamp: settings.polar_clamp,
            drag_anchor: None,
        };
        camera.resize(width, height);
        camera
    }

    pub fn azimuth(&self) -> f32 {
        self.azimuth
    }

    pub fn polar(&self) -> f32 {
        self.polar
    }

    pub fn polar_clamp(&self) -> PolarClamp {
        self.polar_clamp
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_anchor.is_some()
    }

    /// Set both angles, wrapping azimuth and clamping polar
    pub fn set_angles(&mut self, azimuth: f32, polar: f32) {
        self.azimuth = wrap_azimuth(azimuth);
        self.polar = self.polar_clamp.apply(polar);
    }

    /// Add angle deltas in radians
    pub fn rotate(&mut self, delta_azimuth: f32, delta_polar: f32) {
        self.set_angles(self.azimuth + delta_azimuth, self.polar + delta_polar);
    }

    pub fn begin_drag(&mut self, x: f32, y: f32) {
        self.drag_anchor = Some(Vec2::new(x, y));
    }

    pub fn drag_move(&mut self, x: f32, y: f32) {
        let Some(anchor) = self.drag_anchor else {
            return;
        };

        let position = Vec2::new(x, y);
        let delta = position - anchor;
        self.drag_anchor = Some(position);

        // Screen y grows downwards; dragging up lowers the polar angle
        self.rotate(delta.x * self.drag_speed, -delta.y * self.drag_speed);

        log::trace!(
            "Camera drag: azimuth={:.4}, polar={:.4}",
            self.azimuth,
            self.polar
        );
    }

    pub fn end_drag(&mut self) {
        self.drag_anchor = None;
    }

    pub fn scroll(&mut self, delta_y: f32) {
        if delta_y > 0.0 {
            self.radius *= self.scroll_speed;
        } else if delta_y < 0.0 {
            self.radius /= self.scroll_speed;
        }
    }

    /// Recompute aspect ratio; a zero-sized (minimized) viewport is ignored
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn handle(&mut self, event: CameraEvent) {
        match event {
            CameraEvent::BeginDrag { x, y } => self.begin_drag(x, y),
            CameraEvent::DragMove { x, y } => self.drag_move(x, y),
            CameraEvent::EndDrag => self.end_drag(),
            CameraEvent::Scroll { delta_y } => self.scroll(delta_y),
            CameraEvent::Resize { width, height } => self.resize(width, height),
        }
    }

    /// Pure transition: the state after `event`
    #[must_use]
    pub fn apply(mut self, event: CameraEvent) -> Self {
        self.handle(event);
        self
    }

    pub fn eye(&self) -> Vec3 {
        let (sin_az, cos_az) = self.azimuth.sin_cos();
        let (sin_pol, cos_pol) = self.polar.sin_cos();
        self.radius * Vec3::new(cos_az * sin_pol, cos_pol, sin_az * sin_pol)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), Vec3::ZERO, Vec3::Y)
    }

    /// Right-handed perspective with wgpu's `[0, 1]` depth range
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.znear, self.zfar)
    }

    pub fn build_view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn to_uniform(&self) -> CameraUniform {
        let view = self.view_matrix();
        let projection = self.projection_matrix();
        CameraUniform {
            view: view.to_cols_array_2d(),
            projection: projection.to_cols_array_2d(),
            view_proj: (projection * view).to_cols_array_2d(),
            eye: self.eye().to_array(),
            _padding: 0.0,
        }
    }
}

/// `rem_euclid` can round up to exactly `TAU` for tiny negative inputs
fn wrap_azimuth(azimuth: f32) -> f32 {
    let wrapped = azimuth.rem_euclid(TAU);
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}
