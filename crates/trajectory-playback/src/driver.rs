//! Per-tick frame planning
//!
//! The driver owns the playback cursor. Every tick it reads the camera,
//! decides which slice of each vertex buffer is drawn, and advances the
//! cursor. It never touches the GPU; the renderer consumes the returned
//! [`FramePlan`].

use crate::params::{DisplayParams, PointScale};
use crate::playback::Playback;
use orbit_camera::{CameraUniform, OrbitCamera};
use std::ops::Range;
use trajectory_data::FrameBuffers;

/// Contiguous run of vertices in one of the trajectory buffers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawRange {
    pub start: usize,
    pub count: usize,
}

impl DrawRange {
    pub fn vertices(&self) -> Range<u32> {
        self.start as u32..(self.start + self.count) as u32
    }
}

/// Everything the renderer needs for one frame
#[derive(Clone, Debug)]
pub struct FramePlan {
    /// Timestep shown this frame
    pub step: usize,
    pub camera: CameraUniform,
    /// Bodies at `step` in the step-major point buffer
    pub points: DrawRange,
    /// One prefix per body in the body-major orbit buffer; empty when trails are off
    pub trails: Vec<DrawRange>,
    pub point_scale: PointScale,
}

#[derive(Debug, Clone)]
pub struct FrameDriver {
    playback: Playback,
    num_bodies: usize,
    params: DisplayParams,
    paused: bool,
}

impl FrameDriver {
    pub fn new(num_bodies: usize, num_steps: usize, params: DisplayParams) -> Self {
        Self {
            playback: Playback::new(num_steps),
            num_bodies,
            params,
            paused: false,
        }
    }

    pub fn for_buffers(buffers: &FrameBuffers, params: DisplayParams) -> Self {
        Self::new(buffers.num_bodies(), buffers.num_steps(), params)
    }

    /// Plan the frame for the current step, then advance the cursor.
    ///
    /// The first tick shows step 0. While paused the cursor stays put.
    pub fn tick(&mut self, camera: &OrbitCamera) -> FramePlan {
        let step = self.playback.cursor();
        let num_steps = self.playback.num_steps();

        let trails = if self.params.draw_orbits {
            (0..self.num_bodies)
                .map(|body| DrawRange {
                    start: body * num_steps,
                    count: step,
                })
                .collect()
        } else {
            Vec::new()
        };

        let plan = FramePlan {
            step,
            camera: camera.to_uniform(),
            points: DrawRange {
                start: step * self.num_bodies,
                count: self.num_bodies,
            },
            trails,
            point_scale: self.params.point_scale,
        };

        if !self.paused {
            self.playback.advance();
        }

        plan
    }

    pub fn cursor(&self) -> usize {
        self.playback.cursor()
    }

    pub fn num_steps(&self) -> usize {
        self.playback.num_steps()
    }

    pub fn params(&self) -> &DisplayParams {
        &self.params
    }

    pub fn draw_orbits(&self) -> bool {
        self.params.draw_orbits
    }

    pub fn set_draw_orbits(&mut self, draw_orbits: bool) {
        self.params.draw_orbits = draw_orbits;
    }

    pub fn toggle_orbits(&mut self) -> bool {
        self.params.draw_orbits = !self.params.draw_orbits;
        log::debug!("Orbit trails: {}", self.params.draw_orbits);
        self.params.draw_orbits
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        log::debug!("Playback paused: {}", self.paused);
        self.paused
    }

    /// Back to step 0
    pub fn restart(&mut self) {
        self.playback.rewind();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orbit_camera::CameraSettings;

    fn camera() -> OrbitCamera {
        OrbitCamera::new(CameraSettings::default(), 640, 480)
    }

    #[test]
    fn test_first_tick_shows_step_zero() {
        let mut driver = FrameDriver::new(2, 3, DisplayParams::default());
        let plan = driver.tick(&camera());

        assert_eq!(plan.step, 0);
        assert_eq!(plan.points, DrawRange { start: 0, count: 2 });
        assert_eq!(driver.cursor(), 1);
    }

    #[test]
    fn test_point_slice_follows_cursor() {
        let mut driver = FrameDriver::new(4, 5, DisplayParams::default());
        let camera = camera();

        for expected_step in [0, 1, 2, 3, 4, 0, 1] {
            let plan = driver.tick(&camera);
            assert_eq!(plan.step, expected_step);
            assert_eq!(plan.points.start, expected_step * 4);
            assert_eq!(plan.points.count, 4);
            assert!(driver.cursor() < 5);
        }
    }

    #[test]
    fn test_wraps_after_num_steps_ticks() {
        let mut driver = FrameDriver::new(3, 7, DisplayParams::default());
        let camera = camera();
        for _ in 0..7 {
            driver.tick(&camera);
        }
        assert_eq!(driver.cursor(), 0);
    }

    #[test]
    fn test_trail_prefixes() {
        let mut driver = FrameDriver::new(2, 3, DisplayParams::default());
        let camera = camera();
        driver.tick(&camera);
        driver.tick(&camera);
        let plan = driver.tick(&camera);

        assert_eq!(
            plan.trails,
            vec![
                DrawRange { start: 0, count: 2 },
                DrawRange { start: 3, count: 2 }
            ]
        );
        assert_eq!(plan.trails[1].vertices(), 3..5);
    }

    #[test]
    fn test_trails_toggle() {
        let params = DisplayParams {
            draw_orbits: false,
            ..Default::default()
        };
        let mut driver = FrameDriver::new(2, 3, params);
        assert!(driver.tick(&camera()).trails.is_empty());

        assert!(driver.toggle_orbits());
        assert_eq!(driver.tick(&camera()).trails.len(), 2);

        driver.set_draw_orbits(false);
        assert!(!driver.draw_orbits());
    }

    #[test]
    fn test_pause_and_restart() {
        let mut driver = FrameDriver::new(1, 10, DisplayParams::default());
        let camera = camera();
        driver.tick(&camera);
        driver.tick(&camera);

        assert!(driver.toggle_pause());
        assert_eq!(driver.tick(&camera).step, 2);
        assert_eq!(driver.tick(&camera).step, 2);

        driver.toggle_pause();
        driver.restart();
        assert_eq!(driver.tick(&camera).step, 0);
    }

    #[test]
    fn test_plan_carries_camera_and_scale() {
        let mut driver = FrameDriver::new(1, 1, DisplayParams::default());
        let camera = camera();
        let plan = driver.tick(&camera);

        assert_eq!(plan.camera.view, camera.view_matrix().to_cols_array_2d());
        assert_eq!(
            plan.camera.projection,
            camera.projection_matrix().to_cols_array_2d()
        );
        assert_eq!(plan.point_scale, PointScale::default());
    }
}
