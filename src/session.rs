//! Window-independent viewer state
//!
//! One session per run. It owns the camera, the frame driver and the
//! CPU-side vertex layouts; the event loop forwards input here and asks
//! for a [`FramePlan`] on every redraw.

use crate::config::ViewerConfig;
use orbit_camera::{CameraEvent, OrbitCamera};
use std::time::Instant;
use trajectory_data::{FrameBuffers, NormalizedTrajectory};
use trajectory_playback::{FrameDriver, FramePlan, FrameStats};

pub struct Session {
    camera: OrbitCamera,
    driver: FrameDriver,
    stats: FrameStats,
    frames: FrameBuffers,
    cursor: Option<(f32, f32)>,
    last_step: usize,
    last_frame_time: Instant,
}

impl Session {
    pub fn new(normalized: NormalizedTrajectory, config: &ViewerConfig) -> Self {
        let NormalizedTrajectory { scalars, buffers } = normalized;
        let camera = OrbitCamera::new(config.camera_settings(), config.width, config.height);

        let extent = scalars.normalized_extent() as f32;
        if extent + camera.radius >= camera.zfar {
            log::warn!(
                "Scene extent {:.1} at radius {:.1} reaches the far plane ({}), distant bodies will be clipped",
                extent,
                camera.radius,
                camera.zfar
            );
        }

        let driver = FrameDriver::for_buffers(&buffers, config.display_params());

        Self {
            camera,
            driver,
            stats: FrameStats::new(),
            frames: buffers,
            cursor: None,
            last_step: 0,
            last_frame_time: Instant::now(),
        }
    }

    pub fn frames(&self) -> &FrameBuffers {
        &self.frames
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn driver(&self) -> &FrameDriver {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut FrameDriver {
        &mut self.driver
    }

    pub fn cursor_moved(&mut self, x: f32, y: f32) {
        self.cursor = Some((x, y));
        if self.camera.is_dragging() {
            self.camera.handle(CameraEvent::DragMove { x, y });
        }
    }

    pub fn left_button(&mut self, pressed: bool) {
        if pressed {
            let (x, y) = self.cursor.unwrap_or_default();
            self.camera.handle(CameraEvent::BeginDrag { x, y });
        } else {
            self.camera.handle(CameraEvent::EndDrag);
        }
    }

    /// Positive `delta_y` zooms out
    pub fn scroll(&mut self, delta_y: f32) {
        self.camera.handle(CameraEvent::Scroll { delta_y });
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.handle(CameraEvent::Resize { width, height });
    }

    /// Record the frame time and plan the next frame
    pub fn next_frame(&mut self) -> FramePlan {
        let now = Instant::now();
        let frame_time = (now - self.last_frame_time).as_secs_f32() * 1000.0;
        self.last_frame_time = now;
        self.stats.record(frame_time);

        let plan = self.driver.tick(&self.camera);
        self.last_step = plan.step;
        plan
    }

    pub fn title(&self) -> String {
        format!(
            "N-Body Viewer - {:.0} FPS ({:.2}ms) - step {}/{} - {} bodies{}",
            self.stats.fps(),
            self.stats.average_frame_time(),
            self.last_step + 1,
            self.driver.num_steps(),
            self.frames.num_bodies(),
            if self.driver.is_paused() { " [paused]" } else { "" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;
    use trajectory_data::{normalize, Trajectory};

    fn session() -> Session {
        let trajectory = Trajectory::from_parts(
            vec![1.0, 2.0],
            vec![
                DVec3::new(1.0, 0.0, 0.0),
                DVec3::new(2.0, 0.0, 0.0),
                DVec3::new(3.0, 0.0, 0.0),
                DVec3::new(-1.0, 0.0, 0.0),
                DVec3::new(-2.0, 0.0, 0.0),
                DVec3::new(-3.0, 0.0, 0.0),
            ],
            3,
        )
        .unwrap();
        Session::new(normalize(&trajectory), &ViewerConfig::default())
    }

    #[test]
    fn test_drag_starts_at_last_cursor() {
        let mut session = session();
        let start = session.camera().azimuth();

        session.cursor_moved(100.0, 100.0);
        assert_eq!(session.camera().azimuth(), start);

        session.left_button(true);
        session.cursor_moved(110.0, 100.0);
        let expected = start + 10.0 * session.camera().drag_speed;
        assert!((session.camera().azimuth() - expected).abs() < 1e-5);

        session.left_button(false);
        session.cursor_moved(200.0, 100.0);
        assert!((session.camera().azimuth() - expected).abs() < 1e-5);
    }

    #[test]
    fn test_scroll_and_resize() {
        let mut session = session();
        let radius = session.camera().radius;

        session.scroll(1.0);
        assert!(session.camera().radius > radius);

        session.resize(800, 400);
        assert_eq!(session.camera().aspect, 2.0);
    }

    #[test]
    fn test_frames_cycle_through_steps() {
        let mut session = session();
        let steps: Vec<usize> = (0..4).map(|_| session.next_frame().step).collect();
        assert_eq!(steps, vec![0, 1, 2, 0]);
        assert!(session.title().contains("step 1/3"));
        assert!(session.title().contains("2 bodies"));
    }

    #[test]
    fn test_paused_title() {
        let mut session = session();
        session.driver_mut().toggle_pause();
        session.next_frame();
        assert!(session.title().ends_with("[paused]"));
        assert_eq!(session.driver().cursor(), 0);
    }
}
