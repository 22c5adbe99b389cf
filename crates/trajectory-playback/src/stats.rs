//! Rolling frame timing

use std::collections::VecDeque;

const WINDOW: usize = 100;

/// Average frame time over the last hundred frames
#[derive(Debug, Clone, Default)]
pub struct FrameStats {
    frame_times: VecDeque<f32>,
}

impl FrameStats {
    pub fn new() -> Self {
        Self {
            frame_times: VecDeque::with_capacity(WINDOW),
        }
    }

    /// Record one frame duration in milliseconds
    pub fn record(&mut self, frame_time_ms: f32) {
        self.frame_times.push_back(frame_time_ms);
        if self.frame_times.len() > WINDOW {
            self.frame_times.pop_front();
        }
    }

    pub fn average_frame_time(&self) -> f32 {
        if self.frame_times.is_empty() {
            return 0.0;
        }
        self.frame_times.iter().sum::<f32>() / self.frame_times.len() as f32
    }

    pub fn fps(&self) -> f32 {
        let average = self.average_frame_time();
        if average > 0.0 {
            1000.0 / average
        } else {
            0.0
        }
    }
}
