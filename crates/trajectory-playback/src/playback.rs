//! Timestep cursor

/// Integer step counter in `[0, num_steps)`, wrapping on advance
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Playback {
    cursor: usize,
    num_steps: usize,
}

impl Playback {
    /// A zero step count is treated as one so the cursor range is never empty
    pub fn new(num_steps: usize) -> Self {
        Self {
            cursor: 0,
            num_steps: num_steps.max(1),
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn num_steps(&self) -> usize {
        self.num_steps
    }

    pub fn advance(&mut self) {
        self.cursor = (self.cursor + 1) % self.num_steps;
    }

    pub fn rewind(&mut self) {
        self.cursor = 0;
    }
}
