//! # Trajectory Playback
//!
//! Playback cursor over precomputed timesteps and the per-tick frame plan
//! handed to the renderer.

pub mod driver;
pub mod params;
pub mod playback;
pub mod stats;

pub use driver::*;
pub use params::*;
pub use playback::*;
pub use stats::*;
