//! # Trajectory Renderer
//!
//! wgpu rendering of a normalized trajectory: point sprites for the bodies at
//! the current step and line strips for their orbit trails.

pub mod buffers;
pub mod palette;
pub mod renderer;

pub use buffers::*;
pub use renderer::*;
