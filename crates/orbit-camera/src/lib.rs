//! # Orbit Camera
//!
//! Spherical-coordinate camera orbiting the origin. Pointer and wheel input
//! arrive as [`CameraEvent`]s; view and projection matrices are derived from
//! the current state every frame.

pub mod camera;
pub mod settings;

pub use camera::*;
pub use settings::*;
