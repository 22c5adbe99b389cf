//! Display parameters for runtime toggling

pub const DEFAULT_RELATIVE_SIZE: f32 = 0.8;
pub const DEFAULT_ABSOLUTE_SIZE: f32 = 1.5;

/// Sprite size factors passed to the point shader
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointScale {
    /// Contribution of the normalized mass to sprite size
    pub relative: f32,
    /// Minimum sprite size in pixels
    pub absolute: f32,
}

impl Default for PointScale {
    fn default() -> Self {
        Self {
            relative: DEFAULT_RELATIVE_SIZE,
            absolute: DEFAULT_ABSOLUTE_SIZE,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayParams {
    /// Draw a trail behind every body up to the current step
    pub draw_orbits: bool,
    pub point_scale: PointScale,
}

impl Default for DisplayParams {
    fn default() -> Self {
        Self {
            draw_orbits: true,
            point_scale: PointScale::default(),
        }
    }
}
