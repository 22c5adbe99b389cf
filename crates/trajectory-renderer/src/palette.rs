//! Catppuccin Mocha colors in linear space for an sRGB surface

use catppuccin::PALETTE;

/// Clear color; the scene is drawn on black
pub const BACKGROUND: wgpu::Color = wgpu::Color::BLACK;

pub fn point_color() -> [f32; 4] {
    let rgb = PALETTE.mocha.colors.rosewater.rgb;
    linear_rgba([rgb.r, rgb.g, rgb.b], 1.0)
}

pub fn trail_color() -> [f32; 4] {
    let rgb = PALETTE.mocha.colors.blue.rgb;
    linear_rgba([rgb.r, rgb.g, rgb.b], 0.45)
}

pub fn linear_rgba(srgb: [u8; 3], alpha: f32) -> [f32; 4] {
    let [r, g, b] = srgb.map(|c| srgb_to_linear(c as f32 / 255.0));
    [r, g, b, alpha]
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}
