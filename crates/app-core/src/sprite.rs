//! Billboard layout math: how big the backing surface for a piece of content
//! is, and how large the billboard appears in world units.
//!
//! Rasterization itself lives in the frontend; this module only decides
//! sizes, so it stays pure and host-testable.

use crate::constants::{
    BASE_FONT_PX, BASE_SURFACE_H, BASE_SURFACE_W, FONT_SHRINK_PER_CHAR, HEART_FONT_PX,
    HEART_SCALE, HEART_SURFACE_PX, MAX_TEXT_LEN, MIN_FONT_PX, SURFACE_PAD_PX, TEXT_SCALE_X,
    TEXT_SCALE_Y,
};

/// What a rain drop displays.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpriteContent {
    Heart,
    Word(&'static str),
}

/// Backing-surface dimensions and world scale for one billboard.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteLayout {
    pub font_px: f32,
    pub surface_w: u32,
    pub surface_h: u32,
    pub scale_x: f32,
    pub scale_y: f32,
}

/// Compute the layout for a text billboard.
///
/// `measure` returns the rendered width in px of a string at a font size;
/// the frontend backs it with `CanvasRenderingContext2d::measure_text`.
/// Messages up to [`MAX_TEXT_LEN`] chars always use the base surface, so the
/// result is never zero-area even for an empty message. Longer messages
/// shrink the font (down to [`MIN_FONT_PX`]) and widen the surface to fit
/// the measured text plus padding. World scale grows with surface width so
/// the text reads at a constant apparent size.
pub fn text_layout(message: &str, measure: impl FnOnce(&str, f32) -> f32) -> SpriteLayout {
    let len = message.chars().count();
    if len <= MAX_TEXT_LEN {
        return SpriteLayout {
            font_px: BASE_FONT_PX,
            surface_w: BASE_SURFACE_W,
            surface_h: BASE_SURFACE_H,
            scale_x: TEXT_SCALE_X,
            scale_y: TEXT_SCALE_Y,
        };
    }

    let over = (len - MAX_TEXT_LEN) as f32;
    let font_px = (BASE_FONT_PX - over * FONT_SHRINK_PER_CHAR).max(MIN_FONT_PX);
    let measured = measure(message, font_px).max(0.0);
    let surface_w = ((measured + 2.0 * SURFACE_PAD_PX).ceil() as u32).max(BASE_SURFACE_W);
    let surface_h = ((font_px + 2.0 * SURFACE_PAD_PX).ceil() as u32).max(BASE_SURFACE_H);
    SpriteLayout {
        font_px,
        surface_w,
        surface_h,
        scale_x: TEXT_SCALE_X * surface_w as f32 / BASE_SURFACE_W as f32,
        scale_y: TEXT_SCALE_Y,
    }
}

/// Layout for the heart glyph: fixed square surface and world scale.
pub fn heart_layout() -> SpriteLayout {
    SpriteLayout {
        font_px: HEART_FONT_PX,
        surface_w: HEART_SURFACE_PX,
        surface_h: HEART_SURFACE_PX,
        scale_x: HEART_SCALE,
        scale_y: HEART_SCALE,
    }
}

// Radial gradient stops for the sparkle halo: (normalized radius, alpha).
const GLOW_STOPS: [(f32, f32); 3] = [(0.0, 0.9), (0.3, 0.5), (1.0, 0.0)];

/// White radial-gradient RGBA pixels for the sparkle glow texture.
pub fn glow_pixels(size: u32) -> Vec<u8> {
    let mut pixels = vec![0u8; (size * size * 4) as usize];
    let half = size as f32 / 2.0;
    for y in 0..size {
        for x in 0..size {
            let dx = x as f32 + 0.5 - half;
            let dy = y as f32 + 0.5 - half;
            let r = (dx * dx + dy * dy).sqrt() / half;
            let alpha = glow_alpha(r.min(1.0));
            let i = ((y * size + x) * 4) as usize;
            pixels[i] = 255;
            pixels[i + 1] = 255;
            pixels[i + 2] = 255;
            pixels[i + 3] = (alpha * 255.0).round() as u8;
        }
    }
    pixels
}

fn glow_alpha(r: f32) -> f32 {
    for pair in GLOW_STOPS.windows(2) {
        let (r0, a0) = pair[0];
        let (r1, a1) = pair[1];
        if r <= r1 {
            let t = if r1 > r0 { (r - r0) / (r1 - r0) } else { 0.0 };
            return a0 + (a1 - a0) * t;
        }
    }
    0.0
}
