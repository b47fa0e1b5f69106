//! # Text and Neon Styling
//!
//! Styling is passed around as plain immutable values instead of module-level
//! constants: the [`TextStyle`] template is what the measurer and the sizer see,
//! and [`NeonStyle`] is what the renderers use to paint the glow.

use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use serde::{Deserialize, Serialize};

/// Font template shared by measurement and drawing.
///
/// The template is fixed for the lifetime of the display; only `size` varies
/// while the sizer searches.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Font family name
    pub family: String,
    /// CSS-style weight (400 regular, 700 bold)
    pub weight: u16,
    /// Extra horizontal space between glyphs, in pixels
    pub letter_spacing: f32,
    /// Font size in pixels
    pub size: f32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            family: "Inter".to_string(),
            weight: 700,
            letter_spacing: 0.0,
            size: 16.0,
        }
    }
}

impl TextStyle {
    /// Copy of this template at a different font size.
    pub fn at_size(&self, size: f32) -> Self {
        Self {
            size,
            ..self.clone()
        }
    }
}

/// One halo drawn behind the main text.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlowLayer {
    pub color: Rgb888,
    /// Opacity in `0.0..=1.0`
    pub alpha: f32,
    /// Blur radius in pixels
    pub blur_radius: f32,
}

impl GlowLayer {
    /// The layer colour composited over `background`.
    pub fn composited_over(&self, background: Rgb888) -> Rgb888 {
        blend(self.color, background, self.alpha)
    }
}

/// Colours and glow layers for the neon look.
///
/// `glow` is ordered outermost first; renderers paint it in order and the main
/// colour last so the sharp core ends up on top.
#[derive(Clone, Debug, PartialEq)]
pub struct NeonStyle {
    pub background: Rgb888,
    pub color: Rgb888,
    pub glow: Vec<GlowLayer>,
}

/// Bright neon green used for the text itself.
pub const NEON_GREEN: Rgb888 = Rgb888::new(0x39, 0xFF, 0x14);
pub const NEON_GREEN_MID: Rgb888 = Rgb888::new(0x20, 0xCC, 0x00);
pub const NEON_GREEN_DIM: Rgb888 = Rgb888::new(0x0D, 0x55, 0x00);

impl Default for NeonStyle {
    fn default() -> Self {
        Self {
            background: Rgb888::BLACK,
            color: NEON_GREEN,
            glow: vec![
                GlowLayer {
                    color: NEON_GREEN_DIM,
                    alpha: 0.20,
                    blur_radius: 18.0,
                },
                GlowLayer {
                    color: NEON_GREEN_MID,
                    alpha: 0.45,
                    blur_radius: 6.0,
                },
                GlowLayer {
                    color: NEON_GREEN,
                    alpha: 0.95,
                    blur_radius: 2.0,
                },
            ],
        }
    }
}

/// Linear alpha blend of `fg` over `bg`.
pub fn blend(fg: Rgb888, bg: Rgb888, alpha: f32) -> Rgb888 {
    let alpha = alpha.clamp(0.0, 1.0);
    let mix = |f: u8, b: u8| (f32::from(f) * alpha + f32::from(b) * (1.0 - alpha)).round() as u8;
    Rgb888::new(mix(fg.r(), bg.r()), mix(fg.g(), bg.g()), mix(fg.b(), bg.b()))
}
