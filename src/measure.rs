//! # Text Measurement
//!
//! The sizer never rasterizes anything itself. It asks a [`TextMeasurer`] how big a
//! string would be at a given [`TextStyle`] and bisects on the answer, so any
//! backend works as long as it is deterministic for fixed inputs.
//!
//! Two measurers ship with the crate:
//! - [`MonoMetricsMeasurer`]: linear scaling of an `embedded-graphics` monospaced
//!   font cell. Matches what the frame buffer renderer actually draws.
//! - [`HeuristicMeasurer`]: fixed em ratios, handy for proportional fonts when no
//!   real metrics are available.

use crate::style::TextStyle;
use embedded_graphics::mono_font::{ascii::FONT_10X20, MonoFont};
use thiserror::Error;

/// Measurement failures. These are treated as defects by callers and abort the
/// current render pass.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeasureError {
    /// Font size was zero, negative or not finite
    #[error("invalid font size: {0}")]
    InvalidSize(f32),
}

/// Rendered pixel extent of a string.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct TextBounds {
    pub width: f32,
    pub height: f32,
}

/// Oracle answering "how large is this text at this style".
pub trait TextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> Result<TextBounds, MeasureError>;
}

impl<M: TextMeasurer + ?Sized> TextMeasurer for &M {
    fn measure(&self, text: &str, style: &TextStyle) -> Result<TextBounds, MeasureError> {
        (**self).measure(text, style)
    }
}

/// Number of terminal-style cells a character occupies.
///
/// CJK ideographs, kana, Hangul and full-width forms take two cells, everything
/// else one. Good enough for clock faces, which only ever mix digits with the
/// date's ideographs and full-width parentheses.
pub fn cell_width(c: char) -> usize {
    match c as u32 {
        0x1100..=0x115F
        | 0x2E80..=0x303E
        | 0x3041..=0x33FF
        | 0x3400..=0x4DBF
        | 0x4E00..=0x9FFF
        | 0xA000..=0xA4CF
        | 0xAC00..=0xD7A3
        | 0xF900..=0xFAFF
        | 0xFE30..=0xFE4F
        | 0xFF00..=0xFF60
        | 0xFFE0..=0xFFE6 => 2,
        _ => 1,
    }
}

/// Total cell count of a string.
pub fn text_cells(text: &str) -> usize {
    text.chars().map(cell_width).sum()
}

fn check_size(style: &TextStyle) -> Result<(), MeasureError> {
    if style.size.is_finite() && style.size > 0.0 {
        Ok(())
    } else {
        Err(MeasureError::InvalidSize(style.size))
    }
}

/// Measures text using the cell metrics of a monospaced bitmap font scaled
/// linearly to the requested size.
///
/// At size `s` a cell is `s` pixels tall and `s * advance / height` wide, where
/// `advance` includes the font's character spacing.
#[derive(Clone, Copy)]
pub struct MonoMetricsMeasurer {
    font: &'static MonoFont<'static>,
}

impl std::fmt::Debug for MonoMetricsMeasurer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonoMetricsMeasurer")
            .field("character_size", &self.font.character_size)
            .field("character_spacing", &self.font.character_spacing)
            .finish()
    }
}

impl MonoMetricsMeasurer {
    pub fn new(font: &'static MonoFont<'static>) -> Self {
        Self { font }
    }

    /// Cell width divided by cell height for the base font.
    pub fn aspect(&self) -> f32 {
        let advance = self.font.character_size.width + self.font.character_spacing;
        advance as f32 / self.font.character_size.height as f32
    }
}

impl Default for MonoMetricsMeasurer {
    fn default() -> Self {
        Self::new(&FONT_10X20)
    }
}

impl TextMeasurer for MonoMetricsMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> Result<TextBounds, MeasureError> {
        check_size(style)?;
        let cells = text_cells(text) as f32;
        let gaps = text.chars().count().saturating_sub(1) as f32;
        Ok(TextBounds {
            width: cells * style.size * self.aspect() + gaps * style.letter_spacing,
            height: style.size,
        })
    }
}

/// Em-ratio estimate for proportional fonts.
#[derive(Clone, Copy, Debug)]
pub struct HeuristicMeasurer {
    /// Average advance per cell, in em
    pub advance_em: f32,
    /// Line height, in em
    pub line_height_em: f32,
}

impl Default for HeuristicMeasurer {
    fn default() -> Self {
        Self {
            advance_em: 0.6,
            line_height_em: 1.2,
        }
    }
}

impl TextMeasurer for HeuristicMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> Result<TextBounds, MeasureError> {
        check_size(style)?;
        let cells = text_cells(text) as f32;
        let gaps = text.chars().count().saturating_sub(1) as f32;
        Ok(TextBounds {
            width: cells * self.advance_em * style.size + gaps * style.letter_spacing,
            height: self.line_height_em * style.size,
        })
    }
}
