//! # Neon Clock Rendering
//!
//! This module draws a laid-out [`Frame`] either to an ANSI terminal or to any
//! `embedded-graphics` RGB draw target. The terminal path is meant for development
//! and headless hosts; the draw target path produces the real neon look.
//!
//! ## Scaling Bitmap Fonts
//! `embedded-graphics` only ships fixed-size bitmap fonts, so text is drawn with
//! the font and integer pixel scale whose rendered height comes closest to the
//! requested size without exceeding it. All candidate fonts are at most half as
//! wide as they are tall, so from the smallest font's height upwards the drawn
//! text fits inside what [`MonoMetricsMeasurer`](crate::measure::MonoMetricsMeasurer)
//! reported. Below that height the smallest font is still too big, so every line
//! is clipped to its measured box.

use crate::display::{Frame, PlacedText};
use crate::framebuffer::FrameBuffer;
use crate::measure::text_cells;
use crate::style::{blend, NeonStyle};
use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_6X13_BOLD, FONT_7X14_BOLD, FONT_9X18_BOLD};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::{Baseline, Text};
use std::io::{self, Write};

/// Bitmap fonts available to the renderer, smallest first.
const FONTS: [&MonoFont<'static>; 4] = [&FONT_6X13_BOLD, &FONT_7X14_BOLD, &FONT_9X18_BOLD, &FONT_10X20];

/// Glow offsets, one per compass direction.
const DIRECTIONS: [(i32, i32); 8] = [(-1, -1), (0, -1), (1, -1), (-1, 0), (1, 0), (-1, 1), (0, 1), (1, 1)];

/// Pick the font and integer scale that best approximate `size` pixels.
///
/// Below the smallest font's height the smallest font is used unscaled.
pub fn pick_font(size: f32) -> (&'static MonoFont<'static>, u32) {
    let mut best = (FONTS[0], 1u32, 0u32);
    for font in FONTS {
        let height = font.character_size.height;
        let scale = (size / height as f32).floor() as u32;
        if scale == 0 {
            continue;
        }
        let rendered = height * scale;
        // Ties go to the larger font: fewer blocky pixels for the same height
        if rendered >= best.2 {
            best = (font, scale, rendered);
        }
    }
    (best.0, best.1)
}

/// Draw target adapter that blows every pixel up into a `scale`×`scale` block
/// placed relative to `origin`.
struct Scaled<'a, D> {
    inner: &'a mut D,
    origin: Point,
    scale: u32,
}

impl<D: DrawTarget<Color = Rgb888>> Dimensions for Scaled<'_, D> {
    fn bounding_box(&self) -> Rectangle {
        let outer = self.inner.bounding_box();
        Rectangle::new(
            Point::zero(),
            Size::new(outer.size.width / self.scale, outer.size.height / self.scale),
        )
    }
}

impl<D: DrawTarget<Color = Rgb888>> DrawTarget for Scaled<'_, D> {
    type Color = Rgb888;
    type Error = D::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let block = Size::new_equal(self.scale);
        for Pixel(point, color) in pixels {
            let top_left = self.origin + point * self.scale as i32;
            self.inner.fill_solid(&Rectangle::new(top_left, block), color)?;
        }
        Ok(())
    }
}

fn draw_text_at<D: DrawTarget<Color = Rgb888>>(
    target: &mut D,
    line: &PlacedText,
    origin: Point,
    color: Rgb888,
) -> Result<(), D::Error> {
    let (font, scale) = pick_font(line.font_size);
    let clip = Rectangle::new(
        origin,
        Size::new(
            line.bounds.width.ceil().max(0.0) as u32,
            line.bounds.height.ceil().max(0.0) as u32,
        ),
    );
    let mut clipped = target.clipped(&clip);
    let mut scaled = Scaled {
        inner: &mut clipped,
        origin,
        scale,
    };
    let style = MonoTextStyle::new(font, color);
    Text::with_baseline(&line.text, Point::zero(), style, Baseline::Top).draw(&mut scaled)?;
    Ok(())
}

/// Paint one line: glow halos outermost first, then the sharp text on top.
pub fn draw_neon_line<D: DrawTarget<Color = Rgb888>>(
    target: &mut D,
    line: &PlacedText,
    style: &NeonStyle,
) -> Result<(), D::Error> {
    let origin = Point::new(line.x as i32, line.y as i32);

    for layer in &style.glow {
        let radius = layer.blur_radius.max(1.0);
        // Three rings per layer, far ring first so nearer rings overwrite it
        let mut rings: Vec<i32> = [1.0, 2.0 / 3.0, 1.0 / 3.0]
            .iter()
            .map(|f| (radius * f).round().max(1.0) as i32)
            .collect();
        rings.dedup();
        for distance in rings {
            let falloff = 1.0 - distance as f32 / (radius + 1.0);
            let color = blend(layer.color, style.background, layer.alpha * falloff);
            for (dx, dy) in DIRECTIONS {
                draw_text_at(target, line, origin + Point::new(dx * distance, dy * distance), color)?;
            }
        }
    }

    draw_text_at(target, line, origin, style.color)
}

/// Draw a whole frame onto `target`, clearing it to the background first.
pub fn draw_frame<D: DrawTarget<Color = Rgb888>>(
    target: &mut D,
    frame: &Frame,
    style: &NeonStyle,
) -> Result<(), D::Error> {
    target.clear(style.background)?;
    draw_neon_line(target, &frame.date, style)?;
    draw_neon_line(target, &frame.time, style)
}

/// Render a frame into a new buffer sized to its surface.
pub fn render_to_buffer(frame: &Frame, style: &NeonStyle) -> FrameBuffer {
    let mut buffer = FrameBuffer::new(
        frame.surface.max_width_px as u32,
        frame.surface.max_height_px as u32,
    );
    match draw_frame(&mut buffer, frame, style) {
        Ok(()) => buffer,
        Err(never) => match never {},
    }
}

fn ansi_fg(color: Rgb888, bold: bool) -> String {
    let weight = if bold { "1;" } else { "" };
    format!("\x1b[{}38;2;{};{};{}m", weight, color.r(), color.g(), color.b())
}

const ANSI_RESET: &str = "\x1b[0m";

fn centred(text: &str, columns: usize) -> String {
    let pad = columns.saturating_sub(text_cells(text)) / 2;
    format!("{}{}", " ".repeat(pad), text)
}

/// Render a frame as centred neon lines on an ANSI true-colour terminal.
pub fn draw_terminal<W: Write>(frame: &Frame, style: &NeonStyle, columns: usize, out: &mut W) -> io::Result<()> {
    let glow = style.glow.get(1).map(|g| g.color).unwrap_or(style.color);

    writeln!(out)?;
    writeln!(out, "{}{}{}", ansi_fg(style.color, true), centred(&frame.date.text, columns), ANSI_RESET)?;
    writeln!(out)?;
    writeln!(out, "{}{}{}", ansi_fg(style.color, true), centred(&frame.time.text, columns), ANSI_RESET)?;
    writeln!(out)?;

    let status = format!(
        "time {:.1}px · date {:.1}px · {}x{}",
        frame.time.font_size, frame.date.font_size, frame.surface.max_width_px, frame.surface.max_height_px
    );
    writeln!(out, "{}{}{}", ansi_fg(glow, false), centred(&status, columns), ANSI_RESET)?;
    out.flush()
}
