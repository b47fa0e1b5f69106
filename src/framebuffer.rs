//! RGB frame buffer
//!
//! In-memory 24-bit buffer that `embedded-graphics` can draw into. Used to render
//! the clock off-screen and export it as a binary PPM image.

use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use embedded_graphics::prelude::*;
use std::io::{self, Write};

/// Row-major offset of `(x, y)` in `usize`.
fn pixel_index(width: u32, x: u32, y: u32) -> usize {
    y as usize * width as usize + x as usize
}

pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgb888>,
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgb888::BLACK; width as usize * height as usize],
        }
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgb888) {
        if x >= self.width || y >= self.height {
            return;
        }
        self.pixels[pixel_index(self.width, x, y)] = color;
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb888> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[pixel_index(self.width, x, y)])
    }

    /// Count of pixels that differ from `background`.
    pub fn painted_pixels(&self, background: Rgb888) -> usize {
        self.pixels.iter().filter(|&&p| p != background).count()
    }

    /// Write the buffer as a binary PPM (P6) image.
    pub fn write_ppm<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "P6\n{} {}\n255\n", self.width, self.height)?;
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for p in &self.pixels {
            bytes.extend_from_slice(&[p.r(), p.g(), p.b()]);
        }
        out.write_all(&bytes)
    }

    pub fn to_ppm(&self) -> Vec<u8> {
        let mut out = Vec::new();
        // Writing into a Vec cannot fail
        let _ = self.write_ppm(&mut out);
        out
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = Rgb888;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x >= 0 && point.y >= 0 {
                self.set_pixel(point.x as u32, point.y as u32, color);
            }
        }
        Ok(())
    }
}
