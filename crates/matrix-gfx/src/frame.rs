//! CPU-side framebuffer for the 64×64 panel.
//!
//! The `Frame` is the unit of presentation: scenes render into a `Frame`,
//! and the hardware driver swaps it onto the panel in one atomic step.

use core::convert::Infallible;
use core::fmt;

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::{DrawTarget, OriginDimensions, Pixel, RgbColor, Size};

/// Panel width in pixels.
pub const MATRIX_WIDTH: i32 = 64;

/// Panel height in pixels.
pub const MATRIX_HEIGHT: i32 = 64;

/// Dense 64×64 RGB framebuffer, origin top-left, y growing downward.
///
/// All writes through [`Frame::set`] (and therefore through the
/// `embedded-graphics` `DrawTarget` impl) silently skip out-of-bounds
/// coordinates.
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    pixels: Vec<Rgb888>,
}

impl Frame {
    /// Create an all-black frame.
    pub fn new() -> Self {
        Self {
            pixels: vec![Rgb888::BLACK; (MATRIX_WIDTH * MATRIX_HEIGHT) as usize],
        }
    }

    /// Create a frame filled with a single color.
    pub fn filled(color: Rgb888) -> Self {
        Self {
            pixels: vec![color; (MATRIX_WIDTH * MATRIX_HEIGHT) as usize],
        }
    }

    /// Write one pixel. Out-of-bounds coordinates are ignored.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, color: Rgb888) {
        if (0..MATRIX_WIDTH).contains(&x) && (0..MATRIX_HEIGHT).contains(&y) {
            self.pixels[(y * MATRIX_WIDTH + x) as usize] = color;
        }
    }

    /// Read one pixel, or `None` outside the panel.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<Rgb888> {
        if (0..MATRIX_WIDTH).contains(&x) && (0..MATRIX_HEIGHT).contains(&y) {
            Some(self.pixels[(y * MATRIX_WIDTH + x) as usize])
        } else {
            None
        }
    }

    /// Reset every pixel to black.
    pub fn clear(&mut self) {
        self.pixels.fill(Rgb888::BLACK);
    }

    /// Iterate `(x, y, color)` over every pixel in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, i32, Rgb888)> + '_ {
        self.pixels
            .iter()
            .enumerate()
            .map(|(i, &c)| (i as i32 % MATRIX_WIDTH, i as i32 / MATRIX_WIDTH, c))
    }

    /// Number of rows containing at least one non-black pixel.
    pub fn lit_rows(&self) -> usize {
        (0..MATRIX_HEIGHT)
            .filter(|&y| (0..MATRIX_WIDTH).any(|x| self.get(x, y) != Some(Rgb888::BLACK)))
            .count()
    }

    /// Whether every pixel is black.
    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|&c| c == Rgb888::BLACK)
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lit = self.pixels.iter().filter(|&&c| c != Rgb888::BLACK).count();
        write!(f, "Frame({}x{}, {} lit)", MATRIX_WIDTH, MATRIX_HEIGHT, lit)
    }
}

impl DrawTarget for Frame {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set(point.x, point.y, color);
        }
        Ok(())
    }
}

impl OriginDimensions for Frame {
    fn size(&self) -> Size {
        Size::new(MATRIX_WIDTH as u32, MATRIX_HEIGHT as u32)
    }
}
