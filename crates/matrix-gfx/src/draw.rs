//! Gauge fills, outlines and the completion checkmark.
//!
//! Fill arithmetic is part of the preview contract: a bar filled to
//! percentage `p` over an extent of `n` pixels lights exactly
//! `floor(p / 100 × n)` of them, after clamping `p` to `0..=100`.

use core::ops::Range;

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::RgbColor;

use crate::frame::Frame;
use crate::palette::CHECK_BG;

/// Side length of the completion checkmark sprite.
pub const CHECKMARK_SIZE: i32 = 7;

/// 7×7 checkmark pattern: 1 = white tick, 0 = green background.
const CHECKMARK: [[u8; 7]; 7] = [
    [0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 1],
    [0, 0, 0, 0, 0, 1, 0],
    [0, 0, 0, 0, 1, 0, 0],
    [0, 1, 0, 1, 0, 0, 0],
    [0, 0, 1, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0],
];

/// Clamp a percentage to `0.0..=100.0`; NaN clamps to zero.
pub fn clamp_percentage(percentage: f32) -> f32 {
    if percentage.is_nan() {
        0.0
    } else {
        percentage.clamp(0.0, 100.0)
    }
}

/// Fill a solid rectangle.
pub fn fill_rect(frame: &mut Frame, xs: Range<i32>, ys: Range<i32>, color: Rgb888) {
    for y in ys {
        for x in xs.clone() {
            frame.set(x, y, color);
        }
    }
}

/// Draw a 1-px border around `xs × ys`.
pub fn draw_outline_rect(frame: &mut Frame, xs: Range<i32>, ys: Range<i32>, color: Rgb888) {
    if xs.is_empty() || ys.is_empty() {
        return;
    }
    for x in xs.clone() {
        frame.set(x, ys.start, color);
        frame.set(x, ys.end - 1, color);
    }
    for y in ys {
        frame.set(xs.start, y, color);
        frame.set(xs.end - 1, y, color);
    }
}

/// Fill a vertical gauge from the bottom of `ys` upward.
///
/// Lit rows = `floor(p / 100 × height)`.
pub fn fill_vertical_bar(
    frame: &mut Frame,
    xs: Range<i32>,
    ys: Range<i32>,
    percentage: f32,
    color: Rgb888,
) {
    let height = (ys.end - ys.start).max(0);
    let fill = (clamp_percentage(percentage) / 100.0 * height as f32) as i32;
    for i in 0..fill {
        let y = ys.end - 1 - i;
        for x in xs.clone() {
            frame.set(x, y, color);
        }
    }
}

/// Fill a horizontal gauge from the left of `xs` rightward.
///
/// Lit columns = `floor(p / 100 × width)`.
pub fn fill_horizontal_bar(
    frame: &mut Frame,
    xs: Range<i32>,
    ys: Range<i32>,
    percentage: f32,
    color: Rgb888,
) {
    let width = (xs.end - xs.start).max(0);
    let fill = (clamp_percentage(percentage) / 100.0 * width as f32) as i32;
    for i in 0..fill {
        let x = xs.start + i;
        for y in ys.clone() {
            frame.set(x, y, color);
        }
    }
}

/// Draw the 7×7 completion checkmark with its top-left corner at `(x, y)`.
pub fn draw_checkmark(frame: &mut Frame, x: i32, y: i32) {
    for (dy, row) in CHECKMARK.iter().enumerate() {
        for (dx, &cell) in row.iter().enumerate() {
            let color = if cell == 1 { Rgb888::WHITE } else { CHECK_BG };
            frame.set(x + dx as i32, y + dy as i32, color);
        }
    }
}
