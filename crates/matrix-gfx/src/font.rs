//! Fixed 3×5 glyph font.
//!
//! Covers `0-9`, `A-Z` (lowercase maps onto the uppercase shapes), `%`,
//! `:`, `/`, `-` and space. Each glyph is 3 pixels wide and 5 tall; the
//! horizontal advance is 4 pixels (one blank column between glyphs).
//! Characters outside the set consume the same 4-pixel advance and draw
//! nothing.
//!
//! The `y` passed to [`draw_text`] is the **top** of the glyph cell; glyphs
//! occupy rows `y..y+5`. Row bitmaps use bit 2 for the leftmost column.

use embedded_graphics::pixelcolor::Rgb888;

use crate::frame::Frame;

/// Glyph cell width in pixels.
pub const GLYPH_WIDTH: i32 = 3;

/// Glyph cell height in pixels.
pub const GLYPH_HEIGHT: i32 = 5;

/// Horizontal advance per character, including the 1-px gap.
pub const GLYPH_ADVANCE: i32 = 4;

/// Look up the row bitmap for a character, or `None` for unknown glyphs.
///
/// Lowercase ASCII letters resolve to their uppercase bitmap.
pub fn glyph(c: char) -> Option<[u8; 5]> {
    let c = c.to_ascii_uppercase();
    let rows = match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b010, 0b010],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b011, 0b100, 0b100, 0b100, 0b011],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b110, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b110, 0b100, 0b100],
        'G' => [0b011, 0b100, 0b101, 0b101, 0b011],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'J' => [0b001, 0b001, 0b001, 0b101, 0b010],
        'K' => [0b101, 0b110, 0b100, 0b110, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b111, 0b111, 0b101, 0b101, 0b101],
        'N' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'R' => [0b111, 0b101, 0b110, 0b101, 0b101],
        'S' => [0b011, 0b100, 0b010, 0b001, 0b110],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b101, 0b010],
        'W' => [0b101, 0b101, 0b101, 0b111, 0b111],
        'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '%' => [0b101, 0b001, 0b010, 0b100, 0b101],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _ => return None,
    };
    Some(rows)
}

/// Rendered width of a string: 4 px per character minus the trailing gap.
pub fn text_width(text: &str) -> i32 {
    let n = text.chars().count() as i32;
    if n == 0 {
        0
    } else {
        n * GLYPH_ADVANCE - 1
    }
}

/// Draw `text` with its top-left glyph corner at `(x, y)`.
pub fn draw_text(frame: &mut Frame, text: &str, x: i32, y: i32, color: Rgb888) {
    let mut pen_x = x;
    for c in text.chars() {
        if let Some(rows) = glyph(c) {
            for (dy, row) in rows.iter().enumerate() {
                for dx in 0..GLYPH_WIDTH {
                    if row & (1 << (GLYPH_WIDTH - 1 - dx)) != 0 {
                        frame.set(pen_x + dx, y + dy as i32, color);
                    }
                }
            }
        }
        pen_x += GLYPH_ADVANCE;
    }
}

/// Draw `text` horizontally centered on `center_x`, glyph tops at `y`.
pub fn draw_text_centered(frame: &mut Frame, text: &str, center_x: i32, y: i32, color: Rgb888) {
    let x = center_x - text_width(text) / 2;
    draw_text(frame, text, x, y, color);
}
