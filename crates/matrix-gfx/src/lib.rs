//! Pixel-level building blocks for the 64×64 RGB matrix.
//!
//! # Modules
//!
//! - [`frame`] — `Frame`, the in-memory framebuffer presented to the panel
//! - [`palette`] — the closed set of color constants shared with the preview
//! - [`font`] — the 3×5 glyph table and text drawing
//! - [`draw`] — gauge fills, outlines and the completion checkmark sprite
//!
//! Everything here is deterministic and side-effect free: the same inputs
//! always produce the same framebuffer, which is what lets the browser
//! preview reproduce the panel pixel for pixel (see
//! `docs/preview-contract.md`).

pub mod draw;
pub mod font;
pub mod frame;
pub mod palette;

pub use draw::{
    clamp_percentage, draw_checkmark, draw_outline_rect, fill_horizontal_bar, fill_rect,
    fill_vertical_bar, CHECKMARK_SIZE,
};
pub use font::{draw_text, draw_text_centered, text_width, GLYPH_ADVANCE, GLYPH_HEIGHT, GLYPH_WIDTH};
pub use frame::{Frame, MATRIX_HEIGHT, MATRIX_WIDTH};
