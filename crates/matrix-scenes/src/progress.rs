//! Legacy full-panel progress bar.
//!
//! Used by producers with a single percentage and no hierarchy context
//! (boot supervisor, sync jobs). The bar fills bottom-up across the full
//! panel width; row color depends on the row's absolute position: the top
//! third is red, the middle third yellow, the bottom third green.

use matrix_gfx::palette::{RED, SPRINT_GREEN, YELLOW};
use matrix_gfx::{clamp_percentage, Frame, MATRIX_HEIGHT, MATRIX_WIDTH};

/// Render the three-color vertical progress bar.
pub fn render_progress(percentage: f32) -> Frame {
    let mut frame = Frame::new();
    let lit_rows = (clamp_percentage(percentage) / 100.0 * MATRIX_HEIGHT as f32) as i32;

    for y in 0..MATRIX_HEIGHT {
        let row_from_bottom = MATRIX_HEIGHT - 1 - y;
        if row_from_bottom >= lit_rows {
            continue;
        }
        let color = if y < MATRIX_HEIGHT / 3 {
            RED
        } else if y < 2 * MATRIX_HEIGHT / 3 {
            YELLOW
        } else {
            SPRINT_GREEN
        };
        for x in 0..MATRIX_WIDTH {
            frame.set(x, y, color);
        }
    }
    frame
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::pixelcolor::Rgb888;
    use embedded_graphics::prelude::RgbColor;
    use proptest::prelude::*;

    #[test]
    fn zero_percent_is_blank() {
        assert!(render_progress(0.0).is_blank());
    }

    #[test]
    fn full_bar_lights_all_rows_in_three_bands() {
        let frame = render_progress(100.0);
        assert_eq!(frame.lit_rows(), 64);
        assert_eq!(frame.get(0, 0), Some(RED));
        assert_eq!(frame.get(0, 30), Some(YELLOW));
        assert_eq!(frame.get(0, 63), Some(SPRINT_GREEN));
    }

    #[test]
    fn half_bar_fills_bottom_up() {
        let frame = render_progress(50.0);
        // floor(0.5 * 64) = 32 rows: y 32..=63 lit, 0..=31 dark.
        assert_eq!(frame.get(0, 31), Some(Rgb888::BLACK));
        assert_eq!(frame.get(0, 32), Some(YELLOW));
        assert_eq!(frame.lit_rows(), 32);
    }

    proptest! {
        /// Out-of-range percentages clamp instead of overflowing the panel.
        #[test]
        fn any_percentage_is_safe(p in proptest::num::f32::ANY) {
            let frame = render_progress(p);
            prop_assert!(frame.lit_rows() <= 64);
        }

        /// Rendering the same value twice gives identical frames.
        #[test]
        fn progress_is_deterministic(p in -500.0f32..500.0) {
            prop_assert_eq!(render_progress(p), render_progress(p));
        }
    }
}
