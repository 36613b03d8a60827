//! The closed color set shared by the panel renderer and the web preview.
//!
//! These constants are part of the preview contract: a preview renderer
//! given the same inputs must use exactly these RGB values.

use embedded_graphics::pixelcolor::Rgb888;

/// Project-level gauge fill.
pub const PROJECT_BLUE: Rgb888 = Rgb888::new(0, 100, 255);

/// Sprint-level gauge fill.
pub const SPRINT_GREEN: Rgb888 = Rgb888::new(0, 255, 0);

/// Cyclic per-user-story palette, indexed modulo 8.
pub const STORY_PALETTE: [Rgb888; 8] = [
    Rgb888::new(0, 100, 255), // blue
    Rgb888::new(255, 255, 0), // yellow
    Rgb888::new(0, 255, 255), // cyan
    Rgb888::new(255, 0, 255), // magenta
    Rgb888::new(255, 128, 0), // orange
    Rgb888::new(128, 255, 0), // lime
    Rgb888::new(255, 0, 128), // pink
    Rgb888::new(128, 0, 255), // purple
];

/// Gauge border.
pub const GAUGE_OUTLINE: Rgb888 = Rgb888::new(100, 100, 100);

/// Labels, counts and percentage text.
pub const TEXT_WHITE: Rgb888 = Rgb888::new(255, 255, 255);

/// Background of the 7×7 completion checkmark sprite.
pub const CHECK_BG: Rgb888 = Rgb888::new(0, 200, 0);

/// Unused sprint slot in the sprint view.
pub const EMPTY_SLOT: Rgb888 = Rgb888::new(10, 10, 10);

/// Error glyphs and the top third of the legacy progress bar.
pub const RED: Rgb888 = Rgb888::new(255, 0, 0);

/// Hourglass and the middle third of the legacy progress bar.
pub const YELLOW: Rgb888 = Rgb888::new(255, 255, 0);

/// Discord symbol.
pub const PURPLE: Rgb888 = Rgb888::new(128, 0, 255);
