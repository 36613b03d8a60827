//! Frame generators for the four animations.
//!
//! The animation engine calls [`animation_frame`] with a monotonically
//! increasing frame index; looping animations wrap internally, so the
//! caller never needs to know a cycle length.

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, PrimitiveStyle};

use led_protocol::Animation;
use matrix_gfx::palette::{PROJECT_BLUE, SPRINT_GREEN, TEXT_WHITE};
use matrix_gfx::{draw_outline_rect, draw_text_centered, fill_horizontal_bar, Frame};

use crate::symbols::draw_wifi_arc;

/// Perimeter positions of the idle dot, clockwise from top center.
const IDLE_POSITIONS: [(i32, i32); 8] = [
    (32, 5),
    (55, 10),
    (58, 32),
    (55, 54),
    (32, 59),
    (9, 54),
    (6, 32),
    (9, 10),
];

/// Render one animation frame.
pub fn animation_frame(animation: Animation, index: u32) -> Frame {
    match animation {
        Animation::Boot => boot_frame(index),
        Animation::WifiSearching => wifi_searching_frame(index),
        Animation::Activity => activity_frame(index),
        Animation::Idle => idle_frame(index),
    }
}

fn fill_circle(frame: &mut Frame, center: (i32, i32), radius: i32, color: Rgb888) {
    let _ = Circle::with_center(Point::new(center.0, center.1), (radius * 2 + 1) as u32)
        .into_styled(PrimitiveStyle::with_fill(color))
        .draw(frame);
}

/// "BOOTING..." over a horizontal bar advancing 0→100 across 40 frames.
fn boot_frame(index: u32) -> Frame {
    let mut frame = Frame::new();
    let last = Animation::Boot.frame_count().unwrap_or(40) - 1;
    let percentage = (index.min(last) * 100 / last) as f32;

    draw_text_centered(&mut frame, "BOOTING...", 32, 10, TEXT_WHITE);
    draw_outline_rect(&mut frame, 7..57, 35..46, TEXT_WHITE);
    fill_horizontal_bar(&mut frame, 8..56, 36..45, percentage, SPRINT_GREEN);
    frame
}

/// Arcs appearing one by one: frame 0 shows the innermost arc, frame 2 all
/// three. Searching is drawn in blue (the connected symbol is green).
fn wifi_searching_frame(index: u32) -> Frame {
    let mut frame = Frame::new();
    let (cx, cy) = (32, 40);
    let step = index % 3;

    fill_circle(&mut frame, (cx, cy), 2, PROJECT_BLUE);
    draw_wifi_arc(&mut frame, cx, cy, 8.0, 45, 5, PROJECT_BLUE);
    if step >= 1 {
        draw_wifi_arc(&mut frame, cx, cy, 14.0, 60, 4, PROJECT_BLUE);
    }
    if step >= 2 {
        draw_wifi_arc(&mut frame, cx, cy, 20.0, 70, 3, PROJECT_BLUE);
    }
    frame
}

/// Corner dot blinking on even frames.
fn activity_frame(index: u32) -> Frame {
    let mut frame = Frame::new();
    if index % 2 == 0 {
        fill_circle(&mut frame, (58, 6), 3, SPRINT_GREEN);
    }
    frame
}

/// A dot circling the panel perimeter.
fn idle_frame(index: u32) -> Frame {
    let mut frame = Frame::new();
    let position = IDLE_POSITIONS[index as usize % IDLE_POSITIONS.len()];
    fill_circle(&mut frame, position, 2, PROJECT_BLUE);
    frame
}
