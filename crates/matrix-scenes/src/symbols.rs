//! Static status symbols.
//!
//! Geometry is fixed per symbol; the optional color override replaces the
//! symbol's primary color only (the WiFi-error slash stays red, the
//! checkmark tick stays white on green, and so on).

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, Line, PrimitiveStyle};

use led_protocol::Symbol;
use matrix_gfx::palette::{PURPLE, RED, SPRINT_GREEN, TEXT_WHITE, YELLOW};
use matrix_gfx::{draw_text_centered, Frame};

/// Render a symbol into a fresh frame.
pub fn render_symbol(symbol: Symbol, color: Option<Rgb888>) -> Frame {
    let mut frame = Frame::new();
    match symbol {
        Symbol::Wifi => wifi(&mut frame, color.unwrap_or(SPRINT_GREEN)),
        Symbol::WifiError => wifi_error(&mut frame, color.unwrap_or(RED)),
        Symbol::Tunnel => tunnel(&mut frame, color.unwrap_or(Rgb888::new(0, 100, 255))),
        Symbol::Discord => discord(&mut frame, color.unwrap_or(PURPLE)),
        Symbol::Check => check(&mut frame, color.unwrap_or(SPRINT_GREEN)),
        Symbol::Error => error(&mut frame, color.unwrap_or(RED)),
        Symbol::Hourglass => hourglass(&mut frame, color.unwrap_or(YELLOW)),
        Symbol::Dot => dot(&mut frame, color.unwrap_or(TEXT_WHITE)),
        Symbol::AllOn => all_on(&mut frame, color.unwrap_or(TEXT_WHITE)),
        Symbol::Connected => connected(&mut frame, color.unwrap_or(SPRINT_GREEN)),
    }
    frame
}

fn stroke_line(frame: &mut Frame, from: (i32, i32), to: (i32, i32), color: Rgb888) {
    let _ = Line::new(Point::new(from.0, from.1), Point::new(to.0, to.1))
        .into_styled(PrimitiveStyle::with_stroke(color, 1))
        .draw(frame);
}

fn stroke_circle(frame: &mut Frame, center: (i32, i32), radius: i32, color: Rgb888) {
    let _ = Circle::with_center(Point::new(center.0, center.1), (radius * 2 + 1) as u32)
        .into_styled(PrimitiveStyle::with_stroke(color, 1))
        .draw(frame);
}

fn fill_circle(frame: &mut Frame, center: (i32, i32), radius: i32, color: Rgb888) {
    let _ = Circle::with_center(Point::new(center.0, center.1), (radius * 2 + 1) as u32)
        .into_styled(PrimitiveStyle::with_fill(color))
        .draw(frame);
}

/// Plot one arc of the WiFi glyph: points at `radius` around `(cx, cy)`,
/// swept from `-span..=span` degrees off vertical in `step`-degree
/// increments, coordinates truncated toward zero.
pub fn draw_wifi_arc(
    frame: &mut Frame,
    cx: i32,
    cy: i32,
    radius: f32,
    span: i32,
    step: i32,
    color: Rgb888,
) {
    let mut angle = -span;
    while angle <= span {
        let rad = (angle as f32).to_radians();
        let x = cx + (radius * rad.sin()) as i32;
        let y = cy - (radius * rad.cos()) as i32;
        frame.set(x, y, color);
        angle += step;
    }
}

const WIFI_CENTER: (i32, i32) = (32, 40);

fn wifi(frame: &mut Frame, color: Rgb888) {
    let (cx, cy) = WIFI_CENTER;
    stroke_circle(frame, (cx, cy), 2, color);
    draw_wifi_arc(frame, cx, cy, 8.0, 45, 5, color);
    draw_wifi_arc(frame, cx, cy, 14.0, 60, 4, color);
    draw_wifi_arc(frame, cx, cy, 20.0, 70, 3, color);
}

fn wifi_error(frame: &mut Frame, color: Rgb888) {
    let (cx, cy) = WIFI_CENTER;
    stroke_circle(frame, (cx, cy), 2, color);
    draw_wifi_arc(frame, cx, cy, 8.0, 45, 5, color);
    draw_wifi_arc(frame, cx, cy, 14.0, 60, 4, color);
    stroke_line(frame, (15, 15), (49, 49), RED);
}

fn tunnel(frame: &mut Frame, color: Rgb888) {
    // Perspective lines converging on a center rectangle.
    stroke_line(frame, (10, 15), (25, 32), color);
    stroke_line(frame, (54, 15), (39, 32), color);
    stroke_line(frame, (10, 49), (25, 32), color);
    stroke_line(frame, (54, 49), (39, 32), color);
    stroke_line(frame, (25, 25), (39, 25), color);
    stroke_line(frame, (25, 39), (39, 39), color);
    stroke_line(frame, (25, 25), (25, 39), color);
    stroke_line(frame, (39, 25), (39, 39), color);
}

fn discord(frame: &mut Frame, color: Rgb888) {
    // Simplified controller: round body with two dark eyes.
    fill_circle(frame, (32, 32), 10, color);
    matrix_gfx::fill_rect(frame, 27..29, 29..31, Rgb888::BLACK);
    matrix_gfx::fill_rect(frame, 36..38, 29..31, Rgb888::BLACK);
}

fn check(frame: &mut Frame, color: Rgb888) {
    stroke_line(frame, (25, 35), (30, 40), color);
    stroke_line(frame, (30, 40), (40, 20), color);
}

fn error(frame: &mut Frame, color: Rgb888) {
    stroke_line(frame, (20, 20), (44, 44), color);
    stroke_line(frame, (44, 20), (20, 44), color);
}

fn hourglass(frame: &mut Frame, color: Rgb888) {
    const SIZE: i32 = 15;
    let (cx, cy) = (32, 32);
    stroke_line(frame, (cx - SIZE, cy - SIZE), (cx + SIZE, cy - SIZE), color);
    stroke_line(frame, (cx - SIZE, cy - SIZE), (cx, cy), color);
    stroke_line(frame, (cx + SIZE, cy - SIZE), (cx, cy), color);
    stroke_line(frame, (cx - SIZE, cy + SIZE), (cx + SIZE, cy + SIZE), color);
    stroke_line(frame, (cx - SIZE, cy + SIZE), (cx, cy), color);
    stroke_line(frame, (cx + SIZE, cy + SIZE), (cx, cy), color);
}

fn dot(frame: &mut Frame, color: Rgb888) {
    stroke_circle(frame, (32, 32), 3, color);
}

fn all_on(frame: &mut Frame, color: Rgb888) {
    matrix_gfx::fill_rect(frame, 0..64, 0..64, color);
}

fn connected(frame: &mut Frame, color: Rgb888) {
    draw_text_centered(frame, "CONNECTED", 32, 15, color);
    stroke_line(frame, (28, 35), (33, 40), color);
    stroke_line(frame, (33, 40), (43, 25), color);
}
