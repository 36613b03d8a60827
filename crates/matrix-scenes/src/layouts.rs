//! The three hierarchical progress scenes.
//!
//! Geometry constants here are normative for the preview contract; change
//! nothing without updating `docs/preview-contract.md`.

use led_protocol::{Layout, LayoutPayload, SprintSummary};
use matrix_gfx::palette::{
    EMPTY_SLOT, GAUGE_OUTLINE, PROJECT_BLUE, SPRINT_GREEN, STORY_PALETTE, TEXT_WHITE,
};
use matrix_gfx::{
    draw_checkmark, draw_outline_rect, draw_text, draw_text_centered, fill_horizontal_bar,
    fill_rect, fill_vertical_bar, Frame, MATRIX_HEIGHT, MATRIX_WIDTH,
};

/// Render the scene selected by the payload. Percentages are clamped to
/// `0..=100` before any pixel is written.
pub fn render_layout(payload: &LayoutPayload) -> Frame {
    let payload = payload.clamped();
    match payload.layout {
        Layout::SingleView => single_view(&payload),
        Layout::SprintView => sprint_view(&payload),
        Layout::UserStoryLayout => user_story_layout(&payload),
    }
}

fn complete(percentage: f32) -> bool {
    percentage >= 100.0
}

fn percent_text(percentage: f32) -> String {
    format!("{}%", percentage as i32)
}

// ---------------------------------------------------------------------------
// Single view: name, vertical gauge, sprint/story counters.

/// Displayed project name budget in characters.
const NAME_BUDGET: usize = 10;
const NAME_Y: i32 = 3;
const GAUGE_X0: i32 = 22;
const GAUGE_X1: i32 = 42;
const GAUGE_Y0: i32 = 12;
const GAUGE_Y1: i32 = 56;
const LABEL_Y: i32 = 48;
const COUNT_Y: i32 = 56;
const LEFT_X: i32 = 2;
const RIGHT_X: i32 = 46;
const PCT_Y: i32 = 58;

fn single_view(payload: &LayoutPayload) -> Frame {
    let mut frame = Frame::new();

    let name: String = payload.project.name.chars().take(NAME_BUDGET).collect();
    draw_text_centered(&mut frame, &name, MATRIX_WIDTH / 2, NAME_Y, TEXT_WHITE);

    draw_outline_rect(&mut frame, GAUGE_X0..GAUGE_X1, GAUGE_Y0..GAUGE_Y1, GAUGE_OUTLINE);
    fill_vertical_bar(
        &mut frame,
        GAUGE_X0 + 1..GAUGE_X1 - 1,
        GAUGE_Y0 + 1..GAUGE_Y1 - 1,
        payload.project.percentage,
        SPRINT_GREEN,
    );

    let sprints = &payload.sprints;
    if !sprints.is_empty() {
        let done = sprints.iter().filter(|s| complete(s.percentage)).count();
        draw_text(&mut frame, "S:", LEFT_X, LABEL_Y, TEXT_WHITE);
        let counts = format!("{}/{}", done, sprints.len());
        draw_text(&mut frame, &counts, LEFT_X, COUNT_Y, TEXT_WHITE);
    }

    let stories: Vec<f32> = sprints
        .iter()
        .flat_map(|s| s.user_stories.iter().map(|u| u.percentage))
        .collect();
    if !stories.is_empty() {
        let done = stories.iter().filter(|&&p| complete(p)).count();
        draw_text(&mut frame, "US:", RIGHT_X, LABEL_Y, TEXT_WHITE);
        let counts = format!("{}/{}", done, stories.len());
        draw_text(&mut frame, &counts, RIGHT_X, COUNT_Y, TEXT_WHITE);
    }

    if complete(payload.project.percentage) {
        draw_checkmark(&mut frame, 29, PCT_Y - 1);
    } else {
        draw_text_centered(
            &mut frame,
            &percent_text(payload.project.percentage),
            MATRIX_WIDTH / 2,
            PCT_Y,
            TEXT_WHITE,
        );
    }

    frame
}

// ---------------------------------------------------------------------------
// Sprint view: project bar on top, two sprint columns, one empty slot.

const PROJECT_BAR_HEIGHT: i32 = 10;
const COLUMN_LABEL_Y: i32 = 11;
const COLUMNS_Y0: i32 = 13;
const COLUMN_PCT_Y: i32 = 36;
const COLUMN_CHECK_Y: i32 = 35;
/// Column x extents; the third slot absorbs the division remainder.
const COLUMNS: [(i32, i32); 3] = [(0, 21), (21, 42), (42, 64)];

fn sprint_view(payload: &LayoutPayload) -> Frame {
    let mut frame = Frame::new();

    fill_horizontal_bar(
        &mut frame,
        0..MATRIX_WIDTH,
        0..PROJECT_BAR_HEIGHT,
        payload.project.percentage,
        PROJECT_BLUE,
    );
    if complete(payload.project.percentage) {
        draw_checkmark(&mut frame, 28, 1);
    } else {
        draw_text_centered(
            &mut frame,
            &percent_text(payload.project.percentage),
            MATRIX_WIDTH / 2,
            2,
            TEXT_WHITE,
        );
    }

    for (index, &(x0, x1)) in COLUMNS.iter().enumerate() {
        // Slots beyond the second are never populated; extra sprints are
        // silently dropped.
        let sprint = if index < 2 { payload.sprints.get(index) } else { None };
        match sprint {
            Some(sprint) => sprint_column(&mut frame, index, x0, x1, sprint),
            None => fill_rect(&mut frame, x0..x1, COLUMNS_Y0..MATRIX_HEIGHT, EMPTY_SLOT),
        }
    }

    frame
}

fn sprint_column(frame: &mut Frame, index: usize, x0: i32, x1: i32, sprint: &SprintSummary) {
    draw_outline_rect(frame, x0..x1, COLUMNS_Y0..MATRIX_HEIGHT, GAUGE_OUTLINE);
    fill_vertical_bar(
        frame,
        x0 + 1..x1 - 1,
        COLUMNS_Y0 + 1..MATRIX_HEIGHT - 1,
        sprint.percentage,
        SPRINT_GREEN,
    );

    let label = format!("S{}", index + 1);
    draw_text(frame, &label, x0 + 7, COLUMN_LABEL_Y, TEXT_WHITE);

    let center = x0 + (x1 - x0) / 2;
    if complete(sprint.percentage) {
        draw_checkmark(frame, center - 3, COLUMN_CHECK_Y);
    } else if sprint.percentage > 0.0 {
        draw_text_centered(frame, &percent_text(sprint.percentage), center, COLUMN_PCT_Y, TEXT_WHITE);
    }
}

// ---------------------------------------------------------------------------
// User story layout: focused sprint on top, one row per story below.

const ROW_LABEL_X: i32 = 2;
const ROW_GAUGE_X0: i32 = 14;
const ROW_GAUGE_X1: i32 = 38;
const ROW_VALUE_X: i32 = 40;
/// The checkmark sits two pixels above the text top it replaces; the 7-px
/// sprite overhangs the 5-px text box by one pixel on each side. Kept as an
/// intentional design constant.
const ROW_CHECK_LIFT: i32 = 2;

/// Vertical extent of a row's gauge within a band of height `h` starting at
/// `y0`. Bands of 15 px and up centre a gauge of `min(h - 12, 9)` px; short
/// bands degrade to 3 px and below that to whatever fits.
fn gauge_rows(y0: i32, h: i32) -> (i32, i32) {
    let g = if h >= 15 {
        (h - 12).min(9)
    } else if h >= 5 {
        3
    } else {
        (h - 2).max(1)
    };
    let top = y0 + (h - g) / 2;
    (top, top + g)
}

fn user_story_layout(payload: &LayoutPayload) -> Frame {
    let mut frame = Frame::new();

    let Some((sprint_index, sprint)) = payload.focus_sprint() else {
        return frame;
    };

    let lines = 1 + sprint.user_stories.len() as i32;
    let band = MATRIX_HEIGHT / lines;

    story_row(
        &mut frame,
        0,
        band,
        &format!("S{}", sprint_index + 1),
        sprint.percentage,
        SPRINT_GREEN,
    );
    for (story_index, story) in sprint.user_stories.iter().enumerate() {
        story_row(
            &mut frame,
            (story_index as i32 + 1) * band,
            band,
            &format!("U{}", story_index + 1),
            story.percentage,
            STORY_PALETTE[story_index % STORY_PALETTE.len()],
        );
    }

    frame
}

fn story_row(
    frame: &mut Frame,
    y0: i32,
    band: i32,
    label: &str,
    percentage: f32,
    color: embedded_graphics::pixelcolor::Rgb888,
) {
    let text_y = y0 + band / 2 - 2;
    draw_text(frame, label, ROW_LABEL_X, text_y, TEXT_WHITE);

    let (gy0, gy1) = gauge_rows(y0, band);
    draw_outline_rect(frame, ROW_GAUGE_X0..ROW_GAUGE_X1, gy0..gy1, GAUGE_OUTLINE);
    fill_horizontal_bar(
        frame,
        ROW_GAUGE_X0 + 1..ROW_GAUGE_X1 - 1,
        gy0 + 1..gy1 - 1,
        percentage,
        color,
    );

    if complete(percentage) {
        draw_checkmark(frame, ROW_VALUE_X, text_y - ROW_CHECK_LIFT);
    } else {
        draw_text(frame, &percent_text(percentage), ROW_VALUE_X, text_y, TEXT_WHITE);
    }
}
