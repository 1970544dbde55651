//! Cell renderers for the portal tables.

use chrono::{DateTime, Utc};
use egui::{Color32, ProgressBar, RichText, Ui};
use portal_business::portal::AssessmentStatus;

const AVATAR_COLOR: Color32 = Color32::from_rgb(79, 70, 229);
const COMPLETION_BAR_WIDTH: f32 = 110.0;

/// Placeholder for missing values.
pub const NOT_AVAILABLE: &str = "N/A";

#[inline]
pub fn text_cell(ui: &mut Ui, text: &str) {
    ui.label(text);
}

/// Initials badge followed by the name.
#[inline]
pub fn avatar_cell(ui: &mut Ui, initials: &str, name: &str) {
    ui.horizontal(|ui| {
        ui.label(
            RichText::new(initials)
                .strong()
                .monospace()
                .color(Color32::WHITE)
                .background_color(AVATAR_COLOR),
        );
        ui.label(name);
    });
}

#[inline]
pub fn date_cell(ui: &mut Ui, date: Option<DateTime<Utc>>) {
    match date {
        Some(date) => ui.label(date.format("%Y-%m-%d").to_string()),
        None => ui.weak(NOT_AVAILABLE),
    };
}

#[inline]
pub fn progress_cell(ui: &mut Ui, percent: u32) {
    let fraction = percent.min(100) as f32 / 100.0;
    ui.add(
        ProgressBar::new(fraction)
            .desired_width(COMPLETION_BAR_WIDTH)
            .text(format!("{percent}%")),
    );
}

/// Colour coded assessment status.
#[inline]
pub fn status_cell(ui: &mut Ui, status: AssessmentStatus) {
    ui.label(
        RichText::new(status.as_str())
            .strong()
            .color(status_color(status)),
    );
}

fn status_color(status: AssessmentStatus) -> Color32 {
    match status {
        AssessmentStatus::Assigned => Color32::from_rgb(202, 138, 4),
        AssessmentStatus::InProcess => Color32::from_rgb(37, 99, 235),
        AssessmentStatus::Completed => Color32::from_rgb(22, 163, 74),
    }
}
