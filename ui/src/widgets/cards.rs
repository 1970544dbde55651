//! Headline number cards for the dashboard and the assessments page.

use egui::{Frame, RichText, Ui};

const CARD_WIDTH: f32 = 150.0;

/// Shown in place of a value that is still loading.
pub const LOADING_VALUE: &str = "...";

/// A titled card with one large value, or [`LOADING_VALUE`] while `value`
/// is `None`.
pub fn stat_card(ui: &mut Ui, title: &str, value: Option<String>) {
    Frame::group(ui.style()).show(ui, |ui| {
        ui.set_min_width(CARD_WIDTH);
        ui.vertical(|ui| {
            ui.weak(title);
            let value = value.as_deref().unwrap_or(LOADING_VALUE);
            ui.label(RichText::new(value).heading().strong());
        });
    });
}

/// A row of cards that wraps on narrow windows.
pub fn card_row(ui: &mut Ui, cards: &[(&str, Option<String>)]) {
    ui.horizontal_wrapped(|ui| {
        for (title, value) in cards {
            stat_card(ui, title, value.clone());
        }
    });
}
