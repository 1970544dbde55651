//! Column header cells.

use egui::{Button, RichText, Ui};
use portal_business::table::HeaderCell;

/// Renders one header. Returns `true` when a sortable header was clicked.
#[inline]
pub fn render_header_cell(ui: &mut Ui, heading: &HeaderCell) -> bool {
    if !heading.sortable {
        ui.strong(&heading.label);
        return false;
    }
    ui.add(Button::new(RichText::new(heading.text()).strong()).frame(false))
        .on_hover_text(format!("Sort by {}", heading.label))
        .clicked()
}
