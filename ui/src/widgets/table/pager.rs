//! Page navigation under the table rows.

use egui::{Button, Ui};
use portal_business::table::{PageButton, Pager, TableAction};

pub const PREVIOUS_LABEL: &str = "← Previous";
pub const NEXT_LABEL: &str = "Next →";

/// Renders the summary line and navigation buttons.
///
/// Returns the navigation the user asked for. Clicking the current page is
/// not reported.
pub fn render_pager(ui: &mut Ui, pager: &Pager) -> Option<TableAction> {
    let mut action = None;

    ui.add_space(8.0);
    ui.horizontal(|ui| {
        ui.label(&pager.summary);
        ui.separator();

        if ui
            .add_enabled(pager.has_previous(), Button::new(PREVIOUS_LABEL))
            .clicked()
        {
            action = Some(TableAction::Previous);
        }

        for button in &pager.buttons {
            match *button {
                PageButton::Page { number, current } => {
                    let clicked = ui
                        .add(Button::new(number.to_string()).selected(current))
                        .clicked();
                    if clicked && !current {
                        action = Some(TableAction::GoTo(number));
                    }
                }
                PageButton::Ellipsis => {
                    ui.label("…");
                }
            }
        }

        if ui
            .add_enabled(pager.has_next(), Button::new(NEXT_LABEL))
            .clicked()
        {
            action = Some(TableAction::Next);
        }
    });

    action
}
