//! egui rendering for [`PaginatedTable`].
//!
//! - `header`: sortable column headers
//! - `pager`: Previous/Next, numbered page buttons and the summary line

mod header;
mod pager;

use std::hash::Hash;

use egui::{Align, Color32, Layout, Ui};
use egui_extras::{Column, TableBuilder};
use portal_business::table::{PaginatedTable, TableAction, TableError, TableProps, TableRow};
use ustr::Ustr;

pub use header::render_header_cell;
pub use pager::render_pager;

pub const ROW_HEIGHT: f32 = 30.0;
pub const HEADER_HEIGHT: f32 = 28.0;
const MIN_COLUMN_WIDTH: f32 = 90.0;
const WARNING_COLOR: Color32 = Color32::from_rgb(255, 165, 0);

/// Draws `table` for `props` and applies whatever the user clicked.
///
/// `cell` draws one column of one row and receives the column field. The
/// action that was applied, if any, is returned so callers can react to
/// sort changes.
pub fn paginated_table<R, F>(
    ui: &mut Ui,
    id_salt: impl Hash,
    table: &mut PaginatedTable<R>,
    mut props: TableProps<'_, R>,
    mut cell: F,
) -> Result<Option<TableAction>, TableError>
where
    R: TableRow,
    F: FnMut(&mut Ui, &R, Ustr),
{
    let view = table.render(&props)?;
    let mut action = None;

    if let Some(warning) = &view.sort_warning {
        ui.colored_label(WARNING_COLOR, format!("Could not sort rows: {warning}"));
    }

    ui.push_id(id_salt, |ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(false)
            .cell_layout(Layout::left_to_right(Align::Center))
            .columns(
                Column::auto().at_least(MIN_COLUMN_WIDTH),
                view.headers.len(),
            )
            .header(HEADER_HEIGHT, |mut header| {
                for heading in &view.headers {
                    header.col(|ui| {
                        if render_header_cell(ui, heading) {
                            action = Some(TableAction::Sort(heading.field));
                        }
                    });
                }
            })
            .body(|mut body| {
                for row in &view.rows {
                    body.row(ROW_HEIGHT, |mut table_row| {
                        for heading in &view.headers {
                            table_row.col(|ui| cell(ui, row, heading.field));
                        }
                    });
                }
            });
    });

    if let Some(message) = &view.empty_message {
        ui.add_space(8.0);
        ui.vertical_centered(|ui| {
            ui.weak(message);
        });
    }

    if let Some(pager) = &view.pager
        && let Some(clicked) = render_pager(ui, pager)
    {
        action = Some(clicked);
    }

    if let Some(action) = action {
        log::debug!("Table action {action:?}");
        table.apply(action, &mut props)?;
    }
    Ok(action)
}
