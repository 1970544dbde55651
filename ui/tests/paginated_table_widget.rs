//! Rendering of the paginated table widget in both pagination modes.

use egui_kittest::Harness;
use kittest::Queryable;
use portal_business::table::{
    ColumnDescriptor, CompareError, PaginatedTable, PaginationState, SortDirection, SortState,
    TableProps,
};
use portal_ui::widgets::paginated_table;
use serde_json::{Value, json};

struct LocalState {
    table: PaginatedTable<Value>,
    rows: Vec<Value>,
}

struct ServerState {
    table: PaginatedTable<Value>,
    rows: Vec<Value>,
    pagination: PaginationState,
    requested: Option<u32>,
}

fn columns() -> Vec<ColumnDescriptor<Value>> {
    vec![ColumnDescriptor::new("name", "Name")]
}

fn rows(count: usize) -> Vec<Value> {
    (1..=count)
        .map(|i| json!({ "name": format!("row-{i:02}") }))
        .collect()
}

fn local_harness(count: usize) -> Harness<'static, LocalState> {
    let state = LocalState {
        table: PaginatedTable::new(columns()).expect("valid columns"),
        rows: rows(count),
    };
    Harness::new_ui_state(
        |ui, state: &mut LocalState| {
            let props = TableProps::local(&state.rows);
            paginated_table(ui, "local", &mut state.table, props, |ui, row, field| {
                ui.label(row[field.as_str()].as_str().unwrap_or_default());
            })
            .expect("local table renders");
        },
        state,
    )
}

fn server_harness() -> Harness<'static, ServerState> {
    let state = ServerState {
        table: PaginatedTable::new(columns()).expect("valid columns"),
        rows: rows(10),
        pagination: PaginationState {
            current_page: 1,
            total_pages: 3,
            total_items: 25,
            page_size: 10,
        },
        requested: None,
    };
    Harness::new_ui_state(
        |ui, state: &mut ServerState| {
            let mut requested = None;
            let props = TableProps::server(&state.rows, state.pagination, |page| {
                requested = Some(page);
            });
            paginated_table(ui, "server", &mut state.table, props, |ui, row, field| {
                ui.label(row[field.as_str()].as_str().unwrap_or_default());
            })
            .expect("server table renders");
            if requested.is_some() {
                state.requested = requested;
            }
        },
        state,
    )
}

mod local_mode_tests {
    use super::*;

    #[test]
    fn test_first_page_and_summary() {
        let mut harness = local_harness(23);
        harness.run();

        assert!(harness.query_by_label("row-01").is_some());
        assert!(harness.query_by_label("row-10").is_some());
        assert!(harness.query_by_label("row-11").is_none());
        assert!(harness.query_by_label("Showing 1 to 10 of 23").is_some());
    }

    #[test]
    fn test_next_moves_to_second_page() {
        let mut harness = local_harness(23);
        harness.run();

        harness.query_by_label("Next →").unwrap().click();
        harness.run();

        assert_eq!(harness.state().table.local_page(), 2);
        assert!(harness.query_by_label("row-11").is_some());
        assert!(harness.query_by_label("Showing 11 to 20 of 23").is_some());
    }

    #[test]
    fn test_page_button_jumps_to_last_page() {
        let mut harness = local_harness(23);
        harness.run();

        harness.query_by_label("3").unwrap().click();
        harness.run();

        assert_eq!(harness.state().table.local_page(), 3);
        assert!(harness.query_by_label("row-23").is_some());
        assert!(harness.query_by_label("Showing 21 to 23 of 23").is_some());
    }

    #[test]
    fn test_empty_rows_show_message_without_pager() {
        let mut harness = local_harness(0);
        harness.run();

        assert!(harness.query_by_label("No data available").is_some());
        assert!(harness.query_by_label("Next →").is_none());
        assert!(harness.query_by_label_contains("Showing").is_none());
    }

    #[test]
    fn test_single_page_has_no_pager() {
        let mut harness = local_harness(7);
        harness.run();

        assert!(harness.query_by_label("row-07").is_some());
        assert!(harness.query_by_label("← Previous").is_none());
    }

    #[test]
    fn test_header_shows_sort_indicator() {
        let state = LocalState {
            table: PaginatedTable::new(columns())
                .expect("valid columns")
                .with_initial_sort(SortState::new("name", SortDirection::Descending)),
            rows: rows(3),
        };
        let mut harness = Harness::new_ui_state(
            |ui, state: &mut LocalState| {
                let props = TableProps::local(&state.rows);
                paginated_table(ui, "sorted", &mut state.table, props, |ui, row, field| {
                    ui.label(row[field.as_str()].as_str().unwrap_or_default());
                })
                .expect("local table renders");
            },
            state,
        );
        harness.run();

        assert!(harness.query_by_label("Name ↓").is_some());
    }

    #[test]
    fn test_failing_comparator_shows_warning_and_keeps_order() {
        let columns = vec![ColumnDescriptor::new("name", "Name").with_fallible_comparator(
            |_: &Value, _: &Value| Err(CompareError::new("names are encrypted")),
        )];
        let state = LocalState {
            table: PaginatedTable::new(columns)
                .expect("valid columns")
                .with_initial_sort(SortState::new("name", SortDirection::Descending)),
            rows: rows(3),
        };
        let mut harness = Harness::new_ui_state(
            |ui, state: &mut LocalState| {
                let props = TableProps::local(&state.rows);
                paginated_table(ui, "warned", &mut state.table, props, |ui, row, field| {
                    ui.label(row[field.as_str()].as_str().unwrap_or_default());
                })
                .expect("local table renders");
            },
            state,
        );
        harness.run();

        assert!(
            harness
                .query_by_label("Could not sort rows: names are encrypted")
                .is_some()
        );
        let state = harness.state_mut();
        let view = state
            .table
            .render(&TableProps::local(&state.rows))
            .expect("local table renders");
        let shown: Vec<&str> = view
            .rows
            .iter()
            .filter_map(|row| row["name"].as_str())
            .collect();
        assert_eq!(shown, vec!["row-01", "row-02", "row-03"]);
    }
}

mod server_mode_tests {
    use super::*;

    #[test]
    fn test_server_summary_uses_total_items() {
        let mut harness = server_harness();
        harness.run();

        assert!(harness.query_by_label("Showing 1 to 10 of 25").is_some());
    }

    #[test]
    fn test_next_is_forwarded_to_callback() {
        let mut harness = server_harness();
        harness.run();

        harness.query_by_label("Next →").unwrap().click();
        harness.run();

        assert_eq!(harness.state().requested, Some(2));
        assert_eq!(harness.state().table.local_page(), 1);
    }

    #[test]
    fn test_zero_total_items_is_empty() {
        let mut harness = server_harness();
        harness.state_mut().pagination = PaginationState {
            current_page: 1,
            total_pages: 0,
            total_items: 0,
            page_size: 10,
        };
        harness.run();

        assert!(harness.query_by_label("No data available").is_some());
        assert!(harness.query_by_label("Next →").is_none());
    }
}
