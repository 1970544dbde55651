//! Behavioural properties of the paginated table.

use portal_business::table::{
    CellValue, ColumnDescriptor, CompareError, PaginatedTable, PaginationState, SortDirection,
    SortState, TableAction, TableError, TableMode, TableProps, TableRow, sorted_order,
};
use serde_json::{Value, json};
use ustr::Ustr;

fn columns() -> Vec<ColumnDescriptor<Value>> {
    vec![
        ColumnDescriptor::new("name", "Name"),
        ColumnDescriptor::new("score", "Score"),
        ColumnDescriptor::new("created", "Created"),
    ]
}

fn rows(count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| {
            json!({
                "name": format!("user-{:02}", (i * 7) % count),
                "score": (i * 13) % 5,
                "created": format!("2024-01-{:02}T08:00:00Z", 1 + i % 28),
            })
        })
        .collect()
}

fn ids(rows: &[&Value]) -> Vec<String> {
    rows.iter().map(|row| row["name"].to_string()).collect()
}

mod pagination_properties {
    use super::*;

    #[test]
    fn test_pages_partition_the_sorted_rows() {
        let rows = rows(23);
        let columns = columns();
        let expected: Vec<&Value> = sorted_order(&rows, &columns[1], SortDirection::Descending)
            .order
            .into_iter()
            .map(|i| &rows[i])
            .collect();

        let mut table = PaginatedTable::new(columns)
            .unwrap()
            .with_initial_sort(SortState::new("score", SortDirection::Descending));
        let mut props = TableProps::local(&rows);

        let mut seen = Vec::new();
        let total_pages = table
            .render(&props)
            .unwrap()
            .pager
            .map_or(1, |pager| pager.state.total_pages);
        for page in 1..=total_pages {
            table.apply(TableAction::GoTo(page), &mut props).unwrap();
            seen.extend(table.render(&props).unwrap().rows);
        }

        assert_eq!(ids(&seen), ids(&expected));
    }

    #[test]
    fn test_twenty_three_rows_make_three_pages() {
        let rows = rows(23);
        let mut table = PaginatedTable::new(columns()).unwrap();
        let mut props = TableProps::local(&rows).with_page_size(10);

        let mut sizes = Vec::new();
        let mut summaries = Vec::new();
        for page in 1..=3 {
            table.apply(TableAction::GoTo(page), &mut props).unwrap();
            let view = table.render(&props).unwrap();
            let pager = view.pager.expect("three pages need a pager");
            assert_eq!(pager.state.total_pages, 3);
            sizes.push(view.rows.len());
            summaries.push(pager.summary);
        }

        assert_eq!(sizes, vec![10, 10, 3]);
        assert_eq!(
            summaries,
            vec![
                "Showing 1 to 10 of 23",
                "Showing 11 to 20 of 23",
                "Showing 21 to 23 of 23",
            ]
        );
    }

    #[test]
    fn test_out_of_range_pages_clamp_in_local_mode() {
        let rows = rows(23);
        let mut table = PaginatedTable::new(columns()).unwrap();
        let mut props = TableProps::local(&rows);

        assert_eq!(table.go_to_page(0, &mut props).unwrap(), 1);
        assert_eq!(table.go_to_page(4, &mut props).unwrap(), 3);
        assert_eq!(table.local_page(), 3);

        table.apply(TableAction::Next, &mut props).unwrap();
        assert_eq!(table.local_page(), 3);
    }

    #[test]
    fn test_out_of_range_pages_clamp_in_server_mode() {
        let page: Vec<Value> = rows(10);
        let mut requested = Vec::new();
        {
            let state = PaginationState {
                current_page: 1,
                total_pages: 3,
                total_items: 23,
                page_size: 10,
            };
            let mut props = TableProps::server(&page, state, |p| requested.push(p));
            let mut table = PaginatedTable::new(columns()).unwrap();

            table.apply(TableAction::GoTo(0), &mut props).unwrap();
            table.apply(TableAction::GoTo(4), &mut props).unwrap();
            table.apply(TableAction::Previous, &mut props).unwrap();
        }
        assert_eq!(requested, vec![1, 3, 1]);
    }

    #[test]
    fn test_zero_items_show_empty_state_without_pager() {
        let empty: Vec<Value> = Vec::new();
        let mut table = PaginatedTable::new(columns()).unwrap();

        let view = table.render(&TableProps::local(&empty)).unwrap();

        assert!(view.rows.is_empty());
        assert!(view.pager.is_none());
        assert_eq!(view.empty_message.as_deref(), Some("No data available"));
    }
}

mod sort_properties {
    use super::*;

    #[test]
    fn test_same_header_alternates_direction() {
        let mut table = PaginatedTable::<Value>::new(columns()).unwrap();
        let name = Ustr::from("name");

        let mut directions = Vec::new();
        for _ in 0..4 {
            table.toggle_sort(name);
            directions.push(table.sort_state().direction());
        }

        assert_eq!(
            directions,
            vec![
                SortDirection::Ascending,
                SortDirection::Descending,
                SortDirection::Ascending,
                SortDirection::Descending,
            ]
        );
    }

    #[test]
    fn test_nulls_trail_in_both_directions() {
        let rows = vec![
            json!({ "id": 0, "name": null }),
            json!({ "id": 1, "name": "b" }),
            json!({ "id": 2, "name": "a" }),
            json!({ "id": 3 }),
        ];
        let mut table = PaginatedTable::new(columns()).unwrap();
        let props = TableProps::local(&rows);
        let order = |view_rows: Vec<&Value>| -> Vec<i64> {
            view_rows.iter().filter_map(|row| row["id"].as_i64()).collect()
        };

        table.toggle_sort(Ustr::from("name"));
        assert_eq!(order(table.render(&props).unwrap().rows), vec![2, 1, 0, 3]);

        table.toggle_sort(Ustr::from("name"));
        assert_eq!(order(table.render(&props).unwrap().rows), vec![1, 2, 0, 3]);
    }

    #[test]
    fn test_caller_rows_are_never_reordered() {
        let rows = rows(12);
        let before = rows.clone();
        let mut table = PaginatedTable::new(columns()).unwrap();

        table.toggle_sort(Ustr::from("score"));
        table.render(&TableProps::local(&rows)).unwrap();

        assert_eq!(rows, before);
    }

    #[derive(Debug)]
    struct Reading {
        id: u32,
        score: u32,
    }

    impl TableRow for Reading {
        fn cell(&self, field: &str) -> Option<CellValue> {
            (field == "id").then(|| self.id.into())
        }
    }

    #[test]
    fn test_typed_comparator_orders_fields_without_cells() {
        let rows = vec![
            Reading { id: 1, score: 3 },
            Reading { id: 2, score: 1 },
            Reading { id: 3, score: 2 },
        ];
        let columns = vec![
            ColumnDescriptor::new("id", "Id"),
            ColumnDescriptor::new("score", "Score")
                .with_comparator(|a: &Reading, b: &Reading| a.score.cmp(&b.score)),
        ];
        let mut table = PaginatedTable::new(columns).unwrap();
        let props = TableProps::local(&rows);
        let scores = |view_rows: Vec<&Reading>| -> Vec<u32> {
            view_rows.iter().map(|row| row.score).collect()
        };

        assert!(table.toggle_sort(Ustr::from("score")));
        assert_eq!(scores(table.render(&props).unwrap().rows), vec![1, 2, 3]);

        table.toggle_sort(Ustr::from("score"));
        assert_eq!(scores(table.render(&props).unwrap().rows), vec![3, 2, 1]);
    }

    #[test]
    fn test_failing_comparator_keeps_insertion_order_with_warning() {
        let rows = vec![
            json!({ "name": "c" }),
            json!({ "name": "a" }),
            json!({ "name": "b" }),
        ];
        let columns = vec![ColumnDescriptor::new("name", "Name").with_fallible_comparator(
            |_: &Value, _: &Value| Err(CompareError::new("name is not comparable")),
        )];
        let mut table = PaginatedTable::new(columns).unwrap();
        let props = TableProps::local(&rows);

        table.toggle_sort(Ustr::from("name"));
        let view = table.render(&props).unwrap();

        assert_eq!(ids(&view.rows), vec!["\"c\"", "\"a\"", "\"b\""]);
        assert_eq!(
            view.sort_warning,
            Some(CompareError::new("name is not comparable"))
        );
        assert_eq!(view.sort.field(), Some(Ustr::from("name")));
    }

    #[test]
    fn test_dates_sort_chronologically() {
        let rows = vec![
            json!({ "name": "late", "created": "2024-03-01T00:00:00Z" }),
            json!({ "name": "early", "created": "2023-12-31" }),
        ];
        let mut table = PaginatedTable::new(columns()).unwrap();
        table.toggle_sort(Ustr::from("created"));

        let view = table.render(&TableProps::local(&rows)).unwrap();
        assert_eq!(view.rows[0]["name"], "early");
    }
}

mod mode_properties {
    use super::*;

    #[test]
    fn test_switching_modes_is_an_error() {
        let rows = rows(5);
        let mut table = PaginatedTable::new(columns()).unwrap();
        table.render(&TableProps::local(&rows)).unwrap();

        let server = TableProps::server(&rows, PaginationState::local(5, 5, 1), |_| {});
        assert_eq!(
            table.render(&server).unwrap_err(),
            TableError::ModeSwitched {
                from: TableMode::Local,
                to: TableMode::Server,
            }
        );
        assert_eq!(table.mode(), Some(TableMode::Local));
    }

    #[test]
    fn test_error_messages_name_the_modes() {
        let err = TableError::ModeSwitched {
            from: TableMode::Server,
            to: TableMode::Local,
        };
        assert_eq!(
            err.to_string(),
            "table switched from server to local pagination between renders"
        );
    }
}
