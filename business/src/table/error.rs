use thiserror::Error;

use super::paginated::TableMode;

/// Misuse of [`PaginatedTable`](super::PaginatedTable) by its caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("column {index} has an empty field name")]
    MissingField { index: usize },
    #[error("column field `{field}` is declared more than once")]
    DuplicateField { field: String },
    #[error("page size must be at least 1, got {page_size}")]
    InvalidPageSize { page_size: usize },
    #[error("server pagination needs both the pagination state and a page-change callback")]
    IncompleteServerProps,
    #[error("a page size cannot be combined with server pagination")]
    ConflictingModes,
    #[error("table switched from {from} to {to} pagination between renders")]
    ModeSwitched { from: TableMode, to: TableMode },
}
