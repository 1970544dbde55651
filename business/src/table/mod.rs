//! Headless paginated, sortable table.
//!
//! [`PaginatedTable`] owns sort and page state; every frame the rendering
//! layer hands it [`TableProps`] and draws the returned [`TableView`], then
//! reports clicks back as [`TableAction`]s.

mod cell;
mod column;
mod error;
mod paginated;
mod pagination;
mod sort;

pub use cell::{CellValue, TableRow, default_compare};
pub use column::{ColumnDescriptor, Comparator, CompareError, NullCheck};
pub use error::TableError;
pub use paginated::{
    HeaderCell, PaginatedTable, Pager, TableAction, TableMode, TableProps, TableView,
};
pub use pagination::{
    DEFAULT_PAGE_SIZE, PAGE_WINDOW, PageButton, PaginationState, page_buttons, total_pages_for,
};
pub use sort::{SortDirection, SortOutcome, SortState, sorted_order};
