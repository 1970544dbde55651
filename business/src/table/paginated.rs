//! The table model: sort state, page state, and what a frame should draw.

use std::collections::HashSet;
use std::fmt;

use ustr::Ustr;

use super::cell::TableRow;
use super::column::{ColumnDescriptor, CompareError};
use super::error::TableError;
use super::pagination::{DEFAULT_PAGE_SIZE, PageButton, PaginationState, page_buttons};
use super::sort::{SortOutcome, SortState, sorted_order};

const DEFAULT_EMPTY_MESSAGE: &str = "No data available";

/// Who owns pagination for a table instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableMode {
    /// The table receives every row and slices pages itself.
    Local,
    /// The caller fetches one page at a time and is told about page changes.
    Server,
}

impl fmt::Display for TableMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => f.write_str("local"),
            Self::Server => f.write_str("server"),
        }
    }
}

/// Per-render inputs.
pub struct TableProps<'a, R> {
    rows: &'a [R],
    pagination: Option<PaginationState>,
    on_page_change: Option<Box<dyn FnMut(u32) + 'a>>,
    page_size: Option<usize>,
    collection_key: u64,
}

impl<'a, R> TableProps<'a, R> {
    /// Bare props; with nothing else set this is local mode.
    pub fn new(rows: &'a [R]) -> Self {
        Self {
            rows,
            pagination: None,
            on_page_change: None,
            page_size: None,
            collection_key: 0,
        }
    }

    /// The full collection, paged by the table.
    pub fn local(rows: &'a [R]) -> Self {
        Self::new(rows)
    }

    /// One page of a server-side collection.
    pub fn server<F>(rows: &'a [R], pagination: PaginationState, on_page_change: F) -> Self
    where
        F: FnMut(u32) + 'a,
    {
        Self::new(rows)
            .with_pagination(pagination)
            .with_page_change(on_page_change)
    }

    pub fn with_pagination(mut self, pagination: PaginationState) -> Self {
        self.pagination = Some(pagination);
        self
    }

    pub fn with_page_change<F>(mut self, on_page_change: F) -> Self
    where
        F: FnMut(u32) + 'a,
    {
        self.on_page_change = Some(Box::new(on_page_change));
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// A new key tells the table the whole collection was replaced.
    pub fn with_collection_key(mut self, collection_key: u64) -> Self {
        self.collection_key = collection_key;
        self
    }

    pub fn rows(&self) -> &'a [R] {
        self.rows
    }

    pub fn collection_key(&self) -> u64 {
        self.collection_key
    }

    fn mode(&self) -> Result<TableMode, TableError> {
        match (self.pagination.is_some(), self.on_page_change.is_some()) {
            (true, true) if self.page_size.is_some() => Err(TableError::ConflictingModes),
            (true, true) => Ok(TableMode::Server),
            (false, false) => Ok(TableMode::Local),
            _ => Err(TableError::IncompleteServerProps),
        }
    }

    fn local_page_size(&self) -> Result<usize, TableError> {
        match self.page_size {
            Some(0) => Err(TableError::InvalidPageSize { page_size: 0 }),
            Some(page_size) => Ok(page_size),
            None => Ok(DEFAULT_PAGE_SIZE),
        }
    }
}

impl<R> fmt::Debug for TableProps<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableProps")
            .field("rows", &self.rows.len())
            .field("pagination", &self.pagination)
            .field("on_page_change", &self.on_page_change.is_some())
            .field("page_size", &self.page_size)
            .field("collection_key", &self.collection_key)
            .finish()
    }
}

/// One column header as it should be drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub field: Ustr,
    pub label: String,
    pub sortable: bool,
    /// `↑`/`↓` suffix when this column drives the sort.
    pub indicator: Option<&'static str>,
}

impl HeaderCell {
    pub fn text(&self) -> String {
        match self.indicator {
            Some(indicator) => format!("{}{indicator}", self.label),
            None => self.label.clone(),
        }
    }
}

/// Navigation controls under the rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    pub state: PaginationState,
    pub buttons: Vec<PageButton>,
    pub summary: String,
}

impl Pager {
    fn new(state: PaginationState) -> Self {
        Self {
            state,
            buttons: page_buttons(state.current_page, state.total_pages),
            summary: state.summary(),
        }
    }

    pub fn has_previous(&self) -> bool {
        self.state.has_previous()
    }

    pub fn has_next(&self) -> bool {
        self.state.has_next()
    }
}

/// Everything a frame needs to draw the table.
#[derive(Debug)]
pub struct TableView<'a, R> {
    pub mode: TableMode,
    pub headers: Vec<HeaderCell>,
    /// Rows of the current page in display order.
    pub rows: Vec<&'a R>,
    pub sort: SortState,
    /// `None` when there is nothing to page through.
    pub pager: Option<Pager>,
    /// Set instead of rows when the collection is empty.
    pub empty_message: Option<String>,
    pub sort_warning: Option<CompareError>,
}

impl<R> TableView<'_, R> {
    pub fn is_empty(&self) -> bool {
        self.empty_message.is_some()
    }
}

/// Interactions the rendering layer reports back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableAction {
    Sort(Ustr),
    GoTo(u32),
    Previous,
    Next,
}

/// A sortable table with local or server pagination.
///
/// The table never reorders the caller's rows. Sort state and the local page
/// survive renders until the caller changes the collection key.
pub struct PaginatedTable<R> {
    columns: Vec<ColumnDescriptor<R>>,
    initial_sort: SortState,
    sort: SortState,
    local_page: u32,
    mode: Option<TableMode>,
    collection_key: Option<u64>,
    empty_message: String,
}

impl<R> PaginatedTable<R> {
    pub fn new(columns: Vec<ColumnDescriptor<R>>) -> Result<Self, TableError> {
        let mut seen = HashSet::with_capacity(columns.len());
        for (index, column) in columns.iter().enumerate() {
            let field = column.field();
            if field.as_str().trim().is_empty() {
                return Err(TableError::MissingField { index });
            }
            if !seen.insert(field) {
                return Err(TableError::DuplicateField {
                    field: field.to_string(),
                });
            }
        }

        Ok(Self {
            columns,
            initial_sort: SortState::unsorted(),
            sort: SortState::unsorted(),
            local_page: 1,
            mode: None,
            collection_key: None,
            empty_message: DEFAULT_EMPTY_MESSAGE.to_owned(),
        })
    }

    /// Sort applied on first render and after every collection reset.
    pub fn with_initial_sort(mut self, sort: SortState) -> Self {
        self.initial_sort = sort;
        self.sort = sort;
        self
    }

    pub fn with_empty_message(mut self, message: impl Into<String>) -> Self {
        self.empty_message = message.into();
        self
    }

    pub fn columns(&self) -> &[ColumnDescriptor<R>] {
        &self.columns
    }

    /// Current sort, for callers that forward it to a backend.
    pub fn sort_state(&self) -> SortState {
        self.sort
    }

    /// Page the table shows in local mode.
    pub fn local_page(&self) -> u32 {
        self.local_page
    }

    /// Mode fixed by the first render, if any.
    pub fn mode(&self) -> Option<TableMode> {
        self.mode
    }

    /// Header click. Unknown and non-sortable fields are ignored.
    pub fn toggle_sort(&mut self, field: Ustr) -> bool {
        let sortable = self
            .columns
            .iter()
            .any(|column| column.field() == field && column.is_sortable());
        if !sortable {
            log::debug!("Ignoring sort request for `{field}`");
            return false;
        }
        self.sort.toggle(field);
        true
    }

    fn lock_mode(&mut self, props: &TableProps<'_, R>) -> Result<TableMode, TableError> {
        let mode = props.mode()?;
        match self.mode {
            Some(from) if from != mode => Err(TableError::ModeSwitched { from, to: mode }),
            _ => {
                self.mode = Some(mode);
                Ok(mode)
            }
        }
    }

    fn sync_collection(&mut self, collection_key: u64) {
        match self.collection_key {
            Some(previous) if previous == collection_key => {}
            Some(previous) => {
                log::debug!("Collection {previous} replaced by {collection_key}, resetting table");
                self.sort = self.initial_sort;
                self.local_page = 1;
                self.collection_key = Some(collection_key);
            }
            None => self.collection_key = Some(collection_key),
        }
    }

    fn page_state(
        &self,
        mode: TableMode,
        props: &TableProps<'_, R>,
    ) -> Result<PaginationState, TableError> {
        match (mode, props.pagination) {
            (TableMode::Server, Some(pagination)) => Ok(pagination.normalized()),
            _ => Ok(PaginationState::local(
                props.rows.len(),
                props.local_page_size()?,
                self.local_page,
            )),
        }
    }

    /// Moves to `page`, clamped into the valid range. Returns the page used.
    ///
    /// Server mode hands the page to the caller's callback; local mode
    /// switches pages itself.
    pub fn go_to_page(&mut self, page: u32, props: &mut TableProps<'_, R>) -> Result<u32, TableError> {
        let mode = self.lock_mode(props)?;
        let target = self.page_state(mode, props)?.clamp_page(page);
        match (mode, props.on_page_change.as_mut()) {
            (TableMode::Server, Some(on_page_change)) => on_page_change(target),
            _ => self.local_page = target,
        }
        Ok(target)
    }

    /// Applies an interaction reported by the rendering layer.
    pub fn apply(&mut self, action: TableAction, props: &mut TableProps<'_, R>) -> Result<(), TableError> {
        match action {
            TableAction::Sort(field) => {
                self.toggle_sort(field);
            }
            TableAction::GoTo(page) => {
                self.go_to_page(page, props)?;
            }
            TableAction::Previous | TableAction::Next => {
                let mode = self.lock_mode(props)?;
                let current = self.page_state(mode, props)?.current_page;
                let page = if action == TableAction::Next {
                    current.saturating_add(1)
                } else {
                    current.saturating_sub(1)
                };
                self.go_to_page(page, props)?;
            }
        }
        Ok(())
    }
}

impl<R: TableRow> PaginatedTable<R> {
    fn sort_rows(&self, rows: &[R]) -> SortOutcome {
        let column = self.sort.field().and_then(|field| {
            self.columns
                .iter()
                .find(|column| column.field() == field && column.is_sortable())
        });
        match column {
            Some(column) => sorted_order(rows, column, self.sort.direction()),
            None => SortOutcome::insertion(rows.len()),
        }
    }

    fn headers(&self) -> Vec<HeaderCell> {
        self.columns
            .iter()
            .map(|column| HeaderCell {
                field: column.field(),
                label: column.label().to_owned(),
                sortable: column.is_sortable(),
                indicator: column
                    .is_sortable()
                    .then(|| self.sort.indicator_for(column.field()))
                    .flatten(),
            })
            .collect()
    }

    /// Works out what to draw for `props`.
    pub fn render<'a>(&mut self, props: &TableProps<'a, R>) -> Result<TableView<'a, R>, TableError> {
        let mode = self.lock_mode(props)?;
        self.sync_collection(props.collection_key);

        let state = self.page_state(mode, props)?;
        if mode == TableMode::Local {
            self.local_page = state.current_page;
        }

        let rows = props.rows;
        let empty = rows.is_empty() || (mode == TableMode::Server && state.total_items == 0);
        let outcome = if empty {
            SortOutcome::insertion(0)
        } else {
            self.sort_rows(rows)
        };

        let order = match mode {
            TableMode::Local => outcome.order.get(state.item_range()).unwrap_or_default(),
            TableMode::Server => outcome.order.as_slice(),
        };
        let visible: Vec<&'a R> = order.iter().map(|&i| &rows[i]).collect();

        let pager = (!empty && state.total_pages > 1).then(|| Pager::new(state));

        Ok(TableView {
            mode,
            headers: self.headers(),
            rows: visible,
            sort: self.sort,
            pager,
            empty_message: empty.then(|| self.empty_message.clone()),
            sort_warning: outcome.warning,
        })
    }
}

impl<R> fmt::Debug for PaginatedTable<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaginatedTable")
            .field("columns", &self.columns)
            .field("sort", &self.sort)
            .field("local_page", &self.local_page)
            .field("mode", &self.mode)
            .field("collection_key", &self.collection_key)
            .finish()
    }
}
