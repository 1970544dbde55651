//! Column descriptors for [`PaginatedTable`](super::PaginatedTable).

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use ustr::Ustr;

use super::cell::{TableRow, default_compare};

/// A comparator gave up on a pair of rows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CompareError {
    message: String,
}

impl CompareError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Typed, fallible row comparator carried by a column.
pub type Comparator<R> = Arc<dyn Fn(&R, &R) -> Result<Ordering, CompareError> + Send + Sync>;

/// Decides which rows sort after all others.
pub type NullCheck<R> = Arc<dyn Fn(&R) -> bool + Send + Sync>;

/// Describes one table column: which field it reads, its header label,
/// whether clicking the header sorts, and optionally how to order rows.
pub struct ColumnDescriptor<R> {
    field: Ustr,
    label: String,
    sortable: bool,
    comparator: Option<Comparator<R>>,
    null_check: Option<NullCheck<R>>,
}

impl<R> ColumnDescriptor<R> {
    /// A sortable column using the default comparator.
    pub fn new(field: &str, label: impl Into<String>) -> Self {
        Self {
            field: Ustr::from(field),
            label: label.into(),
            sortable: true,
            comparator: None,
            null_check: None,
        }
    }

    /// A column whose header does not react to clicks (actions, avatars).
    pub fn fixed(field: &str, label: impl Into<String>) -> Self {
        Self::new(field, label).sortable(false)
    }

    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    /// Orders rows with `compare` instead of the default comparator.
    ///
    /// The comparator sees every row; pair it with [`Self::with_null_check`]
    /// to push some rows to the end.
    pub fn with_comparator<F>(mut self, compare: F) -> Self
    where
        F: Fn(&R, &R) -> Ordering + Send + Sync + 'static,
    {
        self.comparator = Some(Arc::new(move |a: &R, b: &R| Ok(compare(a, b))));
        self
    }

    /// Like [`Self::with_comparator`], for comparators that can fail.
    pub fn with_fallible_comparator<F>(mut self, compare: F) -> Self
    where
        F: Fn(&R, &R) -> Result<Ordering, CompareError> + Send + Sync + 'static,
    {
        self.comparator = Some(Arc::new(compare));
        self
    }

    /// Rows for which `is_null` holds sort last, in insertion order.
    pub fn with_null_check<F>(mut self, is_null: F) -> Self
    where
        F: Fn(&R) -> bool + Send + Sync + 'static,
    {
        self.null_check = Some(Arc::new(is_null));
        self
    }

    pub fn field(&self) -> Ustr {
        self.field
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_sortable(&self) -> bool {
        self.sortable
    }

    pub fn has_comparator(&self) -> bool {
        self.comparator.is_some()
    }
}

impl<R: TableRow> ColumnDescriptor<R> {
    /// Whether `row` belongs to the trailing null group.
    ///
    /// Without an explicit check, a column with a comparator has no nulls and
    /// one without treats a missing cell as null.
    pub fn is_null(&self, row: &R) -> bool {
        match (&self.null_check, &self.comparator) {
            (Some(is_null), _) => is_null(row),
            (None, Some(_)) => false,
            (None, None) => row.cell(&self.field).is_none(),
        }
    }

    /// Ascending order of two rows by this column.
    ///
    /// Rows with a null cell compare equal here; null placement is the
    /// sorter's job.
    pub fn compare(&self, a: &R, b: &R) -> Result<Ordering, CompareError> {
        if let Some(compare) = &self.comparator {
            return compare(a, b);
        }
        let ordering = match (a.cell(&self.field), b.cell(&self.field)) {
            (Some(x), Some(y)) => default_compare(&x, &y),
            _ => Ordering::Equal,
        };
        Ok(ordering)
    }
}

impl<R> Clone for ColumnDescriptor<R> {
    fn clone(&self) -> Self {
        Self {
            field: self.field,
            label: self.label.clone(),
            sortable: self.sortable,
            comparator: self.comparator.clone(),
            null_check: self.null_check.clone(),
        }
    }
}

impl<R> fmt::Debug for ColumnDescriptor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDescriptor")
            .field("field", &self.field)
            .field("label", &self.label)
            .field("sortable", &self.sortable)
            .field("comparator", &self.comparator.is_some())
            .field("null_check", &self.null_check.is_some())
            .finish()
    }
}
