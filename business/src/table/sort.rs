//! Sort state and the stable, null-last row ordering.

use std::cmp::Ordering;

use ustr::Ustr;

use super::cell::TableRow;
use super::column::{ColumnDescriptor, CompareError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// Header suffix shown next to the active column label.
    pub fn indicator(self) -> &'static str {
        match self {
            Self::Ascending => " ↑",
            Self::Descending => " ↓",
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

/// Active sort column and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortState {
    field: Option<Ustr>,
    direction: SortDirection,
}

impl SortState {
    pub fn new(field: &str, direction: SortDirection) -> Self {
        Self {
            field: Some(Ustr::from(field)),
            direction,
        }
    }

    pub fn unsorted() -> Self {
        Self::default()
    }

    pub fn field(&self) -> Option<Ustr> {
        self.field
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Header click: same field flips, a new field starts ascending.
    pub fn toggle(&mut self, field: Ustr) {
        if self.field == Some(field) {
            self.direction = self.direction.flipped();
        } else {
            self.field = Some(field);
            self.direction = SortDirection::Ascending;
        }
    }

    pub fn indicator_for(&self, field: Ustr) -> Option<&'static str> {
        (self.field == Some(field)).then(|| self.direction.indicator())
    }
}

/// Result of ordering a row slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOutcome {
    /// Row indices in display order.
    pub order: Vec<usize>,
    /// Set when the comparator failed and insertion order was kept.
    pub warning: Option<CompareError>,
}

impl SortOutcome {
    pub fn insertion(len: usize) -> Self {
        Self {
            order: (0..len).collect(),
            warning: None,
        }
    }
}

/// Orders `rows` by `column` without touching the slice.
///
/// Non-null rows (see [`ColumnDescriptor::is_null`]) are stably sorted in
/// `direction`; null rows follow in insertion order whatever the direction.
/// A comparator failure aborts the sort and yields insertion order with the
/// error attached.
pub fn sorted_order<R: TableRow>(
    rows: &[R],
    column: &ColumnDescriptor<R>,
    direction: SortDirection,
) -> SortOutcome {
    let field = column.field();
    let (present, nulls): (Vec<usize>, Vec<usize>) =
        (0..rows.len()).partition(|&i| !column.is_null(&rows[i]));

    let sorted = try_merge_sort(present, |a, b| {
        column
            .compare(&rows[a], &rows[b])
            .map(|ordering| direction.apply(ordering))
    });

    match sorted {
        Ok(mut order) => {
            order.extend(nulls);
            SortOutcome {
                order,
                warning: None,
            }
        }
        Err(err) => {
            log::warn!("Sorting by `{field}` failed, keeping insertion order: {err}");
            SortOutcome {
                order: (0..rows.len()).collect(),
                warning: Some(err),
            }
        }
    }
}

/// Bottom-up stable merge sort with a fallible comparator.
fn try_merge_sort<F>(mut items: Vec<usize>, mut compare: F) -> Result<Vec<usize>, CompareError>
where
    F: FnMut(usize, usize) -> Result<Ordering, CompareError>,
{
    let len = items.len();
    let mut buffer = Vec::with_capacity(len);
    let mut width = 1;

    while width < len {
        buffer.clear();
        for start in (0..len).step_by(2 * width) {
            let mid = (start + width).min(len);
            let end = (start + 2 * width).min(len);
            let (mut left, mut right) = (start, mid);

            while left < mid && right < end {
                // Ties take from the left run to keep the sort stable.
                if compare(items[right], items[left])? == Ordering::Less {
                    buffer.push(items[right]);
                    right += 1;
                } else {
                    buffer.push(items[left]);
                    left += 1;
                }
            }
            buffer.extend_from_slice(&items[left..mid]);
            buffer.extend_from_slice(&items[right..end]);
        }
        std::mem::swap(&mut items, &mut buffer);
        width *= 2;
    }

    Ok(items)
}
