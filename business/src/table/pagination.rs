//! Page arithmetic and page-button generation.

use std::ops::Range;

/// Rows per page when the caller does not choose one.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Numbered buttons in the sliding window around the current page.
pub const PAGE_WINDOW: u32 = 5;

/// Where the table is within a paged collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_items: usize,
    pub page_size: usize,
}

impl PaginationState {
    /// State for a fully fetched collection of `total_items` rows.
    pub fn local(total_items: usize, page_size: usize, current_page: u32) -> Self {
        Self {
            current_page,
            total_pages: total_pages_for(total_items, page_size),
            total_items,
            page_size,
        }
        .normalized()
    }

    /// Restores `1 <= current_page <= total_pages` and `page_size >= 1`.
    pub fn normalized(self) -> Self {
        let total_pages = self.total_pages.max(1);
        Self {
            current_page: self.current_page.clamp(1, total_pages),
            total_pages,
            total_items: self.total_items,
            page_size: self.page_size.max(1),
        }
    }

    pub fn clamp_page(&self, page: u32) -> u32 {
        page.clamp(1, self.total_pages.max(1))
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Zero-based item positions covered by the current page.
    pub fn item_range(&self) -> Range<usize> {
        let page = self.current_page.max(1) as usize;
        let end = (page * self.page_size).min(self.total_items);
        let start = ((page - 1) * self.page_size).min(end);
        start..end
    }

    /// "Showing X to Y of Z" line under the table.
    pub fn summary(&self) -> String {
        let range = self.item_range();
        if range.is_empty() {
            return format!("Showing 0 of {}", self.total_items);
        }
        format!(
            "Showing {} to {} of {}",
            range.start + 1,
            range.end,
            self.total_items
        )
    }
}

/// `max(1, ceil(total_items / page_size))`.
pub fn total_pages_for(total_items: usize, page_size: usize) -> u32 {
    if page_size == 0 {
        return 1;
    }
    u32::try_from(total_items.div_ceil(page_size))
        .unwrap_or(u32::MAX)
        .max(1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageButton {
    Page { number: u32, current: bool },
    Ellipsis,
}

/// Buttons between the Previous and Next arrows.
///
/// A window of up to [`PAGE_WINDOW`] pages is centred on `current` and
/// shifted to stay inside `1..=total`. Page 1 and the last page stay
/// reachable; an ellipsis stands in for any skipped run of pages.
pub fn page_buttons(current: u32, total: u32) -> Vec<PageButton> {
    let total = total.max(1);
    let current = current.clamp(1, total);

    let mut start = current.saturating_sub(PAGE_WINDOW / 2).max(1);
    let end = (start + PAGE_WINDOW - 1).min(total);
    if end - start + 1 < PAGE_WINDOW {
        start = end.saturating_sub(PAGE_WINDOW - 1).max(1);
    }

    let mut buttons = Vec::with_capacity(PAGE_WINDOW as usize + 4);
    if start > 1 {
        buttons.push(PageButton::Page {
            number: 1,
            current: false,
        });
        if start > 2 {
            buttons.push(PageButton::Ellipsis);
        }
    }
    buttons.extend((start..=end).map(|number| PageButton::Page {
        number,
        current: number == current,
    }));
    if end < total {
        if end + 1 < total {
            buttons.push(PageButton::Ellipsis);
        }
        buttons.push(PageButton::Page {
            number: total,
            current: false,
        });
    }
    buttons
}
