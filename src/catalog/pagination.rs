//! Pagination

use std::{num::NonZeroUsize, ops::RangeInclusive};

use crate::products::Product;

/// Default number of products per page.
pub const DEFAULT_PAGE_SIZE: NonZeroUsize = match NonZeroUsize::new(8) {
    Some(size) => size,
    None => NonZeroUsize::MIN,
};

/// Most page numbers shown in the page selector.
pub const MAX_VISIBLE_PAGES: usize = 5;

/// Number of pages needed for `count` items; zero when there are none.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1))
}

/// Clamp `page` into `[1, max(1, total_pages)]`.
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// Page numbers to show around `current`: at most [`MAX_VISIBLE_PAGES`],
/// never outside `[1, total_pages]`, shifted left near the last page so the
/// window stays full when enough pages exist.
pub fn page_window(current: usize, total_pages: usize) -> RangeInclusive<usize> {
    let mut start = current.saturating_sub(MAX_VISIBLE_PAGES / 2).max(1);
    let end = (start + MAX_VISIBLE_PAGES - 1).min(total_pages);

    if (end + 1).saturating_sub(start) < MAX_VISIBLE_PAGES {
        start = (end + 1).saturating_sub(MAX_VISIBLE_PAGES).max(1);
    }

    start..=end
}

/// One page of filtered products plus the metadata needed to render a
/// results summary and page selector.
#[derive(Debug, Clone)]
pub struct Page<'a> {
    /// Products on this page
    pub products: Vec<&'a Product>,

    /// Page number, 1-based
    pub number: usize,

    /// Number of pages; zero when nothing matched
    pub total_pages: usize,

    /// Number of products across all pages
    pub total_items: usize,

    /// Products per page
    pub page_size: usize,

    /// Page numbers to offer in the selector
    pub window: RangeInclusive<usize>,
}

impl Page<'_> {
    /// Whether nothing matched the current filters.
    pub fn is_empty(&self) -> bool {
        self.total_items == 0
    }

    /// Whether a previous page exists.
    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    /// Whether a next page exists.
    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    /// 1-based position of the first product on this page, zero when empty.
    pub fn first_position(&self) -> usize {
        if self.is_empty() {
            return 0;
        }

        (self.number - 1) * self.page_size + 1
    }

    /// 1-based position of the last product on this page, zero when empty.
    pub fn last_position(&self) -> usize {
        (self.number * self.page_size).min(self.total_items)
    }

    /// Whether the page selector is worth showing.
    pub fn needs_selector(&self) -> bool {
        self.total_pages > 1
    }
}
