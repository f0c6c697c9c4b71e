use std::ops::Range;

/// Messages per page in the interactive view
pub const DEFAULT_PAGE_SIZE: usize = 20;
/// Page size change per zoom key press
pub const PAGE_SIZE_STEP: usize = 10;
pub const MAX_PAGE_SIZE: usize = 200;

/// Next page size when growing or shrinking by one step. Never below 1, and
/// never grown past [`MAX_PAGE_SIZE`] (a larger configured size is kept).
pub fn step_page_size(current: usize, grow: bool) -> usize {
    if grow {
        (current + PAGE_SIZE_STEP).min(MAX_PAGE_SIZE.max(current))
    } else {
        current.saturating_sub(PAGE_SIZE_STEP).max(1)
    }
}

/// Fixed-size page window over the displayed set.
///
/// `current_page` is always within `[0, total_pages - 1]` and there is always
/// at least one page, even for an empty set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    count: usize,
    page_size: usize,
    total_pages: usize,
    current_page: usize,
}

impl Pagination {
    /// Paginate `count` messages, positioned on the first page
    pub fn new(count: usize, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        Self {
            count,
            page_size,
            total_pages: Self::pages_for(count, page_size),
            current_page: 0,
        }
    }

    fn pages_for(count: usize, page_size: usize) -> usize {
        count.div_ceil(page_size).max(1)
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn is_first(&self) -> bool {
        self.current_page == 0
    }

    pub fn is_last(&self) -> bool {
        self.current_page + 1 == self.total_pages
    }

    /// Advance one page. Returns false (and does nothing) on the last page.
    pub fn next(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.current_page += 1;
        true
    }

    /// Go back one page. Returns false (and does nothing) on the first page.
    pub fn prev(&mut self) -> bool {
        if self.is_first() {
            return false;
        }
        self.current_page -= 1;
        true
    }

    /// Jump to the newest messages
    pub fn go_to_last(&mut self) -> bool {
        let last = self.total_pages - 1;
        let changed = self.current_page != last;
        self.current_page = last;
        changed
    }

    pub fn go_to_first(&mut self) -> bool {
        let changed = self.current_page != 0;
        self.current_page = 0;
        changed
    }

    /// Change the page size, keeping the current page in range
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.total_pages = Self::pages_for(self.count, self.page_size);
        self.current_page = self.current_page.min(self.total_pages - 1);
    }

    /// Displayed-set positions covered by the current page
    pub fn page_range(&self) -> Range<usize> {
        let start = (self.current_page * self.page_size).min(self.count);
        let end = (start + self.page_size).min(self.count);
        start..end
    }

    /// 1-based `(first, last)` positions on the current page, for status text
    pub fn shown_range(&self) -> (usize, usize) {
        let range = self.page_range();
        (range.start + 1, range.end)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(0, DEFAULT_PAGE_SIZE)
    }
}
