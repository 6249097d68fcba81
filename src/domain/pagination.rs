use serde::Deserialize;

pub const DEFAULT_PAGE_SIZE: u32 = 25;
pub const MAX_PAGE_SIZE: u32 = 100;

pub fn normalized_page_size(requested: u32) -> u32 {
    match requested {
        0 => DEFAULT_PAGE_SIZE,
        value if value > MAX_PAGE_SIZE => MAX_PAGE_SIZE,
        value => value,
    }
}

/// Pagination block as returned by `/clientes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PaginationInfo {
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
    pub total_pages: u32,
}

/// Where the accumulated list stands relative to the server's pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    page: u32,
    per_page: u32,
    total: u64,
    total_pages: u32,
}

impl PageCursor {
    /// Cursor before any page has been loaded.
    pub fn start(per_page: u32) -> Self {
        Self {
            page: 0,
            per_page: normalized_page_size(per_page),
            total: 0,
            total_pages: 1,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn next_page(&self) -> u32 {
        self.page.saturating_add(1)
    }

    pub fn has_more(&self) -> bool {
        self.page < self.total_pages
    }

    /// Records a loaded page. `total_pages` of zero is treated as one empty page,
    /// and the page number is clamped so `page <= total_pages` always holds.
    pub fn advance(&mut self, page: u32, info: &PaginationInfo) {
        self.total = info.total;
        self.total_pages = info.total_pages.max(1);
        self.page = page.min(self.total_pages);
    }
}
