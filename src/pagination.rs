//! Paged responses and the page/size controls that drive them.

use serde::{Deserialize, Serialize};

/// Page sizes offered by the pagination footer
pub const PAGE_SIZES: [u32; 4] = [5, 10, 20, 50];

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// `meta` block as sent by the REST API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub last_page: u32,
}

/// Wire envelope `{ data, meta }`
#[derive(Debug, Clone, Deserialize)]
pub struct PagedResponse<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

/// Pagination data as the dashboard consumes it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationData {
    pub current_page: u32,
    #[serde(rename = "registerPerPage")]
    pub per_page: u32,
    #[serde(rename = "totalCountofRegisters")]
    pub total: u64,
    pub last_page: u32,
}

impl From<PageMeta> for PaginationData {
    fn from(meta: PageMeta) -> Self {
        Self {
            current_page: meta.page,
            per_page: meta.limit,
            total: meta.total,
            last_page: meta.last_page,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub meta: PaginationData,
}

impl<T> Page<T> {
    /// What a failed fetch renders as: no rows, all counters zero
    pub fn empty() -> Self {
        Self {
            data: Vec::new(),
            meta: PaginationData::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<T> From<PagedResponse<T>> for Page<T> {
    fn from(response: PagedResponse<T>) -> Self {
        Self {
            data: response.data,
            meta: response.meta.into(),
        }
    }
}

/// Selected page and page size for one listing.
///
/// Every page handed out is within `[1, last_page]`, treating an unknown or
/// zero `last_page` as a single page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page: u32,
    page_size: u32,
    last_page: u32,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Paginator {
    pub fn new(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size: normalize_page_size(page_size),
            last_page: 1,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn last_page(&self) -> u32 {
        self.last_page
    }

    /// Adopt the bounds reported by the latest response
    pub fn sync(&mut self, meta: &PaginationData) {
        self.last_page = meta.last_page.max(1);
        self.page = self.clamp(self.page);
    }

    pub fn clamp(&self, page: u32) -> u32 {
        page.clamp(1, self.last_page.max(1))
    }

    pub fn go_to(&mut self, page: u32) -> u32 {
        self.page = self.clamp(page);
        self.page
    }

    pub fn can_previous(&self) -> bool {
        self.page > 1
    }

    pub fn can_next(&self) -> bool {
        self.page < self.last_page
    }

    pub fn previous(&mut self) -> u32 {
        self.go_to(self.page.saturating_sub(1))
    }

    pub fn next(&mut self) -> u32 {
        self.go_to(self.page.saturating_add(1))
    }

    /// Changing the page size keeps the current page, still clamped
    pub fn set_page_size(&mut self, size: u32) {
        self.page_size = normalize_page_size(size);
        self.page = self.clamp(self.page);
    }
}

/// Snap an arbitrary size to the nearest offered size that is not smaller
pub fn normalize_page_size(size: u32) -> u32 {
    PAGE_SIZES
        .iter()
        .copied()
        .find(|s| *s >= size)
        .unwrap_or(PAGE_SIZES[PAGE_SIZES.len() - 1])
}
