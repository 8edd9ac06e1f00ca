//! Offset pagination primitives and the product listing query.

use common::CategoryId;
use serde::{Deserialize, Serialize};

/// A zero-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Zero-based page index.
    pub page: usize,

    /// Number of items per page. Always at least 1.
    pub size: usize,
}

impl PageRequest {
    /// Creates a page request; a zero size is clamped to 1.
    pub fn new(page: usize, size: usize) -> Self {
        Self {
            page,
            size: size.max(1),
        }
    }

    /// Returns the number of items to skip.
    pub fn offset(&self) -> usize {
        self.page * self.size
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 0, size: 10 }
    }
}

/// One page of results with the metadata needed by paging clients.
///
/// At a fixed store state, requesting the same page twice returns the same
/// items: listings are ordered by a deterministic key (product id ascending).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// The items on this page.
    pub items: Vec<T>,

    /// Zero-based index of this page.
    pub page: usize,

    /// Requested page size.
    pub size: usize,

    /// Total number of items across all pages.
    pub total_elements: usize,

    /// Total number of pages.
    pub total_pages: usize,

    /// True when this is the first page.
    pub first: bool,

    /// True when this is the last page.
    pub last: bool,
}

impl<T> Page<T> {
    /// Builds a page from the items selected for `request` out of
    /// `total_elements` matching items.
    pub fn new(items: Vec<T>, request: PageRequest, total_elements: usize) -> Self {
        let total_pages = total_elements.div_ceil(request.size);
        Self {
            items,
            page: request.page,
            size: request.size,
            total_elements,
            total_pages,
            first: request.page == 0,
            last: request.page + 1 >= total_pages.max(1),
        }
    }

    /// Maps the items of this page, preserving the page metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            first: self.first,
            last: self.last,
        }
    }

    /// Number of items on this page.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when this page holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Query for the paginated product listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductQuery {
    /// Page to return.
    pub page: PageRequest,

    /// Restrict the listing to products in this category.
    pub category: Option<CategoryId>,
}

impl ProductQuery {
    /// Creates a query for the given page with no filters.
    pub fn new(page: PageRequest) -> Self {
        Self {
            page,
            category: None,
        }
    }

    /// Filters the listing by category.
    pub fn category(mut self, category: CategoryId) -> Self {
        self.category = Some(category);
        self
    }
}
