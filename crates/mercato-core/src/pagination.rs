//! Pagination types for list operations.

use crate::{FieldError, MercatoError, MercatoResult};
use serde::{Deserialize, Serialize};

/// A request for a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PageRequest {
    /// The page number (1-indexed).
    pub page: u32,
    /// The number of items per page.
    pub limit: u32,
}

impl PageRequest {
    /// The default page size.
    pub const DEFAULT_LIMIT: u32 = 20;
    /// The maximum allowed page size.
    pub const MAX_LIMIT: u32 = 100;

    /// Creates a page request without checking bounds.
    #[must_use]
    pub const fn new(page: u32, limit: u32) -> Self {
        Self { page, limit }
    }

    /// Creates a page request, rejecting out-of-range values.
    pub fn validated(page: u32, limit: u32) -> MercatoResult<Self> {
        let mut violations = Vec::new();
        if page == 0 {
            violations.push(FieldError::new("page", "Page must be at least 1"));
        }
        if limit == 0 || limit > Self::MAX_LIMIT {
            violations.push(FieldError::new(
                "limit",
                format!("Limit must be between 1 and {}", Self::MAX_LIMIT),
            ));
        }
        if violations.is_empty() {
            Ok(Self::new(page, limit))
        } else {
            Err(MercatoError::Validation(violations))
        }
    }

    /// Creates a page request for the first page with default size.
    #[must_use]
    pub const fn first() -> Self {
        Self::new(1, Self::DEFAULT_LIMIT)
    }

    /// Returns the offset for backend queries.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page.saturating_sub(1) as u64) * self.limit as u64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first()
    }
}

/// A page of results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// The current page number (1-indexed).
    pub page: u32,
    /// The number of items per page.
    pub limit: u32,
    /// The total number of items across all pages.
    pub total: u64,
    /// The total number of pages.
    pub total_pages: u64,
}

impl<T> Page<T> {
    /// Creates a new page.
    #[must_use]
    pub fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        let total_pages = if request.limit > 0 {
            total.div_ceil(u64::from(request.limit))
        } else {
            0
        };
        Self {
            items,
            page: request.page,
            limit: request.limit,
            total,
            total_pages,
        }
    }

    /// Creates an empty page.
    #[must_use]
    pub fn empty(request: PageRequest) -> Self {
        Self::new(Vec::new(), request, 0)
    }

    /// Builds a page out of an already filtered collection.
    #[must_use]
    pub fn from_slice(all: &[T], request: PageRequest) -> Self
    where
        T: Clone,
    {
        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let items = all
            .iter()
            .skip(offset)
            .take(request.limit as usize)
            .cloned()
            .collect();
        Self::new(items, request, all.len() as u64)
    }

    /// Maps the page content to a different type.
    #[must_use]
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            limit: self.limit,
            total: self.total,
            total_pages: self.total_pages,
        }
    }

    /// Returns true if the page is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns true if there is a next page.
    #[must_use]
    pub fn has_next(&self) -> bool {
        u64::from(self.page) < self.total_pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_offset() {
        assert_eq!(PageRequest::new(1, 10).offset(), 0);
        assert_eq!(PageRequest::new(3, 10).offset(), 20);
        assert_eq!(PageRequest::new(5, 15).offset(), 60);
    }

    #[test]
    fn test_validated_rejects_out_of_range() {
        assert!(PageRequest::validated(1, 20).is_ok());

        let err = PageRequest::validated(0, 500).unwrap_err();
        match err {
            MercatoError::Validation(violations) => {
                assert_eq!(violations.len(), 2);
                assert_eq!(violations[0].field, "page");
                assert_eq!(violations[1].field, "limit");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_page_totals() {
        let page: Page<i32> = Page::new(vec![1, 2, 3], PageRequest::new(1, 10), 25);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_next());

        let last: Page<i32> = Page::new(vec![1], PageRequest::new(3, 10), 21);
        assert!(!last.has_next());
    }

    #[test]
    fn test_from_slice() {
        let all: Vec<i32> = (1..=25).collect();
        let page = Page::from_slice(&all, PageRequest::new(3, 10));
        assert_eq!(page.items, vec![21, 22, 23, 24, 25]);
        assert_eq!(page.total, 25);

        let beyond = Page::from_slice(&all, PageRequest::new(9, 10));
        assert!(beyond.is_empty());
    }

    #[test]
    fn test_page_map() {
        let page = Page::new(vec![1, 2, 3], PageRequest::new(1, 10), 3);
        let mapped = page.map(|x| x * 2);
        assert_eq!(mapped.items, vec![2, 4, 6]);
    }
}
