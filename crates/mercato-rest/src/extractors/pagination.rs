//! Pagination query parameters.

use mercato_core::{MercatoResult, PageRequest};
use serde::Deserialize;

/// Query parameters for pagination. Pages are 1-indexed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
}

impl PageQuery {
    /// Resolves defaults and checks bounds.
    pub fn page_request(&self) -> MercatoResult<PageRequest> {
        PageRequest::validated(
            self.page.unwrap_or(1),
            self.limit.unwrap_or(PageRequest::DEFAULT_LIMIT),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let page = PageQuery::default().page_request().unwrap();
        assert_eq!(page, PageRequest::new(1, PageRequest::DEFAULT_LIMIT));
    }

    #[test]
    fn test_out_of_range_limit() {
        let query = PageQuery {
            page: Some(1),
            limit: Some(1_000),
        };
        assert!(query.page_request().is_err());
    }
}
