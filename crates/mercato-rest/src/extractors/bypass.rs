//! Cache bypass extractor.

use crate::state::AppState;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderValue},
};
use std::convert::Infallible;

/// Whether the caller asked to skip cached reads.
///
/// Set when the configured bypass header is present with an empty or truthy
/// value. `0`, `false`, `no` and `off` explicitly keep the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheBypass(pub bool);

impl CacheBypass {
    /// Interprets the bypass header value.
    #[must_use]
    pub fn from_header(value: Option<&HeaderValue>) -> Self {
        let Some(value) = value else {
            return Self(false);
        };
        let value = value.to_str().unwrap_or_default().trim().to_ascii_lowercase();
        Self(!matches!(value.as_str(), "0" | "false" | "no" | "off"))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CacheBypass {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(Self::from_header(parts.headers.get(state.bypass_header.as_ref())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bypass(value: &'static str) -> bool {
        CacheBypass::from_header(Some(&HeaderValue::from_static(value))).0
    }

    #[test]
    fn test_header_values() {
        assert!(!CacheBypass::from_header(None).0);
        assert!(bypass(""));
        assert!(bypass("1"));
        assert!(bypass("true"));
        assert!(bypass("yes"));
        assert!(!bypass("0"));
        assert!(!bypass("FALSE"));
        assert!(!bypass("no"));
        assert!(!bypass(" off "));
    }
}
