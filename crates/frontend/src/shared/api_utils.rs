//! API utilities for frontend-backend communication
//!
//! Provides the API location and the list-fetch ceilings. All requests go
//! through the same-origin proxy under [`API_PREFIX`].

use serde::Serialize;

/// Path prefix served by the reverse proxy
pub const API_PREFIX: &str = "/api";

/// Page size ceiling for reference collections (clients, products, ...)
pub const REFERENCE_PAGE_LIMIT: u32 = 1000;

/// Page size ceiling for contracts shown on the board
pub const BOARD_PAGE_LIMIT: u32 = 500;

/// Get the base URL for API requests
///
/// # Returns
/// - Origin of the current page, like "http://localhost:8080"
/// - Empty string if window is not available (relative URLs are used then)
pub fn api_base() -> String {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    window.location().origin().unwrap_or_default()
}

/// Build a full API URL from a resource path
///
/// # Example
/// ```rust,ignore
/// let url = api_url("/contracts/123");
/// ```
pub fn api_url(path: &str) -> String {
    format!("{}{}{}", api_base(), API_PREFIX, path)
}

/// Query parameters accepted by list endpoints
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub funnel_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl ListParams {
    pub fn limit(limit: u32) -> Self {
        Self {
            page: Some(1),
            limit: Some(limit),
            ..Self::default()
        }
    }

    pub fn with_funnel(mut self, funnel_id: impl Into<String>) -> Self {
        self.funnel_id = Some(funnel_id.into());
        self
    }

    /// `?page=1&limit=1000`, or empty when there is nothing to send
    pub fn to_query(&self) -> String {
        match serde_qs::to_string(self) {
            Ok(query) if !query.is_empty() => format!("?{}", query),
            _ => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_string() {
        assert_eq!(ListParams::default().to_query(), "");
        assert_eq!(ListParams::limit(1000).to_query(), "?page=1&limit=1000");
        let guard = ListParams {
            limit: Some(1),
            ..ListParams::default()
        }
        .with_funnel("F1");
        assert_eq!(guard.to_query(), "?limit=1&funnel_id=F1");
    }
}
