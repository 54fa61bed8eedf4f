//! Lister types
//!
//! Request description and statistics for a listing operation.

use crate::pagination::PaginationConfig;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// One listing operation against a collection endpoint
///
/// Paths and header values are expected to be rendered already.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListRequest {
    /// Path relative to the API base URL
    pub path: String,
    /// Static query parameters sent with every page
    pub query: HashMap<String, String>,
    /// Headers sent with every page
    pub headers: HashMap<String, String>,
    /// Where the records array lives in each page (empty = response root)
    pub records_path: String,
    /// Pagination strategy
    pub pagination: PaginationConfig,
}

impl ListRequest {
    /// Create a request for `path`
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Add a static query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Add several static query parameters
    #[must_use]
    pub fn queries<K, V>(mut self, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Add several headers
    #[must_use]
    pub fn headers<K, V>(mut self, headers: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Set the records path
    #[must_use]
    pub fn records_path(mut self, path: impl Into<String>) -> Self {
        self.records_path = path.into();
        self
    }

    /// Set the pagination strategy
    #[must_use]
    pub fn pagination(mut self, pagination: PaginationConfig) -> Self {
        self.pagination = pagination;
        self
    }
}

/// Statistics for one listing operation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListStats {
    /// Requests issued
    pub pages_fetched: usize,
    /// Records received across all pages
    pub records_fetched: usize,
    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,
}

impl ListStats {
    /// Record one fetched page
    pub fn add_page(&mut self, records: usize) {
        self.pages_fetched += 1;
        self.records_fetched += records;
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}

/// Records of a completed listing, in server order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Listing {
    /// All records
    pub records: Vec<Value>,
    /// Request statistics
    pub stats: ListStats,
}
