//! Pagination types and traits

use crate::jsonpath::search_string;
use serde_json::Value;
use std::collections::HashMap;

/// Default name of the offset query parameter
pub const DEFAULT_OFFSET_PARAM: &str = "offset";

/// Default name of the page size query parameter
pub const DEFAULT_LIMIT_PARAM: &str = "limit";

/// Default page size used by most DataArts listing endpoints
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// How an endpoint pages its results
#[derive(Debug, Clone, Default, PartialEq)]
pub enum PaginationConfig {
    /// Single request, no pagination
    #[default]
    None,

    /// `offset`/`limit` query parameters
    Offset {
        /// Query parameter name for offset
        offset_param: String,
        /// Query parameter name for limit
        limit_param: String,
        /// Records requested per page
        limit_value: u32,
        /// When the listing is exhausted
        stop_condition: StopCondition,
    },
}

impl PaginationConfig {
    /// Offset pagination with custom parameter names
    pub fn offset(
        offset_param: impl Into<String>,
        limit_param: impl Into<String>,
        limit_value: u32,
        stop_condition: StopCondition,
    ) -> Self {
        Self::Offset {
            offset_param: offset_param.into(),
            limit_param: limit_param.into(),
            limit_value,
            stop_condition,
        }
    }

    /// Offset pagination with the usual `offset`/`limit` parameter names
    pub fn offset_limit(limit_value: u32, stop_condition: StopCondition) -> Self {
        Self::offset(
            DEFAULT_OFFSET_PARAM,
            DEFAULT_LIMIT_PARAM,
            limit_value,
            stop_condition,
        )
    }

    /// Build the paginator for this config
    pub fn paginator(&self) -> Box<dyn Paginator> {
        match self {
            Self::None => Box::new(super::NoPaginator),
            Self::Offset {
                offset_param,
                limit_param,
                limit_value,
                stop_condition,
            } => Box::new(super::OffsetPaginator::new(
                offset_param.clone(),
                limit_param.clone(),
                *limit_value,
                stop_condition.clone(),
            )),
        }
    }
}

/// When an offset listing is exhausted
///
/// An empty page always ends the listing, whatever the condition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StopCondition {
    /// Only an empty page ends the listing; short pages do not
    #[default]
    EmptyPage,

    /// The listing ends once the offset reaches the envelope's total
    ///
    /// A missing or unreadable total counts as zero.
    TotalCount {
        /// Path to the total in the response envelope
        path: String,
    },
}

impl StopCondition {
    /// Total-count condition reading `path`
    pub fn total_count(path: impl Into<String>) -> Self {
        Self::TotalCount { path: path.into() }
    }
}

/// Whether another page should be requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextPage {
    /// Request the page now described by the state
    Continue,
    /// The listing is exhausted
    Done,
}

impl NextPage {
    /// Check if the listing is exhausted
    pub fn is_done(self) -> bool {
        self == Self::Done
    }
}

/// Position within a listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationState {
    /// Offset of the next page; the number of records received so far
    pub offset: u64,
    /// Last total reported by the server, if any
    pub reported_total: Option<u64>,
    /// Set once the listing is exhausted
    pub done: bool,
}

impl PaginationState {
    /// State for the first page
    pub fn new() -> Self {
        Self::default()
    }
}

/// A pagination strategy
pub trait Paginator: Send + Sync {
    /// Query parameters selecting the page described by `state`
    fn page_params(&self, state: &PaginationState) -> HashMap<String, String>;

    /// Account for a page of `records_count` records and decide whether to go on
    fn advance(&self, body: &Value, records_count: usize, state: &mut PaginationState)
        -> NextPage;
}

/// Check whether `condition` ends the listing
///
/// `state.offset` must already count the page being checked. The total
/// read from `body` is kept in `state.reported_total`.
pub fn is_exhausted(
    condition: &StopCondition,
    body: &Value,
    records_count: usize,
    state: &mut PaginationState,
) -> bool {
    if records_count == 0 {
        return true;
    }

    match condition {
        StopCondition::EmptyPage => false,
        StopCondition::TotalCount { path } => {
            let total = extract_total(body, path).unwrap_or(0);
            state.reported_total = Some(total);
            state.offset >= total
        }
    }
}

/// Read a total count that may be a JSON number or a numeric string
pub fn extract_total(body: &Value, path: &str) -> Option<u64> {
    let raw = search_string(body, path)?;
    raw.parse::<u64>()
        .ok()
        .or_else(|| raw.parse::<f64>().ok().filter(|f| *f >= 0.0).map(|f| f as u64))
}
