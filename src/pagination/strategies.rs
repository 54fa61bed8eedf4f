//! Pagination strategies

use super::types::{is_exhausted, NextPage, PaginationState, Paginator, StopCondition};
use serde_json::Value;
use std::collections::HashMap;

/// Offset/limit pagination
///
/// The offset advances by the number of records actually received, not by
/// the page size, so a server that caps pages below `limit` is still walked
/// to the end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetPaginator {
    offset_param: String,
    limit_param: String,
    limit_value: u32,
    stop_condition: StopCondition,
}

impl OffsetPaginator {
    /// Create an offset paginator
    pub fn new(
        offset_param: impl Into<String>,
        limit_param: impl Into<String>,
        limit_value: u32,
        stop_condition: StopCondition,
    ) -> Self {
        Self {
            offset_param: offset_param.into(),
            limit_param: limit_param.into(),
            limit_value,
            stop_condition,
        }
    }
}

impl Paginator for OffsetPaginator {
    fn page_params(&self, state: &PaginationState) -> HashMap<String, String> {
        HashMap::from([
            (self.offset_param.clone(), state.offset.to_string()),
            (self.limit_param.clone(), self.limit_value.to_string()),
        ])
    }

    fn advance(
        &self,
        body: &Value,
        records_count: usize,
        state: &mut PaginationState,
    ) -> NextPage {
        state.offset += records_count as u64;

        if is_exhausted(&self.stop_condition, body, records_count, state) {
            state.done = true;
            NextPage::Done
        } else {
            NextPage::Continue
        }
    }
}

/// Single request
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPaginator;

impl Paginator for NoPaginator {
    fn page_params(&self, _state: &PaginationState) -> HashMap<String, String> {
        HashMap::new()
    }

    fn advance(
        &self,
        _body: &Value,
        records_count: usize,
        state: &mut PaginationState,
    ) -> NextPage {
        state.offset += records_count as u64;
        state.done = true;
        NextPage::Done
    }
}
