//! Pagination module
//!
//! Offset/limit pagination ending on an empty page or on the reported
//! total, plus single-request endpoints. A [`Paginator`] names the query
//! parameters of the next page and decides, from each response, whether
//! there is one.

mod strategies;
mod types;

pub use strategies::{NoPaginator, OffsetPaginator};
pub use types::{
    extract_total, is_exhausted, NextPage, PaginationConfig, PaginationState, Paginator,
    StopCondition, DEFAULT_LIMIT_PARAM, DEFAULT_OFFSET_PARAM, DEFAULT_PAGE_SIZE,
};
