//! Paginated resource lister
//!
//! Drives a paginator against a transport until the endpoint is exhausted and
//! returns every record in server order.
//!
//! # Overview
//!
//! - `Lister` - the listing loop (`list`, `list_all`, `find_first`)
//! - `ListRequest` - path, query, headers, records path and pagination
//! - `Listing` / `ListStats` - records plus request statistics
//!
//! Any transport or parse failure aborts the listing; no partial result is
//! returned.

mod types;

pub use types::{ListRequest, ListStats, Listing};

use crate::error::{Error, Result};
use crate::http::{ApiRequest, Transport};
use crate::jsonpath::path_search;
use crate::pagination::{PaginationState, Paginator};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Fetches complete listings through a transport
#[derive(Clone)]
pub struct Lister {
    transport: Arc<dyn Transport>,
}

impl Lister {
    /// Create a lister on top of `transport`
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Get the underlying transport
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Fetch every record of the listing
    pub async fn list(&self, request: &ListRequest) -> Result<Vec<Value>> {
        Ok(self.list_all(request).await?.records)
    }

    /// Fetch every record of the listing along with request statistics
    pub async fn list_all(&self, request: &ListRequest) -> Result<Listing> {
        let start = Instant::now();
        let mut listing = Listing::default();

        let records = &mut listing.records;
        self.walk(request, &mut listing.stats, |page| {
            records.extend(page);
            false
        })
        .await?;

        #[allow(clippy::cast_possible_truncation)]
        listing.stats.set_duration(start.elapsed().as_millis() as u64);

        info!(
            path = %request.path,
            records = listing.records.len(),
            pages = listing.stats.pages_fetched,
            "Listing complete"
        );

        Ok(listing)
    }

    /// Return the first record satisfying `matcher`
    ///
    /// Pages after the one holding the match are not requested.
    pub async fn find_first<F>(&self, request: &ListRequest, matcher: F) -> Result<Option<Value>>
    where
        F: Fn(&Value) -> bool,
    {
        let mut found = None;
        let mut stats = ListStats::default();

        self.walk(request, &mut stats, |page| {
            found = page.into_iter().find(|record| matcher(record));
            found.is_some()
        })
        .await?;

        debug!(
            path = %request.path,
            pages = stats.pages_fetched,
            found = found.is_some(),
            "Search complete"
        );

        Ok(found)
    }

    /// Run the pagination loop, handing each page to `on_page`
    ///
    /// `on_page` returns `true` to stop early.
    async fn walk<F>(
        &self,
        request: &ListRequest,
        stats: &mut ListStats,
        mut on_page: F,
    ) -> Result<()>
    where
        F: FnMut(Vec<Value>) -> bool,
    {
        let paginator = request.pagination.paginator();
        let mut state = PaginationState::new();

        loop {
            let api_request = build_page_request(request, paginator.as_ref(), &state);
            let response = self.transport.send(api_request).await?;
            let body = response.json()?;

            let records = extract_records(&body, &request.records_path)?;
            let record_count = records.len();
            stats.add_page(record_count);

            debug!(
                path = %request.path,
                page = stats.pages_fetched,
                offset = state.offset,
                records = record_count,
                "Fetched page"
            );

            if on_page(records) {
                return Ok(());
            }

            if paginator.advance(&body, record_count, &mut state).is_done() {
                return Ok(());
            }
        }
    }
}

impl std::fmt::Debug for Lister {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lister").finish_non_exhaustive()
    }
}

/// Build the request for the page described by `state`
fn build_page_request(
    request: &ListRequest,
    paginator: &dyn Paginator,
    state: &PaginationState,
) -> ApiRequest {
    let mut api_request = ApiRequest::get(&request.path);
    api_request.query.extend(request.query.clone());
    api_request.query.extend(paginator.page_params(state));
    api_request.headers.extend(request.headers.clone());
    api_request
}

/// Pull the records array out of a page
///
/// An absent (or `null`) array is an empty page. Anything other than an
/// array at the records path is a decode error.
pub fn extract_records(body: &Value, records_path: &str) -> Result<Vec<Value>> {
    match path_search(body, records_path) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(records)) => Ok(records),
        Some(other) => Err(Error::decode(format!(
            "expected an array at '{records_path}', found {}",
            json_type(&other)
        ))),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
