//! Loader types
//!
//! Declarative endpoint catalog types for YAML parsing.

use crate::classify::DEFAULT_ERROR_CODE_PATH;
use crate::pagination::{
    PaginationConfig, StopCondition, DEFAULT_LIMIT_PARAM, DEFAULT_OFFSET_PARAM, DEFAULT_PAGE_SIZE,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

// ============================================================================
// Catalog Definition
// ============================================================================

/// Top-level catalog definition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CatalogDefinition {
    /// Catalog name
    pub name: String,
    /// Catalog version
    #[serde(default = "default_version")]
    pub version: String,
    /// Human-readable description
    #[serde(default)]
    pub description: Option<String>,
    /// HTTP client defaults
    #[serde(default)]
    pub http: HttpDefinition,
    /// Headers sent with every request (templated)
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Endpoint definitions
    pub endpoints: Vec<EndpointDefinition>,
}

impl CatalogDefinition {
    /// Look up an endpoint by name
    pub fn endpoint(&self, name: &str) -> Option<&EndpointDefinition> {
        self.endpoints.iter().find(|e| e.name == name)
    }

    /// Names of all endpoints, in catalog order
    pub fn endpoint_names(&self) -> Vec<&str> {
        self.endpoints.iter().map(|e| e.name.as_str()).collect()
    }
}

fn default_version() -> String {
    "0.1.0".to_string()
}

// ============================================================================
// HTTP Definition
// ============================================================================

/// HTTP client defaults for a catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct HttpDefinition {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Maximum retries
    #[serde(default = "default_retries")]
    pub max_retries: u32,
    /// Rate limit (requests per second)
    #[serde(default)]
    pub rate_limit_rps: Option<u32>,
}

impl Default for HttpDefinition {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
            rate_limit_rps: None,
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_retries() -> u32 {
    3
}

// ============================================================================
// Endpoint Definition
// ============================================================================

/// One listable DataArts collection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EndpointDefinition {
    /// Endpoint name
    pub name: String,
    /// Human-readable description
    #[serde(default)]
    pub description: Option<String>,
    /// Collection path template, e.g. `v1/{project_id}/service/apps`
    pub path: String,
    /// Header templates
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Default values for template variables
    #[serde(default)]
    pub defaults: BTreeMap<String, String>,
    /// Static query parameters (templated)
    #[serde(default)]
    pub query: HashMap<String, String>,
    /// Argument name → query parameter name, sent only when the argument is set
    #[serde(default)]
    pub params: BTreeMap<String, String>,
    /// Path to the records array in each page (empty = response root)
    #[serde(default)]
    pub records_path: String,
    /// Pagination configuration
    #[serde(default)]
    pub pagination: Option<PaginationDefinition>,
    /// Business error codes meaning "not found" on HTTP 400
    #[serde(default)]
    pub not_found_codes: Vec<String>,
    /// Path to the business error code in an error body
    #[serde(default = "default_error_code_path")]
    pub error_code_path: String,
    /// Argument name → record field, applied after listing
    #[serde(default)]
    pub filters: HashMap<String, String>,
    /// Field identifying a record
    #[serde(default = "default_id_field")]
    pub id_field: String,
    /// Per-record detail lookup, used by `get`
    #[serde(default)]
    pub detail: Option<DetailDefinition>,
    /// Merge each listed record with its detail; needs `detail`
    #[serde(default)]
    pub enrich: bool,
    /// Output projection (empty = records as returned)
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

impl EndpointDefinition {
    /// Pagination strategy for this endpoint
    pub fn pagination_config(&self) -> PaginationConfig {
        self.pagination
            .as_ref()
            .map(PaginationDefinition::to_config)
            .unwrap_or_default()
    }

    /// Check whether a detail lookup is configured
    pub fn has_detail(&self) -> bool {
        self.detail.is_some()
    }

    /// Check whether listings fetch the detail of every record
    pub fn enriches(&self) -> bool {
        self.enrich && self.detail.is_some()
    }
}

fn default_error_code_path() -> String {
    DEFAULT_ERROR_CODE_PATH.to_string()
}

fn default_id_field() -> String {
    "id".to_string()
}

/// Detail lookup for a single record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DetailDefinition {
    /// Path template; `{id}` is the record identifier
    pub path: String,
    /// Where the record sits in the detail response (empty = root)
    #[serde(default)]
    pub record_path: String,
    /// Not-found codes for the detail call; falls back to the endpoint's
    #[serde(default)]
    pub not_found_codes: Vec<String>,
}

// ============================================================================
// Field Definition
// ============================================================================

/// One projected output field
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FieldDefinition {
    /// Output name
    pub name: String,
    /// Source path in the record; defaults to `name`
    #[serde(default)]
    pub path: Option<String>,
    /// Value conversion
    #[serde(default)]
    pub format: FieldFormat,
    /// Value used when the source field is absent
    #[serde(default)]
    pub default: Option<serde_json::Value>,
}

impl FieldDefinition {
    /// Source path of this field
    pub fn source(&self) -> &str {
        self.path.as_deref().unwrap_or(&self.name)
    }
}

/// How a projected value is converted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldFormat {
    /// Keep the value as returned
    #[default]
    Raw,
    /// Epoch milliseconds → RFC 3339
    TimestampMs,
    /// Epoch seconds → RFC 3339
    Timestamp,
    /// Render as a string
    String,
}

// ============================================================================
// Pagination Definition
// ============================================================================

/// Pagination configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PaginationDefinition {
    /// No pagination
    None,
    /// Offset-based pagination
    Offset {
        /// Offset parameter name
        #[serde(default = "default_offset_param")]
        offset_param: String,
        /// Limit parameter name
        #[serde(default = "default_limit_param")]
        limit_param: String,
        /// Page size
        #[serde(default = "default_limit")]
        limit: u32,
        /// Stop condition
        #[serde(default)]
        stop: StopConditionDefinition,
    },
}

impl PaginationDefinition {
    /// Convert into the runtime pagination config
    pub fn to_config(&self) -> PaginationConfig {
        match self {
            Self::None => PaginationConfig::None,
            Self::Offset {
                offset_param,
                limit_param,
                limit,
                stop,
            } => PaginationConfig::offset(
                offset_param.clone(),
                limit_param.clone(),
                *limit,
                stop.to_condition(),
            ),
        }
    }
}

fn default_offset_param() -> String {
    DEFAULT_OFFSET_PARAM.to_string()
}

fn default_limit_param() -> String {
    DEFAULT_LIMIT_PARAM.to_string()
}

fn default_limit() -> u32 {
    DEFAULT_PAGE_SIZE
}

/// Stop condition for pagination
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StopConditionDefinition {
    /// Stop when page is empty
    #[default]
    EmptyPage,
    /// Stop when the offset reaches the reported total
    TotalCount {
        /// Path to total count
        path: String,
    },
}

impl StopConditionDefinition {
    /// Convert into the runtime stop condition
    pub fn to_condition(&self) -> StopCondition {
        match self {
            Self::EmptyPage => StopCondition::EmptyPage,
            Self::TotalCount { path } => StopCondition::total_count(path.clone()),
        }
    }
}
