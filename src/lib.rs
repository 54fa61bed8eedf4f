//! # DataArts Studio
//!
//! A declarative listing client for the Huawei Cloud DataArts Studio
//! control-plane API.
//!
//! ## Features
//!
//! - **Offset Pagination**: Walk paginated listings until an empty page or the reported total
//! - **Error Reclassification**: Turn business-level HTTP 400 errors into not-found
//! - **Client-side Filtering**: String-coerced equality over listed records
//! - **YAML Catalog**: Endpoints, arguments, detail lookups and output fields in one file
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dataarts_studio::{load_catalog, DataArtsService, Settings};
//!
//! #[tokio::main]
//! async fn main() -> dataarts_studio::Result<()> {
//!     let settings = Settings::load(None)?;
//!     let service = DataArtsService::from_settings(&settings, load_catalog("dataarts")?)?;
//!
//!     let args = [("workspace_id".to_string(), "ws-1".to_string())].into();
//!     for app in service.list("dataservice_apps", &args).await? {
//!         println!("{app}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                     DataArtsService                       │
//! │   list() → Vec<Value>   get()/find() → Option<Value>      │
//! └───────────────────────────────────────────────────────────┘
//!                               │
//! ┌───────────┬─────────────┬───┴─────────┬──────────┬───────────┐
//! │  Catalog  │   Lister    │  Classify   │  Filter  │  Flatten  │
//! ├───────────┼─────────────┼─────────────┼──────────┼───────────┤
//! │ YAML      │ Offset      │ Business    │ String   │ Fields    │
//! │ Templates │ Empty page  │ 400 → 404   │ equality │ Timestamps│
//! │ Settings  │ Total count │             │          │ Merge     │
//! └───────────┴──────┬──────┴─────────────┴──────────┴───────────┘
//!                    │
//!          ┌─────────┴─────────┐
//!          │ Transport (HTTP)  │
//!          │ Retry, Rate Limit │
//!          └───────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// JSON path lookups
pub mod jsonpath;

/// Template interpolation
pub mod template;

/// HTTP client with retry and rate limiting
pub mod http;

/// Pagination strategies
pub mod pagination;

/// Client-side record filtering
pub mod filter;

/// Business error reclassification
pub mod classify;

/// Paginated resource lister
pub mod lister;

/// YAML loader for catalog definitions
pub mod loader;

/// Built-in catalogs
pub mod catalog;

/// Client settings
pub mod config;

/// DataArts Studio service
pub mod dataarts;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use classify::{reclassify, reclassify_status};
pub use config::Settings;
pub use dataarts::DataArtsService;
pub use filter::{filter, FilterPredicate};
pub use lister::{ListRequest, Lister, Listing};
pub use loader::{load_catalog, load_catalog_from_str, CatalogDefinition};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
