//! YAML Loader module
//!
//! Parse endpoint catalogs from YAML files.
//!
//! # Overview
//!
//! The loader module provides:
//! - `CatalogDefinition` - Declarative set of DataArts endpoints
//! - `EndpointDefinition` - One listable collection
//! - YAML parsing with validation

mod parser;
mod types;

pub use parser::{load_catalog, load_catalog_from_str};
pub use types::{
    CatalogDefinition, DetailDefinition, EndpointDefinition, FieldDefinition, FieldFormat,
    HttpDefinition, PaginationDefinition, StopConditionDefinition,
};
