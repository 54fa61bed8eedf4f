//! YAML parser for endpoint catalogs
//!
//! Parses and validates catalog YAML files.
//! Supports both built-in catalogs (by name) and custom YAML files (by path).

use crate::catalog;
use crate::error::{Error, Result};
use crate::loader::types::{
    CatalogDefinition, EndpointDefinition, PaginationDefinition, StopConditionDefinition,
};
use crate::template;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Load a catalog from a built-in name or a file path
///
/// ```ignore
/// let catalog = load_catalog("dataarts")?;
/// let custom = load_catalog("./my-endpoints.yaml")?;
/// ```
pub fn load_catalog(path: impl AsRef<Path>) -> Result<CatalogDefinition> {
    let path = path.as_ref();
    let path_str = path.to_string_lossy();

    if catalog::is_builtin(&path_str) {
        if let Some(yaml) = catalog::get_builtin(&path_str) {
            return load_catalog_from_str(yaml);
        }
    }

    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::config(format!(
                "Catalog '{}' not found. Built-in catalogs: {}. Or provide a path to a YAML file.",
                path.display(),
                catalog::list_builtin().join(", ")
            ))
        } else {
            Error::config(format!(
                "Failed to read catalog file '{}': {}",
                path.display(),
                e
            ))
        }
    })?;
    load_catalog_from_str(&content)
}

/// Load a catalog from a YAML string
pub fn load_catalog_from_str(yaml: &str) -> Result<CatalogDefinition> {
    let def: CatalogDefinition = serde_yaml::from_str(yaml)
        .map_err(|e| Error::config(format!("Failed to parse catalog YAML: {e}")))?;

    validate_catalog(&def)?;
    Ok(def)
}

fn validate_catalog(def: &CatalogDefinition) -> Result<()> {
    if def.name.is_empty() {
        return Err(Error::config("Catalog name cannot be empty"));
    }

    if def.endpoints.is_empty() {
        return Err(Error::config("Catalog must have at least one endpoint"));
    }

    let names: HashSet<_> = def.endpoints.iter().map(|e| &e.name).collect();
    if names.len() != def.endpoints.len() {
        return Err(Error::config("Duplicate endpoint names found"));
    }

    for endpoint in &def.endpoints {
        validate_endpoint(endpoint)?;
    }

    Ok(())
}

fn validate_endpoint(endpoint: &EndpointDefinition) -> Result<()> {
    if endpoint.name.is_empty() {
        return Err(Error::config("Endpoint name cannot be empty"));
    }

    if endpoint.path.is_empty() {
        return Err(Error::config(format!(
            "Endpoint '{}' path cannot be empty",
            endpoint.name
        )));
    }

    if let Some(PaginationDefinition::Offset { limit, stop, .. }) = &endpoint.pagination {
        if *limit == 0 {
            return Err(Error::config(format!(
                "Endpoint '{}' page limit must be positive",
                endpoint.name
            )));
        }
        if let StopConditionDefinition::TotalCount { path } = stop {
            if path.is_empty() {
                return Err(Error::config(format!(
                    "Endpoint '{}' total_count stop needs a path",
                    endpoint.name
                )));
            }
        }
    }

    if let Some(detail) = &endpoint.detail {
        if !template::extract_variables(&detail.path).iter().any(|v| v == "id") {
            return Err(Error::config(format!(
                "Endpoint '{}' detail path must contain {{id}}",
                endpoint.name
            )));
        }
    }

    if endpoint.enrich && endpoint.detail.is_none() {
        return Err(Error::config(format!(
            "Endpoint '{}' enriches listings but has no detail lookup",
            endpoint.name
        )));
    }

    let mut field_names = HashSet::new();
    for field in &endpoint.fields {
        if !field_names.insert(field.name.as_str()) {
            return Err(Error::config(format!(
                "Endpoint '{}' has duplicate field '{}'",
                endpoint.name, field.name
            )));
        }
    }

    Ok(())
}
