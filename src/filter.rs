//! Client-side record filtering
//!
//! Several DataArts listing endpoints ignore some of the arguments a caller
//! wants to filter on, so the complete result set is filtered locally after
//! pagination finishes. Comparison is done on string renderings: a record
//! field holding `3`, `true` or `"3"` matches the configured strings `"3"`
//! and `"true"` respectively.

use crate::jsonpath::{path_search, value_to_string};
use crate::types::Arguments;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Field path → expected value, all of which must match
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPredicate {
    fields: BTreeMap<String, String>,
}

impl FilterPredicate {
    /// Create an empty predicate (matches everything)
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `field` to equal `expected`
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, expected: impl Into<String>) -> Self {
        self.fields.insert(field.into(), expected.into());
        self
    }

    /// Require `field` to equal `expected` when a non-empty value is given
    #[must_use]
    pub fn with_optional<S: Into<String>>(self, field: impl Into<String>, expected: Option<S>) -> Self {
        match expected.map(Into::into) {
            Some(value) if !value.is_empty() => self.with(field, value),
            _ => self,
        }
    }

    /// Build a predicate from an argument-name → record-field mapping
    ///
    /// Only arguments the caller actually supplied contribute a constraint.
    pub fn from_arguments(mapping: &HashMap<String, String>, args: &Arguments) -> Self {
        mapping
            .iter()
            .fold(Self::new(), |predicate, (arg, field)| {
                predicate.with_optional(field.clone(), args.get(arg).cloned())
            })
    }

    /// Check whether the predicate has no constraints
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of constrained fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Iterate over `(field, expected)` pairs
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Check a single record
    ///
    /// A record lacking a constrained field, or holding `null` there, does
    /// not match.
    pub fn matches(&self, record: &Value) -> bool {
        self.fields.iter().all(|(field, expected)| {
            match path_search(record, field) {
                Some(Value::Null) | None => false,
                Some(actual) => value_to_string(&actual) == *expected,
            }
        })
    }
}

/// Keep the records matching `predicate`, in their original order
pub fn filter(records: Vec<Value>, predicate: &FilterPredicate) -> Vec<Value> {
    if predicate.is_empty() {
        return records;
    }
    records
        .into_iter()
        .filter(|record| predicate.matches(record))
        .collect()
}
