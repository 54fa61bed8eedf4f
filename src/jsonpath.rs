//! Path-query extraction over untyped JSON
//!
//! Addresses nested fields inside a `serde_json::Value` with a dotted/bracketed
//! expression.
//!
//! Supported forms:
//! - `records`, `data.value.records`, `$.data.total`
//! - `errors[0].error_code`, `items[-1]`, `[0].id`
//! - anything with filters or wildcards (`$.records[?(@.id == 'a')]`, `$..id`)
//!   is delegated to `jsonpath-rust`

use crate::error::{Error, Result};
use serde_json::Value;

/// One step of a simple path
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment<'a> {
    Key(&'a str),
    Index(i64),
}

/// Search `value` for the sub-value addressed by `expr`
///
/// An empty expression (or `$`) addresses the whole value. Missing keys,
/// out-of-range indices and type mismatches all yield `None`.
pub fn path_search(value: &Value, expr: &str) -> Option<Value> {
    let expr = expr.trim();
    if is_complex(expr) {
        return extract_with_jsonpath(value, expr).ok().flatten();
    }

    let segments = parse_simple(expr)?;
    let mut current = value;
    for segment in segments {
        current = match segment {
            Segment::Key(key) => current.get(key)?,
            Segment::Index(index) => {
                let arr = current.as_array()?;
                #[allow(clippy::cast_possible_wrap)]
                let idx = if index < 0 {
                    arr.len() as i64 + index
                } else {
                    index
                };
                if idx < 0 {
                    return None;
                }
                arr.get(idx as usize)?
            }
        };
    }

    Some(current.clone())
}

/// Search for a scalar and render it as a string
///
/// Returns `None` for absent fields, `null`, arrays and objects.
pub fn search_string(value: &Value, expr: &str) -> Option<String> {
    match path_search(value, expr)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Render a JSON value as a plain string
///
/// Strings are returned without quotes, `null` becomes an empty string and
/// containers use their compact JSON form.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

/// Check whether an expression needs the full JSONPath engine
fn is_complex(expr: &str) -> bool {
    expr.contains("[?") || expr.contains('*') || expr.contains("..") || expr.contains("['")
}

fn parse_simple(expr: &str) -> Option<Vec<Segment<'_>>> {
    let path = expr.strip_prefix('$').unwrap_or(expr);
    let path = path.strip_prefix('.').unwrap_or(path);

    let mut segments = Vec::new();
    if path.is_empty() {
        return Some(segments);
    }

    for part in path.split('.') {
        if part.is_empty() {
            return None;
        }

        let (name, mut rest) = match part.find('[') {
            Some(pos) => (&part[..pos], &part[pos..]),
            None => (part, ""),
        };
        if !name.is_empty() {
            segments.push(Segment::Key(name));
        }

        while !rest.is_empty() {
            let inner = rest.strip_prefix('[')?;
            let end = inner.find(']')?;
            let index = inner[..end].trim().parse::<i64>().ok()?;
            segments.push(Segment::Index(index));
            rest = &inner[end + 1..];
        }
    }

    Some(segments)
}

/// Run a full JSONPath query; an empty match set is `None`
fn extract_with_jsonpath(value: &Value, expr: &str) -> Result<Option<Value>> {
    use jsonpath_rust::JsonPath;

    let normalized = if expr.starts_with('$') {
        expr.to_string()
    } else if expr.starts_with('[') {
        format!("${expr}")
    } else {
        format!("$.{expr}")
    };

    let jp = JsonPath::try_from(normalized.as_str())
        .map_err(|e| Error::json_path(format!("Invalid JSONPath '{expr}': {e}")))?;

    match jp.find(value) {
        Value::Array(arr) if arr.is_empty() => Ok(None),
        Value::Null => Ok(None),
        other => Ok(Some(other)),
    }
}
