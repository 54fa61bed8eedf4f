//! Record projection
//!
//! Turns raw API records into the output shape declared by an endpoint's
//! `fields` list.

use crate::jsonpath::{path_search, value_to_string};
use crate::loader::{FieldDefinition, FieldFormat};
use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

/// Project every record; an empty field list keeps records as returned
pub fn project_all(records: Vec<Value>, fields: &[FieldDefinition]) -> Vec<Value> {
    if fields.is_empty() {
        return records;
    }
    records.iter().map(|r| project(r, fields)).collect()
}

/// Project one record onto `fields`
///
/// Absent source fields take the field default, or `null`.
pub fn project(record: &Value, fields: &[FieldDefinition]) -> Value {
    let mut out = Map::with_capacity(fields.len());
    for field in fields {
        let value = match path_search(record, field.source()) {
            Some(Value::Null) | None => field.default.clone().unwrap_or(Value::Null),
            Some(value) => format_value(value, field.format),
        };
        out.insert(field.name.clone(), value);
    }
    Value::Object(out)
}

/// Apply a field format to a present value
///
/// Values that cannot be converted are kept unchanged.
pub fn format_value(value: Value, format: FieldFormat) -> Value {
    match format {
        FieldFormat::Raw => value,
        FieldFormat::String => Value::String(value_to_string(&value)),
        FieldFormat::TimestampMs => epoch(&value)
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .map_or(value, |dt| Value::String(rfc3339(dt))),
        FieldFormat::Timestamp => match epoch(&value) {
            Some(secs) => DateTime::<Utc>::from_timestamp(secs, 0)
                .map_or(value, |dt| Value::String(rfc3339(dt))),
            None => value
                .as_str()
                .and_then(parse_datetime)
                .map_or(value, |dt| Value::String(rfc3339(dt))),
        },
    }
}

/// Shallow-merge `overlay` into `base`; overlay keys win
///
/// A non-object on either side yields `overlay`.
pub fn merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base), Value::Object(overlay)) => {
            base.extend(overlay);
            Value::Object(base)
        }
        (_, overlay) => overlay,
    }
}

/// Read an integer epoch from a number or numeric string
#[allow(clippy::cast_possible_truncation)]
fn epoch(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}

fn rfc3339(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use test_case::test_case;

    fn field(name: &str, path: Option<&str>, format: FieldFormat) -> FieldDefinition {
        FieldDefinition {
            name: name.to_string(),
            path: path.map(str::to_string),
            format,
            default: None,
        }
    }

    #[test_case(json!(1_700_000_000_000_i64), json!("2023-11-14T22:13:20Z") ; "millis number")]
    #[test_case(json!("1700000000000"), json!("2023-11-14T22:13:20Z") ; "millis string")]
    #[test_case(json!(0), json!("1970-01-01T00:00:00Z") ; "zero")]
    #[test_case(json!("soon"), json!("soon") ; "unparsable kept")]
    fn test_timestamp_ms(input: Value, expected: Value) {
        assert_eq!(format_value(input, FieldFormat::TimestampMs), expected);
    }

    #[test_case(json!(1_700_000_000), json!("2023-11-14T22:13:20Z") ; "seconds")]
    #[test_case(json!("2023-11-14T22:13:20+08:00"), json!("2023-11-14T14:13:20Z") ; "rfc3339 offset")]
    #[test_case(json!("2023-11-14T22:13:20.123+0800"), json!("2023-11-14T14:13:20Z") ; "compact offset")]
    #[test_case(json!("2023-11-14 22:13:20"), json!("2023-11-14T22:13:20Z") ; "naive")]
    #[test_case(json!(true), json!(true) ; "non temporal kept")]
    fn test_timestamp(input: Value, expected: Value) {
        assert_eq!(format_value(input, FieldFormat::Timestamp), expected);
    }

    #[test]
    fn test_string_and_raw() {
        assert_eq!(format_value(json!(3), FieldFormat::String), json!("3"));
        assert_eq!(format_value(json!(false), FieldFormat::String), json!("false"));
        assert_eq!(format_value(json!({"a": 1}), FieldFormat::Raw), json!({"a": 1}));
    }

    #[test]
    fn test_project() {
        let record = json!({
            "id": "api-1",
            "create_time": 1_700_000_000_000_i64,
            "backend": {"host": "10.0.0.1"},
            "description": null
        });
        let mut with_default = field("request_params", Some("request_paras"), FieldFormat::Raw);
        with_default.default = Some(json!([]));
        let fields = vec![
            field("id", None, FieldFormat::Raw),
            field("created_at", Some("create_time"), FieldFormat::TimestampMs),
            field("host", Some("backend.host"), FieldFormat::Raw),
            field("description", None, FieldFormat::Raw),
            with_default,
        ];

        assert_eq!(
            project(&record, &fields),
            json!({
                "id": "api-1",
                "created_at": "2023-11-14T22:13:20Z",
                "host": "10.0.0.1",
                "description": null,
                "request_params": []
            })
        );
    }

    #[test]
    fn test_project_all_without_fields_is_identity() {
        let records = vec![json!({"a": 1}), json!({"b": 2})];
        assert_eq!(project_all(records.clone(), &[]), records);
    }

    #[test]
    fn test_merge() {
        assert_eq!(
            merge(json!({"id": 1, "create_user": "bob", "name": "old"}), json!({"name": "new", "protocol": "HTTPS"})),
            json!({"id": 1, "create_user": "bob", "name": "new", "protocol": "HTTPS"})
        );
        assert_eq!(merge(json!({"id": 1}), json!([1])), json!([1]));
    }
}
