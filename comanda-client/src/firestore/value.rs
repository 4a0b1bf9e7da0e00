//! JSON ⇄ Firestore typed value codec
//!
//! Firestore REST wraps every value in a one-key object naming its type
//! (`{"stringValue": "x"}`, `{"integerValue": "42"}`, ...). Documents are
//! handled as plain `serde_json` maps everywhere else, so this module is the
//! only place that knows the wire shape.
//!
//! Top-level fields listed in [`TIMESTAMP_FIELDS`] are written as native
//! `timestampValue`s when they hold an RFC 3339 string, so they sort and
//! compare as timestamps on the server.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Number, Value, json};

use crate::{ClientError, ClientResult};

/// Encode a JSON value as a Firestore `Value`
pub fn encode(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                json!({ "integerValue": i.to_string() })
            } else if let Some(u) = n.as_u64() {
                json!({ "integerValue": u.to_string() })
            } else {
                json!({ "doubleValue": n.as_f64().unwrap_or_default() })
            }
        }
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            let values: Vec<Value> = items.iter().map(encode).collect();
            if values.is_empty() {
                json!({ "arrayValue": {} })
            } else {
                json!({ "arrayValue": { "values": values } })
            }
        }
        Value::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}

/// Document fields stored as Firestore timestamps
pub const TIMESTAMP_FIELDS: &[&str] = &["creado_en"];

/// Encode a document's top-level fields
pub fn encode_fields(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .map(|(k, v)| {
            let encoded = match v {
                Value::String(s) if TIMESTAMP_FIELDS.contains(&k.as_str()) => encode_timestamp(s),
                _ => encode(v),
            };
            (k.clone(), encoded)
        })
        .collect()
}

/// Normalized to UTC; a string that is not RFC 3339 stays a string
fn encode_timestamp(s: &str) -> Value {
    match DateTime::parse_from_rfc3339(s) {
        Ok(ts) => {
            let utc = ts.with_timezone(&Utc);
            json!({ "timestampValue": utc.to_rfc3339_opts(SecondsFormat::AutoSi, true) })
        }
        Err(_) => json!({ "stringValue": s }),
    }
}

/// Decode a Firestore `Value` into plain JSON
///
/// Timestamps, references and bytes come back as strings.
pub fn decode(value: &Value) -> ClientResult<Value> {
    let Some(obj) = value.as_object() else {
        return Err(invalid(value));
    };
    let Some((kind, inner)) = obj.iter().next() else {
        return Err(invalid(value));
    };

    match kind.as_str() {
        "nullValue" => Ok(Value::Null),
        "booleanValue" => inner.as_bool().map(Value::Bool).ok_or_else(|| invalid(value)),
        "integerValue" => decode_integer(inner).ok_or_else(|| invalid(value)),
        "doubleValue" => decode_double(inner).ok_or_else(|| invalid(value)),
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => inner
            .as_str()
            .map(|s| Value::String(s.to_string()))
            .ok_or_else(|| invalid(value)),
        "geoPointValue" => Ok(inner.clone()),
        "arrayValue" => {
            let values = match inner.get("values") {
                Some(Value::Array(values)) => values,
                Some(_) => return Err(invalid(value)),
                None => return Ok(Value::Array(Vec::new())),
            };
            values
                .iter()
                .map(decode)
                .collect::<ClientResult<Vec<_>>>()
                .map(Value::Array)
        }
        "mapValue" => match inner.get("fields") {
            Some(Value::Object(fields)) => decode_fields(fields).map(Value::Object),
            Some(_) => Err(invalid(value)),
            None => Ok(Value::Object(Map::new())),
        },
        _ => Err(invalid(value)),
    }
}

/// Decode a document's `fields` object
pub fn decode_fields(fields: &Map<String, Value>) -> ClientResult<Map<String, Value>> {
    fields
        .iter()
        .map(|(k, v)| decode(v).map(|decoded| (k.clone(), decoded)))
        .collect()
}

/// int64 values arrive as strings
fn decode_integer(inner: &Value) -> Option<Value> {
    match inner {
        Value::String(s) => s.parse::<i64>().ok().map(Value::from),
        Value::Number(n) => n.as_i64().map(Value::from),
        _ => None,
    }
}

/// Special doubles ("NaN", "Infinity") have no JSON form and decode to null
fn decode_double(inner: &Value) -> Option<Value> {
    match inner {
        Value::Number(n) => Some(Value::Number(n.clone())),
        Value::String(s) => Some(
            s.parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map_or(Value::Null, Value::Number),
        ),
        _ => None,
    }
}

fn invalid(value: &Value) -> ClientError {
    ClientError::InvalidResponse(format!("unsupported Firestore value: {}", value))
}
