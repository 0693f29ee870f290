//! Tolerant identifier extraction from portal payloads
//!
//! The portal's payload shapes are not contractually stable, so extraction
//! is total over malformed input: non-JSON text, missing fields, and
//! unexpected shapes all yield empty results instead of errors.

use serde_json::Value;
use std::borrow::Cow;

/// Extraction input: either raw response text or an already-parsed document
pub enum Payload<'a> {
    Text(&'a str),
    Json(&'a Value),
}

impl<'a> From<&'a str> for Payload<'a> {
    fn from(text: &'a str) -> Self {
        Payload::Text(text)
    }
}

impl<'a> From<&'a String> for Payload<'a> {
    fn from(text: &'a String) -> Self {
        Payload::Text(text)
    }
}

impl<'a> From<&'a Value> for Payload<'a> {
    fn from(value: &'a Value) -> Self {
        Payload::Json(value)
    }
}

impl<'a> Payload<'a> {
    fn to_value(&self) -> Option<Cow<'a, Value>> {
        match self {
            Payload::Text(text) => serde_json::from_str(text).ok().map(Cow::Owned),
            Payload::Json(value) => Some(Cow::Borrowed(*value)),
        }
    }
}

/// Order numbers from an order-list payload, in source order. Entries
/// without an `orderNumber` are skipped.
pub fn extract_order_numbers<'a>(payload: impl Into<Payload<'a>>) -> Vec<String> {
    extract_field(payload.into(), "orders", "orderNumber")
}

/// Material numbers from an order-detail payload, in source order. Lines
/// without a `materialNumber` are skipped.
pub fn extract_material_numbers<'a>(payload: impl Into<Payload<'a>>) -> Vec<String> {
    extract_field(payload.into(), "orderLines", "materialNumber")
}

fn extract_field(payload: Payload<'_>, collection: &str, field: &str) -> Vec<String> {
    let Some(data) = payload.to_value() else {
        return Vec::new();
    };
    let Some(entries) = data.get(collection).and_then(Value::as_array) else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| entry.get(field))
        .filter_map(identifier)
        .collect()
}

// Identifiers arrive as strings or bare numbers depending on the endpoint
// version; both normalize to strings.
fn identifier(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
