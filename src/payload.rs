//! Response-body normalization.
//!
//! The proximity and sensor endpoints answer with several JSON shapes.
//! Everything is turned into one ordered list of typed records here,
//! before any business logic sees it:
//!
//! | Body shape              | Proximity events        | Sensors        |
//! |-------------------------|-------------------------|----------------|
//! | `[ r0, r1, ... ]`       | `r0` only (newest)      | every record   |
//! | `{ "data": [ ... ] }`   | every record            | every record   |
//! | `{ ...record... }`      | the record itself       | rejected       |
//!
//! The array-vs-wrapper asymmetry for proximity events is the behaviour
//! the backend was built against; do not unify it.
//!
//! The whole body is decoded before anything is returned, so a decode
//! failure never leaves a caller with half a batch.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::DecodeError;

// ───────────────────────────────────────────────────────────────
// Wire records
// ───────────────────────────────────────────────────────────────

/// One proximity event as sent by the backend.  Missing or null fields
/// decode to empty strings / zero.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawEvent {
    #[serde(deserialize_with = "lenient_string")]
    pub event_id: String,
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(deserialize_with = "lenient_string")]
    pub event_type: String,
    #[serde(deserialize_with = "lenient_string")]
    pub home_location_name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub location_name: String,
    #[serde(deserialize_with = "lenient_f32")]
    pub distance: f32,
    #[serde(deserialize_with = "lenient_string")]
    pub created_at: String,
}

/// One remote sensor record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RawSensor {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(deserialize_with = "lenient_string")]
    pub sensor_type: String,
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(rename = "isActive", deserialize_with = "lenient_bool")]
    pub is_active: bool,
}

/// Which body shape a payload arrived in (for logging and tests).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    Sequence,
    Wrapper,
    Single,
}

// ───────────────────────────────────────────────────────────────
// Normalization
// ───────────────────────────────────────────────────────────────

/// Decode a proximity body into the events that must be processed, in order.
pub fn normalize_events(body: &str) -> Result<(PayloadShape, Vec<RawEvent>), DecodeError> {
    match parse_document(body)? {
        Value::Array(items) => {
            // Newest entry first; the rest of the history is ignored.
            let events = match items.into_iter().next() {
                Some(first) => vec![record(first)?],
                None => Vec::new(),
            };
            Ok((PayloadShape::Sequence, events))
        }
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => Ok((PayloadShape::Wrapper, records(items)?)),
            Some(other) => {
                // Not a wrapper after all: `data` is an ordinary field.
                map.insert("data".to_owned(), other);
                Ok((PayloadShape::Single, vec![record(Value::Object(map))?]))
            }
            None => Ok((PayloadShape::Single, vec![record(Value::Object(map))?])),
        },
        _ => Err(DecodeError::UnexpectedShape),
    }
}

/// Decode a sensor-list body.  Every record is returned.
pub fn normalize_sensors(body: &str) -> Result<(PayloadShape, Vec<RawSensor>), DecodeError> {
    match parse_document(body)? {
        Value::Array(items) => Ok((PayloadShape::Sequence, records(items)?)),
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => Ok((PayloadShape::Wrapper, records(items)?)),
            _ => Err(DecodeError::UnexpectedShape),
        },
        _ => Err(DecodeError::UnexpectedShape),
    }
}

fn parse_document(body: &str) -> Result<Value, DecodeError> {
    if body.trim().is_empty() {
        return Err(DecodeError::Empty);
    }
    Ok(serde_json::from_str(body)?)
}

fn records<T: DeserializeOwned>(items: Vec<Value>) -> Result<Vec<T>, DecodeError> {
    items.into_iter().map(record).collect()
}

fn record<T: DeserializeOwned>(value: Value) -> Result<T, DecodeError> {
    if !value.is_object() {
        return Err(DecodeError::UnexpectedShape);
    }
    Ok(serde_json::from_value(value)?)
}

// ───────────────────────────────────────────────────────────────
// Lenient field decoders
// ───────────────────────────────────────────────────────────────

/// Strings as-is, numbers and booleans as their text, anything else empty.
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    })
}

fn lenient_f32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f32, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0) as f32,
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    })
}

fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(matches!(
        Option::<Value>::deserialize(deserializer)?,
        Some(Value::Bool(true))
    ))
}
