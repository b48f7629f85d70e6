//! Deserializers for the places where translator output is loose.

use crate::codes::StopReasonCode;
use crate::transaction::Stop;
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

/// Accepts a string, a number, or null.
pub(crate) fn opt_string_or_number<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(d)?;
    Ok(match v {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        Some(other) => Some(other.to_string()),
    })
}

/// Reads any value; one that does not fit `T` becomes `T::default()`.
pub(crate) fn or_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let v = Value::deserialize(d)?;
    if v.is_null() {
        return Ok(T::default());
    }
    let kind = json_kind(&v);
    Ok(serde_json::from_value(v).unwrap_or_else(|e| {
        debug!(kind, error = %e, "ignoring malformed value");
        T::default()
    }))
}

/// Reads an array element by element, dropping the elements that do not fit `T`.
pub(crate) fn vec_skip_invalid<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = match Value::deserialize(d)? {
        Value::Array(items) => items,
        Value::Null => return Ok(Vec::new()),
        other => {
            debug!(kind = %json_kind(&other), "expected an array; treating as empty");
            return Ok(Vec::new());
        }
    };
    Ok(items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(v) => Some(v),
            Err(e) => {
                debug!(index, error = %e, "skipping malformed element");
                None
            }
        })
        .collect())
}

/// A number, or a string holding one. Anything else reads as `None`.
pub(crate) fn opt_f64<'de, D>(d: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(d)? {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => {
            let parsed = s.trim().parse::<f64>().ok();
            if parsed.is_none() {
                debug!(value = %s, "ignoring non-numeric value");
            }
            parsed
        }
        Some(other) => {
            debug!(kind = %json_kind(&other), "ignoring non-numeric value");
            None
        }
    })
}

/// Like [`opt_f64`], for non-negative integers.
pub(crate) fn opt_u64<'de, D>(d: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(d)? {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        Some(other) => {
            debug!(kind = %json_kind(&other), "ignoring non-numeric value");
            None
        }
    })
}

/// S5-01. Required; a number or a string holding one.
pub(crate) fn stop_sequence<'de, D>(d: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(d)? {
        Value::Number(n) => n
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| D::Error::custom(format!("invalid stop sequence number {n}"))),
        Value::String(s) => s
            .trim()
            .parse::<u32>()
            .map_err(|_| D::Error::custom(format!("invalid stop sequence number {s:?}"))),
        other => Err(D::Error::custom(format!(
            "stop sequence number is a {}",
            json_kind(&other)
        ))),
    }
}

/// S5-02. A numeric code is read as its digits.
pub(crate) fn opt_stop_reason<'de, D>(d: D) -> Result<Option<StopReasonCode>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_string_or_number(d)?.map(|code| StopReasonCode::parse(&code)))
}

/// Reads the S5 loop element by element. Elements that are not stops are dropped; a loop that is
/// not an array reads as empty.
pub(crate) fn stops<'de, D>(d: D) -> Result<Vec<Stop>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match Option::<Value>::deserialize(d)? {
        Some(Value::Array(items)) => items,
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(other) => {
            debug!(kind = %json_kind(&other), "stop loop is not an array; treating as empty");
            return Ok(Vec::new());
        }
    };

    let mut out = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<Stop>(item) {
            Ok(stop) => out.push(stop),
            Err(e) => debug!(index, error = %e, "skipping malformed stop"),
        }
    }
    Ok(out)
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
