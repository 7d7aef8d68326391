//! Cookie string and local storage parsing.
//!
//! Captured payloads are free-form and frequently broken. Everything public
//! in this module is total: bad input yields an empty map, never an error.

use crate::record::{timestamp_text, CookieMap, LocalDataMap, NormalizedRecord, RawRecord};
use serde_json::Value;
use thiserror::Error;

/// Why a local storage blob could not be decoded.
#[derive(Error, Debug)]
pub enum LocalDataError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a JSON object, found {0}")]
    NotAnObject(&'static str),
}

/// Parse a `name=value; name=value` cookie string.
///
/// Only the first `=` of a segment separates name from value. Segments with
/// an empty name or value are dropped; a repeated name keeps the last value.
pub fn normalize_cookie_field(raw: Option<&str>) -> CookieMap {
    let mut cookies = CookieMap::new();
    let Some(raw) = raw else {
        return cookies;
    };

    for segment in raw.split(';') {
        let Some((name, value)) = segment.split_once('=') else {
            continue;
        };
        let (name, value) = (name.trim(), value.trim());
        if name.is_empty() || value.is_empty() {
            continue;
        }
        cookies.insert(name.to_string(), value.to_string());
    }

    cookies
}

/// Decode a local storage blob, falling back to an empty map on failure.
pub fn normalize_local_data(raw: Option<&str>) -> LocalDataMap {
    match raw {
        None | Some("") => LocalDataMap::new(),
        Some(raw) => parse_local_data(raw).unwrap_or_else(|err| {
            log::warn!("Error parsing localData: {}", err);
            LocalDataMap::new()
        }),
    }
}

/// Decode a local storage blob after undoing producer double-escaping.
pub fn parse_local_data(raw: &str) -> std::result::Result<LocalDataMap, LocalDataError> {
    let unescaped = collapse_double_escapes(raw);
    match serde_json::from_str::<Value>(&unescaped)? {
        Value::Object(map) => Ok(map),
        other => Err(LocalDataError::NotAnObject(json_kind(&other))),
    }
}

/// Remove every `\\` pair, scanning left to right without overlap.
///
/// Some producers escape the whole payload a second time. This also eats a
/// literal `\\` inside an otherwise clean payload.
pub fn collapse_double_escapes(raw: &str) -> String {
    raw.replace("\\\\", "")
}

/// Parse both payloads of a capture.
pub fn normalize_record(raw: &RawRecord) -> NormalizedRecord {
    NormalizedRecord {
        id: raw.id.clone(),
        url: raw.url.clone(),
        updated_at: raw.updated_at(),
        updated_at_raw: raw.updated_at.as_ref().and_then(timestamp_text),
        same_site: raw.same_site.clone(),
        cookies: normalize_cookie_field(raw.data.as_deref()),
        local_data: normalize_local_data(raw.local_data.as_deref()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
