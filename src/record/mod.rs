//! Capture records as delivered by the collector and after normalization.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};


/// Insertion-ordered cookie name to value mapping.
pub type CookieMap = IndexMap<String, String>;

/// Decoded local storage snapshot.
pub type LocalDataMap = Map<String, Value>;

/// One capture entry exactly as the collector returned it.
///
/// Producers that group captures send a top-level entry carrying only
/// `profile` and a `cookiesList` of sub-records.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    #[serde(rename = "_id", default, deserialize_with = "deserialize_record_id")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub url: String,
    #[serde(default, deserialize_with = "deserialize_optional_text")]
    pub data: Option<String>,
    #[serde(default, deserialize_with = "deserialize_local_data")]
    pub local_data: Option<String>,
    #[serde(default)]
    pub updated_at: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_optional_text")]
    pub same_site: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_text")]
    pub profile: Option<String>,
    #[serde(default, deserialize_with = "deserialize_cookies_list")]
    pub cookies_list: Option<Vec<RawRecord>>,
}

impl RawRecord {
    /// Absolute instant of the last update, if `updatedAt` is readable.
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at.as_ref().and_then(parse_timestamp)
    }
}

/// A capture after its cookie string and local storage blob were parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    pub id: Option<String>,
    pub url: String,
    pub updated_at: Option<DateTime<Utc>>,
    /// `updatedAt` as sent, for display when it could not be parsed.
    pub updated_at_raw: Option<String>,
    pub same_site: Option<String>,
    pub cookies: CookieMap,
    pub local_data: LocalDataMap,
}

fn deserialize_record_id<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(record_id_from_value))
}

// Off-type fields read as absent.

fn deserialize_optional_text<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Ok(Some(s)),
        _ => Ok(None),
    }
}

fn deserialize_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserialize_optional_text(deserializer)?.unwrap_or_default())
}

/// Local storage sent already decoded is kept as its JSON text.
fn deserialize_local_data<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Ok(Some(other.to_string())),
    }
}

/// Sub-records that are not objects become empty captures so the count holds.
fn deserialize_cookies_list<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<Vec<RawRecord>>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items,
        _ => return Ok(None),
    };

    let records = items
        .into_iter()
        .map(|item| {
            serde_json::from_value(item).unwrap_or_else(|err| {
                log::warn!("Unreadable entry in cookiesList: {}", err);
                RawRecord::default()
            })
        })
        .collect();
    Ok(Some(records))
}

/// Decode a collector body; the body must be a JSON array.
///
/// Entries that are not objects become empty captures.
pub fn parse_records(body: &[u8]) -> serde_json::Result<Vec<RawRecord>> {
    let entries: Vec<Value> = serde_json::from_slice(body)?;
    Ok(entries
        .into_iter()
        .map(|entry| {
            serde_json::from_value(entry).unwrap_or_else(|err| {
                log::warn!("Unreadable capture entry: {}", err);
                RawRecord::default()
            })
        })
        .collect())
}

fn record_id_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        // Mongo extended JSON: {"$oid": "..."}
        Value::Object(map) => map.get("$oid").and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
}

/// Text form of a raw `updatedAt` value.
pub fn timestamp_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Resolve an `updatedAt` value to an absolute instant.
///
/// Numbers (and numeric strings) are epoch milliseconds.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|millis| millis as i64))
            .and_then(DateTime::from_timestamp_millis),
        Value::String(s) => parse_timestamp_str(s),
        _ => None,
    }
}

fn parse_timestamp_str(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(input) {
        return Some(parsed.with_timezone(&Utc));
    }

    // Date-time without offset is local time; a bare date is UTC midnight.
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return naive
                .and_local_timezone(Local)
                .earliest()
                .map(|local| local.with_timezone(&Utc));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }

    input
        .parse::<i64>()
        .ok()
        .and_then(DateTime::from_timestamp_millis)
}
