//! Cookie-import export format.
//!
//! The JSON shape matches what browser cookie-editor extensions accept on
//! import. No per-cookie metadata survives capture, so every cookie gets the
//! same flags and a one hour expiry.

use crate::record::{CookieMap, LocalDataMap, NormalizedRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Seconds added to the export time to form `expirationDate`.
pub const EXPIRATION_HORIZON_SECS: i64 = 3600;

/// `sameSite` values the import schema accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SameSite {
    Lax,
    NoRestriction,
    Strict,
    #[default]
    Unspecified,
}

impl SameSite {
    /// Case-insensitive match; anything unrecognised is `Unspecified`.
    pub fn parse_lenient(input: Option<&str>) -> Self {
        match input.map(str::to_lowercase).as_deref() {
            Some("lax") => SameSite::Lax,
            Some("no_restriction") => SameSite::NoRestriction,
            Some("strict") => SameSite::Strict,
            _ => SameSite::Unspecified,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SameSite::Lax => "lax",
            SameSite::NoRestriction => "no_restriction",
            SameSite::Strict => "strict",
            SameSite::Unspecified => "unspecified",
        }
    }
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One cookie in import schema. Field order is the serialized order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportCookie {
    pub domain: String,
    pub expiration_date: i64,
    pub host_only: bool,
    pub http_only: bool,
    pub name: String,
    pub path: String,
    pub same_site: SameSite,
    pub secure: bool,
    pub session: bool,
    pub store_id: Option<String>,
    pub value: String,
}

impl ExportCookie {
    /// Export every cookie of a capture, using its own url and `sameSite`.
    pub fn from_record(record: &NormalizedRecord) -> Vec<ExportCookie> {
        to_import_cookies(&record.url, &record.cookies, record.same_site.as_deref())
    }
}

/// Convert a cookie map to import schema, expiring one hour from now.
pub fn to_import_cookies(
    url: &str,
    cookies: &CookieMap,
    same_site: Option<&str>,
) -> Vec<ExportCookie> {
    to_import_cookies_at(url, cookies, same_site, Utc::now())
}

/// Same as [`to_import_cookies`] with an explicit export time.
pub fn to_import_cookies_at(
    url: &str,
    cookies: &CookieMap,
    same_site: Option<&str>,
    now: DateTime<Utc>,
) -> Vec<ExportCookie> {
    let expiration_date = now.timestamp() + EXPIRATION_HORIZON_SECS;
    let same_site = SameSite::parse_lenient(same_site);

    cookies
        .iter()
        .map(|(name, value)| ExportCookie {
            domain: url.to_string(),
            expiration_date,
            host_only: true,
            http_only: false,
            name: name.clone(),
            path: "/".to_string(),
            same_site,
            secure: true,
            session: false,
            store_id: None,
            value: value.clone(),
        })
        .collect()
}

/// Something that can be copied out of the viewer.
#[derive(Debug, Clone, Copy)]
pub enum ClipboardPayload<'a> {
    Cookies(&'a [ExportCookie]),
    LocalData(&'a LocalDataMap),
}

/// Pretty-printed JSON with two-space indentation.
pub fn to_clipboard_text(payload: ClipboardPayload<'_>) -> String {
    let rendered = match payload {
        ClipboardPayload::Cookies(cookies) => serde_json::to_string_pretty(cookies),
        ClipboardPayload::LocalData(data) => serde_json::to_string_pretty(data),
    };
    // Both payloads have string keys only, so serialization cannot fail.
    rendered.unwrap_or_else(|err| {
        log::error!("Failed to serialize clipboard payload: {}", err);
        match payload {
            ClipboardPayload::Cookies(_) => "[]".to_string(),
            ClipboardPayload::LocalData(_) => "{}".to_string(),
        }
    })
}
