//! Grouping of captures into profiles.

use crate::normalize::normalize_record;
use crate::record::{NormalizedRecord, RawRecord};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Profile name used when a capture does not carry one.
pub const DEFAULT_PROFILE: &str = "default";

/// A named group of captures, most recently updated first.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub name: String,
    pub records: Vec<NormalizedRecord>,
}

impl Profile {
    fn new(name: String) -> Self {
        Self {
            name,
            records: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// How a top-level collector entry carries its captures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RecordShape<'a> {
    /// The entry is itself a capture.
    Flat(&'a RawRecord),
    /// The entry only names a profile; `cookiesList` holds the captures.
    Nested {
        profile: &'a str,
        records: &'a [RawRecord],
    },
}

impl<'a> RecordShape<'a> {
    pub fn resolve(record: &'a RawRecord) -> Self {
        match &record.cookies_list {
            Some(records) => RecordShape::Nested {
                profile: profile_key(record),
                records,
            },
            None => RecordShape::Flat(record),
        }
    }

    pub fn profile(&self) -> &'a str {
        match self {
            RecordShape::Flat(record) => profile_key(*record),
            RecordShape::Nested { profile, .. } => *profile,
        }
    }

    /// Captures carried by this entry, in input order.
    pub fn leaves(&self) -> &'a [RawRecord] {
        match self {
            RecordShape::Flat(record) => std::slice::from_ref(*record),
            RecordShape::Nested { records, .. } => *records,
        }
    }
}

fn profile_key(record: &RawRecord) -> &str {
    match record.profile.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name,
        _ => DEFAULT_PROFILE,
    }
}

/// Flatten collector entries into `(profile, capture)` pairs in input order.
pub fn ingest(records: &[RawRecord]) -> Vec<(&str, &RawRecord)> {
    records
        .iter()
        .map(RecordShape::resolve)
        .flat_map(|shape| {
            let profile = shape.profile();
            shape.leaves().iter().map(move |leaf| (profile, leaf))
        })
        .collect()
}

/// Group captures by profile.
///
/// Profiles appear in first-seen order. Each profile's captures are sorted by
/// `updatedAt` descending; equal or unreadable timestamps keep input order,
/// and unreadable ones go last.
pub fn group_by_profile(records: &[RawRecord]) -> Vec<Profile> {
    let mut profiles: Vec<Profile> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for shape in records.iter().map(RecordShape::resolve) {
        let name = shape.profile();
        let slot = *index.entry(name).or_insert_with(|| {
            profiles.push(Profile::new(name.to_string()));
            profiles.len() - 1
        });
        profiles[slot]
            .records
            .extend(shape.leaves().iter().map(normalize_record));
    }

    for profile in &mut profiles {
        profile.records.sort_by(newest_first);
    }

    log::debug!(
        "Grouped {} captures into {} profiles",
        total_records(&profiles),
        profiles.len()
    );

    profiles
}

fn newest_first(a: &NormalizedRecord, b: &NormalizedRecord) -> Ordering {
    match (a.updated_at, b.updated_at) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Number of captures across all profiles.
pub fn total_records(profiles: &[Profile]) -> usize {
    profiles.iter().map(Profile::len).sum()
}

/// Find a capture by its `_id`, searching profiles in order.
pub fn find_record<'a>(profiles: &'a [Profile], id: &str) -> Option<&'a NormalizedRecord> {
    profiles
        .iter()
        .flat_map(|profile| profile.records.iter())
        .find(|record| record.id.as_deref() == Some(id))
}

/// Resolve a capture selector: an `_id`, or `PROFILE:N` with `N` counting
/// from 1 in display order. An `_id` match wins.
pub fn select_record<'a>(profiles: &'a [Profile], selector: &str) -> Option<&'a NormalizedRecord> {
    if let Some(record) = find_record(profiles, selector) {
        return Some(record);
    }

    let (name, position) = selector.rsplit_once(':')?;
    let position: usize = position.parse().ok()?;
    profiles
        .iter()
        .find(|profile| profile.name == name)
        .and_then(|profile| profile.records.get(position.checked_sub(1)?))
}

/// Positional selector for the capture at `index` (0-based) in `profile`.
pub fn record_ref(profile: &Profile, index: usize) -> String {
    format!("{}:{}", profile.name, index + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawRecord {
        serde_json::from_value(value).expect("record")
    }

    #[test]
    fn resolve_detects_nested_entries() {
        let nested = raw(json!({ "profile": "p", "cookiesList": [{ "_id": "1" }] }));
        assert!(matches!(
            RecordShape::resolve(&nested),
            RecordShape::Nested { profile: "p", records } if records.len() == 1
        ));

        let flat = raw(json!({ "_id": "2", "profile": "p" }));
        assert!(matches!(RecordShape::resolve(&flat), RecordShape::Flat(_)));
    }

    #[test]
    fn blank_profile_falls_back_to_default() {
        let records = vec![
            raw(json!({ "_id": "1", "profile": "  " })),
            raw(json!({ "_id": "2" })),
        ];
        let profiles = group_by_profile(&records);
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].name, DEFAULT_PROFILE);
        assert_eq!(profiles[0].len(), 2);
    }

    #[test]
    fn nested_sub_record_profiles_are_ignored() {
        let records = vec![raw(json!({
            "profile": "outer",
            "cookiesList": [{ "_id": "1", "profile": "inner" }]
        }))];
        let pairs = ingest(&records);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].0, "outer");
    }

    #[test]
    fn empty_nested_list_still_creates_profile() {
        let records = vec![
            raw(json!({ "profile": "empty", "cookiesList": [] })),
            raw(json!({ "_id": "1", "profile": "full" })),
        ];
        let profiles = group_by_profile(&records);
        let names: Vec<&str> = profiles.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["empty", "full"]);
        assert!(profiles[0].is_empty());
    }

    #[test]
    fn unreadable_timestamps_sort_last_in_input_order() {
        let records = vec![
            raw(json!({ "_id": "a", "updatedAt": "garbage" })),
            raw(json!({ "_id": "b", "updatedAt": "2024-01-01T00:00:00Z" })),
            raw(json!({ "_id": "c" })),
        ];
        let profiles = group_by_profile(&records);
        let ids: Vec<&str> = profiles[0]
            .records
            .iter()
            .filter_map(|r| r.id.as_deref())
            .collect();
        assert_eq!(ids, ["b", "a", "c"]);
    }

    #[test]
    fn find_record_searches_every_profile() {
        let records = vec![
            raw(json!({ "_id": "1", "profile": "a" })),
            raw(json!({ "profile": "b", "cookiesList": [{ "_id": "2", "url": "b.com" }] })),
        ];
        let profiles = group_by_profile(&records);
        assert_eq!(
            find_record(&profiles, "2").map(|r| r.url.as_str()),
            Some("b.com")
        );
        assert!(find_record(&profiles, "3").is_none());
    }

    #[test]
    fn select_record_falls_back_to_profile_position() {
        let records = vec![
            raw(json!({ "url": "old.com", "profile": "w:x", "updatedAt": "2024-01-01T00:00:00Z" })),
            raw(json!({ "url": "new.com", "profile": "w:x", "updatedAt": "2024-02-01T00:00:00Z" })),
            raw(json!({ "_id": "w:x:1", "url": "by-id.com", "profile": "other" })),
        ];
        let profiles = group_by_profile(&records);

        let url = |selector: &str| select_record(&profiles, selector).map(|r| r.url.clone());
        assert_eq!(url("w:x:2").as_deref(), Some("old.com"));
        assert_eq!(url("w:x:1").as_deref(), Some("by-id.com"));
        assert_eq!(url("other:1").as_deref(), Some("by-id.com"));
        assert_eq!(record_ref(&profiles[0], 1), "w:x:2");
        assert!(url("w:x:0").is_none());
        assert!(url("w:x:3").is_none());
        assert!(url("missing:1").is_none());
        assert!(url("w:x:two").is_none());
    }
}
