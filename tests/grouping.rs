use crumbs::profile::{group_by_profile, ingest, total_records, Profile};
use crumbs::record::RawRecord;
use serde_json::json;

fn records(value: serde_json::Value) -> Vec<RawRecord> {
    serde_json::from_value(value).expect("records")
}

fn ids(profile: &Profile) -> Vec<&str> {
    profile
        .records
        .iter()
        .filter_map(|r| r.id.as_deref())
        .collect()
}

fn mixed_input() -> Vec<RawRecord> {
    records(json!([
        { "_id": "f1", "profile": "beta", "updatedAt": "2024-01-01T00:00:00Z" },
        {
            "profile": "alpha",
            "cookiesList": [
                { "_id": "n1", "updatedAt": "2024-01-02T00:00:00Z" },
                { "_id": "n2", "updatedAt": "2024-01-05T00:00:00Z" }
            ]
        },
        { "_id": "f2", "profile": "beta", "updatedAt": "2024-01-03T00:00:00Z" },
        { "profile": "alpha", "cookiesList": [{ "_id": "n3", "updatedAt": "2024-01-04T00:00:00Z" }] },
        { "_id": "f3", "profile": "gamma" }
    ]))
}

#[test]
fn test_grouping_preserves_leaf_count() {
    let input = mixed_input();
    let profiles = group_by_profile(&input);
    assert_eq!(ingest(&input).len(), 6);
    assert_eq!(total_records(&profiles), 6);
}

#[test]
fn test_profiles_in_first_seen_order() {
    let profiles = group_by_profile(&mixed_input());
    let names: Vec<&str> = profiles.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["beta", "alpha", "gamma"]);
}

#[test]
fn test_records_sorted_newest_first() {
    let profiles = group_by_profile(&mixed_input());
    assert_eq!(ids(&profiles[0]), ["f2", "f1"]);
    assert_eq!(ids(&profiles[1]), ["n2", "n3", "n1"]);
}

#[test]
fn test_equal_timestamps_keep_input_order() {
    let input = records(json!([
        { "_id": "a", "updatedAt": "2024-01-01T00:00:00Z" },
        { "_id": "b", "updatedAt": "2024-01-02T00:00:00Z" },
        { "_id": "c", "updatedAt": "2024-01-01T00:00:00Z" },
        { "_id": "d", "updatedAt": "2024-01-02T00:00:00.000Z" },
        { "_id": "e", "updatedAt": 1704067200000_i64 }
    ]));
    let profiles = group_by_profile(&input);
    assert_eq!(ids(&profiles[0]), ["b", "d", "a", "c", "e"]);
}

#[test]
fn test_grouping_normalizes_every_capture() {
    let input = records(json!([
        {
            "profile": "p",
            "cookiesList": [
                { "_id": "1", "data": "a=1", "localData": "{\"k\":true}" },
                { "_id": "2", "data": null, "localData": "broken" }
            ]
        }
    ]));
    let profiles = group_by_profile(&input);
    let first = &profiles[0].records[0];
    assert_eq!(first.cookies.get("a").map(String::as_str), Some("1"));
    assert_eq!(first.local_data.get("k"), Some(&json!(true)));
    let second = &profiles[0].records[1];
    assert!(second.cookies.is_empty());
    assert!(second.local_data.is_empty());
}

#[test]
fn test_empty_input_yields_no_profiles() {
    assert!(group_by_profile(&[]).is_empty());
}
