//! Property-based tests using proptest
//!
//! These tests verify the field projection and tag filter rules that decide
//! which data crosses the local/remote boundary, using randomized inputs.

use proptest::prelude::*;
use serde_json::{json, Map, Value};

/// The monitor fields that survive a pull.
const MONITOR_PULL_FIELDS: &[&str] = &[
    "tags",
    "deleted",
    "query",
    "message",
    "matching_downtimes",
    "multi",
    "name",
    "type",
    "options",
    "id",
];

/// Remote-assigned synthetic test fields that must never be resubmitted.
const SYNTHETIC_STRIP_FIELDS: &[&str] = &["public_id", "monitor_id"];

/// Allow-list projection: keep only the listed fields.
fn project(doc: &Value, allowed: &[&str]) -> Value {
    let mut out = Map::new();
    if let Some(obj) = doc.as_object() {
        for (key, value) in obj {
            if allowed.contains(&key.as_str()) {
                out.insert(key.clone(), value.clone());
            }
        }
    }
    Value::Object(out)
}

/// Strip-list projection: drop the listed fields, keep the rest.
fn strip(doc: &Value, stripped: &[&str]) -> Value {
    let mut out = doc.clone();
    if let Some(obj) = out.as_object_mut() {
        for key in stripped {
            obj.remove(*key);
        }
    }
    out
}

/// A test is pulled iff its tags intersect the supplied tag set.
fn tags_intersect(test_tags: &[String], wanted: &[String]) -> bool {
    wanted.iter().any(|w| test_tags.contains(w))
}

/// Generate arbitrary monitor-like objects with a mix of allow-listed and
/// remote-assigned fields.
fn arb_monitor() -> impl Strategy<Value = Value> {
    (
        any::<i64>(),
        "[a-z][a-z0-9-]{0,30}",
        prop_oneof!["metric alert", "query alert", "service check"],
        prop::collection::vec("[a-z]+:[a-z0-9]+", 0..5),
        prop::collection::btree_map("[a-z_]{1,20}", "[a-zA-Z0-9 ]{0,20}", 0..8),
    )
        .prop_map(|(id, name, monitor_type, tags, extra)| {
            let mut doc = json!({
                "id": id,
                "name": name,
                "type": monitor_type,
                "query": "avg(last_5m):x > 1",
                "message": "msg",
                "tags": tags,
                "options": {},
                "deleted": null,
                "multi": false,
                "matching_downtimes": []
            });
            let obj = doc.as_object_mut().unwrap();
            for (key, value) in extra {
                // Random extra fields model remote-assigned state.
                obj.entry(key).or_insert(Value::String(value));
            }
            doc
        })
}

fn arb_tags() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z]+:[a-z0-9]{1,8}", 0..6)
}

proptest! {
    /// Every projected key is in the allow-list, whatever the input carries.
    #[test]
    fn projection_emits_only_allowed_fields(monitor in arb_monitor()) {
        let projected = project(&monitor, MONITOR_PULL_FIELDS);
        for key in projected.as_object().unwrap().keys() {
            prop_assert!(MONITOR_PULL_FIELDS.contains(&key.as_str()));
        }
    }

    /// Projection preserves the values of the fields it keeps.
    #[test]
    fn projection_preserves_kept_values(monitor in arb_monitor()) {
        let projected = project(&monitor, MONITOR_PULL_FIELDS);
        for (key, value) in projected.as_object().unwrap() {
            prop_assert_eq!(Some(value), monitor.get(key));
        }
    }

    /// Projection is idempotent.
    #[test]
    fn projection_is_idempotent(monitor in arb_monitor()) {
        let once = project(&monitor, MONITOR_PULL_FIELDS);
        let twice = project(&once, MONITOR_PULL_FIELDS);
        prop_assert_eq!(once, twice);
    }

    /// Stripped fields never survive, and nothing else is touched.
    #[test]
    fn strip_removes_exactly_the_listed_fields(monitor in arb_monitor()) {
        let mut doc = monitor.clone();
        doc.as_object_mut().unwrap().insert("public_id".into(), json!("abc-123"));
        doc.as_object_mut().unwrap().insert("monitor_id".into(), json!(7));

        let stripped = strip(&doc, SYNTHETIC_STRIP_FIELDS);
        let obj = stripped.as_object().unwrap();
        prop_assert!(!obj.contains_key("public_id"));
        prop_assert!(!obj.contains_key("monitor_id"));
        prop_assert_eq!(obj.len(), doc.as_object().unwrap().len() - 2);
    }

    /// Stripping twice produces the same payload as stripping once, so a
    /// repeated push submits identical data.
    #[test]
    fn strip_is_idempotent(monitor in arb_monitor()) {
        let once = strip(&monitor, SYNTHETIC_STRIP_FIELDS);
        let twice = strip(&once, SYNTHETIC_STRIP_FIELDS);
        prop_assert_eq!(once, twice);
    }

    /// An empty supplied tag set matches no test at all.
    #[test]
    fn empty_wanted_set_matches_nothing(tags in arb_tags()) {
        prop_assert!(!tags_intersect(&tags, &[]));
    }

    /// Inclusion holds iff the two tag sets actually intersect.
    #[test]
    fn inclusion_iff_intersection(test_tags in arb_tags(), wanted in arb_tags()) {
        let expected = test_tags.iter().any(|t| wanted.contains(t));
        prop_assert_eq!(tags_intersect(&test_tags, &wanted), expected);
    }

    /// The intersection test is symmetric.
    #[test]
    fn intersection_is_symmetric(a in arb_tags(), b in arb_tags()) {
        prop_assert_eq!(tags_intersect(&a, &b), tags_intersect(&b, &a));
    }
}
