//! Per-kind field projections
//!
//! The load-bearing table of the whole tool: which fields survive a
//! pull-edit-push round trip, and which remote-assigned fields must never be
//! resubmitted. Submit payloads are structured types, so an invalid field is
//! unrepresentable rather than deleted at runtime.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fields a monitor keeps on pull. Everything else the API returns is
/// remote-assigned state and is dropped before the file is written.
pub const MONITOR_PULL_FIELDS: &[&str] = &[
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

/// Monitors of this type belong to synthetic tests and are recreated
/// automatically when the tests are pushed; pulling them would duplicate.
pub const SYNTHETICS_ALERT_TYPE: &str = "synthetics alert";

/// Remote-assigned synthetic test fields rejected on create.
pub const SYNTHETIC_STRIP_FIELDS: &[&str] = &["public_id", "monitor_id"];

/// Remote-assigned log pipeline fields rejected on create.
pub const LOG_PIPELINE_STRIP_FIELDS: &[&str] = &["id", "is_read_only", "type"];

/// Monitor create payload: exactly the six fields the API accepts.
#[derive(Debug, Serialize, Deserialize)]
pub struct MonitorCreate {
    #[serde(rename = "type")]
    pub monitor_type: Value,
    pub query: Value,
    pub name: Value,
    pub message: Value,
    pub tags: Value,
    pub options: Value,
}

/// Monitor validate payload.
#[derive(Debug, Serialize, Deserialize)]
pub struct MonitorValidate {
    #[serde(rename = "type")]
    pub monitor_type: Value,
    pub query: Value,
    pub options: Value,
}

/// Dashboard create payload.
#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardCreate {
    pub title: Value,
    pub description: Value,
    pub widgets: Value,
    pub template_variables: Value,
    pub layout_type: Value,
    pub notify_list: Value,
    pub is_read_only: Value,
}

/// User create payload; the rest of the local file is ignored.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserCreate {
    pub handle: Value,
    pub name: Value,
    pub access_role: Value,
}

/// Keep only the allow-listed fields of `doc`.
pub fn project(doc: &Value, allowed: &[&str]) -> Value {
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

/// Drop the strip-listed fields of `doc`, keeping everything else.
pub fn strip(doc: &Value, stripped: &[&str]) -> Value {
    let mut out = doc.clone();
    if let Some(obj) = out.as_object_mut() {
        for key in stripped {
            obj.remove(*key);
        }
    }
    out
}

/// Tag filter for synthetic pulls: a test is included iff its tag set
/// intersects the caller-supplied set. An empty supplied set matches nothing;
/// pulling synthetics without `--tag` is an explicit no-result policy.
pub fn tags_intersect(test_tags: Option<&Value>, wanted: &[String]) -> bool {
    let Some(tags) = test_tags.and_then(Value::as_array) else {
        return false;
    };
    wanted
        .iter()
        .any(|w| tags.iter().any(|t| t.as_str() == Some(w.as_str())))
}
