//! Utility functions for directory lookup and JSON helpers
//!
//! Directories follow the XDG Base Directory specification:
//!
//! - Data: `~/.local/share/forumkit/` - Cached site config (`config.json`)
//!
//! # Example
//!
//! ```
//! use forumkit::utils::object_diff;
//! use serde_json::json;
//!
//! let diff = object_diff(&json!({"a": 1, "b": 2}), &json!({"a": 1, "b": 3}));
//! assert_eq!(diff, json!({"b": 2}));
//! ```

use directories::ProjectDirs;
use serde_json::{Map, Value};
use std::path::PathBuf;

pub fn get_data_dir() -> Option<PathBuf> {
    ProjectDirs::from("com", "forumkit", "forumkit").map(|pd| pd.data_dir().to_path_buf())
}

/// Deep difference between two JSON values.
///
/// For objects, returns the keys of `object` whose values differ from `base`;
/// when both sides of a key are objects the diff recurses into them. Keys only
/// present in `base` are not reported. Non-object inputs yield `object` itself
/// when different, or an empty object when equal.
pub fn object_diff(object: &Value, base: &Value) -> Value {
    match (object, base) {
        (Value::Object(obj), Value::Object(base)) => Value::Object(diff_maps(obj, base)),
        _ if object == base => Value::Object(Map::new()),
        _ => object.clone(),
    }
}

fn diff_maps(object: &Map<String, Value>, base: &Map<String, Value>) -> Map<String, Value> {
    object
        .iter()
        .filter_map(|(key, value)| {
            let other = base.get(key);
            if other == Some(value) {
                return None;
            }
            let changed = match (value, other) {
                (Value::Object(inner), Some(Value::Object(other))) => {
                    Value::Object(diff_maps(inner, other))
                }
                _ => value.clone(),
            };
            Some((key.clone(), changed))
        })
        .collect()
}

/// Truncates a string to a maximum length and adds an ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        // Find the nearest character boundary to avoid splitting multi-byte characters
        let end = s
            .char_indices()
            .map(|(idx, _)| idx)
            .take_while(|&idx| idx <= max_len.saturating_sub(3))
            .last()
            .unwrap_or(0);
        format!("{}...", &s[..end])
    }
}
