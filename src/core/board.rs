//! Board records as delivered by the API client
//!
//! Boards form a forest: every board either has no parent (a root) or points
//! at another board through `parent_id`. Ids arrive as JSON strings or
//! integers and are normalized into [`BoardId`].

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Unique board identifier.
///
/// Backends disagree on whether ids are numeric or textual, so both
/// deserialize into the same string form (`7` and `"7"` are equal).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawId", into = "String")]
pub struct BoardId(String);

impl BoardId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for BoardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BoardId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for BoardId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<i64> for BoardId {
    fn from(n: i64) -> Self {
        Self(n.to_string())
    }
}

impl From<BoardId> for String {
    fn from(id: BoardId) -> Self {
        id.0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Int(i64),
    Str(String),
}

impl From<RawId> for BoardId {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Int(n) => Self::from(n),
            RawId::Str(s) => Self(s),
        }
    }
}

/// `null`, `""` and `0` all mean "no parent".
fn deserialize_parent<'de, D>(deserializer: D) -> Result<Option<BoardId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawId>::deserialize(deserializer)?;
    Ok(match raw {
        None | Some(RawId::Int(0)) => None,
        Some(RawId::Str(s)) if s.is_empty() => None,
        Some(raw) => Some(BoardId::from(raw)),
    })
}

/// Blank color strings are treated as unset.
fn deserialize_color<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|c| !c.trim().is_empty()))
}

/// A forum board (category node)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub id: BoardId,

    #[serde(default, deserialize_with = "deserialize_parent")]
    pub parent_id: Option<BoardId>,

    #[serde(default)]
    pub name: String,

    /// Explicit color: a CSS color or a bare hex fragment such as `ff0000`
    #[serde(default, deserialize_with = "deserialize_color")]
    pub color: Option<String>,

    /// Ordering hint, higher first among siblings
    #[serde(default)]
    pub weight: i64,

    /// Creation time as sent by the backend, earlier first among equal weights
    #[serde(default)]
    pub time: Option<serde_json::Value>,

    /// Fields this crate does not interpret (brief, category, can_post_rank, ...)
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Board {
    /// Creates a board with only the fields the hierarchy cares about
    pub fn new(id: impl Into<BoardId>, parent_id: Option<BoardId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent_id,
            name: name.into(),
            color: None,
            weight: 0,
            time: None,
            extra: serde_json::Map::new(),
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Sort direction of one ordering key
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::AsRefStr)]
pub enum SortDirection {
    #[strum(serialize = "asc")]
    Asc,
    #[strum(serialize = "desc")]
    Desc,
}

/// Ordering request passed to the board listing endpoint.
///
/// Renders as `field.dir,field.dir,...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSpec(Vec<(&'static str, SortDirection)>);

impl OrderSpec {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn then(mut self, field: &'static str, direction: SortDirection) -> Self {
        self.0.push((field, direction));
        self
    }

    /// Children grouped under parents, heaviest first, oldest first on ties
    pub fn boards() -> Self {
        Self::new()
            .then("parent_id", SortDirection::Desc)
            .then("weight", SortDirection::Desc)
            .then("time", SortDirection::Asc)
    }
}

impl Default for OrderSpec {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OrderSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, dir)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{field}.{dir}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_board_id_from_int_and_string_are_equal() {
        let a: BoardId = serde_json::from_value(json!(7)).unwrap();
        let b: BoardId = serde_json::from_value(json!("7")).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "7");
    }

    #[test]
    fn test_board_id_serializes_as_string() {
        let id = BoardId::from(12);
        assert_eq!(serde_json::to_value(&id).unwrap(), json!("12"));
    }

    #[test]
    fn test_parent_id_falsy_values_mean_root() {
        for parent in [json!(null), json!(""), json!(0)] {
            let board: Board =
                serde_json::from_value(json!({"id": 1, "parent_id": parent, "name": "a"}))
                    .unwrap();
            assert!(board.is_root(), "parent {parent} should be root");
        }
    }

    #[test]
    fn test_missing_parent_id_is_root() {
        let board: Board = serde_json::from_value(json!({"id": "x", "name": "a"})).unwrap();
        assert!(board.is_root());
        assert_eq!(board.weight, 0);
    }

    #[test]
    fn test_parent_id_present() {
        let board: Board =
            serde_json::from_value(json!({"id": 2, "parent_id": 1, "name": "child"})).unwrap();
        assert_eq!(board.parent_id, Some(BoardId::from("1")));
    }

    #[test]
    fn test_blank_color_is_none() {
        let board: Board =
            serde_json::from_value(json!({"id": 1, "name": "a", "color": "  "})).unwrap();
        assert_eq!(board.color, None);
    }

    #[test]
    fn test_unknown_fields_kept_in_extra() {
        let board: Board = serde_json::from_value(
            json!({"id": 1, "name": "a", "brief": "hello", "can_post_rank": 0}),
        )
        .unwrap();
        assert_eq!(board.extra["brief"], "hello");
        assert_eq!(board.extra["can_post_rank"], 0);
    }

    #[test]
    fn test_board_order_spec_rendering() {
        assert_eq!(
            OrderSpec::boards().to_string(),
            "parent_id.desc,weight.desc,time.asc"
        );
        assert_eq!(OrderSpec::new().to_string(), "");
    }
}
