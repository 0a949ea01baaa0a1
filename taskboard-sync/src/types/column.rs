//! Column identity: the raw stored value and the fixed enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Column value as stored on a task.
///
/// Remote documents can carry any string here, so this is kept raw. Use
/// [`ColumnId::key`] to map it onto the board's fixed set of columns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnId(String);

impl ColumnId {
    /// Wrap a raw column value
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The recognized column this id names, if any
    pub fn key(&self) -> Option<ColumnKey> {
        ColumnKey::parse(&self.0)
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ColumnId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ColumnId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<ColumnKey> for ColumnId {
    fn from(key: ColumnKey) -> Self {
        Self(key.as_str().to_string())
    }
}

impl PartialEq<ColumnKey> for ColumnId {
    fn eq(&self, other: &ColumnKey) -> bool {
        self.0 == other.as_str()
    }
}

/// The fixed set of board columns, in left-to-right render order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum ColumnKey {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl ColumnKey {
    /// All columns in render order
    pub const ALL: [ColumnKey; 3] = [ColumnKey::Todo, ColumnKey::InProgress, ColumnKey::Done];

    /// Stored key for this column
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "inProgress",
            Self::Done => "done",
        }
    }

    /// Display label shown in the column header
    pub fn label(self) -> &'static str {
        match self {
            Self::Todo => "To Do",
            Self::InProgress => "In Progress",
            Self::Done => "Done",
        }
    }

    /// Render index of this column
    pub fn index(self) -> usize {
        match self {
            Self::Todo => 0,
            Self::InProgress => 1,
            Self::Done => 2,
        }
    }

    /// Parse a stored key; unknown keys yield `None`
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "todo" => Some(Self::Todo),
            "inProgress" => Some(Self::InProgress),
            "done" => Some(Self::Done),
            _ => None,
        }
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown column '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_keys() {
        for key in ColumnKey::ALL {
            assert_eq!(ColumnKey::parse(key.as_str()), Some(key));
        }
    }

    #[test]
    fn test_parse_unknown_key() {
        assert_eq!(ColumnKey::parse("backlog"), None);
        assert_eq!(ColumnKey::parse("InProgress"), None);
        assert!("archive".parse::<ColumnKey>().is_err());
    }

    #[test]
    fn test_render_order_and_labels() {
        let labels: Vec<_> = ColumnKey::ALL.iter().map(|k| k.label()).collect();
        assert_eq!(labels, vec!["To Do", "In Progress", "Done"]);
        for (i, key) in ColumnKey::ALL.iter().enumerate() {
            assert_eq!(key.index(), i);
        }
    }

    #[test]
    fn test_column_id_maps_to_key() {
        assert_eq!(
            ColumnId::from("inProgress").key(),
            Some(ColumnKey::InProgress)
        );
        assert_eq!(ColumnId::from("nope").key(), None);
        assert_eq!(ColumnId::from(ColumnKey::Done), ColumnKey::Done);
    }

    #[test]
    fn test_serde_uses_stored_keys() {
        let json = serde_json::to_string(&ColumnKey::InProgress).unwrap();
        assert_eq!(json, "\"inProgress\"");
        let key: ColumnKey = serde_json::from_str("\"done\"").unwrap();
        assert_eq!(key, ColumnKey::Done);
    }
}
