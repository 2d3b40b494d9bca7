//! Read-only note metadata consumed by the filter evaluator.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A frontmatter property value.
///
/// Scalars (strings, numbers, booleans) are stored as text; sequences of
/// scalars become lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Text(String),
    List(Vec<String>),
}

impl PropertyValue {
    /// True when the value carries at least one non-blank string.
    pub fn is_present(&self) -> bool {
        match self {
            Self::Text(s) => !s.trim().is_empty(),
            Self::List(items) => items.iter().any(|s| !s.trim().is_empty()),
        }
    }

    /// Exact, case-sensitive comparison against the text or any list element.
    pub fn contains_exact(&self, wanted: &str) -> bool {
        match self {
            Self::Text(s) => s == wanted,
            Self::List(items) => items.iter().any(|s| s == wanted),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<Vec<&str>> for PropertyValue {
    fn from(items: Vec<&str>) -> Self {
        Self::List(items.into_iter().map(String::from).collect())
    }
}

/// Snapshot of one note's metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteRecord {
    /// Path relative to the vault root, using `/` separators.
    pub path: String,
    /// File name without extension.
    pub filename: String,
    /// Extension without the leading dot.
    pub extension: String,
    /// Containing folder relative to the vault root; `""` for the root.
    pub folder_path: String,
    /// Hierarchical tag paths without the leading `#`, in document order.
    pub tags: Vec<String>,
    /// Frontmatter properties.
    pub properties: BTreeMap<String, PropertyValue>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    /// Whether the body contains at least one unchecked task item.
    pub has_incomplete_task: bool,
}

impl NoteRecord {
    /// Build a record for `path`, deriving filename, extension and folder.
    ///
    /// Timestamps default to the Unix epoch; tags, properties and the task
    /// flag start empty.
    pub fn new(path: &str) -> Self {
        let path = path.trim_start_matches('/').to_string();
        let (folder_path, file) = match path.rfind('/') {
            Some(idx) => (path[..idx].to_string(), &path[idx + 1..]),
            None => (String::new(), path.as_str()),
        };
        let (filename, extension) = match file.rfind('.') {
            Some(idx) if idx > 0 => (file[..idx].to_string(), file[idx + 1..].to_string()),
            _ => (file.to_string(), String::new()),
        };

        Self {
            filename,
            extension,
            folder_path,
            tags: Vec::new(),
            properties: BTreeMap::new(),
            created_at: DateTime::<Utc>::UNIX_EPOCH,
            modified_at: DateTime::<Utc>::UNIX_EPOCH,
            has_incomplete_task: false,
            path,
        }
    }

    /// Look up a property with a case-insensitive key.
    ///
    /// An exact key match wins over a case-folded one.
    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        if let Some(value) = self.properties.get(key) {
            return Some(value);
        }
        let wanted = key.to_lowercase();
        self.properties
            .iter()
            .find(|(k, _)| k.to_lowercase() == wanted)
            .map(|(_, v)| v)
    }
}
