//! Frontmatter types.

use serde::Deserialize;
use serde_yaml::Value;
use std::collections::BTreeMap;

/// Parsed YAML frontmatter of a note.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Frontmatter {
    /// Top-level fields.
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

impl Frontmatter {
    /// Field lookup ignoring key case.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    }
}

/// A note split into frontmatter and body.
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    /// Parsed frontmatter (if present).
    pub frontmatter: Option<Frontmatter>,
    /// The markdown body (everything after frontmatter).
    pub body: String,
}
