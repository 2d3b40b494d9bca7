//! Shared output formatting for query commands.

use std::collections::BTreeMap;

use chrono::{DateTime, Local, Utc};
use notesieve_core::note::{NoteRecord, PropertyValue};
use serde::Serialize;
use tabled::Tabled;

/// Formatted note for JSON output.
#[derive(Debug, Serialize)]
pub struct NoteOutput {
    pub path: String,
    pub folder: String,
    pub extension: String,
    pub tags: Vec<String>,
    pub properties: BTreeMap<String, PropertyValue>,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    pub has_task: bool,
}

impl From<&NoteRecord> for NoteOutput {
    fn from(note: &NoteRecord) -> Self {
        Self {
            path: note.path.clone(),
            folder: note.folder_path.clone(),
            extension: note.extension.clone(),
            tags: note.tags.clone(),
            properties: note.properties.clone(),
            created: note.created_at,
            modified: note.modified_at,
            has_task: note.has_incomplete_task,
        }
    }
}

/// Table row for a note.
#[derive(Tabled)]
pub struct NoteRow {
    #[tabled(rename = "Path")]
    pub path: String,
    #[tabled(rename = "Tags")]
    pub tags: String,
    #[tabled(rename = "Task")]
    pub task: String,
    #[tabled(rename = "Modified")]
    pub modified: String,
}

impl From<&NoteRecord> for NoteRow {
    fn from(note: &NoteRecord) -> Self {
        let tags = note.tags.iter().map(|t| format!("#{t}")).collect::<Vec<_>>().join(" ");
        Self {
            path: truncate(&note.path, 60),
            tags: truncate(&tags, 40),
            task: if note.has_incomplete_task { "open".into() } else { String::new() },
            modified: format_local(&note.modified_at),
        }
    }
}

pub fn format_local(instant: &DateTime<Utc>) -> String {
    instant.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

/// Truncate to `max` characters, marking the cut with `...`.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}
