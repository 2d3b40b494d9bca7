//! Query evaluation against note records.

use super::ast::Node;
use super::date::DateField;
use super::token::Connector;
use crate::note::NoteRecord;

/// Whether `note` satisfies `node`. Pure and side-effect free.
pub fn matches(node: &Node, note: &NoteRecord) -> bool {
    node.matches(note)
}

impl Node {
    /// Evaluate this node against `note`.
    pub fn matches(&self, note: &NoteRecord) -> bool {
        match self {
            Self::Name { text, negated } => {
                apply(*negated, note.filename.to_lowercase().contains(&text.to_lowercase()))
            }
            Self::Tag { path, negated } => {
                let hit = match path {
                    Some(path) => has_tag(&note.tags, path),
                    None => !note.tags.is_empty(),
                };
                apply(*negated, hit)
            }
            Self::Property { key, value, negated } => {
                let hit = note.property(key).is_some_and(|v| match value {
                    Some(wanted) => v.contains_exact(wanted),
                    None => v.is_present(),
                });
                apply(*negated, hit)
            }
            Self::Task { negated } => apply(*negated, note.has_incomplete_task),
            Self::Folder { path, rooted, negated } => {
                let hit = if *rooted {
                    in_exact_folder(&note.folder_path, path)
                } else {
                    in_folder_segment(&note.folder_path, path)
                };
                apply(*negated, hit)
            }
            Self::Extension { ext, negated } => {
                let note_ext = note.extension.trim_start_matches('.');
                apply(*negated, note_ext.eq_ignore_ascii_case(ext))
            }
            Self::Date { field, range, negated, .. } => {
                let instant = match field {
                    DateField::Created => &note.created_at,
                    DateField::Modified => &note.modified_at,
                };
                apply(*negated, range.contains(instant))
            }
            Self::Connector { op, left, right } => match op {
                Connector::And => left.matches(note) && right.matches(note),
                Connector::Or => left.matches(note) || right.matches(note),
            },
            Self::Conjunction(terms) => terms.iter().all(|t| t.matches(note)),
        }
    }
}

fn apply(negated: bool, hit: bool) -> bool {
    hit != negated
}

/// Hierarchical, case-insensitive tag match: `a` matches `a` and `a/...`.
pub fn has_tag(tags: &[String], wanted: &str) -> bool {
    let wanted = wanted.to_lowercase();
    tags.iter().any(|tag| {
        let tag = tag.trim_start_matches('#').to_lowercase();
        tag == wanted
            || tag.strip_prefix(wanted.as_str()).is_some_and(|rest| rest.starts_with('/'))
    })
}

fn segments(path: &str) -> Vec<String> {
    path.split('/').filter(|s| !s.is_empty()).map(str::to_lowercase).collect()
}

/// The note sits directly in `folder` (`""` is the vault root).
fn in_exact_folder(note_folder: &str, folder: &str) -> bool {
    segments(note_folder) == segments(folder)
}

/// The query's segments appear as a contiguous run in the note's folder path.
fn in_folder_segment(note_folder: &str, folder: &str) -> bool {
    let wanted = segments(folder);
    if wanted.is_empty() {
        return false;
    }
    segments(note_folder).windows(wanted.len()).any(|w| w == wanted.as_slice())
}
