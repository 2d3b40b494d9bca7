//! Note metadata extraction: frontmatter properties, tags and open tasks.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde_yaml::Value;

use super::walker::WalkedFile;
use crate::frontmatter::{self, Frontmatter};
use crate::note::{NoteRecord, PropertyValue};

// An inline tag needs a non-digit character and must follow whitespace or
// the line start, so headings and anchors like `foo#bar` are skipped.
static INLINE_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)#([\p{L}\p{N}_\-/]*[\p{L}_\-][\p{L}\p{N}_\-/]*)").unwrap()
});

static OPEN_TASK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:[-*+]|\d+[.)])\s+\[ \]").unwrap());

/// Build the record of a walked file from its content.
pub fn extract_record(content: &str, file: &WalkedFile) -> NoteRecord {
    let mut record = record_from_content(&file.vault_path(), content);
    record.modified_at = DateTime::<Utc>::from(file.modified);
    record.created_at = DateTime::<Utc>::from(file.created);
    record
}

/// Build a record for `path` from markdown `content`, leaving timestamps at
/// their defaults.
///
/// Invalid frontmatter is logged and the note is kept with body tags and
/// tasks only.
pub fn record_from_content(path: &str, content: &str) -> NoteRecord {
    let mut record = NoteRecord::new(path);

    let (fm, body) = match frontmatter::parse(content) {
        Ok(doc) => (doc.frontmatter, doc.body),
        Err(e) => {
            tracing::warn!(path, "skipping frontmatter: {e}");
            let (_, body) = frontmatter::split(content);
            (None, body.to_string())
        }
    };

    if let Some(fm) = &fm {
        record.tags = frontmatter_tags(fm);
        record.properties = fm
            .fields
            .iter()
            .filter_map(|(key, value)| Some((key.clone(), property_value(value)?)))
            .collect();
    }

    let mut in_fence = false;
    for line in body.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }

        if OPEN_TASK_RE.is_match(line) {
            record.has_incomplete_task = true;
        }
        for cap in INLINE_TAG_RE.captures_iter(line) {
            push_tag(&mut record.tags, &cap[1]);
        }
    }

    record
}

fn frontmatter_tags(fm: &Frontmatter) -> Vec<String> {
    let mut tags = Vec::new();
    match fm.get("tags") {
        Some(Value::String(s)) => {
            for tag in s.split(|c: char| c == ',' || c.is_whitespace()) {
                push_tag(&mut tags, tag);
            }
        }
        Some(Value::Sequence(items)) => {
            for item in items {
                if let Some(tag) = scalar_text(item) {
                    push_tag(&mut tags, &tag);
                }
            }
        }
        _ => {}
    }
    tags
}

fn push_tag(tags: &mut Vec<String>, raw: &str) {
    let tag = raw.trim().trim_start_matches('#').trim_end_matches('/');
    if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
        tags.push(tag.to_string());
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some(String::new()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Tagged(tagged) => scalar_text(&tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

/// Scalars become text and sequences of scalars become lists. Nested
/// mappings have no query syntax and are dropped.
fn property_value(value: &Value) -> Option<PropertyValue> {
    match value {
        Value::Sequence(items) => {
            Some(PropertyValue::List(items.iter().filter_map(scalar_text).collect()))
        }
        Value::Tagged(tagged) => property_value(&tagged.value),
        other => scalar_text(other).map(PropertyValue::Text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_properties_from_frontmatter() {
        let content = "---\nstatus: In Progress\npriority: 2\ndone: false\n\
                       authors: [Ann, Bo]\nempty:\nnested:\n  a: 1\n---\nBody";
        let note = record_from_content("a.md", content);

        assert_eq!(note.property("status"), Some(&"In Progress".into()));
        assert_eq!(note.property("priority"), Some(&"2".into()));
        assert_eq!(note.property("done"), Some(&"false".into()));
        assert_eq!(note.property("authors"), Some(&vec!["Ann", "Bo"].into()));
        assert_eq!(note.property("empty"), Some(&"".into()));
        assert_eq!(note.property("nested"), None);
    }

    #[test]
    fn test_tags_from_frontmatter_and_body() {
        let content = "---\ntags: [work/meetings, \"#Weekly\"]\n---\n\
                       # Heading\nNotes for #project/alpha and #work/meetings.\n\
                       Not a tag: issue#12, #2026, `#code`\n";
        let note = record_from_content("a.md", content);

        assert_eq!(note.tags, vec!["work/meetings", "Weekly", "project/alpha"]);
    }

    #[test]
    fn test_string_tags_field() {
        let note = record_from_content("a.md", "---\ntags: alpha, beta gamma\n---\n");
        assert_eq!(note.tags, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_fenced_code_is_ignored() {
        let content = "```\n#not-a-tag\n- [ ] not a task\n```\n- [x] done\n";
        let note = record_from_content("a.md", content);
        assert!(note.tags.is_empty());
        assert!(!note.has_incomplete_task);
    }

    #[test]
    fn test_open_tasks() {
        for line in ["- [ ] todo", "  * [ ] nested", "1. [ ] numbered", "+ [ ] plus"] {
            assert!(record_from_content("a.md", line).has_incomplete_task, "{line}");
        }
        for line in ["- [x] done", "[ ] no bullet", "- [] empty"] {
            assert!(!record_from_content("a.md", line).has_incomplete_task, "{line}");
        }
    }

    #[test]
    fn test_invalid_frontmatter_keeps_body() {
        let content = "---\n: [unclosed\n---\n#inbox\n- [ ] triage\n";
        let note = record_from_content("inbox.md", content);
        assert!(note.properties.is_empty());
        assert_eq!(note.tags, vec!["inbox"]);
        assert!(note.has_incomplete_task);
    }
}
