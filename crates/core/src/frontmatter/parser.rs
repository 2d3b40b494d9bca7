//! Frontmatter parsing from markdown documents.

use super::types::{Frontmatter, ParsedDocument};
use thiserror::Error;

/// Errors that can occur during frontmatter parsing.
#[derive(Debug, Error)]
pub enum FrontmatterParseError {
    #[error("invalid YAML frontmatter: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),
}

/// Split a document into its raw YAML block and body.
///
/// Frontmatter is delimited by `---` lines at the start of the document.
/// Without a closing delimiter the whole content is body.
pub fn split(content: &str) -> (Option<&str>, &str) {
    let trimmed = content.trim_start();
    let Some(after_open) = trimmed.strip_prefix("---") else {
        return (None, content);
    };
    if !(after_open.starts_with('\n') || after_open.starts_with("\r\n")) {
        return (None, content);
    }
    let after_open = strip_newline(after_open);

    let mut offset = 0;
    for line in after_open.split_inclusive('\n') {
        if line.trim() == "---" {
            let yaml = &after_open[..offset];
            let body = strip_newline(&after_open[offset + line.trim_end().len()..]);
            return (Some(yaml), body);
        }
        offset += line.len();
    }

    (None, content)
}

fn strip_newline(s: &str) -> &str {
    s.strip_prefix("\r\n").or_else(|| s.strip_prefix('\n')).unwrap_or(s)
}

/// Parse frontmatter from markdown content.
pub fn parse(content: &str) -> Result<ParsedDocument, FrontmatterParseError> {
    let (yaml, body) = split(content);

    let frontmatter = match yaml {
        None => None,
        Some(yaml) if yaml.trim().is_empty() => Some(Frontmatter::default()),
        Some(yaml) => Some(serde_yaml::from_str(yaml.trim())?),
    };

    Ok(ParsedDocument { frontmatter, body: body.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_no_frontmatter() {
        let content = "# Hello\n\nSome content";
        let result = parse(content).unwrap();
        assert!(result.frontmatter.is_none());
        assert_eq!(result.body, content);
    }

    #[test]
    fn parse_simple_frontmatter() {
        let content = "---\ntitle: Hello\n---\n# Content";
        let result = parse(content).unwrap();
        let fm = result.frontmatter.unwrap();
        assert_eq!(fm.get("Title").and_then(|v| v.as_str()), Some("Hello"));
        assert_eq!(result.body, "# Content");
    }

    #[test]
    fn parse_list_fields() {
        let content = "---\ntags:\n  - rust\n  - cli\n---\n\nBody";
        let result = parse(content).unwrap();
        let fm = result.frontmatter.unwrap();
        assert!(fm.get("tags").is_some_and(|v| v.is_sequence()));
        assert_eq!(result.body, "\nBody");
    }

    #[test]
    fn parse_empty_frontmatter() {
        let result = parse("---\n---\n# Content").unwrap();
        assert!(result.frontmatter.unwrap().fields.is_empty());
        assert_eq!(result.body, "# Content");
    }

    #[test]
    fn parse_crlf_document() {
        let result = parse("---\r\nstatus: open\r\n---\r\nBody").unwrap();
        let fm = result.frontmatter.unwrap();
        assert_eq!(fm.get("status").and_then(|v| v.as_str()), Some("open"));
        assert_eq!(result.body, "Body");
    }

    #[test]
    fn unclosed_frontmatter_is_body() {
        let content = "---\ntitle: x\n# No closing";
        let result = parse(content).unwrap();
        assert!(result.frontmatter.is_none());
        assert_eq!(result.body, content);
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        assert!(parse("---\n: [unclosed\n---\nBody").is_err());
    }
}
