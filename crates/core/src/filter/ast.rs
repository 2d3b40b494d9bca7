//! Query syntax tree.

use std::fmt;

use super::date::{DateField, DateRange};
use super::token::{Connector, TokenKind, segment_kind};

/// A parsed query node. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Case-insensitive substring of the filename.
    Name { text: String, negated: bool },
    /// Hierarchical tag path; `None` is the bare `#` (note has any tag).
    Tag { path: Option<String>, negated: bool },
    /// Property presence (`value == None`) or exact value.
    Property { key: String, value: Option<String>, negated: bool },
    /// Note has at least one unchecked task.
    Task { negated: bool },
    /// Folder by segment (`rooted == false`) or exact vault path.
    Folder { path: String, rooted: bool, negated: bool },
    /// File extension without the dot, lowercased.
    Extension { ext: String, negated: bool },
    /// Timestamp inside an inclusive range. `expr` keeps the source text
    /// (after `@`) for rendering.
    Date { field: DateField, range: DateRange, expr: String, negated: bool },
    /// Explicit operator, only built for pure tag/property queries.
    Connector { op: Connector, left: Box<Node>, right: Box<Node> },
    /// Implicit AND of all terms.
    Conjunction(Vec<Node>),
}

impl Node {
    /// The query that matches everything.
    pub fn empty() -> Self {
        Self::Conjunction(Vec::new())
    }

    pub fn connector(op: Connector, left: Node, right: Node) -> Self {
        Self::Connector { op, left: Box::new(left), right: Box::new(right) }
    }

    pub fn tag(path: &str) -> Self {
        Self::Tag { path: Some(path.to_string()), negated: false }
    }

    pub fn name(text: &str) -> Self {
        Self::Name { text: text.to_string(), negated: false }
    }

    /// Whether this is the empty conjunction.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Conjunction(terms) if terms.is_empty())
    }

    /// Whether a date range in the tree runs up to the parse instant (`@A..`).
    pub fn has_open_end(&self) -> bool {
        match self {
            Self::Date { expr, .. } => expr.trim_end().ends_with(".."),
            Self::Connector { left, right, .. } => left.has_open_end() || right.has_open_end(),
            Self::Conjunction(terms) => terms.iter().any(Node::has_open_end),
            _ => false,
        }
    }

    /// Number of leaf terms in the tree.
    pub fn term_count(&self) -> usize {
        match self {
            Self::Connector { left, right, .. } => left.term_count() + right.term_count(),
            Self::Conjunction(terms) => terms.iter().map(Node::term_count).sum(),
            _ => 1,
        }
    }
}

/// Renders a query string that parses back to an equivalent tree.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name { text, negated } => {
                write!(f, "{}{}", neg(*negated), quote_name(text))
            }
            Self::Tag { path, negated } => {
                write!(f, "{}#{}", neg(*negated), path.as_deref().unwrap_or(""))
            }
            Self::Property { key, value, negated } => {
                write!(f, "{}.{}", neg(*negated), quote_if_needed(key, true))?;
                if let Some(value) = value {
                    write!(f, "={}", quote_if_needed(value, false))?;
                }
                Ok(())
            }
            Self::Task { negated } => write!(f, "{}has:task", neg(*negated)),
            Self::Folder { path, rooted, negated } => {
                let root = if *rooted { "/" } else { "" };
                write!(f, "{}folder:{root}{}", neg(*negated), quote_if_needed(path, false))
            }
            Self::Extension { ext, negated } => write!(f, "{}ext:{ext}", neg(*negated)),
            Self::Date { expr, negated, .. } => write!(f, "{}@{expr}", neg(*negated)),
            Self::Connector { op, left, right } => write!(f, "{left} {op} {right}"),
            Self::Conjunction(terms) => {
                for (i, term) in terms.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{term}")?;
                }
                Ok(())
            }
        }
    }
}

fn neg(negated: bool) -> &'static str {
    if negated { "-" } else { "" }
}

/// Quote a name that would otherwise read back as a filter, an operator or
/// a negation.
fn quote_name(text: &str) -> String {
    let literal = segment_kind(text) == TokenKind::Name
        && !(text.len() > 1 && text.starts_with('-'))
        && !text.chars().any(char::is_whitespace);
    if literal { text.to_string() } else { format!("\"{text}\"") }
}

fn quote_if_needed(text: &str, is_key: bool) -> String {
    let needs_quotes =
        text.chars().any(char::is_whitespace) || (is_key && text.contains('='));
    if needs_quotes { format!("\"{text}\"") } else { text.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    #[test]
    fn test_display_leaves() {
        assert_eq!(Node::tag("work/meetings").to_string(), "#work/meetings");
        assert_eq!(Node::Tag { path: None, negated: true }.to_string(), "-#");
        assert_eq!(
            Node::Property {
                key: "Reading Status".into(),
                value: Some("In Progress".into()),
                negated: false,
            }
            .to_string(),
            r#"."Reading Status"="In Progress""#
        );
        assert_eq!(
            Node::Folder { path: String::new(), rooted: true, negated: false }.to_string(),
            "folder:/"
        );
        assert_eq!(
            Node::Extension { ext: "md".into(), negated: true }.to_string(),
            "-ext:md"
        );
    }

    #[test]
    fn test_display_quotes_names_that_look_like_syntax() {
        assert_eq!(Node::name("#a").to_string(), "\"#a\"");
        assert_eq!(Node::name("OR").to_string(), r#""OR""#);
        assert_eq!(Node::name("@someday").to_string(), r#""@someday""#);
        assert_eq!(Node::name("has:task").to_string(), r#""has:task""#);
        assert_eq!(Node::name("-x").to_string(), r#""-x""#);
        assert_eq!(Node::name("weekly review").to_string(), r#""weekly review""#);
        assert_eq!(Node::name("ext:").to_string(), "ext:");
        assert_eq!(Node::name("plan").to_string(), "plan");
        assert_eq!(Node::Name { text: "draft".into(), negated: true }.to_string(), "-draft");
    }

    #[test]
    fn test_term_count() {
        let tree = Node::connector(
            Connector::Or,
            Node::tag("a"),
            Node::Conjunction(vec![Node::tag("b"), Node::name("c")]),
        );
        assert_eq!(tree.term_count(), 3);
        assert_eq!(Node::empty().term_count(), 0);
        assert!(Node::empty().is_empty());
    }

    #[test]
    fn test_has_open_end() {
        let date = |expr: &str| Node::Date {
            field: DateField::Modified,
            range: DateRange { start: DateTime::<Utc>::MIN_UTC, end: DateTime::<Utc>::MAX_UTC },
            expr: expr.to_string(),
            negated: false,
        };
        assert!(date("c:2026-02-01..").has_open_end());
        assert!(Node::Conjunction(vec![Node::tag("a"), date("2026-01.. ")]).has_open_end());
        assert!(!date("..2026-02").has_open_end());
        assert!(!date("2026-02-01..2026-02-10").has_open_end());
        assert!(!Node::connector(Connector::Or, Node::tag("a"), date("today")).has_open_end());
    }
}
