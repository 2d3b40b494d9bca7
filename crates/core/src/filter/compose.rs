//! Building new query strings from UI actions.
//!
//! Actions like "add tag with AND" never edit a parsed tree; they produce a
//! new raw string that is submitted like any typed input.

use super::parser::{QueryKind, classify};
use super::token::{Connector, Token, TokenKind, tokenize};

/// Append `clause` to `raw` with `op`.
///
/// The operator is appended as written, without grouping: adding `#c` with
/// `AND` to `#a OR #b` yields `#a OR #b AND #c`, which reads as
/// `#a OR (#b AND #c)` because `AND` binds tighter.
///
/// Returns `None` when the combination cannot be expressed:
/// - `OR` only has operator meaning when both the existing query and the
///   clause are pure tag/property queries;
/// - `AND` with a non-pure side would turn the operators of a pure side into
///   literal filename text.
pub fn append_clause(raw: &str, clause: &str, op: Connector) -> Option<String> {
    let raw = raw.trim();
    let clause = clause.trim();

    if clause.is_empty() {
        return Some(raw.to_string());
    }
    if raw.is_empty() {
        return Some(clause.to_string());
    }

    let raw_tokens = tokenize(raw);
    let clause_tokens = tokenize(clause);
    let raw_kind = classify(&raw_tokens);
    let clause_kind = classify(&clause_tokens);
    let both_pure = raw_kind == QueryKind::Pure && clause_kind == QueryKind::Pure;

    match op {
        Connector::And if both_pure => Some(format!("{raw} AND {clause}")),
        Connector::And
            if has_operators(raw_kind, &raw_tokens)
                || has_operators(clause_kind, &clause_tokens) =>
        {
            None
        }
        Connector::And => Some(format!("{raw} {clause}")),
        Connector::Or if both_pure => Some(format!("{raw} OR {clause}")),
        Connector::Or => None,
    }
}

/// A pure query whose connectors act as operators.
fn has_operators(kind: QueryKind, tokens: &[Token]) -> bool {
    kind == QueryKind::Pure
        && tokens.iter().any(|t| matches!(t.kind, TokenKind::Connector(_)))
}
