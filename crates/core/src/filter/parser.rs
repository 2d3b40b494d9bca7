//! Query parser.
//!
//! Parsing is two-pass. The whole token stream is first classified:
//! - **pure**: only tag and property terms (plus negations and connectors);
//!   `AND`/`OR` are operators, `AND` binding tighter than `OR`, and adjacent
//!   terms are implicitly ANDed.
//! - **mixed**: anything else; every token, `AND`/`OR` included, becomes a
//!   term of one implicit conjunction.
//!
//! The second pass builds the tree under the chosen grammar. Tokens that do
//! not form a valid filter degrade to name terms, so parsing never fails.

use chrono::{DateTime, Local, TimeZone};

use super::ast::Node;
use super::date::{DateOptions, resolve_date};
use super::token::{
    Connector, Token, TokenKind, split_unquoted, strip_prefix_ci, tokenize, unquote,
};

/// Grammar chosen for a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    /// No tokens at all; matches every note.
    Empty,
    /// Tag/property boolean algebra.
    Pure,
    /// Implicit conjunction of literal terms and filters.
    Mixed,
}

impl QueryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Pure => "pure",
            Self::Mixed => "mixed",
        }
    }
}

/// Everything the parser needs besides the tokens.
#[derive(Debug, Clone)]
pub struct ParseContext<Tz: TimeZone> {
    /// Reference instant for relative dates and open range ends.
    pub now: DateTime<Tz>,
    pub dates: DateOptions,
}

impl<Tz: TimeZone> ParseContext<Tz> {
    pub fn new(now: DateTime<Tz>, dates: DateOptions) -> Self {
        Self { now, dates }
    }
}

impl ParseContext<Local> {
    /// Context anchored at the current local time.
    pub fn local(dates: DateOptions) -> Self {
        Self::new(Local::now(), dates)
    }
}

/// A parsed query, keyed by its raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub raw: String,
    pub kind: QueryKind,
    pub ast: Node,
}

impl Query {
    /// Whether `note` satisfies the query.
    pub fn matches(&self, note: &crate::note::NoteRecord) -> bool {
        self.ast.matches(note)
    }
}

/// Tokenize, classify and parse `raw`.
pub fn parse_query<Tz: TimeZone>(raw: &str, ctx: &ParseContext<Tz>) -> Query {
    let tokens = tokenize(raw);
    let kind = classify(&tokens);
    let ast = parse_as(kind, &tokens, ctx);

    tracing::debug!(
        kind = kind.as_str(),
        tokens = tokens.len(),
        terms = ast.term_count(),
        "parsed query {raw:?}"
    );

    Query { raw: raw.to_string(), kind, ast }
}

/// Decide the grammar for the whole token stream.
pub fn classify(tokens: &[Token]) -> QueryKind {
    if tokens.is_empty() {
        return QueryKind::Empty;
    }

    let mut has_operand = false;
    for token in tokens {
        match token.kind {
            TokenKind::Tag | TokenKind::Property => has_operand = true,
            TokenKind::Connector(_) | TokenKind::Negation => {}
            _ => return QueryKind::Mixed,
        }
    }

    if has_operand { QueryKind::Pure } else { QueryKind::Mixed }
}

/// Parse tokens into a tree.
pub fn parse<Tz: TimeZone>(tokens: &[Token], ctx: &ParseContext<Tz>) -> Node {
    parse_as(classify(tokens), tokens, ctx)
}

fn parse_as<Tz: TimeZone>(
    kind: QueryKind,
    tokens: &[Token],
    ctx: &ParseContext<Tz>,
) -> Node {
    match kind {
        QueryKind::Empty => Node::empty(),
        QueryKind::Pure => parse_pure(tokens, ctx),
        QueryKind::Mixed => parse_mixed(tokens, ctx),
    }
}

enum Item<'a> {
    Term { token: &'a Token, negated: bool },
    Op(Connector),
}

/// Fold negation markers into the term that follows them.
fn items(tokens: &[Token]) -> Vec<Item<'_>> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut negated = false;

    for token in tokens {
        match token.kind {
            TokenKind::Negation => negated = true,
            TokenKind::Connector(op) => {
                out.push(Item::Op(op));
                negated = false;
            }
            _ => {
                out.push(Item::Term { token, negated });
                negated = false;
            }
        }
    }
    out
}

fn parse_mixed<Tz: TimeZone>(tokens: &[Token], ctx: &ParseContext<Tz>) -> Node {
    let terms = items(tokens)
        .into_iter()
        .map(|item| match item {
            Item::Term { token, negated } => term(token, negated, ctx),
            Item::Op(op) => Node::name(op.as_str()),
        })
        .collect();
    Node::Conjunction(terms)
}

fn parse_pure<Tz: TimeZone>(tokens: &[Token], ctx: &ParseContext<Tz>) -> Node {
    // OR-separated groups; each group is a list of AND-ed operands.
    let mut groups: Vec<Vec<Node>> = Vec::new();
    let mut current: Vec<Node> = Vec::new();
    let mut pending_and = false;

    for item in items(tokens) {
        match item {
            Item::Op(Connector::Or) => {
                if !current.is_empty() {
                    groups.push(std::mem::take(&mut current));
                }
                pending_and = false;
            }
            Item::Op(Connector::And) => pending_and = !current.is_empty(),
            Item::Term { token, negated } => {
                let node = term(token, negated, ctx);
                match current.pop() {
                    Some(last) if pending_and => {
                        current.push(Node::connector(Connector::And, last, node));
                    }
                    Some(last) => {
                        current.push(last);
                        current.push(node);
                    }
                    None => current.push(node),
                }
                pending_and = false;
            }
        }
    }
    if !current.is_empty() {
        groups.push(current);
    }

    groups
        .into_iter()
        .map(|mut group| {
            if group.len() == 1 { group.remove(0) } else { Node::Conjunction(group) }
        })
        .reduce(|left, right| Node::connector(Connector::Or, left, right))
        .unwrap_or_else(Node::empty)
}

/// Build the node for one term token, degrading to a name term when the
/// token does not form a valid filter.
fn term<Tz: TimeZone>(token: &Token, negated: bool, ctx: &ParseContext<Tz>) -> Node {
    let text = token.text.as_str();
    let node = match token.kind {
        TokenKind::Name => Some(Node::Name { text: unquote(text), negated }),
        TokenKind::Tag => Some(tag(text, negated)),
        TokenKind::Property => property(text, negated),
        TokenKind::Date => date(text, negated, ctx),
        TokenKind::Task => Some(Node::Task { negated }),
        TokenKind::Folder => folder(text, negated),
        TokenKind::Extension => extension(text, negated),
        TokenKind::Connector(_) | TokenKind::Negation => None,
    };

    node.unwrap_or_else(|| {
        tracing::trace!("token {text:?} degrades to a name term");
        Node::Name { text: text.to_string(), negated }
    })
}

fn tag(text: &str, negated: bool) -> Node {
    let path = unquote(text.strip_prefix('#').unwrap_or(text));
    let path = path.trim_end_matches('/');
    let path = if path.is_empty() { None } else { Some(path.to_string()) };
    Node::Tag { path, negated }
}

fn property(text: &str, negated: bool) -> Option<Node> {
    let rest = text.strip_prefix('.')?;
    let (key, value) = match split_unquoted(rest, '=') {
        Some((key, value)) => (key, Some(value)),
        None => (rest, None),
    };

    let key = unquote(key).trim().to_string();
    if key.is_empty() {
        return None;
    }
    let value = value.map(unquote).filter(|v| !v.is_empty());
    Some(Node::Property { key, value, negated })
}

fn date<Tz: TimeZone>(text: &str, negated: bool, ctx: &ParseContext<Tz>) -> Option<Node> {
    let expr = text.strip_prefix('@')?;
    let (field, range) = resolve_date(expr, &ctx.now, &ctx.dates)?;
    Some(Node::Date { field, range, expr: expr.to_string(), negated })
}

fn folder(text: &str, negated: bool) -> Option<Node> {
    let value = unquote(strip_prefix_ci(text, "folder:")?);
    let rooted = value.starts_with('/');
    let path = value.trim_matches('/').to_string();
    if !rooted && path.is_empty() {
        return None;
    }
    Some(Node::Folder { path, rooted, negated })
}

fn extension(text: &str, negated: bool) -> Option<Node> {
    let value = unquote(strip_prefix_ci(text, "ext:")?);
    let ext = value.trim_start_matches('.').to_lowercase();
    if ext.is_empty() {
        return None;
    }
    Some(Node::Extension { ext, negated })
}
