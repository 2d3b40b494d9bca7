//! Query tokenizer.
//!
//! Splits a raw search string on whitespace, keeping double-quoted segments
//! together, and tags each segment with the filter form it looks like. The
//! tokenizer never fails: an unterminated quote simply runs to the end of
//! the input, and anything unrecognised becomes a [`TokenKind::Name`].

use std::fmt;

/// Boolean operator between two pure-query terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Connector {
    And,
    Or,
}

impl Connector {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

impl fmt::Display for Connector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a token looks like, before the parser interprets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Plain text matched against the filename.
    Name,
    /// `#tag/path`, or a bare `#`.
    Tag,
    /// `.key` or `.key=value`.
    Property,
    /// `@expr`, optionally `@c:expr` / `@m:expr`.
    Date,
    /// `has:task`.
    Task,
    /// `folder:name` or `folder:/exact/path`.
    Folder,
    /// `ext:md` or `ext:.md`.
    Extension,
    /// Uppercase `AND` / `OR`.
    Connector(Connector),
    /// A `-` attached to the following token.
    Negation,
}

/// One lexical unit of a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Raw segment text, quotes retained, negation marker excluded.
    pub text: String,
    /// Byte offset of the first character in the raw query.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
}

impl Token {
    fn new(kind: TokenKind, text: &str, start: usize) -> Self {
        Self { kind, text: text.to_string(), start, end: start + text.len() }
    }

    /// True for tokens that are neither connectors nor negation markers.
    pub fn is_term(&self) -> bool {
        !matches!(self.kind, TokenKind::Connector(_) | TokenKind::Negation)
    }
}

/// Split `raw` into tokens.
pub fn tokenize(raw: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    for (start, segment) in segments(raw) {
        push_segment(&mut tokens, segment, start);
    }
    tokens
}

/// Whitespace-separated segments with their byte offsets, quote aware.
fn segments(raw: &str) -> Vec<(usize, &str)> {
    let mut out = Vec::new();
    let mut seg_start: Option<usize> = None;
    let mut in_quotes = false;

    for (i, ch) in raw.char_indices() {
        if ch == '"' {
            in_quotes = !in_quotes;
            seg_start.get_or_insert(i);
        } else if ch.is_whitespace() && !in_quotes {
            if let Some(start) = seg_start.take() {
                out.push((start, &raw[start..i]));
            }
        } else {
            seg_start.get_or_insert(i);
        }
    }

    if let Some(start) = seg_start {
        out.push((start, &raw[start..]));
    }
    out
}

fn push_segment(tokens: &mut Vec<Token>, segment: &str, start: usize) {
    if let Some(rest) = segment.strip_prefix('-')
        && !rest.is_empty()
    {
        tokens.push(Token::new(TokenKind::Negation, "-", start));
        let kind = match segment_kind(rest) {
            // A negated connector is just the word.
            TokenKind::Connector(_) => TokenKind::Name,
            kind => kind,
        };
        tokens.push(Token::new(kind, rest, start + 1));
        return;
    }

    tokens.push(Token::new(segment_kind(segment), segment, start));
}

/// Kind of an unquoted, unnegated segment.
pub(crate) fn segment_kind(segment: &str) -> TokenKind {
    match segment {
        "AND" => return TokenKind::Connector(Connector::And),
        "OR" => return TokenKind::Connector(Connector::Or),
        _ => {}
    }

    if segment.starts_with('#') {
        return TokenKind::Tag;
    }
    if segment.len() > 1 && segment.starts_with('.') {
        return TokenKind::Property;
    }
    if segment.len() > 1 && segment.starts_with('@') {
        return TokenKind::Date;
    }
    if segment.eq_ignore_ascii_case("has:task") {
        return TokenKind::Task;
    }
    if strip_prefix_ci(segment, "folder:").is_some_and(|v| !v.is_empty()) {
        return TokenKind::Folder;
    }
    if strip_prefix_ci(segment, "ext:").is_some_and(|v| !v.is_empty()) {
        return TokenKind::Extension;
    }
    TokenKind::Name
}

/// Strip an ASCII prefix, ignoring case.
pub(crate) fn strip_prefix_ci<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    if s.len() >= prefix.len()
        && s.is_char_boundary(prefix.len())
        && s[..prefix.len()].eq_ignore_ascii_case(prefix)
    {
        Some(&s[prefix.len()..])
    } else {
        None
    }
}

/// Remove the double quotes of a segment. An unmatched quote is dropped too.
pub fn unquote(text: &str) -> String {
    text.chars().filter(|&c| c != '"').collect()
}

/// Split at the first `sep` that is not inside double quotes.
pub fn split_unquoted(text: &str, sep: char) -> Option<(&str, &str)> {
    let mut in_quotes = false;
    for (i, ch) in text.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == sep && !in_quotes => {
                return Some((&text[..i], &text[i + sep.len_utf8()..]));
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(raw: &str) -> Vec<TokenKind> {
        tokenize(raw).into_iter().map(|t| t.kind).collect()
    }

    fn texts(raw: &str) -> Vec<String> {
        tokenize(raw).into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn test_empty_and_whitespace() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \t ").is_empty());
    }

    #[test]
    fn test_sigils() {
        assert_eq!(
            kinds("#work .status @today has:task folder:x ext:md plain"),
            vec![
                TokenKind::Tag,
                TokenKind::Property,
                TokenKind::Date,
                TokenKind::Task,
                TokenKind::Folder,
                TokenKind::Extension,
                TokenKind::Name,
            ]
        );
    }

    #[test]
    fn test_bare_sigils() {
        assert_eq!(kinds("#"), vec![TokenKind::Tag]);
        assert_eq!(kinds("."), vec![TokenKind::Name]);
        assert_eq!(kinds("@"), vec![TokenKind::Name]);
        assert_eq!(kinds("folder:"), vec![TokenKind::Name]);
        assert_eq!(kinds("ext:"), vec![TokenKind::Name]);
    }

    #[test]
    fn test_connectors_are_uppercase_only() {
        assert_eq!(
            kinds("AND OR and or"),
            vec![
                TokenKind::Connector(Connector::And),
                TokenKind::Connector(Connector::Or),
                TokenKind::Name,
                TokenKind::Name,
            ]
        );
    }

    #[test]
    fn test_negation_emits_marker() {
        let tokens = tokenize("-#draft");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind, TokenKind::Negation);
        assert_eq!((tokens[0].start, tokens[0].end), (0, 1));
        assert_eq!(tokens[1].kind, TokenKind::Tag);
        assert_eq!(tokens[1].text, "#draft");
        assert_eq!((tokens[1].start, tokens[1].end), (1, 7));
    }

    #[test]
    fn test_lone_dash_is_name() {
        assert_eq!(kinds("-"), vec![TokenKind::Name]);
        assert_eq!(kinds("a - b"), vec![TokenKind::Name; 3]);
    }

    #[test]
    fn test_negated_connector_is_name() {
        assert_eq!(kinds("-AND"), vec![TokenKind::Negation, TokenKind::Name]);
    }

    #[test]
    fn test_spaced_dash_does_not_negate() {
        assert_eq!(kinds("- #a"), vec![TokenKind::Name, TokenKind::Tag]);
    }

    #[test]
    fn test_quoted_property_keeps_spaces() {
        let tokens = tokenize(r#"."Reading Status"="In Progress" next"#);
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind, TokenKind::Property);
        assert_eq!(tokens[0].text, r#"."Reading Status"="In Progress""#);
        assert_eq!(tokens[1].text, "next");
    }

    #[test]
    fn test_unquoted_property_splits() {
        assert_eq!(
            texts(".Reading Status=In Progress"),
            vec![".Reading", "Status=In", "Progress"]
        );
    }

    #[test]
    fn test_unterminated_quote_runs_to_end() {
        let tokens = tokenize(r#"a "b c  d"#);
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].text, r#""b c  d"#);
        assert_eq!(tokens[1].end, 9);
    }

    #[test]
    fn test_offsets_are_byte_positions() {
        let raw = "  héllo   #tag";
        let tokens = tokenize(raw);
        assert_eq!(&raw[tokens[0].start..tokens[0].end], "héllo");
        assert_eq!(&raw[tokens[1].start..tokens[1].end], "#tag");
    }

    #[test]
    fn test_prefixes_ignore_case() {
        assert_eq!(kinds("HAS:TASK Folder:x EXT:md"), vec![
            TokenKind::Task,
            TokenKind::Folder,
            TokenKind::Extension,
        ]);
    }

    #[test]
    fn test_split_unquoted() {
        assert_eq!(split_unquoted(r#""a=b"=c"#, '='), Some((r#""a=b""#, "c")));
        assert_eq!(split_unquoted("key", '='), None);
        assert_eq!(split_unquoted("k=v=w", '='), Some(("k", "v=w")));
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote(r#""In Progress""#), "In Progress");
        assert_eq!(unquote(r#""open"#), "open");
    }
}
