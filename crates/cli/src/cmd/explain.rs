//! Explain command: show how a query is read.

use std::path::Path;

use notesieve_core::config::loader::{ConfigError, ConfigLoader};
use notesieve_core::filter::{
    Node, ParseContext, SearchOptions, Token, TokenKind, classify, parse, tokenize,
};
use tabled::{settings::Style, Table, Tabled};

use super::output::format_local;
use crate::logging;

#[derive(Tabled)]
struct TokenRow {
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Text")]
    text: String,
    #[tabled(rename = "Span")]
    span: String,
}

impl From<&Token> for TokenRow {
    fn from(token: &Token) -> Self {
        Self {
            kind: kind_label(token.kind),
            text: token.text.clone(),
            span: format!("{}..{}", token.start, token.end),
        }
    }
}

pub fn run(config: Option<&Path>, profile: Option<&str>, query: &str) {
    // Without an explicit --config a missing file just means default settings.
    let (options, _log) = match ConfigLoader::load(config, profile) {
        Ok(rc) => (rc.search_options(), Some(logging::init(&rc.logging))),
        Err(ConfigError::NotFound(_)) if config.is_none() => (SearchOptions::default(), None),
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };

    let ctx = ParseContext::local(options.dates);
    let tokens = tokenize(query);
    let kind = classify(&tokens);
    let ast = parse(&tokens, &ctx);

    println!("query: {query}");
    println!("kind:  {}", kind.as_str());

    if tokens.is_empty() {
        println!("(no tokens: matches every note)");
        return;
    }

    let rows: Vec<TokenRow> = tokens.iter().map(TokenRow::from).collect();
    println!("{}", Table::new(&rows).with(Style::rounded()));

    println!("ast:   {ast}");
    let mut tree = String::new();
    render_tree(&ast, 0, &mut tree);
    print!("{tree}");
}

fn kind_label(kind: TokenKind) -> String {
    match kind {
        TokenKind::Name => "name".into(),
        TokenKind::Tag => "tag".into(),
        TokenKind::Property => "property".into(),
        TokenKind::Date => "date".into(),
        TokenKind::Task => "task".into(),
        TokenKind::Folder => "folder".into(),
        TokenKind::Extension => "extension".into(),
        TokenKind::Connector(op) => format!("connector {op}"),
        TokenKind::Negation => "negation".into(),
    }
}

/// One node per line, children indented under their operator.
fn render_tree(node: &Node, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    match node {
        Node::Connector { op, left, right } => {
            out.push_str(&format!("{indent}{op}\n"));
            render_tree(left, depth + 1, out);
            render_tree(right, depth + 1, out);
        }
        Node::Conjunction(terms) => {
            out.push_str(&format!("{indent}ALL\n"));
            for term in terms {
                render_tree(term, depth + 1, out);
            }
        }
        Node::Date { field, range, .. } => {
            let start = if range.is_open_start() {
                "(open)".to_string()
            } else {
                format_local(&range.start)
            };
            out.push_str(&format!(
                "{indent}{node}  [{} {} .. {}]\n",
                field.as_str(),
                start,
                format_local(&range.end)
            ));
        }
        leaf => out.push_str(&format!("{indent}{leaf}\n")),
    }
}
