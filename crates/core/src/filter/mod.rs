//! Filter-search query language.
//!
//! A single free-form search string is turned into a predicate over
//! [`NoteRecord`](crate::note::NoteRecord)s:
//!
//! | syntax | meaning |
//! |--------|---------|
//! | `word` | filename contains `word` (case-insensitive) |
//! | `#tag` | note has `tag` or a descendant such as `tag/sub`; `#` alone: any tag |
//! | `.key`, `.key=value` | property present / equal (quote keys or values with spaces) |
//! | `@today`, `@c:2026-W07`, `@2026-01..` | modified (or `c:` created) date in range |
//! | `has:task` | note has an unchecked task |
//! | `folder:name`, `folder:/exact/path` | folder segment / exact folder |
//! | `ext:md` | file extension |
//! | `-term` | negate the following term |
//! | `AND`, `OR` | operators, only in tag/property-only queries |
//!
//! # Example
//!
//! ```
//! use notesieve_core::filter::{QuerySession, SearchOptions};
//! use notesieve_core::note::NoteRecord;
//!
//! let mut work = NoteRecord::new("work/plan.md");
//! work.tags = vec!["project/alpha".to_string()];
//! let notes = vec![work, NoteRecord::new("inbox.md")];
//!
//! let mut session = QuerySession::new(SearchOptions::default());
//! let hits = session.filter("#project OR #meeting", &notes);
//! assert_eq!(hits.len(), 1);
//! ```

pub mod ast;
pub mod compose;
pub mod date;
pub mod eval;
pub mod parser;
pub mod session;
pub mod token;

pub use ast::Node;
pub use compose::append_clause;
pub use date::{DateError, DateField, DateOptions, DateOrder, DateRange, resolve_date};
pub use eval::matches;
pub use parser::{ParseContext, Query, QueryKind, classify, parse, parse_query};
pub use session::{FullTextProvider, QuerySession, SearchOptions, SearchScope};
pub use token::{Connector, Token, TokenKind, tokenize};
