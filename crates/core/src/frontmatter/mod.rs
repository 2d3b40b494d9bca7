//! YAML frontmatter splitting and parsing.

pub mod parser;
pub mod types;

pub use parser::{FrontmatterParseError, parse, split};
pub use types::{Frontmatter, ParsedDocument};
