#![deny(clippy::all)]
#![allow(clippy::module_name_repetitions)]

//! Core library for notesieve: the filter-search query language over a
//! markdown note collection, plus the vault scanner and configuration that
//! feed it.

pub mod config;
pub mod filter;
pub mod frontmatter;
pub mod note;
pub mod vault;

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
