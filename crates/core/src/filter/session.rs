//! Query session: parse caching, scoping and provider routing.

use std::collections::HashSet;

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};

use super::ast::Node;
use super::date::DateOptions;
use super::parser::{ParseContext, Query, parse_query};
use crate::note::{MetadataIndex, NoteRecord};

/// Settings shared by every query of a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchOptions {
    pub dates: DateOptions,
}

/// The part of the vault the caller is currently browsing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SearchScope {
    /// Whole vault.
    #[default]
    All,
    /// Notes directly inside this vault folder (`""` or `/` for the root).
    Folder(String),
    /// Notes carrying this tag or one of its descendants.
    Tag(String),
}

impl SearchScope {
    /// The filter node equivalent to this scope, if any.
    pub fn to_node(&self) -> Option<Node> {
        match self {
            Self::All => None,
            Self::Folder(path) => Some(Node::Folder {
                path: path.trim_matches('/').to_string(),
                rooted: true,
                negated: false,
            }),
            Self::Tag(tag) => Some(Node::tag(tag.trim_start_matches('#'))),
        }
    }
}

/// An alternate search backend. Takes the raw query and returns the
/// vault-relative paths of the notes it considers hits.
pub trait FullTextProvider {
    fn name(&self) -> &str;

    fn search(&self, raw: &str) -> Vec<String>;
}

#[derive(Debug)]
struct CacheEntry {
    query: Query,
    /// Calendar day relative dates were resolved against.
    day: NaiveDate,
    /// Instant an open range end (`@A..`) was pinned to.
    resolved_at: DateTime<Utc>,
    open_end: bool,
}

impl CacheEntry {
    fn is_fresh(&self, raw: &str, day: NaiveDate, instant: DateTime<Utc>) -> bool {
        self.query.raw == raw
            && self.day == day
            && (!self.open_end || self.resolved_at == instant)
    }
}

/// Drives query evaluation for one search field.
///
/// Keeps the last parsed query keyed by its raw text so repeated calls with
/// unchanged input skip tokenizing and parsing.
#[derive(Debug, Default)]
pub struct QuerySession {
    options: SearchOptions,
    cache: Option<CacheEntry>,
    parses: u64,
}

impl QuerySession {
    pub fn new(options: SearchOptions) -> Self {
        Self { options, cache: None, parses: 0 }
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// How many times a query string was actually parsed.
    pub fn parse_count(&self) -> u64 {
        self.parses
    }

    /// Parsed query for `raw`, resolved against the current local time.
    pub fn query(&mut self, raw: &str) -> &Query {
        self.query_at(raw, &Local::now())
    }

    /// Parsed query for `raw`, resolved against `now`.
    ///
    /// The cached entry is reused when the raw text is identical and `now`
    /// falls on the same calendar day it was resolved on. A query with an
    /// open-ended date range ends at `now`, so it is only reused for the
    /// same instant.
    pub fn query_at<Tz: TimeZone>(&mut self, raw: &str, now: &DateTime<Tz>) -> &Query {
        let day = now.date_naive();
        let instant = now.with_timezone(&Utc);

        let entry = match self.cache.take() {
            Some(entry) if entry.is_fresh(raw, day, instant) => {
                tracing::debug!("query cache hit for {raw:?}");
                entry
            }
            _ => {
                tracing::debug!("query cache miss for {raw:?}");
                let ctx = ParseContext::new(now.clone(), self.options.dates);
                self.parses += 1;
                let query = parse_query(raw, &ctx);
                let open_end = query.ast.has_open_end();
                CacheEntry { query, day, resolved_at: instant, open_end }
            }
        };

        &self.cache.insert(entry).query
    }

    /// Notes of `snapshot` matching `raw`, in snapshot order.
    pub fn filter<'a>(
        &mut self,
        raw: &str,
        snapshot: &'a [NoteRecord],
    ) -> Vec<&'a NoteRecord> {
        self.filter_at(raw, snapshot, &Local::now())
    }

    pub fn filter_at<'a, Tz: TimeZone>(
        &mut self,
        raw: &str,
        snapshot: &'a [NoteRecord],
        now: &DateTime<Tz>,
    ) -> Vec<&'a NoteRecord> {
        self.filter_scoped_at(raw, &SearchScope::All, snapshot, now)
    }

    /// Like [`filter`](Self::filter), restricted to `scope`.
    pub fn filter_scoped<'a>(
        &mut self,
        raw: &str,
        scope: &SearchScope,
        snapshot: &'a [NoteRecord],
    ) -> Vec<&'a NoteRecord> {
        self.filter_scoped_at(raw, scope, snapshot, &Local::now())
    }

    pub fn filter_scoped_at<'a, Tz: TimeZone>(
        &mut self,
        raw: &str,
        scope: &SearchScope,
        snapshot: &'a [NoteRecord],
        now: &DateTime<Tz>,
    ) -> Vec<&'a NoteRecord> {
        let scope = scope.to_node();
        let query = self.query_at(raw, now);

        snapshot
            .iter()
            .filter(|note| scope.as_ref().is_none_or(|s| s.matches(note)))
            .filter(|note| query.matches(note))
            .collect()
    }

    /// Route `raw` to an alternate provider and post-filter its hits by
    /// `scope`, keeping the index's order.
    pub fn filter_with_provider<'a>(
        &self,
        provider: &dyn FullTextProvider,
        raw: &str,
        scope: &SearchScope,
        index: &'a dyn MetadataIndex,
    ) -> Vec<&'a NoteRecord> {
        let hits: HashSet<String> = provider.search(raw).into_iter().collect();
        tracing::debug!(
            provider = provider.name(),
            hits = hits.len(),
            "alternate provider answered {raw:?}"
        );

        let scope = scope.to_node();
        index
            .records()
            .iter()
            .filter(|note| hits.contains(&note.path))
            .filter(|note| scope.as_ref().is_none_or(|s| s.matches(note)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::parser::QueryKind;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, day, hour, 0, 0).unwrap()
    }

    fn snapshot() -> Vec<NoteRecord> {
        let mut a = NoteRecord::new("work/plan.md");
        a.tags = vec!["project/alpha".into()];
        let mut b = NoteRecord::new("work/meetings/standup.md");
        b.tags = vec!["meeting".into()];
        let c = NoteRecord::new("inbox.md");
        vec![a, b, c]
    }

    #[test]
    fn test_cache_reuses_identical_input() {
        let mut session = QuerySession::default();
        session.query_at("#project", &at(13, 9));
        session.query_at("#project", &at(13, 17));
        assert_eq!(session.parse_count(), 1);

        session.query_at("#meeting", &at(13, 17));
        assert_eq!(session.parse_count(), 2);

        // Single entry: going back re-parses.
        session.query_at("#project", &at(13, 17));
        assert_eq!(session.parse_count(), 3);
    }

    #[test]
    fn test_cache_invalidates_on_new_day() {
        let mut session = QuerySession::default();
        session.query_at("@today", &at(13, 23));
        session.query_at("@today", &at(14, 1));
        assert_eq!(session.parse_count(), 2);
    }

    #[test]
    fn test_open_range_follows_the_clock() {
        let mut note = NoteRecord::new("log.md");
        note.modified_at = at(13, 12);
        let notes = vec![note];

        let mut session = QuerySession::default();
        session.query_at("@2026-02-01..", &at(13, 9));
        assert_eq!(session.filter_at("@2026-02-01..", &notes, &at(13, 17)).len(), 1);
        assert_eq!(session.parse_count(), 2);

        // Same instant: nothing to re-resolve.
        session.query_at("@2026-02-01..", &at(13, 17));
        assert_eq!(session.parse_count(), 2);
    }

    #[test]
    fn test_closed_range_is_cached_within_the_day() {
        let mut session = QuerySession::default();
        session.query_at("@2026-02-01..2026-02-10", &at(13, 9));
        session.query_at("@2026-02-01..2026-02-10", &at(13, 17));
        assert_eq!(session.parse_count(), 1);
    }

    #[test]
    fn test_filter_preserves_order() {
        let notes = snapshot();
        let mut session = QuerySession::default();

        let all: Vec<_> = session
            .filter_at("", &notes, &at(13, 9))
            .into_iter()
            .map(|n| n.path.as_str())
            .collect();
        assert_eq!(all, vec!["work/plan.md", "work/meetings/standup.md", "inbox.md"]);

        let tagged: Vec<_> = session
            .filter_at("#", &notes, &at(13, 9))
            .into_iter()
            .map(|n| n.path.as_str())
            .collect();
        assert_eq!(tagged, vec!["work/plan.md", "work/meetings/standup.md"]);
    }

    #[test]
    fn test_scope_is_exact_folder() {
        let notes = snapshot();
        let mut session = QuerySession::default();

        let hits = session.filter_scoped_at(
            "",
            &SearchScope::Folder("/work".into()),
            &notes,
            &at(13, 9),
        );
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].path, "work/plan.md");

        let hits =
            session.filter_scoped_at("", &SearchScope::Folder("/".into()), &notes, &at(13, 9));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].path, "inbox.md");
    }

    #[test]
    fn test_query_exposes_ast() {
        let mut session = QuerySession::default();
        let query = session.query_at("#a OR #b", &at(13, 9));
        assert_eq!(query.kind, QueryKind::Pure);
        assert_eq!(query.raw, "#a OR #b");
    }
}
