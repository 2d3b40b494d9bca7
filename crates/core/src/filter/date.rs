//! Date filter resolution.
//!
//! Turns the text of an `@` token into a concrete, inclusive time range.
//! Supports:
//! - `today`, `yesterday`, `last7d`, `last30d`, `thisweek`, `thismonth`
//! - `2026-02-13`, `20260213`
//! - `2026`, `2026-02`, `202602`, `2026-W07`, `2026W07`, `2026-Q1`, `2026Q1`
//! - `13/02/2026`, `02.13.2026` (ambiguous day/month follows [`DateOrder`])
//! - ranges `A..B`, `A..`, `..B`
//! - a `c:` or `m:` prefix selecting the created or modified timestamp
//!
//! Calendar arithmetic happens in the time zone of the supplied `now`; the
//! resulting boundaries are converted to UTC instants.

use std::sync::LazyLock;

use chrono::{
    DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
    Weekday,
};
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

use super::token::strip_prefix_ci;

/// Error raised while resolving a date expression.
///
/// Never leaves the filter core: the parser turns it into a name term.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateError {
    #[error("empty date expression")]
    Empty,

    #[error("unrecognised date expression: {0}")]
    Unrecognized(String),

    #[error("invalid calendar date: {0}")]
    InvalidDate(String),

    #[error("range start is after its end: {0}")]
    InvertedRange(String),
}

/// Which note timestamp a date filter applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateField {
    #[serde(alias = "c")]
    Created,
    #[default]
    #[serde(alias = "m")]
    Modified,
}

impl DateField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Modified => "modified",
        }
    }

    /// Prefix used inside an `@` token.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Created => "c:",
            Self::Modified => "m:",
        }
    }
}

/// How to read an ambiguous numeric date such as `03/04/2026`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateOrder {
    /// `03/04/2026` is the 3rd of April.
    #[default]
    #[serde(alias = "dmy")]
    DayFirst,
    /// `03/04/2026` is March 4th.
    #[serde(alias = "mdy")]
    MonthFirst,
}

/// Locale-dependent knobs for date resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateOptions {
    pub order: DateOrder,
    /// First day of the week for `thisweek`.
    pub week_start: Weekday,
    /// Field used when the token has no `c:`/`m:` prefix.
    pub default_field: DateField,
}

impl Default for DateOptions {
    fn default() -> Self {
        Self {
            order: DateOrder::default(),
            week_start: Weekday::Mon,
            default_field: DateField::default(),
        }
    }
}

/// Inclusive range of instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn contains(&self, instant: &DateTime<Utc>) -> bool {
        self.start <= *instant && *instant <= self.end
    }

    /// Whether the range has no lower bound.
    pub fn is_open_start(&self) -> bool {
        self.start == DateTime::<Utc>::MIN_UTC
    }
}

static COMPACT_DAY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})(\d{2})(\d{2})$").unwrap());

static YEAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d{4})$").unwrap());

static MONTH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-?(\d{2})$").unwrap());

static WEEK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-?w(\d{1,2})$").unwrap());

static QUARTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-?q(\d)$").unwrap());

// Day/month/year with `/`, `.` or `-` between the parts.
static SEPARATED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,4})[/.\-](\d{1,2})[/.\-](\d{1,4})$").unwrap()
});

/// Resolve a date token, returning `None` when it is not a valid date.
///
/// `text` may include the leading `@`.
pub fn resolve_date<Tz: TimeZone>(
    text: &str,
    now: &DateTime<Tz>,
    options: &DateOptions,
) -> Option<(DateField, DateRange)> {
    match parse_date_filter(text, now, options) {
        Ok(resolved) => Some(resolved),
        Err(e) => {
            tracing::trace!("date token {text:?} falls back to text: {e}");
            None
        }
    }
}

/// Resolve a date token into the field it targets and its range.
pub fn parse_date_filter<Tz: TimeZone>(
    text: &str,
    now: &DateTime<Tz>,
    options: &DateOptions,
) -> Result<(DateField, DateRange), DateError> {
    let text = text.strip_prefix('@').unwrap_or(text).trim();

    let (field, expr) = if let Some(rest) = strip_prefix_ci(text, "c:") {
        (DateField::Created, rest)
    } else if let Some(rest) = strip_prefix_ci(text, "m:") {
        (DateField::Modified, rest)
    } else {
        (options.default_field, text)
    };

    let range = resolve_range(expr.trim(), now, options)?;
    Ok((field, range))
}

fn resolve_range<Tz: TimeZone>(
    expr: &str,
    now: &DateTime<Tz>,
    options: &DateOptions,
) -> Result<DateRange, DateError> {
    if expr.is_empty() {
        return Err(DateError::Empty);
    }

    let Some((from, to)) = expr.split_once("..") else {
        return resolve_span(expr, now, options);
    };

    let (from, to) = (from.trim(), to.trim());
    if from.is_empty() && to.is_empty() {
        return Err(DateError::Empty);
    }

    let start = if from.is_empty() {
        DateTime::<Utc>::MIN_UTC
    } else {
        resolve_span(from, now, options)?.start
    };
    let end = if to.is_empty() {
        now.with_timezone(&Utc)
    } else {
        resolve_span(to, now, options)?.end
    };

    if start > end {
        return Err(DateError::InvertedRange(expr.to_string()));
    }
    Ok(DateRange { start, end })
}

/// Resolve a single (non-range) expression to whole local days.
fn resolve_span<Tz: TimeZone>(
    expr: &str,
    now: &DateTime<Tz>,
    options: &DateOptions,
) -> Result<DateRange, DateError> {
    let (first, last) = resolve_days(expr, now.date_naive(), options)?;
    let tz = now.timezone();
    Ok(DateRange { start: start_of_day(&tz, first), end: end_of_day(&tz, last) })
}

/// Resolve an expression to its first and last calendar day.
pub fn resolve_days(
    expr: &str,
    today: NaiveDate,
    options: &DateOptions,
) -> Result<(NaiveDate, NaiveDate), DateError> {
    let expr = expr.to_ascii_lowercase();

    match expr.as_str() {
        "today" => return Ok((today, today)),
        "yesterday" => {
            let day = today - Duration::days(1);
            return Ok((day, day));
        }
        "last7d" => return Ok((today - Duration::days(6), today)),
        "last30d" => return Ok((today - Duration::days(29), today)),
        "thisweek" => {
            let back = (today.weekday().num_days_from_monday() + 7
                - options.week_start.num_days_from_monday())
                % 7;
            let first = today - Duration::days(i64::from(back));
            return Ok((first, first + Duration::days(6)));
        }
        "thismonth" => return month_bounds(today.year(), today.month(), &expr),
        _ => {}
    }

    if let Some(caps) = COMPACT_DAY_RE.captures(&expr) {
        let day = ymd(num(&caps[1]) as i32, num(&caps[2]), num(&caps[3]), &expr)?;
        return Ok((day, day));
    }

    if let Some(caps) = YEAR_RE.captures(&expr) {
        let year = num(&caps[1]) as i32;
        let first = ymd(year, 1, 1, &expr)?;
        let last = ymd(year, 12, 31, &expr)?;
        return Ok((first, last));
    }

    if let Some(caps) = MONTH_RE.captures(&expr) {
        return month_bounds(num(&caps[1]) as i32, num(&caps[2]), &expr);
    }

    if let Some(caps) = WEEK_RE.captures(&expr) {
        let first =
            NaiveDate::from_isoywd_opt(num(&caps[1]) as i32, num(&caps[2]), Weekday::Mon)
                .ok_or_else(|| DateError::InvalidDate(expr.clone()))?;
        return Ok((first, first + Duration::days(6)));
    }

    if let Some(caps) = QUARTER_RE.captures(&expr) {
        let quarter = num(&caps[2]);
        let year = num(&caps[1]) as i32;
        if !(1..=4).contains(&quarter) {
            return Err(DateError::InvalidDate(expr.clone()));
        }
        let first_month = (quarter - 1) * 3 + 1;
        let (first, _) = month_bounds(year, first_month, &expr)?;
        let (_, last) = month_bounds(year, first_month + 2, &expr)?;
        return Ok((first, last));
    }

    if let Some(caps) = SEPARATED_RE.captures(&expr) {
        let day = separated_date(&caps[1], &caps[2], &caps[3], options.order, &expr)?;
        return Ok((day, day));
    }

    Err(DateError::Unrecognized(expr))
}

fn separated_date(
    a: &str,
    b: &str,
    c: &str,
    order: DateOrder,
    expr: &str,
) -> Result<NaiveDate, DateError> {
    if a.len() == 4 {
        return ymd(num(a) as i32, num(b), num(c), expr);
    }
    if c.len() != 4 {
        return Err(DateError::Unrecognized(expr.to_string()));
    }

    let (a, b, year) = (num(a), num(b), num(c) as i32);
    let (day, month) = if a > 12 {
        (a, b)
    } else if b > 12 {
        (b, a)
    } else {
        match order {
            DateOrder::DayFirst => (a, b),
            DateOrder::MonthFirst => (b, a),
        }
    };
    ymd(year, month, day, expr)
}

fn month_bounds(
    year: i32,
    month: u32,
    expr: &str,
) -> Result<(NaiveDate, NaiveDate), DateError> {
    let first = ymd(year, month, 1, expr)?;
    let next = if month == 12 {
        ymd(year + 1, 1, 1, expr)?
    } else {
        ymd(year, month + 1, 1, expr)?
    };
    let last = next.pred_opt().ok_or_else(|| DateError::InvalidDate(expr.to_string()))?;
    Ok((first, last))
}

fn ymd(year: i32, month: u32, day: u32, expr: &str) -> Result<NaiveDate, DateError> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| DateError::InvalidDate(expr.to_string()))
}

// Regex groups are bounded to a few ASCII digits.
fn num(digits: &str) -> u32 {
    digits.parse().unwrap_or(0)
}

/// Midnight at the start of `date` in `tz`.
pub fn start_of_day<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Utc> {
    local_instant(tz, date.and_time(NaiveTime::MIN))
}

/// Last millisecond of `date` in `tz` (23:59:59.999 on ordinary days).
pub fn end_of_day<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Utc> {
    match date.succ_opt() {
        Some(next) => start_of_day(tz, next) - Duration::milliseconds(1),
        None => DateTime::<Utc>::MAX_UTC,
    }
}

// Ambiguous wall times take the earlier instant; skipped ones read as UTC.
fn local_instant<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> DateTime<Utc> {
    tz.from_local_datetime(&naive)
        .earliest()
        .unwrap_or_else(|| tz.from_utc_datetime(&naive))
        .with_timezone(&Utc)
}
