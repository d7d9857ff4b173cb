// LogKeep - core/filter.rs
//
// Filter engine for parsed entries. All active criteria are AND-combined.
// Core layer: pure logic, no I/O.
//
// Malformed filter input never errors: a date bound that does not parse is
// not applied. An entry whose timestamp cannot be judged is dropped whenever a
// bound was supplied, even if that bound itself did not parse.

use crate::core::model::LogEntry;
use crate::util::constants;
use chrono::{NaiveDate, NaiveDateTime};

// =============================================================================
// Date range
// =============================================================================

/// Inclusive calendar-day window `[from 00:00:00, to 23:59:59]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    /// A non-blank bound was given, whether or not it parsed.
    pub supplied: bool,
}

impl DateRange {
    /// Build a range from raw `YYYY-MM-DD` strings. Blank bounds are absent;
    /// unparsable bounds are dropped but still mark the range as supplied.
    pub fn parse(from: Option<&str>, to: Option<&str>) -> Self {
        let supplied = [from, to]
            .into_iter()
            .flatten()
            .any(|raw| !raw.trim().is_empty());
        Self {
            from: from.and_then(|s| parse_bound(s, "from")),
            to: to.and_then(|s| parse_bound(s, "to")),
            supplied,
        }
    }

    /// True when no bound was supplied at all.
    pub fn is_unbounded(&self) -> bool {
        !self.supplied && self.from.is_none() && self.to.is_none()
    }

    /// Whether a canonical display timestamp falls inside the range.
    /// Unparsable timestamps never match once any bound was supplied.
    pub fn contains(&self, display_timestamp: &str) -> bool {
        if self.is_unbounded() {
            return true;
        }
        let Ok(ts) =
            NaiveDateTime::parse_from_str(display_timestamp, constants::DISPLAY_TIMESTAMP_FORMAT)
        else {
            return false;
        };

        if let Some(start) = self.from.and_then(|d| d.and_hms_opt(0, 0, 0)) {
            if ts < start {
                return false;
            }
        }
        if let Some(end) = self.to.and_then(|d| d.and_hms_opt(23, 59, 59)) {
            if ts > end {
                return false;
            }
        }
        true
    }
}

fn parse_bound(raw: &str, side: &'static str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match NaiveDate::parse_from_str(trimmed, constants::DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(e) => {
            tracing::debug!(side, value = trimmed, error = %e, "Ignoring unparsable date bound");
            None
        }
    }
}

// =============================================================================
// Filter state
// =============================================================================

/// Complete filter state. All fields are AND-combined when applied.
#[derive(Debug, Clone, Default)]
pub struct FilterState {
    /// Inclusive date window. Unbounded = no date filter.
    pub date_range: DateRange,

    /// Exact level to keep (compared case-insensitively). None = all levels.
    pub level: Option<String>,

    /// Exact substring the message must contain. Empty = no text filter.
    pub text_search: String,
}

impl FilterState {
    /// Filter by date range only.
    pub fn by_date(date_range: DateRange) -> Self {
        Self {
            date_range,
            ..Default::default()
        }
    }

    /// Returns true if no filters are active.
    pub fn is_empty(&self) -> bool {
        self.date_range.is_unbounded() && self.level.is_none() && self.text_search.is_empty()
    }
}

/// Apply `filter` to `entries`, preserving order.
///
/// Takes ownership so that the common unfiltered case hands the same vector
/// straight back without copying.
pub fn apply_filters(entries: Vec<LogEntry>, filter: &FilterState) -> Vec<LogEntry> {
    if filter.is_empty() {
        return entries;
    }

    let level = filter.level.as_deref().map(str::to_lowercase);
    let before = entries.len();

    let kept: Vec<LogEntry> = entries
        .into_iter()
        .filter(|entry| matches_all(entry, filter, level.as_deref()))
        .collect();

    tracing::debug!(before, after = kept.len(), "Filters applied");
    kept
}

/// Check if a single entry matches all active filters.
fn matches_all(entry: &LogEntry, filter: &FilterState, level: Option<&str>) -> bool {
    if let Some(level) = level {
        if entry.level != level {
            return false;
        }
    }

    if !filter.text_search.is_empty() && !entry.message.contains(&filter.text_search) {
        return false;
    }

    filter.date_range.contains(&entry.timestamp)
}
