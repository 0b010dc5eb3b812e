//! Data models for search filters and extracted results.
//!
//! This module defines the core data structures used throughout the application:
//! - [`SearchHit`]: One extracted search result (URL + position + page)
//! - [`SearchFilter`]: The high-level filters a run applies to its queries
//! - [`TimeBucket`]: Relative time windows (last hour/day/week/month/year)
//! - [`DateRange`]: An explicit date range, either endpoint open
//!
//! The time bucket and the date range are mutually exclusive; the CLI enforces
//! that only one of the two can be set for a run.

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// One extracted search result.
///
/// Hits have no identity beyond their position in the output sequence; no
/// deduplication is performed across pages.
///
/// # Fields
///
/// * `url` - The result URL, trimmed and lowercased. `None` only for records
///   that arrived without a link target; the plain-text writer renders those
///   as a literal `null`.
/// * `position` - 1-based position within the aggregated result list,
///   strictly increasing across the whole run
/// * `page` - 1-based page number the hit was found on, non-decreasing
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchHit {
    /// The result URL.
    pub url: Option<String>,
    /// 1-based position within the aggregated result list.
    pub position: usize,
    /// 1-based page number the hit was extracted from.
    pub page: usize,
}

/// Relative time window for a search query.
///
/// Engines encode the bucket into their filter string; Google uses
/// `qdr:<code>` with the single-letter codes below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TimeBucket {
    /// Last hour.
    #[value(name = "h")]
    Hour,
    /// Last day.
    #[value(name = "d")]
    Day,
    /// Last week.
    #[value(name = "w")]
    Week,
    /// Last month.
    #[value(name = "m")]
    Month,
    /// Last year.
    #[value(name = "y")]
    Year,
}

impl TimeBucket {
    /// The single-letter code engines expect for this bucket.
    pub fn code(&self) -> &'static str {
        match self {
            TimeBucket::Hour => "h",
            TimeBucket::Day => "d",
            TimeBucket::Week => "w",
            TimeBucket::Month => "m",
            TimeBucket::Year => "y",
        }
    }
}

/// An explicit publication date range, either endpoint open.
///
/// A `None` endpoint means "no bound on that side"; engines encode it as an
/// empty token rather than rejecting the range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// Earliest publication date, inclusive.
    pub start: Option<NaiveDate>,
    /// Latest publication date, inclusive.
    pub end: Option<NaiveDate>,
}

/// The high-level filters a run applies to every page request.
///
/// At most one of `time` and `range` is set (the CLI rejects the
/// combination); `sort` and `lang` compose freely with either.
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    /// Relative time window, if any.
    pub time: Option<TimeBucket>,
    /// Explicit date range, if any.
    pub range: Option<DateRange>,
    /// Sort results by recency instead of relevance.
    pub sort: bool,
    /// Language restriction (RFC 5646 subset code), if any.
    pub lang: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_bucket_codes() {
        assert_eq!(TimeBucket::Hour.code(), "h");
        assert_eq!(TimeBucket::Day.code(), "d");
        assert_eq!(TimeBucket::Week.code(), "w");
        assert_eq!(TimeBucket::Month.code(), "m");
        assert_eq!(TimeBucket::Year.code(), "y");
    }

    #[test]
    fn test_search_hit_serializes_expected_keys() {
        let hit = SearchHit {
            url: Some("https://example.com/story".to_string()),
            position: 1,
            page: 1,
        };
        let json = serde_json::to_value(&hit).unwrap();
        assert_eq!(json["url"], "https://example.com/story");
        assert_eq!(json["position"], 1);
        assert_eq!(json["page"], 1);
    }

    #[test]
    fn test_search_hit_missing_url_serializes_null() {
        let hit = SearchHit {
            url: None,
            position: 4,
            page: 2,
        };
        let json = serde_json::to_value(&hit).unwrap();
        assert!(json["url"].is_null());
    }

    #[test]
    fn test_search_filter_default_is_empty() {
        let filter = SearchFilter::default();
        assert!(filter.time.is_none());
        assert!(filter.range.is_none());
        assert!(!filter.sort);
        assert!(filter.lang.is_none());
    }
}
