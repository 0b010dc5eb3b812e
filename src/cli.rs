//! Command-line interface definitions for newsgrab.
//!
//! This module defines the CLI arguments and options using the `clap` crate,
//! plus the custom value parsers that validate date ranges, log levels, and
//! language codes before any network activity happens.

use chrono::{Local, NaiveDate};
use clap::Parser;
use tracing::Level;

use crate::engines::{EngineKind, google};
use crate::models::{DateRange, SearchFilter, TimeBucket};

/// Command-line arguments for newsgrab.
///
/// # Examples
///
/// ```sh
/// # Scrape up to 3 pages of news results for a query
/// newsgrab -q "solar storm" -f results
///
/// # Last week's results, sorted by recency, as JSON
/// newsgrab -q "solar storm" -f results --time w --sort -v
///
/// # Explicit date range with an open end, through a proxy
/// newsgrab -q "solar storm" -f results --range "01/01/2023 - #" -p
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Query to search
    #[arg(short, long)]
    pub query: String,

    /// Result filename where all results will be stored (only the name
    /// without the extension)
    #[arg(short, long)]
    pub filename: String,

    /// Search engine to use
    #[arg(long, value_enum, default_value_t = EngineKind::Google)]
    pub engine: EngineKind,

    /// The maximum number of search result pages to crawl
    #[arg(short, long, default_value_t = 3)]
    pub max_pages: usize,

    /// If set, writes a JSON file with more information (like the page and
    /// position of each URL) instead of plain URLs
    #[arg(short, long)]
    pub verbose: bool,

    /// Log level (e.g. "info", "debug", "warn", "error")
    #[arg(short = 'L', long, default_value = "warn", value_parser = parse_loglevel)]
    pub loglevel: Level,

    /// Allow proxy. Environment variable PROXY_URL required
    #[arg(short, long)]
    pub proxies: bool,

    /// Time filter: "h" last hour, "d" last day, "w" last week, "m" last
    /// month, "y" last year
    #[arg(long, value_enum)]
    pub time: Option<TimeBucket>,

    /// Date range filter in the format 'DD/MM/YYYY - DD/MM/YYYY'. Either
    /// endpoint can be left open with the '#' wildcard (e.g. '# - 01/05/2024'
    /// or '01/05/2024 - #')
    #[arg(long, value_parser = parse_date_range, conflicts_with = "time")]
    pub range: Option<DateRange>,

    /// Sort results by date, showing the most recent results first
    #[arg(long)]
    pub sort: bool,

    /// Force the engine to return results only in a specific language
    /// (accepts a subset of RFC 5646 codes). The first pages tend to contain
    /// sites in the language of your location regardless
    #[arg(long, value_parser = parse_lang)]
    pub lang: Option<String>,

    /// Load secrets from a randomly chosen .env* file in ./profiles instead
    /// of the process environment
    #[arg(short, long)]
    pub rotate: bool,
}

impl Cli {
    /// Collect the filter flags into a [`SearchFilter`].
    pub fn filter(&self) -> SearchFilter {
        SearchFilter {
            time: self.time,
            range: self.range,
            sort: self.sort,
            lang: self.lang.clone(),
        }
    }
}

/// Validate a log level name against the levels `tracing` knows.
fn parse_loglevel(value: &str) -> Result<Level, String> {
    value
        .parse::<Level>()
        .map_err(|_| format!("not a valid log level: {value:?}"))
}

/// Validate a language code against the engine's supported subset.
fn parse_lang(value: &str) -> Result<String, String> {
    if google::LANG_CODES.contains(&value) {
        Ok(value.to_string())
    } else {
        Err(format!("not a supported language code: {value:?}"))
    }
}

/// Parse and validate a date range of the form `DD/MM/YYYY - DD/MM/YYYY`.
///
/// Either endpoint may be the `#` wildcard, which leaves that side of the
/// range open. Rejects dates later than today and ranges whose start is
/// after their end.
fn parse_date_range(value: &str) -> Result<DateRange, String> {
    let (start_str, end_str) = value
        .split_once(" - ")
        .ok_or_else(|| format!("the range contains an invalid date: {value:?}"))?;

    let start = parse_range_endpoint(start_str)?;
    let end = parse_range_endpoint(end_str)?;

    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            return Err(
                "not a valid range: the start date must not be later than the end date"
                    .to_string(),
            );
        }
    }

    Ok(DateRange { start, end })
}

/// Parse one side of a date range; `#` means the endpoint is open.
fn parse_range_endpoint(value: &str) -> Result<Option<NaiveDate>, String> {
    if value == "#" {
        return Ok(None);
    }
    let date = NaiveDate::parse_from_str(value, "%d/%m/%Y")
        .map_err(|_| format!("the range contains an invalid date: {value:?}"))?;
    if date > Local::now().date_naive() {
        return Err(format!("not a valid range: {value} is later than today"));
    }
    Ok(Some(date))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from(&["newsgrab", "--query", "storm warning", "--filename", "out"]);

        assert_eq!(cli.query, "storm warning");
        assert_eq!(cli.filename, "out");
        assert_eq!(cli.engine, EngineKind::Google);
        assert_eq!(cli.max_pages, 3);
        assert!(!cli.verbose);
        assert_eq!(cli.loglevel, Level::WARN);
        assert!(!cli.proxies);
        assert!(!cli.rotate);
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from(&["newsgrab", "-q", "storm", "-f", "out", "-m", "5", "-v", "-r"]);

        assert_eq!(cli.max_pages, 5);
        assert!(cli.verbose);
        assert!(cli.rotate);
    }

    #[test]
    fn test_cli_filter_flags() {
        let cli = Cli::parse_from(&[
            "newsgrab", "-q", "storm", "-f", "out", "--time", "w", "--sort", "--lang", "es",
        ]);

        let filter = cli.filter();
        assert_eq!(filter.time, Some(TimeBucket::Week));
        assert!(filter.range.is_none());
        assert!(filter.sort);
        assert_eq!(filter.lang.as_deref(), Some("es"));
    }

    #[test]
    fn test_time_and_range_conflict() {
        let result = Cli::try_parse_from(&[
            "newsgrab", "-q", "storm", "-f", "out",
            "--time", "d",
            "--range", "01/01/2023 - 02/01/2023",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_date_range_closed() {
        let range = parse_date_range("01/01/2023 - 15/02/2023").unwrap();
        assert_eq!(range.start, NaiveDate::from_ymd_opt(2023, 1, 1));
        assert_eq!(range.end, NaiveDate::from_ymd_opt(2023, 2, 15));
    }

    #[test]
    fn test_parse_date_range_open_end() {
        let range = parse_date_range("01/01/2023 - #").unwrap();
        assert_eq!(range.start, NaiveDate::from_ymd_opt(2023, 1, 1));
        assert!(range.end.is_none());
    }

    #[test]
    fn test_parse_date_range_open_start() {
        let range = parse_date_range("# - 01/01/2023").unwrap();
        assert!(range.start.is_none());
        assert_eq!(range.end, NaiveDate::from_ymd_opt(2023, 1, 1));
    }

    #[test]
    fn test_parse_date_range_both_open() {
        let range = parse_date_range("# - #").unwrap();
        assert!(range.start.is_none());
        assert!(range.end.is_none());
    }

    #[test]
    fn test_parse_date_range_reversed_rejected() {
        assert!(parse_date_range("15/02/2023 - 01/01/2023").is_err());
    }

    #[test]
    fn test_parse_date_range_future_rejected() {
        assert!(parse_date_range("01/01/2999 - #").is_err());
    }

    #[test]
    fn test_parse_date_range_garbage_rejected() {
        assert!(parse_date_range("yesterday - today").is_err());
        assert!(parse_date_range("01/01/2023").is_err());
    }

    #[test]
    fn test_parse_loglevel() {
        assert_eq!(parse_loglevel("info").unwrap(), Level::INFO);
        assert_eq!(parse_loglevel("DEBUG").unwrap(), Level::DEBUG);
        assert!(parse_loglevel("loud").is_err());
    }

    #[test]
    fn test_parse_lang() {
        assert_eq!(parse_lang("es").unwrap(), "es");
        assert_eq!(parse_lang("zh-CN").unwrap(), "zh-CN");
        assert!(parse_lang("klingon").is_err());
    }
}
