//! Google News search engine.
//!
//! Issues GET requests against the news vertical of Google's search endpoint
//! (`tbm=nws`) and extracts result URLs from the returned HTML.
//!
//! # Session requirements
//!
//! Two cookies must accompany every request:
//! - `AEC`: ensures requests within a browsing session are made by the user,
//!   and not by other sites (6 month lifetime)
//! - `SOCS`: stores the user's state regarding their cookie choices
//!   (13 month lifetime)
//!
//! # Filter encoding
//!
//! Time, date-range, sort, and language filters are folded into the opaque
//! `tbs` query parameter as comma-joined sub-tokens; the parameter is omitted
//! entirely when no filter is requested. The language restriction additionally
//! sets a separate `lr` parameter.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use reqwest::header::{HeaderMap, HeaderValue};
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

use super::Engine;
use crate::config::Secrets;
use crate::models::{SearchFilter, SearchHit};

/// The production search endpoint.
pub const GOOGLE_SEARCH_URL: &str = "https://www.google.com/search";

/// The RFC 5646 subset Google accepts for the language restriction.
pub const LANG_CODES: [&str; 46] = [
    "af", "ar", "hy", "be", "bg", "ca", "zh-CN", "zh-TW", "hr", "cs", "da", "nl", "en", "eo",
    "et", "tl", "fi", "fr", "de", "el", "iw", "hi", "hu", "is", "id", "it", "ja", "ko", "lv",
    "lt", "no", "fa", "pl", "pt", "ro", "ru", "sr", "sk", "sl", "es", "sw", "sv", "th", "tr",
    "uk", "vi",
];

// News result cards sit at a fixed depth under the #search container.
static CARD_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("#search > div > div > div > div > div").unwrap());
static LINK_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").unwrap());
static GOOGLE_ORIGIN: Lazy<Url> = Lazy::new(|| Url::parse("https://www.google.com").unwrap());

/// The Google News engine.
pub struct GoogleEngine {
    search_url: String,
}

impl GoogleEngine {
    /// Create an engine querying the given endpoint.
    pub fn new(search_url: impl Into<String>) -> Self {
        Self {
            search_url: search_url.into(),
        }
    }
}

impl Default for GoogleEngine {
    fn default() -> Self {
        Self::new(GOOGLE_SEARCH_URL)
    }
}

impl Engine for GoogleEngine {
    fn name(&self) -> &'static str {
        "google"
    }

    fn search_url(&self) -> &str {
        &self.search_url
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("authority", HeaderValue::from_static("www.google.com"));
        headers.insert(
            "accept",
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,\
                 image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7",
            ),
        );
        headers.insert(
            "accept-language",
            HeaderValue::from_static("es-ES,es;q=0.9"),
        );
        headers
    }

    fn cookies(&self, secrets: &Secrets) -> Vec<(String, Url)> {
        vec![
            (
                format!("AEC={}; Domain=.google.com", secrets.aec),
                GOOGLE_ORIGIN.clone(),
            ),
            (
                format!("SOCS={}; Domain=.google.com", secrets.socs),
                GOOGLE_ORIGIN.clone(),
            ),
        ]
    }

    fn build_params(&self, query: &str, filter: &SearchFilter) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("q", query.to_string()),
            // News vertical.
            ("tbm", "nws".to_string()),
            // Screen width, height, and pixel density.
            ("biw", "1920".to_string()),
            ("bih", "912".to_string()),
            ("dpr", "1".to_string()),
        ];

        let tbs = build_tbs(filter);
        if !tbs.is_empty() {
            params.push(("tbs", tbs));
        }
        if let Some(lang) = &filter.lang {
            params.push(("lr", format!("lang_{}", lang.to_lowercase())));
        }
        params
    }

    fn extract_hits(&self, html: &str, count: usize, page: usize) -> Vec<SearchHit> {
        let document = Html::parse_document(html);
        let hits: Vec<SearchHit> = document
            .select(&CARD_SELECTOR)
            .filter_map(|card| {
                // Cards without an embedded link are skipped, not an error.
                card.select(&LINK_SELECTOR)
                    .next()
                    .and_then(|link| link.value().attr("href"))
            })
            .enumerate()
            .map(|(index, href)| SearchHit {
                url: Some(href.trim().to_lowercase()),
                position: count + index + 1,
                page: page + 1,
            })
            .collect();
        debug!(page, count = hits.len(), "extracted news cards");
        hits
    }
}

/// Build the `tbs` filter string: comma-joined sub-tokens, empty when no
/// filter is requested.
pub fn build_tbs(filter: &SearchFilter) -> String {
    let mut tbs = String::new();

    if let Some(time) = filter.time {
        tbs.push_str(&format!("qdr:{}", time.code()));
    } else if let Some(range) = &filter.range {
        tbs.push_str(&format!(
            "cdr:1,cd_min:{},cd_max:{}",
            format_date(range.start),
            format_date(range.end)
        ));
    }

    if filter.sort {
        push_token(&mut tbs, "sbd:1");
    }
    if let Some(lang) = &filter.lang {
        let token = format!("lr:lang_1{}", lang.to_lowercase());
        push_token(&mut tbs, &token);
    }

    tbs
}

fn push_token(tbs: &mut String, token: &str) {
    if !tbs.is_empty() {
        tbs.push(',');
    }
    tbs.push_str(token);
}

/// Google expects `month/day/year` without zero padding; an open endpoint
/// encodes as an empty value.
fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| format!("{}/{}/{}", d.month(), d.day(), d.year()))
        .unwrap_or_default()
}
