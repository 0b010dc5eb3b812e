//! Search engine implementations and the shared pagination loop.
//!
//! Each engine knows how to do two things: translate the query and filters
//! into its own query parameters, and map one page of result HTML into hits.
//! Everything else (issuing requests, advancing the page offset, deciding
//! when to stop, pacing requests with the anti-bot sleep) lives in
//! [`run_search`] and is shared across engines.
//!
//! # Supported Engines
//!
//! | Engine | Module | Notes |
//! |--------|--------|-------|
//! | Google News | [`google`] | Requires the AEC and SOCS cookie values |
//!
//! Engines are registered explicitly in [`EngineKind`]; adding one means
//! adding a variant and its `build` arm.
//!
//! # Termination
//!
//! The loop stops on the first of: page budget exhausted, transport failure,
//! non-2xx response, or a page that contributes zero new hits. Any failure is
//! terminal for the whole run, there is no per-page retry, and the hits
//! gathered so far are always returned.

pub mod google;

use std::time::Duration;

use clap::ValueEnum;
use rand::Rng;
use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode};
use tracing::{error, info, instrument, warn};
use url::Url;

use crate::config::Secrets;
use crate::models::{SearchFilter, SearchHit};

/// Offset increment between consecutive result pages.
pub const PAGE_JUMP: usize = 10;

/// Lower bound for the anti-bot sleep, in seconds.
pub const MIN_SLEEP_SECS: f64 = 1.5;

/// Default upper bound for the anti-bot sleep, in seconds.
pub const DEFAULT_SLEEP_INTERVAL: f64 = 5.33;

/// One search engine: its endpoint, session requirements, query encoding,
/// and result extraction.
pub trait Engine {
    /// Engine name used in logs.
    fn name(&self) -> &'static str;

    /// The endpoint queried for every result page.
    fn search_url(&self) -> &str;

    /// Default headers the session sends with every request.
    fn headers(&self) -> HeaderMap;

    /// `(cookie string, origin)` pairs the session must carry, derived from
    /// the run's secrets.
    fn cookies(&self, secrets: &Secrets) -> Vec<(String, Url)>;

    /// Translate the query and filters into the engine's query parameters.
    /// The pagination offset is appended by the loop, not here.
    fn build_params(&self, query: &str, filter: &SearchFilter) -> Vec<(&'static str, String)>;

    /// Map one page's HTML into hits. `count` is the number of hits gathered
    /// so far and `page` the 0-based page index; both feed the hit numbering.
    fn extract_hits(&self, html: &str, count: usize, page: usize) -> Vec<SearchHit>;
}

/// The static engine registry, selectable from the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EngineKind {
    /// Scrape news results from Google. COOKIE_AEC and COOKIE_SOCS required.
    Google,
}

impl EngineKind {
    /// Instantiate the engine this registry entry names.
    pub fn build(self) -> Box<dyn Engine> {
        match self {
            EngineKind::Google => Box::new(google::GoogleEngine::default()),
        }
    }
}

/// Knobs for one run of the pagination loop.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Maximum number of result pages to request.
    pub max_pages: usize,
    /// Upper bound for the randomized inter-page sleep; `None` disables
    /// sleeping entirely.
    pub sleep_interval: Option<f64>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_pages: 3,
            sleep_interval: Some(DEFAULT_SLEEP_INTERVAL),
        }
    }
}

/// Run the paginated search and return every hit gathered.
///
/// Never fails: transport and upstream errors are logged and terminate the
/// loop, and whatever has been accumulated up to that point is returned.
#[instrument(level = "info", skip_all, fields(engine = engine.name(), query = %query))]
pub async fn run_search(
    client: &Client,
    engine: &dyn Engine,
    query: &str,
    filter: &SearchFilter,
    options: &SearchOptions,
) -> Vec<SearchHit> {
    let mut hits: Vec<SearchHit> = Vec::new();
    let base_params = engine.build_params(query, filter);

    for page in 0..options.max_pages {
        let mut params = base_params.clone();
        if page > 0 {
            params.push(("start", (page * PAGE_JUMP).to_string()));
        }

        let response = match client.get(engine.search_url()).query(&params).send().await {
            Ok(response) => response,
            Err(e) => {
                error!(page, error = %e, "transport error during the search; stopping");
                break;
            }
        };

        let status = response.status();
        if !status.is_success() {
            if status == StatusCode::TOO_MANY_REQUESTS {
                error!(
                    page,
                    %status,
                    "captcha block; go to the browser and answer the captcha if necessary"
                );
            } else {
                error!(page, %status, "an error occurred during the search; stopping");
            }
            break;
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                error!(page, error = %e, "failed to read the response body; stopping");
                break;
            }
        };

        let before = hits.len();
        hits.extend(engine.extract_hits(&body, before, page));
        if hits.len() == before {
            warn!(page, "no results found; stopping");
            break;
        }
        info!(page, gained = hits.len() - before, total = hits.len(), "extracted page");

        if page + 1 < options.max_pages {
            if let Some(interval) = options.sleep_interval {
                anti_bot_sleep(interval).await;
            }
        }
    }

    hits
}

/// Sleep a uniformly random duration in `[MIN_SLEEP_SECS, max_secs]` before
/// the next page request.
async fn anti_bot_sleep(max_secs: f64) {
    let secs = if max_secs > MIN_SLEEP_SECS {
        rand::rng().random_range(MIN_SLEEP_SECS..max_secs)
    } else {
        MIN_SLEEP_SECS
    };
    info!(secs, "anti-bot sleep");
    tokio::time::sleep(Duration::from_secs_f64(secs)).await;
}
