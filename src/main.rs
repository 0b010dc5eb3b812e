//! # newsgrab
//!
//! A news-search scraping tool that issues paginated queries against a
//! search engine, extracts result URLs from the returned HTML, and writes
//! them to a file.
//!
//! ## Features
//!
//! - Time-window, explicit date-range, sort-by-recency, and language filters
//! - Cookie-authenticated sessions with optional proxying and credential
//!   profile rotation
//! - Randomized anti-bot delay between page requests
//! - Plain URL-per-line output, or a verbose JSON file with the page and
//!   position of every hit
//!
//! ## Usage
//!
//! ```sh
//! newsgrab -q "solar storm" -f results --time w --sort
//! ```
//!
//! ## Architecture
//!
//! The application is a single bounded loop:
//! 1. **Configuration**: Validate flags, load secrets and proxy settings;
//!    any problem here aborts before a single request is issued
//! 2. **Session**: Build the HTTP client with the engine's headers, the
//!    required cookies, and a randomly chosen user agent
//! 3. **Search**: Fetch result pages one by one, extracting hits, until the
//!    page budget, an error, or an empty page stops the run
//! 4. **Output**: Write the aggregated hits as plain URLs or JSON

use clap::Parser;
use std::error::Error;
use std::path::Path;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod engines;
mod models;
mod outputs;
mod session;

use cli::Cli;
use engines::{SearchOptions, run_search};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Cli::parse();

    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.loglevel.to_string()));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("newsgrab starting up");
    debug!(?args, "Parsed CLI arguments");

    // --- Configuration, before any network activity ---
    let secrets = match config::load_secrets(args.rotate, Path::new(config::PROFILE_DIR)) {
        Ok(secrets) => secrets,
        Err(e) => {
            error!(error = %e, "configuration error");
            return Err(e.into());
        }
    };
    let proxy = match config::load_proxy(args.proxies) {
        Ok(proxy) => proxy,
        Err(e) => {
            error!(error = %e, "configuration error");
            return Err(e.into());
        }
    };

    // --- Session ---
    let engine = args.engine.build();
    let user_agent = session::random_user_agent();
    info!(user_agent, engine = engine.name(), "session configured");
    let client = session::build_client(
        engine.headers(),
        &engine.cookies(&secrets),
        user_agent,
        proxy.as_deref(),
    )?;

    // --- Paginated search ---
    let options = SearchOptions {
        max_pages: args.max_pages,
        ..SearchOptions::default()
    };
    let hits = run_search(&client, engine.as_ref(), &args.query, &args.filter(), &options).await;

    // --- Output ---
    let path = match outputs::write_results(&hits, &args.filename, args.verbose).await {
        Ok(path) => path,
        Err(e) => {
            error!(error = %e, "failed to write results");
            return Err(e);
        }
    };

    let elapsed = start_time.elapsed();
    info!(
        count = hits.len(),
        path = %path.display(),
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "URLs extracted"
    );

    Ok(())
}
