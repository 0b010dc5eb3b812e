//! JSON output generation for verbose mode.
//!
//! Serializes the aggregated hit list as a JSON array of objects with the
//! keys `url`, `position`, and `page`.

use std::error::Error;
use std::path::Path;

use tokio::fs;
use tracing::{info, instrument};

use crate::models::SearchHit;

/// Write the hits as a JSON array to `path`.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_hits(hits: &[SearchHit], path: &Path) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string(hits)?;
    fs::write(path, json).await?;
    info!(count = hits.len(), "wrote JSON hit file");
    Ok(())
}
