//! Plain-text output: one URL per line.
//!
//! The default output format. Hits are written in position order; a hit
//! without a URL renders as the literal `null` so line numbers keep lining
//! up with positions.

use std::error::Error;
use std::path::Path;

use tokio::fs;
use tracing::{info, instrument};

use crate::models::SearchHit;

/// Write one URL per line to `path`.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_hits(hits: &[SearchHit], path: &Path) -> Result<(), Box<dyn Error>> {
    let mut lines = String::new();
    for hit in hits {
        lines.push_str(hit.url.as_deref().unwrap_or("null"));
        lines.push('\n');
    }

    fs::write(path, lines).await?;
    info!(count = hits.len(), "wrote URL list");
    Ok(())
}
