//! Output generation modules for the extracted hits.
//!
//! This module contains the two writers a run can end with:
//!
//! # Submodules
//!
//! - [`json`]: Writes the full hit objects as a JSON array (verbose mode)
//! - [`urls`]: Writes one URL per line, in position order (default)
//!
//! # Output Structure
//!
//! The chosen format also picks the file extension for the caller-supplied
//! base name:
//!
//! ```text
//! results.txt    # default: newline-delimited URLs
//! results.json   # verbose: [{"url": ..., "position": ..., "page": ...}, ...]
//! ```

pub mod json;
pub mod urls;

use std::error::Error;
use std::path::PathBuf;

use crate::models::SearchHit;

/// Resolve the output path: the base name plus the extension the chosen
/// format implies.
pub fn output_path(base: &str, verbose: bool) -> PathBuf {
    let ext = if verbose { "json" } else { "txt" };
    PathBuf::from(format!("{base}.{ext}"))
}

/// Write the hits in the chosen format and return the path written to.
pub async fn write_results(
    hits: &[SearchHit],
    base: &str,
    verbose: bool,
) -> Result<PathBuf, Box<dyn Error>> {
    let path = output_path(base, verbose);
    if verbose {
        json::write_hits(hits, &path).await?;
    } else {
        urls::write_hits(hits, &path).await?;
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_extension_follows_mode() {
        assert_eq!(output_path("results", false), PathBuf::from("results.txt"));
        assert_eq!(output_path("results", true), PathBuf::from("results.json"));
        assert_eq!(
            output_path("out/run-1", true),
            PathBuf::from("out/run-1.json")
        );
    }
}
