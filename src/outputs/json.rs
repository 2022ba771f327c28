//! JSON output for a finished digest.
//!
//! # Output Structure
//!
//! Files are organized by digest date, one file per run:
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     ├── digest_1746540000000_1a2b3c4d.json
//!     └── digest_1746583200000_5e6f7a8b.json
//! ```

use crate::error::Result;
use crate::models::DailyDigest;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

/// Write a [`DailyDigest`] as pretty-printed JSON.
///
/// The file is written to `{json_output_dir}/{date}/{digest id}.json`, and
/// the path is returned.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir.as_ref().display()))]
pub async fn write_digest(digest: &DailyDigest, json_output_dir: impl AsRef<Path>) -> Result<PathBuf> {
    let json = serde_json::to_string_pretty(digest)?;

    let full_json_dir = json_output_dir.as_ref().join(digest.date.to_string());
    info!(dir = %full_json_dir.display(), "Ensuring JSON directory exists");
    if let Err(e) = fs::create_dir_all(&full_json_dir).await {
        error!(dir = %full_json_dir.display(), error = %e, "Failed to create JSON dir");
        return Err(e.into());
    }

    let path = full_json_dir.join(format!("{}.json", digest.id));
    fs::write(&path, json).await?;
    info!(path = %path.display(), "Wrote digest JSON");

    Ok(path)
}
