//! Environment/runtime helpers
//!
//! Sanity checks to ensure the backing data file exists at startup.

use std::path::Path;

use tracing::{info, warn};

/// Ensure the data file's directory exists and seed the file with an empty
/// JSON array when it is missing. Returns `true` when the file was created.
///
/// An existing file is never touched, even if it does not parse.
pub async fn ensure_data_file(data_file: &Path) -> anyhow::Result<bool> {
    if let Some(parent) = data_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", parent.display()))?;
    }

    if tokio::fs::metadata(data_file).await.is_ok() {
        return Ok(false);
    }

    warn!(data_file = %data_file.display(), "data file not found; seeding an empty collection");
    tokio::fs::write(data_file, "[]")
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", data_file.display()))?;
    info!(data_file = %data_file.display(), "data file created");
    Ok(true)
}
