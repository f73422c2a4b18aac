//! Optional per-file side cache: one plain-text file per new summary, for
//! inspection. Never read back by the pipeline.

use std::path::{Path, PathBuf};

pub const CACHE_SUFFIX: &str = ".md";

/// `app/web/deploy.yaml` -> `app_web_deploy.yaml.md`.
pub fn cache_file_name(relative: &str) -> String {
    let flat = relative.replace(['/', '\\'], "_");
    format!("{flat}{CACHE_SUFFIX}")
}

/// Write `summary` verbatim to its cache file under `cache_dir`, creating the
/// directory if needed. Each file has its own target, so concurrent workers
/// never contend.
pub async fn write_summary(
    cache_dir: &Path,
    relative: &str,
    summary: &str,
) -> std::io::Result<PathBuf> {
    tokio::fs::create_dir_all(cache_dir).await?;
    let target = cache_dir.join(cache_file_name(relative));
    tokio::fs::write(&target, summary).await?;
    Ok(target)
}
