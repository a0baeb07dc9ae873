//! TTL-based eviction of stored inputs and converted outputs.
//!
//! Nothing else ever deletes these files, so without the sweeper both
//! directories grow for the lifetime of the process. The sweeper only
//! touches the two service-owned directories from the configuration.

use std::path::Path;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::config::CleanupConfig;
use crate::storage::Storage;

pub async fn run_cleanup_sweeper(config: CleanupConfig, storage: Storage, shutdown: CancellationToken) {
    if !config.enabled {
        tracing::info!("Cleanup sweeper disabled by configuration");
        return;
    }

    tracing::info!(
        max_age = %humantime::format_duration(config.max_age),
        sweep_interval = %humantime::format_duration(config.sweep_interval),
        "Starting cleanup sweeper"
    );

    loop {
        tokio::select! {
            _ = tokio::time::sleep(config.sweep_interval) => {}
            _ = shutdown.cancelled() => {
                tracing::info!("Cleanup sweeper shutting down");
                return;
            }
        }

        for dir in [storage.upload_dir(), storage.pdf_dir()] {
            match sweep_dir(dir, config.max_age).await {
                Ok(0) => {}
                Ok(removed) => tracing::info!(dir = %dir.display(), removed, "Evicted expired files"),
                Err(e) => tracing::warn!(dir = %dir.display(), error = %e, "Sweep failed"),
            }
        }
    }
}

/// Delete regular files in `dir` whose mtime is older than `max_age`.
/// Returns how many files were removed.
pub async fn sweep_dir(dir: &Path, max_age: Duration) -> std::io::Result<usize> {
    let mut removed = 0;
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let metadata = match entry.metadata().await {
            Ok(m) if m.is_file() => m,
            Ok(_) => continue,
            Err(e) => {
                tracing::debug!(path = %entry.path().display(), error = %e, "Skipping unreadable entry");
                continue;
            }
        };

        let expired = metadata
            .modified()
            .ok()
            .and_then(|mtime| mtime.elapsed().ok())
            .map(|age| age >= max_age)
            .unwrap_or(false);
        if !expired {
            continue;
        }

        match tokio::fs::remove_file(entry.path()).await {
            Ok(()) => {
                tracing::debug!(path = %entry.path().display(), "Removed expired file");
                removed += 1;
            }
            // Lost a race with a concurrent sweep or manual deletion
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(path = %entry.path().display(), error = %e, "Could not remove expired file"),
        }
    }
    Ok(removed)
}
