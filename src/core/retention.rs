// LogKeep - core/retention.rs
//
// Best-effort deletion of files older than a retention window.
//
// Only a walk that cannot start (missing or unreadable root) fails the whole
// operation. Anything that goes wrong for a single entry (vanished between
// listing and deletion, permission denied, unreadable subdirectory) is counted
// as skipped and the walk carries on. Directories are never removed.
// Running the cleaner twice with the same cutoff deletes nothing the second
// time.

use crate::platform::fs::modified_utc;
use crate::util::constants;
use crate::util::error::RetentionError;
use chrono::{DateTime, Duration, Utc};
use std::io;
use std::path::Path;

/// Outcome of one cleanup run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupReport {
    pub deleted_count: usize,
    /// Bytes of the files actually removed.
    pub reclaimed_bytes: u64,
    /// Files older than the cutoff. `None` only when the window is so large
    /// the cutoff cannot be represented, in which case nothing is deleted.
    pub cutoff: Option<DateTime<Utc>>,
    pub retention_days: i64,
    /// Entries that could not be inspected or removed.
    pub skipped: usize,
}

impl CleanupReport {
    pub fn reclaimed_mb(&self) -> f64 {
        self.reclaimed_bytes as f64 / constants::BYTES_PER_MB
    }
}

/// Retention window in days; anything non-positive becomes the default.
pub fn effective_days(days: i64) -> i64 {
    if days > 0 {
        days
    } else {
        constants::DEFAULT_RETENTION_DAYS
    }
}

/// `now - days`, or `None` if that falls outside the representable range.
pub fn cutoff_for(now: DateTime<Utc>, days: i64) -> Option<DateTime<Utc>> {
    Duration::try_days(days).and_then(|window| now.checked_sub_signed(window))
}

/// Delete every file under `root` last modified strictly before
/// `now - days`.
pub fn cleanup(root: &Path, days: i64, now: DateTime<Utc>) -> Result<CleanupReport, RetentionError> {
    let retention_days = effective_days(days);
    let cutoff = cutoff_for(now, retention_days);

    let mut report = CleanupReport {
        deleted_count: 0,
        reclaimed_bytes: 0,
        cutoff,
        retention_days,
        skipped: 0,
    };

    tracing::info!(
        root = %root.display(),
        retention_days,
        cutoff = ?cutoff,
        "Retention cleanup starting"
    );

    for entry_result in walkdir::WalkDir::new(root).follow_links(false) {
        let entry = match entry_result {
            Ok(e) => e,
            Err(e) if e.depth() == 0 => {
                return Err(RetentionError::WalkFailed {
                    path: root.to_path_buf(),
                    source: e,
                });
            }
            Err(e) => {
                tracing::debug!(error = %e, "Skipping inaccessible entry during cleanup");
                report.skipped += 1;
                continue;
            }
        };

        if entry.file_type().is_dir() {
            continue;
        }
        let Some(cutoff) = cutoff else {
            continue;
        };

        let path = entry.path();
        let meta = match entry.metadata() {
            Ok(m) => m,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "Cannot stat file; skipped");
                report.skipped += 1;
                continue;
            }
        };

        let Some(modified) = modified_utc(&meta) else {
            report.skipped += 1;
            continue;
        };
        if modified >= cutoff {
            continue;
        }

        match std::fs::remove_file(path) {
            Ok(()) => {
                report.deleted_count += 1;
                report.reclaimed_bytes += meta.len();
                tracing::debug!(path = %path.display(), bytes = meta.len(), "Deleted expired file");
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                // Someone else removed it first.
                report.skipped += 1;
            }
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "Delete failed; skipped");
                report.skipped += 1;
            }
        }
    }

    tracing::info!(
        deleted = report.deleted_count,
        reclaimed_bytes = report.reclaimed_bytes,
        skipped = report.skipped,
        "Retention cleanup complete"
    );

    Ok(report)
}
