// LogKeep - core/stats.rs
//
// Two independent aggregates:
//   - per-view level counts over a filtered entry set (pure);
//   - directory-wide file statistics (walks the whole log directory).
//
// The directory walk itself must succeed; an individual file whose metadata
// cannot be read is left out of the totals.

use crate::core::model::{DirectoryStats, LevelCounts, LogEntry};
use crate::platform::fs::modified_utc;
use crate::util::error::StatsError;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// Count entries by the levels the dashboard tracks.
pub fn count_levels(entries: &[LogEntry]) -> LevelCounts {
    entries
        .iter()
        .fold(LevelCounts::default(), |mut counts, entry| {
            counts.total += 1;
            match entry.level.as_str() {
                "error" => counts.error += 1,
                "info" => counts.info += 1,
                _ => {}
            }
            counts
        })
}

/// Gather file count, byte total, and modification-time span over every file
/// under `root` (not only log files).
///
/// The walk is sequential; the per-file `stat` calls are spread over the
/// rayon pool since they dominate on large directories.
pub fn directory_stats(root: &Path) -> Result<DirectoryStats, StatsError> {
    let mut paths: Vec<PathBuf> = Vec::new();
    for entry_result in walkdir::WalkDir::new(root).follow_links(false) {
        let entry = entry_result.map_err(|e| StatsError::Traversal {
            path: root.to_path_buf(),
            source: e,
        })?;
        if !entry.file_type().is_dir() {
            paths.push(entry.into_path());
        }
    }

    let stats = paths
        .par_iter()
        .filter_map(|path| match std::fs::symlink_metadata(path) {
            Ok(meta) => Some(DirectoryStats {
                total_files: 1,
                total_bytes: meta.len(),
                oldest_modified: modified_utc(&meta),
                newest_modified: modified_utc(&meta),
            }),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "Skipping file in stats");
                None
            }
        })
        .reduce(DirectoryStats::default, merge);

    tracing::debug!(
        root = %root.display(),
        files = stats.total_files,
        bytes = stats.total_bytes,
        "Directory stats gathered"
    );

    Ok(stats)
}

fn merge(a: DirectoryStats, b: DirectoryStats) -> DirectoryStats {
    DirectoryStats {
        total_files: a.total_files + b.total_files,
        total_bytes: a.total_bytes + b.total_bytes,
        oldest_modified: pick(a.oldest_modified, b.oldest_modified, std::cmp::min),
        newest_modified: pick(a.newest_modified, b.newest_modified, std::cmp::max),
    }
}

fn pick<T: Ord>(a: Option<T>, b: Option<T>, choose: fn(T, T) -> T) -> Option<T> {
    match (a, b) {
        (Some(a), Some(b)) => Some(choose(a, b)),
        (a, None) => a,
        (None, b) => b,
    }
}
