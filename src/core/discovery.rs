// LogKeep - core/discovery.rs
//
// Recursive log file discovery under the log directory.
//
// Reads directory entries only, never file contents. Ordering is reverse
// lexicographic by file name: with date-stamped names such as
// `app.2025-01-15.log` that puts the newest file first without opening it.
//
// Failure policy:
//   - A missing, non-directory, or unreadable root is fatal.
//   - Unreadable entries below the root are skipped (debug-logged).

use crate::core::model::LogFile;
use crate::platform::fs::relative_name;
use crate::util::error::DiscoveryError;
use std::io;
use std::path::Path;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for a discovery operation.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Maximum directory recursion depth (1 = only the root's own files).
    pub max_depth: usize,

    /// Glob patterns (filename-only) that a file must match to be listed.
    /// An empty list means "list every file".
    pub include_patterns: Vec<String>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        use crate::util::constants;
        Self {
            max_depth: constants::DEFAULT_MAX_DEPTH,
            include_patterns: constants::DEFAULT_INCLUDE_PATTERNS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }
}

// =============================================================================
// Discovery
// =============================================================================

/// List the log files under `root`, newest first.
pub fn discover_log_files(
    root: &Path,
    config: &DiscoveryConfig,
) -> Result<Vec<LogFile>, DiscoveryError> {
    use crate::util::constants;

    check_root(root)?;

    let max_depth = config.max_depth.min(constants::ABSOLUTE_MAX_DEPTH);
    let include_pats = compile_patterns(&config.include_patterns);

    tracing::debug!(
        root = %root.display(),
        max_depth,
        include = ?config.include_patterns,
        "Discovery starting"
    );

    let walker = walkdir::WalkDir::new(root)
        .min_depth(1)
        .max_depth(max_depth)
        .follow_links(false);

    let mut files: Vec<LogFile> = Vec::new();
    let mut skipped = 0usize;

    for entry_result in walker {
        let entry = match entry_result {
            Ok(e) => e,
            Err(e) if e.depth() == 0 => {
                // The root itself could not be listed.
                return Err(DiscoveryError::Unreadable {
                    path: root.to_path_buf(),
                    source: e
                        .into_io_error()
                        .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, "walk failed")),
                });
            }
            Err(e) => {
                tracing::debug!(error = %e, "Skipping inaccessible entry during discovery");
                skipped += 1;
                continue;
            }
        };

        if entry.file_type().is_dir() {
            continue;
        }

        let Some(file_name) = entry.file_name().to_str() else {
            tracing::debug!(path = %entry.path().display(), "Skipping non-UTF-8 filename");
            skipped += 1;
            continue;
        };

        if !is_included(file_name, &include_pats) {
            tracing::trace!(file = file_name, "Not matched by include patterns");
            continue;
        }

        files.push(LogFile(relative_name(root, entry.path())));
    }

    sort_newest_first(&mut files);

    tracing::debug!(
        root = %root.display(),
        files = files.len(),
        skipped,
        "Discovery complete"
    );

    Ok(files)
}

/// Reverse lexicographic order on file name, ties broken by full relative
/// path (also descending) so the order is total and deterministic.
pub fn sort_newest_first(files: &mut [LogFile]) {
    files.sort_unstable_by(|a, b| {
        b.file_name()
            .cmp(a.file_name())
            .then_with(|| b.name().cmp(a.name()))
    });
}

/// Distinguish "missing" from "unreadable" from "not a directory".
///
/// `fs::metadata()` is used rather than `Path::is_dir()` because the latter
/// maps every error, including PermissionDenied, to `false`.
fn check_root(root: &Path) -> Result<(), DiscoveryError> {
    match std::fs::metadata(root) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(DiscoveryError::NotADirectory {
            path: root.to_path_buf(),
        }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(DiscoveryError::RootNotFound {
            path: root.to_path_buf(),
        }),
        Err(e) => Err(DiscoveryError::Unreadable {
            path: root.to_path_buf(),
            source: e,
        }),
    }
}

// =============================================================================
// Glob helpers
// =============================================================================

/// Compile a list of glob pattern strings into `glob::Pattern` objects.
/// Patterns that fail to compile are logged as warnings and skipped.
fn compile_patterns(patterns: &[String]) -> Vec<glob::Pattern> {
    patterns
        .iter()
        .filter_map(|p| match glob::Pattern::new(p) {
            Ok(compiled) => Some(compiled),
            Err(e) => {
                tracing::warn!(pattern = p, error = %e, "Invalid glob pattern, skipping");
                None
            }
        })
        .collect()
}

/// Returns true if `file_name` matches at least one include pattern.
/// An empty include list means "include all" (returns true).
fn is_included(file_name: &str, include_pats: &[glob::Pattern]) -> bool {
    if include_pats.is_empty() {
        return true;
    }
    include_pats.iter().any(|p| p.matches(file_name))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn make_temp_tree() -> TempDir {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path();

        fs::write(root.join("app.2025-01-14.log"), "{}\n").expect("write");
        fs::write(root.join("app.2025-01-15.log"), "{}\n").expect("write");
        fs::write(root.join("notes.txt"), "not a log\n").expect("write");
        fs::write(root.join("app.log.gz"), "binary").expect("write");

        let sub = root.join("worker");
        fs::create_dir(&sub).expect("mkdir worker");
        fs::write(sub.join("app.2025-01-16.log"), "{}\n").expect("write");

        dir
    }

    fn names(files: &[LogFile]) -> Vec<&str> {
        files.iter().map(|f| f.name()).collect()
    }

    #[test]
    fn test_lists_log_suffix_recursively_newest_first() {
        let dir = make_temp_tree();
        let files = discover_log_files(dir.path(), &DiscoveryConfig::default()).unwrap();
        assert_eq!(
            names(&files),
            vec![
                "worker/app.2025-01-16.log",
                "app.2025-01-15.log",
                "app.2025-01-14.log",
            ]
        );
    }

    #[test]
    fn test_max_depth_1_excludes_subdirs() {
        let dir = make_temp_tree();
        let config = DiscoveryConfig {
            max_depth: 1,
            ..Default::default()
        };
        let files = discover_log_files(dir.path(), &config).unwrap();
        assert_eq!(names(&files), vec!["app.2025-01-15.log", "app.2025-01-14.log"]);
    }

    #[test]
    fn test_custom_include_patterns() {
        let dir = make_temp_tree();
        let config = DiscoveryConfig {
            include_patterns: vec!["*.txt".to_string()],
            ..Default::default()
        };
        let files = discover_log_files(dir.path(), &config).unwrap();
        assert_eq!(names(&files), vec!["notes.txt"]);
    }

    #[test]
    fn test_empty_directory_lists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let files = discover_log_files(dir.path(), &DiscoveryConfig::default()).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_root_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let result = discover_log_files(&dir.path().join("missing"), &DiscoveryConfig::default());
        assert!(matches!(result, Err(DiscoveryError::RootNotFound { .. })));
    }

    #[test]
    fn test_root_not_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("not_a_dir.log");
        fs::write(&file, "content").unwrap();
        let result = discover_log_files(&file, &DiscoveryConfig::default());
        assert!(matches!(result, Err(DiscoveryError::NotADirectory { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_subdir_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let dir = make_temp_tree();
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::write(locked.join("app.2025-01-17.log"), "{}\n").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Permission bits do not bind a privileged user.
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let result = discover_log_files(dir.path(), &DiscoveryConfig::default());
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        let files = result.unwrap();
        assert_eq!(
            names(&files),
            vec![
                "worker/app.2025-01-16.log",
                "app.2025-01-15.log",
                "app.2025-01-14.log",
            ]
        );
    }

    #[test]
    fn test_sort_ties_broken_by_path() {
        let mut files = vec![
            LogFile("a/app.log".to_string()),
            LogFile("b/app.log".to_string()),
            LogFile("zz.log".to_string()),
        ];
        sort_newest_first(&mut files);
        assert_eq!(names(&files), vec!["zz.log", "b/app.log", "a/app.log"]);
    }
}
