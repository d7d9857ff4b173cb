// LogKeep - platform/fs.rs
//
// Filesystem helpers shared by the engine: opening log files read-only,
// converting metadata timestamps, and keeping caller-supplied file names
// confined to the log directory.

use chrono::{DateTime, Utc};
use std::fs::{File, Metadata};
use std::io::{self, BufReader};
use std::path::{Component, Path, PathBuf};

/// Open a log file read-only behind a buffered reader.
///
/// The file handle is closed when the reader is dropped.
pub fn open_log_reader(path: &Path) -> io::Result<BufReader<File>> {
    let file = File::open(path)?;
    Ok(BufReader::new(file))
}

/// Last modification time of `metadata` in UTC, if the platform reports one.
pub fn modified_utc(metadata: &Metadata) -> Option<DateTime<Utc>> {
    metadata.modified().ok().map(DateTime::<Utc>::from)
}

/// Resolve a caller-supplied log file name to a path under `root`.
///
/// Returns `None` when the name is empty, absolute, or contains `..` (or any
/// other component that could step outside `root`).
pub fn resolve_log_path(root: &Path, name: &str) -> Option<PathBuf> {
    if name.trim().is_empty() {
        return None;
    }
    let candidate = Path::new(name);
    let mut resolved = root.to_path_buf();
    for component in candidate.components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    if resolved == root {
        return None;
    }
    Some(resolved)
}

/// Render `path` relative to `root` with `/` separators, the form in which
/// file names are handed to callers. Falls back to the bare file name when
/// `path` is not under `root`.
pub fn relative_name(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    let parts: Vec<String> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    if parts.is_empty() {
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    } else {
        parts.join("/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_plain_name() {
        let root = Path::new("/var/logs");
        assert_eq!(
            resolve_log_path(root, "app.2025-01-15.log"),
            Some(PathBuf::from("/var/logs/app.2025-01-15.log"))
        );
    }

    #[test]
    fn test_resolve_nested_name() {
        let root = Path::new("/var/logs");
        assert_eq!(
            resolve_log_path(root, "worker/./jobs.log"),
            Some(PathBuf::from("/var/logs/worker/jobs.log"))
        );
    }

    #[test]
    fn test_resolve_rejects_escapes() {
        let root = Path::new("/var/logs");
        assert_eq!(resolve_log_path(root, "../etc/passwd"), None);
        assert_eq!(resolve_log_path(root, "a/../../b.log"), None);
        assert_eq!(resolve_log_path(root, "/etc/passwd"), None);
        assert_eq!(resolve_log_path(root, ""), None);
        assert_eq!(resolve_log_path(root, "."), None);
    }

    #[test]
    fn test_relative_name_uses_forward_slashes() {
        let root = Path::new("/var/logs");
        let path = root.join("worker").join("jobs.log");
        assert_eq!(relative_name(root, &path), "worker/jobs.log");
        assert_eq!(relative_name(root, &root.join("app.log")), "app.log");
    }

    #[test]
    fn test_modified_utc_reads_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.log");
        std::fs::write(&path, "x").unwrap();
        let meta = std::fs::metadata(&path).unwrap();
        assert!(modified_utc(&meta).is_some());
    }

    #[test]
    fn test_open_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = open_log_reader(&dir.path().join("missing.log")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
