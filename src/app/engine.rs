// LogKeep - app/engine.rs
//
// Request-level orchestration over the core components. A `LogEngine` holds
// only configuration; every call re-reads the filesystem.
//
// Pipelines:
//   view    = discover -> select file -> parse -> filter -> count -> paginate
//   export  = select file -> parse -> filter -> render
//   stats   = directory walk (independent of any file)
//   cleanup = directory walk (independent of any file)

use crate::app::query::{ExportRequest, ViewRequest};
use crate::core::discovery::{self, DiscoveryConfig};
use crate::core::export::{self, ExportPayload};
use crate::core::filter::{self, FilterState};
use crate::core::model::{LogEntry, LogFile, ViewEntry, ViewerResult};
use crate::core::{paginate, parser, retention, stats};
use crate::platform::config::AppConfig;
use crate::platform::fs::resolve_log_path;
use crate::util::constants;
use crate::util::error::{LogKeepError, RequestError, Result};
use chrono::{DateTime, FixedOffset, Local, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};

// =============================================================================
// Response shapes for the directory-wide operations
// =============================================================================

/// Directory statistics in the form handed to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSummary {
    pub total_files: usize,
    pub total_bytes: u64,
    pub total_size_mb: f64,
    /// Local calendar day of the oldest modification, `None` for an empty directory.
    pub oldest_date: Option<String>,
    pub newest_date: Option<String>,
}

/// Cleanup outcome in the form handed to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanupSummary {
    pub deleted_count: usize,
    pub reclaimed_bytes: u64,
    pub total_size_mb: f64,
    pub cutoff_date: Option<String>,
    pub retention_days: i64,
    pub skipped: usize,
}

// =============================================================================
// Engine
// =============================================================================

/// Stateless facade over one log directory.
#[derive(Debug, Clone)]
pub struct LogEngine {
    log_dir: PathBuf,
    discovery: DiscoveryConfig,
    default_page_size: usize,
    default_retention_days: i64,
}

impl LogEngine {
    /// Engine over `log_dir` with default settings.
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            log_dir: log_dir.into(),
            discovery: DiscoveryConfig::default(),
            default_page_size: constants::DEFAULT_PAGE_SIZE,
            default_retention_days: constants::DEFAULT_RETENTION_DAYS,
        }
    }

    /// Engine configured from a validated `AppConfig`.
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            log_dir: config.log_dir.clone(),
            discovery: DiscoveryConfig {
                max_depth: config.max_depth,
                include_patterns: config.include_patterns.clone(),
            },
            default_page_size: config.default_page_size,
            default_retention_days: config.retention_days,
        }
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn default_page_size(&self) -> usize {
        self.default_page_size
    }

    pub fn default_retention_days(&self) -> i64 {
        self.default_retention_days
    }

    /// Log files in the directory, newest first.
    pub fn list_files(&self) -> Result<Vec<LogFile>> {
        Ok(discovery::discover_log_files(&self.log_dir, &self.discovery)?)
    }

    /// Build the paginated, filtered view of one file.
    ///
    /// With no file requested the newest file is shown. Fails with
    /// `NoLogFiles` when the directory has nothing to show.
    pub fn view(&self, request: &ViewRequest) -> Result<ViewerResult> {
        let files = self.list_files()?;
        let Some(newest) = files.first() else {
            return Err(LogKeepError::NoLogFiles {
                dir: self.log_dir.clone(),
            });
        };
        let current_file = match &request.file {
            Some(name) => LogFile(name.clone()),
            None => newest.clone(),
        };

        let entries = self.load_filtered(current_file.name(), &request.filter)?;
        let counts = stats::count_levels(&entries);
        let page = paginate::paginate(entries, request.page);

        let entries_json = serde_json::to_string(&page.items).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Could not serialise page entries");
            "[]".to_string()
        });
        let entries: Vec<ViewEntry> = page.items.into_iter().map(ViewEntry::from).collect();

        tracing::debug!(
            file = %current_file,
            total = counts.total,
            page = page.info.current_page,
            pages = page.info.total_pages,
            "View built"
        );

        Ok(ViewerResult {
            files,
            current_file,
            entries,
            entries_json,
            counts,
            page: page.info,
        })
    }

    /// Render the filtered entries of one file as a download.
    pub fn export(&self, request: &ExportRequest) -> Result<ExportPayload> {
        self.export_at(request, Local::now().into())
    }

    /// `export` with an explicit export timestamp.
    pub fn export_at(
        &self,
        request: &ExportRequest,
        exported_at: DateTime<FixedOffset>,
    ) -> Result<ExportPayload> {
        let entries = self.load_filtered(&request.file, &request.filter)?;
        Ok(export::render(
            &entries,
            &request.file,
            request.format,
            exported_at,
        )?)
    }

    /// Directory-wide file statistics.
    pub fn stats(&self) -> Result<StatsSummary> {
        let dir_stats = stats::directory_stats(&self.log_dir)?;
        Ok(StatsSummary {
            total_files: dir_stats.total_files,
            total_bytes: dir_stats.total_bytes,
            total_size_mb: dir_stats.total_bytes as f64 / constants::BYTES_PER_MB,
            oldest_date: dir_stats.oldest_modified.map(local_date),
            newest_date: dir_stats.newest_modified.map(local_date),
        })
    }

    /// Delete files older than `days` (engine default when `None`).
    pub fn cleanup(&self, days: Option<i64>) -> Result<CleanupSummary> {
        self.cleanup_at(days, Utc::now())
    }

    /// `cleanup` measured from an explicit `now`.
    pub fn cleanup_at(&self, days: Option<i64>, now: DateTime<Utc>) -> Result<CleanupSummary> {
        let days = days.unwrap_or(self.default_retention_days);
        let report = retention::cleanup(&self.log_dir, days, now)?;
        Ok(CleanupSummary {
            deleted_count: report.deleted_count,
            reclaimed_bytes: report.reclaimed_bytes,
            total_size_mb: report.reclaimed_mb(),
            cutoff_date: report.cutoff.map(local_date),
            retention_days: report.retention_days,
            skipped: report.skipped,
        })
    }

    /// Parse `file_name` and apply `filter_state`.
    fn load_filtered(&self, file_name: &str, filter_state: &FilterState) -> Result<Vec<LogEntry>> {
        let path = resolve_log_path(&self.log_dir, file_name).ok_or_else(|| {
            RequestError::InvalidFileName {
                name: file_name.to_string(),
            }
        })?;
        let parsed = parser::parse_file(&path)?;
        Ok(filter::apply_filters(parsed.entries, filter_state))
    }
}

fn local_date(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local)
        .format(constants::DATE_FORMAT)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::query::{ExportParams, ViewParams};
    use crate::core::export::ExportFormat;
    use crate::util::error::ErrorKind;
    use std::fs;

    fn write_lines(path: &Path, lines: &[&str]) {
        fs::write(path, lines.join("\n") + "\n").unwrap();
    }

    fn setup() -> (tempfile::TempDir, LogEngine) {
        let dir = tempfile::tempdir().unwrap();
        write_lines(
            &dir.path().join("app.2025-01-14.log"),
            &[r#"{"timestamp":"2025-01-14T09:00:00Z","level":"info","message":"older file"}"#],
        );
        write_lines(
            &dir.path().join("app.2025-01-15.log"),
            &[
                r#"{"timestamp":"2025-01-15T08:00:00Z","level":"INFO","message":"boot"}"#,
                r#"{"timestamp":"2025-01-15T09:00:00Z","level":"error","message":"db down","additional_info":{"action":"connect"}}"#,
                r#"{"timestamp":"2025-01-15T10:00:00Z","message":"recovered"}"#,
                r#"{"timestamp":"2025-01-15T11:00:00Z","level":"warn","mess"#,
            ],
        );
        let engine = LogEngine::new(dir.path());
        (dir, engine)
    }

    #[test]
    fn test_view_defaults_to_newest_file() {
        let (_dir, engine) = setup();
        let result = engine.view(&ViewRequest::default()).unwrap();
        assert_eq!(result.current_file.name(), "app.2025-01-15.log");
        assert_eq!(result.files.len(), 2);
        assert_eq!(result.total_entries(), 3);
        assert_eq!(result.counts.error, 1);
        assert_eq!(result.counts.info, 2);
        let messages: Vec<_> = result.entries.iter().map(|e| e.entry.message.as_str()).collect();
        assert_eq!(messages, vec!["recovered", "db down", "boot"]);
        assert_eq!(result.entries[1].additional_info_json, r#"{"action":"connect"}"#);
        assert_eq!(result.entries[0].additional_info_json, "null");

        let page_json: Vec<LogEntry> = serde_json::from_str(&result.entries_json).unwrap();
        assert_eq!(page_json.len(), 3);
        assert_eq!(page_json[0].message, "recovered");
    }

    #[test]
    fn test_view_paginates_and_counts_whole_filtered_set() {
        let (_dir, engine) = setup();
        let req = ViewParams::from_pairs([("page", "2"), ("page_size", "2")]).into_request(50);
        let result = engine.view(&req).unwrap();
        assert_eq!(result.page.current_page, 2);
        assert_eq!(result.page.total_pages, 2);
        assert!(result.page.has_previous);
        assert!(!result.page.has_next);
        assert_eq!(result.entries.len(), 1);
        assert_eq!(result.entries[0].entry.message, "boot");
        assert_eq!(result.counts.total, 3);
    }

    #[test]
    fn test_view_selected_file() {
        let (_dir, engine) = setup();
        let req = ViewParams::from_pairs([("file", "app.2025-01-14.log")]).into_request(50);
        let result = engine.view(&req).unwrap();
        assert_eq!(result.current_file.name(), "app.2025-01-14.log");
        assert_eq!(result.entries.len(), 1);
    }

    #[test]
    fn test_view_rejects_traversal() {
        let (_dir, engine) = setup();
        let req = ViewParams::from_pairs([("file", "../secrets.log")]).into_request(50);
        let err = engine.view(&req).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_view_missing_selected_file_is_io() {
        let (_dir, engine) = setup();
        let req = ViewParams::from_pairs([("file", "nope.log")]).into_request(50);
        let err = engine.view(&req).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_view_empty_directory_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let engine = LogEngine::new(dir.path());
        let err = engine.view(&ViewRequest::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_view_missing_directory_is_io() {
        let dir = tempfile::tempdir().unwrap();
        let engine = LogEngine::new(dir.path().join("missing"));
        let err = engine.view(&ViewRequest::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_export_json_and_csv() {
        let (_dir, engine) = setup();
        let exported_at = DateTime::parse_from_rfc3339("2025-01-16T00:00:00Z").unwrap();

        let json_req = ExportParams::from_pairs([("file", "app.2025-01-15.log"), ("format", "json")])
            .into_request()
            .unwrap();
        let payload = engine.export_at(&json_req, exported_at).unwrap();
        assert_eq!(payload.format, ExportFormat::Json);
        assert_eq!(payload.entry_count, 3);
        let value: serde_json::Value = serde_json::from_slice(&payload.body).unwrap();
        assert_eq!(value["total_logs"], serde_json::json!(3));

        let csv_req = ExportParams::from_pairs([
            ("file", "app.2025-01-15.log"),
            ("format", "csv"),
            ("date_from", "2025-01-15"),
            ("date_to", "2025-01-15"),
        ])
        .into_request()
        .unwrap();
        let payload = engine.export_at(&csv_req, exported_at).unwrap();
        let text = String::from_utf8(payload.body).unwrap();
        assert_eq!(text.lines().count(), 4);
        assert!(text.contains(r#""db down","connect""#), "got: {text}");
    }

    #[test]
    fn test_stats_and_cleanup() {
        let (dir, engine) = setup();
        let summary = engine.stats().unwrap();
        assert_eq!(summary.total_files, 2);
        let on_disk: u64 = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().metadata().unwrap().len())
            .sum();
        assert_eq!(summary.total_bytes, on_disk);
        assert!(summary.oldest_date <= summary.newest_date);

        let later = Utc::now() + chrono::Duration::days(31);
        let cleaned = engine.cleanup_at(None, later).unwrap();
        assert_eq!(cleaned.retention_days, 30);
        assert_eq!(cleaned.deleted_count, 2);
        assert_eq!(cleaned.reclaimed_bytes, on_disk);
        assert!(cleaned.cutoff_date.is_some());

        let again = engine.cleanup_at(None, later).unwrap();
        assert_eq!(again.deleted_count, 0);
        assert_eq!(engine.stats().unwrap().total_files, 0);
    }
}
