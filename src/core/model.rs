// LogKeep - core/model.rs
//
// Core data model types. Pure data definitions with no I/O.
//
// These types are the shared vocabulary across all layers. Everything here is
// derived fresh from the filesystem per operation and never persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// Log Entry (normalised output of parsing)
// =============================================================================

/// Open-ended structured context attached to an entry.
pub type AdditionalInfo = Map<String, Value>;

/// A single normalised log line.
///
/// Produced only by the parser, after which it is never mutated: `timestamp`
/// is in the canonical `YYYY-MM-DD HH:MM:SS` form whenever the wire value was
/// valid RFC 3339 (otherwise the raw value is kept), and `level` is lowercase
/// and never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub timestamp: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub level: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<AdditionalInfo>,
}

/// Writers occasionally emit `"level": null`; treat it like a missing field.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl LogEntry {
    /// Value stored under `key` in the additional info, if any.
    pub fn info_value(&self, key: &str) -> Option<&Value> {
        self.additional_info.as_ref().and_then(|info| info.get(key))
    }

    /// Compact JSON rendering of the additional info (`null` when absent).
    pub fn additional_info_json(&self) -> String {
        match &self.additional_info {
            Some(info) => Value::Object(info.clone()).to_string(),
            None => Value::Null.to_string(),
        }
    }
}

// =============================================================================
// Log File (output of discovery)
// =============================================================================

/// A log file found under the log directory, identified by its path relative
/// to that directory (`/`-separated). For flat layouts this is the file name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct LogFile(pub String);

impl LogFile {
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Final path segment; the primary ordering key.
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

impl std::fmt::Display for LogFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Statistics
// =============================================================================

/// Per-view counts over the filtered (pre-pagination) entry set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LevelCounts {
    pub total: usize,
    pub error: usize,
    pub info: usize,
}

/// Aggregate over every file in the log directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryStats {
    pub total_files: usize,
    pub total_bytes: u64,
    /// `None` when the directory holds no files.
    pub oldest_modified: Option<DateTime<Utc>>,
    pub newest_modified: Option<DateTime<Utc>>,
}

// =============================================================================
// Pagination
// =============================================================================

/// Navigation metadata for one page of a filtered result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub current_page: usize,
    pub total_pages: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

/// One page of items plus its navigation metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub info: PageInfo,
}

// =============================================================================
// Viewer Result
// =============================================================================

/// An entry on the current page, with its additional info pre-rendered for
/// display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewEntry {
    #[serde(flatten)]
    pub entry: LogEntry,

    #[serde(skip)]
    pub additional_info_json: String,
}

impl From<LogEntry> for ViewEntry {
    fn from(entry: LogEntry) -> Self {
        let additional_info_json = entry.additional_info_json();
        Self {
            entry,
            additional_info_json,
        }
    }
}

/// The composite handed to the rendering layer for one viewer request.
#[derive(Debug, Clone, Serialize)]
pub struct ViewerResult {
    /// All log files, newest first.
    pub files: Vec<LogFile>,

    /// The file whose entries are shown.
    pub current_file: LogFile,

    /// Current page of entries, newest first.
    pub entries: Vec<ViewEntry>,

    /// Compact JSON array of the current page, for client-side use.
    pub entries_json: String,

    /// Counts over the whole filtered set, not just this page.
    pub counts: LevelCounts,

    pub page: PageInfo,
}

impl ViewerResult {
    /// Number of entries after filtering, across all pages.
    pub fn total_entries(&self) -> usize {
        self.counts.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entry_deserialises_with_missing_fields() {
        let entry: LogEntry = serde_json::from_str(r#"{"message":"hi"}"#).unwrap();
        assert_eq!(entry.message, "hi");
        assert!(entry.timestamp.is_empty());
        assert!(entry.level.is_empty());
        assert!(entry.additional_info.is_none());
    }

    #[test]
    fn test_entry_null_fields_become_empty() {
        let entry: LogEntry =
            serde_json::from_str(r#"{"timestamp":null,"level":null,"message":"x","additional_info":null}"#)
                .unwrap();
        assert!(entry.timestamp.is_empty());
        assert!(entry.level.is_empty());
        assert!(entry.additional_info.is_none());
    }

    #[test]
    fn test_entry_serialisation_omits_absent_info() {
        let entry = LogEntry {
            timestamp: "2025-01-15 10:00:00".to_string(),
            level: "info".to_string(),
            message: "started".to_string(),
            additional_info: None,
        };
        let text = serde_json::to_string(&entry).unwrap();
        assert!(!text.contains("additional_info"), "got: {text}");
    }

    #[test]
    fn test_additional_info_helpers() {
        let mut info = AdditionalInfo::new();
        info.insert("action".to_string(), json!("login"));
        let entry = LogEntry {
            timestamp: String::new(),
            level: "info".to_string(),
            message: String::new(),
            additional_info: Some(info),
        };
        assert_eq!(entry.info_value("action"), Some(&json!("login")));
        assert_eq!(entry.info_value("missing"), None);
        assert_eq!(entry.additional_info_json(), r#"{"action":"login"}"#);

        let bare = LogEntry {
            additional_info: None,
            ..entry
        };
        assert_eq!(bare.additional_info_json(), "null");
    }

    #[test]
    fn test_log_file_name_segments() {
        let nested = LogFile("worker/app.2025-01-15.log".to_string());
        assert_eq!(nested.file_name(), "app.2025-01-15.log");
        let flat = LogFile("app.log".to_string());
        assert_eq!(flat.file_name(), "app.log");
    }
}
