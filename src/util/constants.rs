// LogKeep - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "LogKeep";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "LogKeep";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Log directory and discovery
// =============================================================================

/// Log directory used when neither the CLI nor config.toml names one.
pub const DEFAULT_LOG_DIR: &str = "./storage/logs";

/// Default include glob patterns for log file discovery.
pub const DEFAULT_INCLUDE_PATTERNS: &[&str] = &["*.log"];

/// Maximum directory recursion depth during discovery.
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Hard upper bound on max depth (prevents runaway traversal).
pub const ABSOLUTE_MAX_DEPTH: usize = 50;

// =============================================================================
// Parsing
// =============================================================================

/// Canonical display format for entry timestamps.
pub const DISPLAY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Calendar-day format used for filter bounds and report dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Level assigned to entries whose line carries no level.
pub const DEFAULT_LEVEL: &str = "info";

/// Lines longer than this are dropped instead of decoded. A single log line
/// of this size is almost certainly binary garbage or a runaway writer.
pub const MAX_LINE_BYTES: usize = 1024 * 1024; // 1 MiB

/// Initial capacity of the per-line read buffer.
pub const LINE_BUFFER_CAPACITY: usize = 4 * 1024;

// =============================================================================
// Pagination
// =============================================================================

/// Default number of entries per page.
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Largest accepted page size.
pub const MAX_PAGE_SIZE: usize = 500;

/// First page number.
pub const FIRST_PAGE: usize = 1;

// =============================================================================
// Retention
// =============================================================================

/// Retention window used when the caller supplies none or an invalid one.
pub const DEFAULT_RETENTION_DAYS: i64 = 30;

// =============================================================================
// Export
// =============================================================================

/// CSV header row, written verbatim (unquoted).
pub const CSV_HEADER: &str = "Timestamp,Level,Message,ActionField,AdditionalInfo";

/// Key pulled out of `additional_info` into the CSV `ActionField` column.
pub const ACTION_FIELD_KEY: &str = "action";

/// Base name of the downloaded export file.
pub const EXPORT_FILE_STEM: &str = "logs-export";

// =============================================================================
// Sizes
// =============================================================================

/// Bytes per mebibyte, used for the human-scaled `*_size_mb` report fields.
pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Maximum length of a log line included in trace output.
pub const DEBUG_MAX_LINE_PREVIEW: usize = 200;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
