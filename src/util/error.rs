// LogKeep - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// Every error crossing the engine boundary is classified by `ErrorKind` so the
// caller can tell a server fault from bad request input.
//
// Malformed log lines, unparsable timestamps and filter bounds, and per-file
// failures during directory walks are NOT errors; they are absorbed where they
// occur and never appear in this hierarchy.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// How the caller should treat a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Directory or file unreadable: a server-side fault.
    Io,

    /// Bad request parameters: a client error.
    Validation,

    /// The log directory holds no log files.
    NotFound,
}

/// Top-level error type for all LogKeep operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum LogKeepError {
    /// Log file discovery failed.
    Discovery(DiscoveryError),

    /// A log file could not be read.
    Parse(ParseError),

    /// Directory statistics could not be gathered.
    Stats(StatsError),

    /// Export rendering failed.
    Export(ExportError),

    /// Retention cleanup could not start.
    Retention(RetentionError),

    /// Configuration loading failed.
    Config(ConfigError),

    /// Request parameters were rejected.
    Request(RequestError),

    /// The log directory exists but contains no log files.
    NoLogFiles { dir: PathBuf },
}

impl LogKeepError {
    /// Classify this error for response mapping.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Request(_) => ErrorKind::Validation,
            Self::Export(ExportError::UnsupportedFormat { .. }) => ErrorKind::Validation,
            Self::NoLogFiles { .. } => ErrorKind::NotFound,
            _ => ErrorKind::Io,
        }
    }
}

impl fmt::Display for LogKeepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Discovery(e) => write!(f, "Discovery error: {e}"),
            Self::Parse(e) => write!(f, "Parse error: {e}"),
            Self::Stats(e) => write!(f, "Stats error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::Retention(e) => write!(f, "Retention error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Request(e) => write!(f, "Invalid request: {e}"),
            Self::NoLogFiles { dir } => {
                write!(f, "No log files found in '{}'", dir.display())
            }
        }
    }
}

impl std::error::Error for LogKeepError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Discovery(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Stats(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Retention(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Request(e) => Some(e),
            Self::NoLogFiles { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Discovery errors
// ---------------------------------------------------------------------------

/// Errors related to log file discovery.
#[derive(Debug)]
pub enum DiscoveryError {
    /// The log directory does not exist.
    RootNotFound { path: PathBuf },

    /// The log directory path is not a directory.
    NotADirectory { path: PathBuf },

    /// The log directory could not be read.
    Unreadable { path: PathBuf, source: io::Error },
}

impl fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RootNotFound { path } => {
                write!(f, "Log directory '{}' does not exist", path.display())
            }
            Self::NotADirectory { path } => {
                write!(f, "Log path '{}' is not a directory", path.display())
            }
            Self::Unreadable { path, source } => {
                write!(f, "Cannot read log directory '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for DiscoveryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Unreadable { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<DiscoveryError> for LogKeepError {
    fn from(e: DiscoveryError) -> Self {
        Self::Discovery(e)
    }
}

// ---------------------------------------------------------------------------
// Parse errors
// ---------------------------------------------------------------------------

/// Errors related to reading a log file. Individual bad lines never produce
/// one of these.
#[derive(Debug)]
pub enum ParseError {
    /// The file could not be opened.
    Open { file: PathBuf, source: io::Error },

    /// Reading the file failed part-way through.
    Read { file: PathBuf, source: io::Error },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open { file, source } => {
                write!(f, "'{}': cannot open: {source}", file.display())
            }
            Self::Read { file, source } => {
                write!(f, "'{}': read failed: {source}", file.display())
            }
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Open { source, .. } | Self::Read { source, .. } => Some(source),
        }
    }
}

impl From<ParseError> for LogKeepError {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

// ---------------------------------------------------------------------------
// Stats errors
// ---------------------------------------------------------------------------

/// Errors related to directory-wide statistics.
#[derive(Debug)]
pub enum StatsError {
    /// Walking the directory tree failed.
    Traversal {
        path: PathBuf,
        source: walkdir::Error,
    },
}

impl fmt::Display for StatsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Traversal { path, source } => {
                write!(f, "Error traversing '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for StatsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Traversal { source, .. } => Some(source),
        }
    }
}

impl From<StatsError> for LogKeepError {
    fn from(e: StatsError) -> Self {
        Self::Stats(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to export operations.
#[derive(Debug)]
pub enum ExportError {
    /// The requested format is not one of `json` or `csv`.
    UnsupportedFormat { format: String },

    /// I/O error writing the payload.
    Io { source: io::Error },

    /// CSV serialisation error.
    Csv { source: csv::Error },

    /// JSON serialisation error.
    Json { source: serde_json::Error },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedFormat { format } => write!(
                f,
                "Invalid export format '{format}'. Use 'json' or 'csv'"
            ),
            Self::Io { source } => write!(f, "Export I/O error: {source}"),
            Self::Csv { source } => write!(f, "CSV export error: {source}"),
            Self::Json { source } => write!(f, "JSON export error: {source}"),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source } => Some(source),
            Self::Csv { source } => Some(source),
            Self::Json { source } => Some(source),
            Self::UnsupportedFormat { .. } => None,
        }
    }
}

impl From<ExportError> for LogKeepError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Retention errors
// ---------------------------------------------------------------------------

/// Errors related to retention cleanup. Only a walk that cannot start at all
/// is reported; per-file failures are counted as skipped.
#[derive(Debug)]
pub enum RetentionError {
    /// The top-level log directory could not be walked.
    WalkFailed {
        path: PathBuf,
        source: walkdir::Error,
    },
}

impl fmt::Display for RetentionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WalkFailed { path, source } => {
                write!(f, "Failed to cleanup logs in '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for RetentionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::WalkFailed { source, .. } => Some(source),
        }
    }
}

impl From<RetentionError> for LogKeepError {
    fn from(e: RetentionError) -> Self {
        Self::Retention(e)
    }
}

// ---------------------------------------------------------------------------
// Request errors
// ---------------------------------------------------------------------------

/// Client-input errors raised while validating request parameters.
#[derive(Debug)]
pub enum RequestError {
    /// A required parameter was absent or blank.
    MissingParameter { name: &'static str },

    /// A file name tried to escape the log directory.
    InvalidFileName { name: String },
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingParameter { name } => {
                write!(f, "Missing required parameter '{name}'")
            }
            Self::InvalidFileName { name } => write!(
                f,
                "Log file name '{name}' must be a relative path inside the log directory"
            ),
        }
    }
}

impl std::error::Error for RequestError {}

impl From<RequestError> for LogKeepError {
    fn from(e: RequestError) -> Self {
        Self::Request(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading. Only an explicitly requested
/// config file that cannot be read or parsed is fatal.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
        }
    }
}

impl From<ConfigError> for LogKeepError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for LogKeep results.
pub type Result<T> = std::result::Result<T, LogKeepError>;
