// LogKeep - platform/config.rs
//
// Platform-specific config directory resolution and config.toml loading with
// startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for LogKeep configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/logkeep/ or %APPDATA%\LogKeep\config\)
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths, or `None` when the platform
    /// offers no home directory to anchor them.
    ///
    /// Runs before logging is initialised, so it reports nothing itself.
    pub fn resolve() -> Option<Self> {
        ProjectDirs::from("", "", constants::APP_ID).map(|proj_dirs| Self {
            config_dir: proj_dirs.config_dir().to_path_buf(),
        })
    }

    /// Default location of config.toml.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[logs]` section.
    pub logs: LogsSection,
    /// `[discovery]` section.
    pub discovery: DiscoverySection,
    /// `[viewer]` section.
    pub viewer: ViewerSection,
    /// `[retention]` section.
    pub retention: RetentionSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[logs]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LogsSection {
    /// Directory holding the log files.
    pub directory: Option<String>,
}

/// `[discovery]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct DiscoverySection {
    /// Include glob patterns.
    pub include_patterns: Option<Vec<String>>,
    /// Maximum directory recursion depth.
    pub max_depth: Option<usize>,
}

/// `[viewer]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ViewerSection {
    /// Page size used when the request names none.
    pub default_page_size: Option<usize>,
}

/// `[retention]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RetentionSection {
    /// Retention window used when the request names none.
    pub days: Option<i64>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
    /// Log file path (empty = stderr only).
    pub file: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Log directory.
    pub log_dir: PathBuf,
    /// Include glob patterns for discovery.
    pub include_patterns: Vec<String>,
    /// Maximum directory recursion depth.
    pub max_depth: usize,
    /// Page size used when the request names none.
    pub default_page_size: usize,
    /// Retention window used when the request names none.
    pub retention_days: i64,
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
    /// Log file path.
    pub log_file: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from(constants::DEFAULT_LOG_DIR),
            include_patterns: constants::DEFAULT_INCLUDE_PATTERNS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            max_depth: constants::DEFAULT_MAX_DEPTH,
            default_page_size: constants::DEFAULT_PAGE_SIZE,
            retention_days: constants::DEFAULT_RETENTION_DAYS,
            log_level: None,
            log_file: None,
        }
    }
}

/// Load and validate `config.toml` from `config_path`.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// A missing file yields defaults with no warnings (first run). An unreadable
/// or unparseable file yields defaults with a warning so the tool still runs.
pub fn load_config(config_path: &Path) -> (AppConfig, Vec<String>) {
    if !config_path.exists() {
        return (AppConfig::default(), Vec::new());
    }

    match read_raw(config_path) {
        Ok(raw) => validate(raw),
        Err(e) => (AppConfig::default(), vec![format!("{e}. Using defaults.")]),
    }
}

/// Load a config file the user named explicitly. Unlike `load_config`, a
/// missing or unparseable file is an error.
pub fn load_explicit_config(config_path: &Path) -> Result<(AppConfig, Vec<String>), ConfigError> {
    let raw = read_raw(config_path)?;
    Ok(validate(raw))
}

/// Configuration as resolved at startup, before logging exists.
#[derive(Debug)]
pub struct StartupConfig {
    pub config: AppConfig,
    /// The config file that was consulted (it may not exist).
    pub source: PathBuf,
    /// Everything worth reporting once logging is up.
    pub warnings: Vec<String>,
}

/// Load the config the CLI asked for: `explicit` must exist and parse;
/// otherwise the platform default is read leniently.
///
/// Emits no diagnostics. The caller initialises logging from the result and
/// then reports `warnings`.
pub fn load_startup_config(explicit: Option<&Path>) -> Result<StartupConfig, ConfigError> {
    if let Some(path) = explicit {
        let (config, warnings) = load_explicit_config(path)?;
        return Ok(StartupConfig {
            config,
            source: path.to_path_buf(),
            warnings,
        });
    }

    let mut warnings = Vec::new();
    let source = match PlatformPaths::resolve() {
        Some(paths) => paths.config_file(),
        None => {
            warnings.push(
                "Could not determine platform directories; looking for config.toml in the current directory."
                    .to_string(),
            );
            PathBuf::from(".").join(constants::CONFIG_FILE_NAME)
        }
    };
    let (config, mut load_warnings) = load_config(&source);
    warnings.append(&mut load_warnings);

    Ok(StartupConfig {
        config,
        source,
        warnings,
    })
}

fn read_raw(config_path: &Path) -> Result<RawConfig, ConfigError> {
    let content = std::fs::read_to_string(config_path).map_err(|e| ConfigError::Io {
        path: config_path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
        path: config_path.to_path_buf(),
        source: e,
    })
}

/// Validate each field against named constants, accumulating all warnings.
pub fn validate(raw: RawConfig) -> (AppConfig, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();
    let mut config = AppConfig::default();

    // -- Logs: directory --
    if let Some(dir) = raw.logs.directory {
        if dir.trim().is_empty() {
            warnings.push(format!(
                "[logs] directory is empty. Using default ({}).",
                constants::DEFAULT_LOG_DIR
            ));
        } else {
            config.log_dir = PathBuf::from(dir);
        }
    }

    // -- Discovery: include_patterns --
    if let Some(patterns) = raw.discovery.include_patterns {
        let valid: Vec<String> = patterns
            .into_iter()
            .filter(|p| match glob::Pattern::new(p) {
                Ok(_) => true,
                Err(e) => {
                    warnings.push(format!(
                        "[discovery] include pattern \"{p}\" is invalid ({e}); ignored."
                    ));
                    false
                }
            })
            .collect();
        if valid.is_empty() {
            warnings.push("[discovery] include_patterns has no usable pattern. Using default.".to_string());
        } else {
            config.include_patterns = valid;
        }
    }

    // -- Discovery: max_depth --
    if let Some(depth) = raw.discovery.max_depth {
        if (1..=constants::ABSOLUTE_MAX_DEPTH).contains(&depth) {
            config.max_depth = depth;
        } else {
            warnings.push(format!(
                "[discovery] max_depth = {depth} is out of range (1-{}). Using default ({}).",
                constants::ABSOLUTE_MAX_DEPTH,
                constants::DEFAULT_MAX_DEPTH,
            ));
        }
    }

    // -- Viewer: default_page_size --
    if let Some(size) = raw.viewer.default_page_size {
        if (1..=constants::MAX_PAGE_SIZE).contains(&size) {
            config.default_page_size = size;
        } else {
            warnings.push(format!(
                "[viewer] default_page_size = {size} is out of range (1-{}). Using default ({}).",
                constants::MAX_PAGE_SIZE,
                constants::DEFAULT_PAGE_SIZE,
            ));
        }
    }

    // -- Retention: days --
    if let Some(days) = raw.retention.days {
        if days > 0 {
            config.retention_days = days;
        } else {
            warnings.push(format!(
                "[retention] days = {days} must be positive. Using default ({}).",
                constants::DEFAULT_RETENTION_DAYS,
            ));
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.clone());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default (info).",
            ));
        }
    }

    // -- Logging: file --
    if let Some(file) = raw.logging.file {
        if !file.is_empty() {
            config.log_file = Some(file);
        }
    }

    (config, warnings)
}
