// LogKeep - main.rs
//
// Command-line entry point. Handles:
// 1. CLI argument parsing
// 2. Config loading (explicit --config, else the platform default)
// 3. Logging initialisation (debug mode support)
// 4. Dispatch to the engine and report rendering
//
// Exit codes: 0 success, 1 I/O fault, 2 bad input, 3 no log files.

use clap::{Parser, Subcommand};
use logkeep::app::engine::LogEngine;
use logkeep::app::query::{CleanupParams, ExportParams, ViewParams};
use logkeep::core::model::ViewerResult;
use logkeep::platform::config;
use logkeep::util::error::{ErrorKind, LogKeepError, Result};
use logkeep::util::{constants, logging};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

/// LogKeep - browse, export, and expire structured JSON log files.
#[derive(Parser, Debug)]
#[command(name = "logkeep", version, about)]
struct Cli {
    /// Log directory (overrides [logs] directory in the config file).
    #[arg(short = 'l', long = "log-dir", global = true)]
    log_dir: Option<PathBuf>,

    /// Config file (defaults to the platform config directory).
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug", global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List log files, newest first.
    List,

    /// Show one page of a log file.
    View {
        /// File to show (defaults to the newest).
        #[arg(short, long)]
        file: Option<String>,
        /// First day to include (YYYY-MM-DD).
        #[arg(long)]
        from: Option<String>,
        /// Last day to include (YYYY-MM-DD).
        #[arg(long)]
        to: Option<String>,
        /// Only entries with this level.
        #[arg(long)]
        level: Option<String>,
        /// Only entries whose message contains this text.
        #[arg(short, long)]
        search: Option<String>,
        #[arg(short, long)]
        page: Option<String>,
        #[arg(long = "page-size")]
        page_size: Option<String>,
        /// Print the full view as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Export the filtered entries of a file.
    Export {
        #[arg(short, long)]
        file: Option<String>,
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
        #[arg(long)]
        level: Option<String>,
        #[arg(short, long)]
        search: Option<String>,
        /// `json` or `csv`.
        #[arg(long, default_value = "json")]
        format: String,
        /// Write to this path instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Delete files older than the retention window.
    Cleanup {
        /// Retention window in days.
        #[arg(long)]
        days: Option<String>,
    },

    /// Directory-wide file statistics.
    Stats,
}

fn main() {
    let cli = Cli::parse();

    let startup = match config::load_startup_config(cli.config.as_deref()) {
        Ok(startup) => startup,
        Err(e) => {
            let e = LogKeepError::from(e);
            eprintln!("Error: {e}");
            std::process::exit(exit_code(&e));
        }
    };
    let mut app_config = startup.config;
    if let Some(dir) = &cli.log_dir {
        app_config.log_dir = dir.clone();
    }

    logging::init(
        cli.debug,
        app_config.log_level.as_deref(),
        app_config.log_file.as_deref(),
    );
    tracing::debug!(
        path = %startup.source.display(),
        found = startup.source.exists(),
        "Config file consulted"
    );
    for warning in &startup.warnings {
        tracing::warn!(warning = %warning, "Config warning");
    }

    tracing::info!(
        version = constants::APP_VERSION,
        log_dir = %app_config.log_dir.display(),
        debug = cli.debug,
        "LogKeep starting"
    );

    let engine = LogEngine::from_config(&app_config);
    if let Err(e) = run(&engine, cli.command) {
        tracing::error!(error = %e, "Command failed");
        eprintln!("Error: {e}");
        std::process::exit(exit_code(&e));
    }
}

fn exit_code(e: &LogKeepError) -> i32 {
    match e.kind() {
        ErrorKind::Io => 1,
        ErrorKind::Validation => 2,
        ErrorKind::NotFound => 3,
    }
}

fn run(engine: &LogEngine, command: Command) -> Result<()> {
    match command {
        Command::List => {
            let files = engine.list_files()?;
            if files.is_empty() {
                println!("No log files in {}", engine.log_dir().display());
            }
            for file in files {
                println!("{file}");
            }
        }
        Command::View {
            file,
            from,
            to,
            level,
            search,
            page,
            page_size,
            json,
        } => {
            let params = ViewParams {
                file,
                date_from: from,
                date_to: to,
                level,
                search,
                page,
                page_size,
            };
            let result = engine.view(&params.into_request(engine.default_page_size()))?;
            if json {
                print_json(&result);
            } else {
                print_view(&result);
            }
        }
        Command::Export {
            file,
            from,
            to,
            level,
            search,
            format,
            output,
        } => {
            let params = ExportParams {
                file,
                date_from: from,
                date_to: to,
                level,
                search,
                format: Some(format),
            };
            let payload = engine.export(&params.into_request()?)?;
            let written = match &output {
                Some(path) => std::fs::write(path, &payload.body),
                None => std::io::stdout().lock().write_all(&payload.body),
            };
            written.map_err(|e| logkeep::util::error::ExportError::Io { source: e })?;
            if let Some(path) = output {
                eprintln!(
                    "Exported {} entries to {}",
                    payload.entry_count,
                    path.display()
                );
            }
        }
        Command::Cleanup { days } => {
            let days = CleanupParams { days }.days(engine.default_retention_days());
            print_json(&engine.cleanup(Some(days))?);
        }
        Command::Stats => print_json(&engine.stats()?),
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(e) => tracing::error!(error = %e, "Could not serialise report"),
    }
}

fn print_view(result: &ViewerResult) {
    println!(
        "{}  (page {}/{}, {} entries: {} error, {} info)",
        result.current_file,
        result.page.current_page,
        result.page.total_pages,
        result.counts.total,
        result.counts.error,
        result.counts.info,
    );
    for view_entry in &result.entries {
        let entry = &view_entry.entry;
        match &entry.additional_info {
            Some(_) => println!(
                "{} [{}] {} {}",
                entry.timestamp, entry.level, entry.message, view_entry.additional_info_json
            ),
            None => println!("{} [{}] {}", entry.timestamp, entry.level, entry.message),
        }
    }
}
