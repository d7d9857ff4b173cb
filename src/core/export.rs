// LogKeep - core/export.rs
//
// CSV and JSON export of filtered log entries.
// Core layer: writes to any Write trait object. Never truncates; bounding the
// input (e.g. with a date range) is the caller's job.

use crate::core::model::LogEntry;
use crate::util::constants;
use crate::util::error::ExportError;
use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde::Serialize;
use serde_json::Value;
use std::io::Write;
use std::str::FromStr;

/// Supported download formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(ExportError::UnsupportedFormat {
                format: other.to_string(),
            }),
        }
    }
}

/// A rendered export ready to be sent as a download.
#[derive(Debug, Clone)]
pub struct ExportPayload {
    pub format: ExportFormat,
    pub body: Vec<u8>,
    /// Number of entries written.
    pub entry_count: usize,
}

impl ExportPayload {
    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }

    /// Suggested download file name, e.g. `logs-export.csv`.
    pub fn file_name(&self) -> String {
        format!("{}.{}", constants::EXPORT_FILE_STEM, self.format.extension())
    }

    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.file_name())
    }
}

/// Render `entries` from `source_file` in `format`.
pub fn render(
    entries: &[LogEntry],
    source_file: &str,
    format: ExportFormat,
    exported_at: DateTime<FixedOffset>,
) -> Result<ExportPayload, ExportError> {
    let mut body = Vec::new();
    let entry_count = match format {
        ExportFormat::Json => export_json(entries, source_file, exported_at, &mut body)?,
        ExportFormat::Csv => export_csv(entries, &mut body)?,
    };

    tracing::debug!(
        file = source_file,
        format = format.extension(),
        entries = entry_count,
        bytes = body.len(),
        "Export rendered"
    );

    Ok(ExportPayload {
        format,
        body,
        entry_count,
    })
}

/// JSON envelope around the exported entries.
#[derive(Serialize)]
struct JsonExport<'a> {
    exported_at: String,
    file: &'a str,
    total_logs: usize,
    logs: &'a [LogEntry],
}

/// Export entries as a single compact JSON object.
pub fn export_json<W: Write>(
    entries: &[LogEntry],
    source_file: &str,
    exported_at: DateTime<FixedOffset>,
    writer: W,
) -> Result<usize, ExportError> {
    let envelope = JsonExport {
        exported_at: exported_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        file: source_file,
        total_logs: entries.len(),
        logs: entries,
    };
    serde_json::to_writer(writer, &envelope).map_err(|e| ExportError::Json { source: e })?;
    Ok(entries.len())
}

/// Export entries as CSV.
///
/// Writes: Timestamp, Level, Message, ActionField, AdditionalInfo.
/// The header row goes out verbatim; every data field is quoted.
pub fn export_csv<W: Write>(entries: &[LogEntry], mut writer: W) -> Result<usize, ExportError> {
    writer
        .write_all(constants::CSV_HEADER.as_bytes())
        .and_then(|()| writer.write_all(b"\n"))
        .map_err(|e| ExportError::Io { source: e })?;

    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    let mut count = 0;
    for entry in entries {
        let action = entry
            .info_value(constants::ACTION_FIELD_KEY)
            .map(action_text)
            .unwrap_or_default();
        let info = match &entry.additional_info {
            Some(_) => entry.additional_info_json(),
            None => String::new(),
        };

        csv_writer
            .write_record([
                entry.timestamp.as_str(),
                entry.level.as_str(),
                entry.message.as_str(),
                action.as_str(),
                info.as_str(),
            ])
            .map_err(|e| ExportError::Csv { source: e })?;
        count += 1;
    }

    csv_writer
        .flush()
        .map_err(|e| ExportError::Io { source: e })?;

    Ok(count)
}

/// Strings are written bare; any other JSON value in compact JSON form.
fn action_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
