// LogKeep - core/parser.rs
//
// Line-oriented parsing of JSON log files into normalised entries.
// Core layer: the parsing itself works on any `BufRead`; `parse_file` is the
// thin wrapper that opens a path.
//
// Each non-blank line is decoded independently as a JSON object. A line that
// fails to decode (truncated trailing write, foreign format, invalid UTF-8,
// oversized) is dropped and counted, never reported as an error: a single bad
// line must not hide the rest of the file. Only failure to open or read the
// file itself propagates.

use crate::core::model::LogEntry;
use crate::platform::fs::open_log_reader;
use crate::util::constants;
use crate::util::error::ParseError;
use chrono::DateTime;
use std::io::{self, BufRead, Read};
use std::path::Path;

/// Result of parsing a single log file.
#[derive(Debug, Default)]
pub struct ParseResult {
    /// Decoded entries, most recent first (reverse of on-disk order).
    pub entries: Vec<LogEntry>,
    /// Physical lines read, including blank and skipped ones.
    pub lines_read: u64,
    /// Non-blank lines that could not be decoded.
    pub lines_skipped: u64,
}

/// Open and parse the log file at `path`.
pub fn parse_file(path: &Path) -> Result<ParseResult, ParseError> {
    let reader = open_log_reader(path).map_err(|e| ParseError::Open {
        file: path.to_path_buf(),
        source: e,
    })?;

    let result = parse_reader(reader).map_err(|e| ParseError::Read {
        file: path.to_path_buf(),
        source: e,
    })?;

    tracing::debug!(
        file = %path.display(),
        entries = result.entries.len(),
        skipped = result.lines_skipped,
        lines = result.lines_read,
        "Parsing complete"
    );

    Ok(result)
}

/// Parse newline-delimited JSON records from `reader`.
///
/// Lines are read as raw bytes so that invalid UTF-8 only costs the line it
/// appears on. Returns entries newest first.
pub fn parse_reader<R: BufRead>(mut reader: R) -> io::Result<ParseResult> {
    let mut result = ParseResult::default();
    let mut buf: Vec<u8> = Vec::with_capacity(constants::LINE_BUFFER_CAPACITY);

    loop {
        buf.clear();
        let (consumed, oversized) =
            read_bounded_line(&mut reader, &mut buf, constants::MAX_LINE_BYTES)?;
        if consumed == 0 {
            break;
        }
        result.lines_read += 1;

        if oversized {
            result.lines_skipped += 1;
            tracing::trace!(
                line = result.lines_read,
                bytes = consumed,
                "Skipping oversized line"
            );
            continue;
        }

        let line = trim_ascii(&buf);
        if line.is_empty() {
            continue;
        }

        match decode_line(line) {
            Some(entry) => result.entries.push(entry),
            None => {
                result.lines_skipped += 1;
                tracing::trace!(
                    line = result.lines_read,
                    preview = %preview(line),
                    "Skipping undecodable line"
                );
            }
        }
    }

    result.entries.reverse();
    Ok(result)
}

/// Read one line into `buf`, buffering at most `limit + 1` bytes of it.
///
/// Returns the bytes consumed from `reader` (0 at end of input) and whether
/// the line exceeded `limit`. The rest of an oversized line is discarded up to
/// and including its newline, so `buf` never grows past `limit + 1`.
fn read_bounded_line<R: BufRead>(
    reader: &mut R,
    buf: &mut Vec<u8>,
    limit: usize,
) -> io::Result<(usize, bool)> {
    let taken = reader
        .by_ref()
        .take(limit as u64 + 1)
        .read_until(b'\n', buf)?;
    if taken <= limit || buf.last() == Some(&b'\n') {
        return Ok((taken, false));
    }

    let mut discarded = 0;
    loop {
        let available = reader.fill_buf()?;
        if available.is_empty() {
            break;
        }
        match available.iter().position(|b| *b == b'\n') {
            Some(i) => {
                reader.consume(i + 1);
                discarded += i + 1;
                break;
            }
            None => {
                let n = available.len();
                reader.consume(n);
                discarded += n;
            }
        }
    }
    Ok((taken + discarded, true))
}

/// Decode and normalise one non-blank line. `None` means "skip this line".
pub fn decode_line(line: &[u8]) -> Option<LogEntry> {
    if line.len() > constants::MAX_LINE_BYTES {
        return None;
    }
    let raw: LogEntry = serde_json::from_slice(line).ok()?;
    Some(normalise(raw))
}

/// Apply the display rules to a freshly decoded record.
fn normalise(mut entry: LogEntry) -> LogEntry {
    if let Some(display) = normalise_timestamp(&entry.timestamp) {
        entry.timestamp = display;
    }

    entry.level = if entry.level.is_empty() {
        constants::DEFAULT_LEVEL.to_string()
    } else {
        entry.level.to_lowercase()
    };

    if entry.additional_info.as_ref().is_some_and(|info| info.is_empty()) {
        entry.additional_info = None;
    }

    entry
}

/// Re-render an RFC 3339 wire timestamp in the canonical display format.
///
/// The wall-clock time of the written offset is kept (no conversion to UTC or
/// local time). Returns `None` for values that are not RFC 3339, which the
/// caller leaves untouched.
pub fn normalise_timestamp(raw: &str) -> Option<String> {
    if raw.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.format(constants::DISPLAY_TIMESTAMP_FORMAT).to_string())
}

fn trim_ascii(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    let end = bytes
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |i| i + 1);
    &bytes[start..end]
}

fn preview(line: &[u8]) -> String {
    let cut = line.len().min(constants::DEBUG_MAX_LINE_PREVIEW);
    String::from_utf8_lossy(&line[..cut]).into_owned()
}

// =============================================================================
// Tests
// =============================================================================
