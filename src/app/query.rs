// LogKeep - app/query.rs
//
// Turns raw query-style parameters (as an HTTP layer or the CLI receives
// them) into typed requests for the engine.
//
// Parsing is lenient: blank values count as absent, bad numbers
// fall back to defaults, bad dates drop that side of the range. Only a missing
// export file and an unknown export format are rejected.

use crate::core::export::ExportFormat;
use crate::core::filter::{DateRange, FilterState};
use crate::core::paginate::PageRequest;
use crate::util::constants;
use crate::util::error::{LogKeepError, RequestError};

/// Raw viewer parameters, exactly as received.
#[derive(Debug, Clone, Default)]
pub struct ViewParams {
    pub file: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub level: Option<String>,
    pub search: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
}

/// Raw export parameters, exactly as received.
#[derive(Debug, Clone, Default)]
pub struct ExportParams {
    pub file: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub level: Option<String>,
    pub search: Option<String>,
    pub format: Option<String>,
}

/// Raw cleanup parameters, exactly as received.
#[derive(Debug, Clone, Default)]
pub struct CleanupParams {
    pub days: Option<String>,
}

/// Validated viewer request.
#[derive(Debug, Clone, Default)]
pub struct ViewRequest {
    /// File to show; `None` selects the newest file.
    pub file: Option<String>,
    pub filter: FilterState,
    pub page: PageRequest,
}

/// Validated export request.
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub file: String,
    pub filter: FilterState,
    pub format: ExportFormat,
}

impl ViewParams {
    /// Collect parameters from `key=value` pairs. Unknown keys are ignored;
    /// a repeated key keeps its last value.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key {
                "file" => &mut params.file,
                "date_from" => &mut params.date_from,
                "date_to" => &mut params.date_to,
                "level" => &mut params.level,
                "search" => &mut params.search,
                "page" => &mut params.page,
                "page_size" => &mut params.page_size,
                _ => continue,
            };
            *slot = Some(value.to_string());
        }
        params
    }

    /// Sanitise into a request. `default_page_size` applies when the page
    /// size is absent or outside `1..=MAX_PAGE_SIZE`.
    pub fn into_request(self, default_page_size: usize) -> ViewRequest {
        let page = parse_positive(self.page.as_deref())
            .and_then(|p| usize::try_from(p).ok())
            .unwrap_or(constants::FIRST_PAGE);
        let page_size = parse_positive(self.page_size.as_deref())
            .and_then(|s| usize::try_from(s).ok())
            .filter(|s| *s <= constants::MAX_PAGE_SIZE)
            .unwrap_or(default_page_size);

        ViewRequest {
            file: non_blank(self.file),
            filter: build_filter(self.date_from, self.date_to, self.level, self.search),
            page: PageRequest::new(page, page_size),
        }
    }
}

impl ExportParams {
    /// Collect parameters from `key=value` pairs. Unknown keys are ignored.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key {
                "file" => &mut params.file,
                "date_from" => &mut params.date_from,
                "date_to" => &mut params.date_to,
                "level" => &mut params.level,
                "search" => &mut params.search,
                "format" => &mut params.format,
                _ => continue,
            };
            *slot = Some(value.to_string());
        }
        params
    }

    /// Validate into a request. Fails on a missing file or unknown format.
    pub fn into_request(self) -> Result<ExportRequest, LogKeepError> {
        let file = non_blank(self.file).ok_or(RequestError::MissingParameter { name: "file" })?;
        let format: ExportFormat = self.format.as_deref().unwrap_or("").parse()?;

        Ok(ExportRequest {
            file,
            filter: build_filter(self.date_from, self.date_to, self.level, self.search),
            format,
        })
    }
}

impl CleanupParams {
    /// Retention window; non-numeric or non-positive input becomes the default.
    pub fn days(&self, default_days: i64) -> i64 {
        parse_positive(self.days.as_deref()).unwrap_or(default_days)
    }
}

/// Parse a strictly positive integer, ignoring surrounding whitespace.
pub fn parse_positive(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|n| *n > 0)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn build_filter(
    date_from: Option<String>,
    date_to: Option<String>,
    level: Option<String>,
    search: Option<String>,
) -> FilterState {
    FilterState {
        date_range: DateRange::parse(date_from.as_deref(), date_to.as_deref()),
        level: non_blank(level),
        text_search: search.unwrap_or_default(),
    }
}
