// Record source: load news items from a delimited file.
//
// Only the headline and ticker columns are required. Publisher and date are
// picked up when present and left empty otherwise. Cells are read as raw
// bytes so that a headline which isn't valid UTF-8 can be carried through as
// "not text" instead of failing the whole load.

use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::{ByteRecord, ReaderBuilder};
use tracing::{debug, info};

use crate::error::PipelineError;

/// Column holding the headline text.
pub const HEADLINE_COLUMN: &str = "headline";
/// Accepted names for the ticker column, in order of preference.
pub const TICKER_COLUMNS: [&str; 3] = ["stock", "ticker", "symbol"];
pub const PUBLISHER_COLUMN: &str = "publisher";
pub const DATE_COLUMN: &str = "date";

/// One news item.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Headline text, or `None` if the cell wasn't valid text
    pub headline: Option<String>,
    /// Stock symbol the item is filed under
    pub ticker: String,
    /// Publication time as local wall-clock time
    pub published: Option<NaiveDateTime>,
    pub publisher: Option<String>,
}

impl Record {
    /// Convenience constructor for a record with only a headline and ticker.
    pub fn new(headline: impl Into<String>, ticker: impl Into<String>) -> Self {
        Self {
            headline: Some(headline.into()),
            ticker: ticker.into(),
            published: None,
            publisher: None,
        }
    }
}

/// Column positions resolved from the header row.
struct Columns {
    headline: usize,
    ticker: usize,
    publisher: Option<usize>,
    date: Option<usize>,
}

impl Columns {
    fn locate(headers: &ByteRecord, path: &Path) -> Result<Self, PipelineError> {
        let names: Vec<String> = headers
            .iter()
            .map(|h| String::from_utf8_lossy(h).trim().to_string())
            .collect();
        let find = |name: &str| names.iter().position(|n| n == name);

        let ticker = TICKER_COLUMNS
            .iter()
            .find_map(|name| find(name))
            .ok_or_else(|| PipelineError::Schema {
                column: TICKER_COLUMNS[0].to_string(),
                path: path.to_path_buf(),
            })?;
        let headline = find(HEADLINE_COLUMN).ok_or_else(|| PipelineError::Schema {
            column: HEADLINE_COLUMN.to_string(),
            path: path.to_path_buf(),
        })?;

        Ok(Self {
            headline,
            ticker,
            publisher: find(PUBLISHER_COLUMN),
            date: find(DATE_COLUMN),
        })
    }

    fn record_from(&self, row: &ByteRecord) -> Record {
        let text = |idx: usize| row.get(idx).and_then(|b| std::str::from_utf8(b).ok());

        let headline = text(self.headline).map(str::to_string);
        if headline.is_none() {
            debug!(
                line = ?row.position().map(|p| p.line()),
                "Headline is not valid UTF-8"
            );
        }

        Record {
            headline,
            ticker: row
                .get(self.ticker)
                .map(|b| String::from_utf8_lossy(b).into_owned())
                .unwrap_or_default(),
            published: self.date.and_then(text).and_then(parse_timestamp),
            publisher: self
                .publisher
                .and_then(text)
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string),
        }
    }
}

/// Load every record from the file at `path`, preserving row order.
pub fn load_records(path: &Path) -> Result<Vec<Record>, PipelineError> {
    if !path.exists() {
        return Err(PipelineError::DataNotFound {
            path: path.to_path_buf(),
        });
    }

    let malformed = |source: csv::Error| PipelineError::Malformed {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = ReaderBuilder::new().from_path(path).map_err(malformed)?;
    let headers = reader.byte_headers().map_err(malformed)?.clone();
    let columns = Columns::locate(&headers, path)?;

    let mut records = Vec::new();
    let mut row = ByteRecord::new();
    while reader.read_byte_record(&mut row).map_err(malformed)? {
        records.push(columns.record_from(&row));
    }

    info!(
        path = %path.display(),
        records = records.len(),
        "Loaded news records"
    );
    Ok(records)
}

/// Parse a publication timestamp, keeping the local wall-clock time.
///
/// Accepts `2020-06-05 10:30:54-04:00`, RFC 3339, `2020-06-05 10:30:54`
/// and bare dates. Anything else yields `None`.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%:z") {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
