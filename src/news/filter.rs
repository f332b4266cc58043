// Filter stage: keep only records filed under the target tickers.

use std::collections::HashSet;

use tracing::info;

use super::records::Record;
use crate::error::PipelineError;

/// Keep the records whose ticker is in `tickers`, preserving input order.
///
/// Matching is exact and case-sensitive. An empty result is an error since
/// nothing downstream is defined on zero documents.
pub fn filter_by_tickers(
    records: Vec<Record>,
    tickers: &[String],
) -> Result<Vec<Record>, PipelineError> {
    let allow: HashSet<&str> = tickers.iter().map(String::as_str).collect();
    let total = records.len();

    let filtered: Vec<Record> = records
        .into_iter()
        .filter(|r| allow.contains(r.ticker.as_str()))
        .collect();

    if filtered.is_empty() {
        return Err(PipelineError::EmptyResult {
            tickers: tickers.to_vec(),
        });
    }

    info!(kept = filtered.len(), total, "Filtered records by ticker");
    Ok(filtered)
}
