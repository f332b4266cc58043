// Daily price bars loaded from a CSV export (Date, Open, High, Low, Close,
// optional Adj Close, Volume). Extra columns such as dividends are ignored.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use csv::Reader;
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PriceBar {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Open")]
    pub open: f64,
    #[serde(rename = "High")]
    pub high: f64,
    #[serde(rename = "Low")]
    pub low: f64,
    #[serde(rename = "Close")]
    pub close: f64,
    #[serde(rename = "Adj Close", default)]
    pub adj_close: Option<f64>,
    #[serde(rename = "Volume", default)]
    pub volume: Option<f64>,
}

/// Load price bars from `path`, sorted by date.
pub fn load_prices(path: &Path) -> Result<Vec<PriceBar>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open price file: {}", path.display()))?;

    let mut reader = Reader::from_reader(file);
    let mut bars = Vec::new();
    for (i, result) in reader.deserialize::<PriceBar>().enumerate() {
        let bar: PriceBar = result
            .with_context(|| format!("Failed to parse price row {} in {}", i + 1, path.display()))?;
        bars.push(bar);
    }

    bars.sort_by_key(|b| b.date);
    info!(path = %path.display(), bars = bars.len(), "Loaded price bars");
    Ok(bars)
}
