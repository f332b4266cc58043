// Headline length statistics.

use serde::Serialize;

use crate::news::records::Record;

/// Number of whitespace-separated words in a headline.
pub fn headline_length(headline: &str) -> usize {
    headline.split_whitespace().count()
}

/// Word count of every record's headline, in record order. Headlines that
/// aren't text count as zero words.
pub fn headline_lengths(records: &[Record]) -> Vec<usize> {
    records
        .iter()
        .map(|r| r.headline.as_deref().map(headline_length).unwrap_or(0))
        .collect()
}

/// Descriptive statistics of a numeric sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; undefined for a single value
    pub std: Option<f64>,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

/// Summarize `values`. Quartiles use linear interpolation between the two
/// nearest ranks. Returns `None` for an empty sample.
pub fn describe(values: &[f64]) -> Option<Summary> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let std = (n > 1).then(|| {
        let ss: f64 = sorted.iter().map(|x| (x - mean).powi(2)).sum();
        (ss / (n - 1) as f64).sqrt()
    });

    Some(Summary {
        count: n,
        mean,
        std,
        min: sorted[0],
        q25: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q75: quantile(&sorted, 0.75),
        max: sorted[n - 1],
    })
}

/// Linear-interpolated quantile of an already sorted, non-empty slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}
