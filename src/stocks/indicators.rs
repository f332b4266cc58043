// Technical indicators over a closing-price series.
//
// Rolling indicators are `None` until their window is full. Exponential
// averages are seeded with the first value and use alpha = 2 / (span + 1)
// with no bias adjustment, so they are defined from the first bar.

use chrono::NaiveDate;
use serde::Serialize;

use super::prices::PriceBar;

/// Added to the average loss so a loss-free window doesn't divide by zero.
const RSI_EPSILON: f64 = 1e-10;

/// Simple moving average over `window` values.
pub fn sma(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }

    let mut out = Vec::with_capacity(values.len());
    let mut sum = 0.0;
    for (i, &v) in values.iter().enumerate() {
        sum += v;
        if i >= window {
            sum -= values[i - window];
        }
        out.push((i + 1 >= window).then(|| sum / window as f64));
    }
    out
}

/// Exponential moving average with span `span`.
pub fn ema(values: &[f64], span: usize) -> Vec<f64> {
    let alpha = 2.0 / (span as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut prev: Option<f64> = None;
    for &v in values {
        let next = match prev {
            Some(p) => alpha * v + (1.0 - alpha) * p,
            None => v,
        };
        out.push(next);
        prev = Some(next);
    }
    out
}

/// Relative strength index from rolling-mean gains and losses.
///
/// The first bar has no change and contributes a zero gain and loss, so the
/// first value appears at index `period - 1`.
pub fn rsi(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let deltas: Vec<f64> = std::iter::once(0.0)
        .chain(values.windows(2).map(|w| w[1] - w[0]))
        .take(values.len())
        .collect();
    let gains: Vec<f64> = deltas.iter().map(|d| d.max(0.0)).collect();
    let losses: Vec<f64> = deltas.iter().map(|d| (-d).max(0.0)).collect();

    sma(&gains, period)
        .into_iter()
        .zip(sma(&losses, period))
        .map(|(gain, loss)| {
            let (gain, loss) = (gain?, loss?);
            let rs = gain / (loss + RSI_EPSILON);
            Some(100.0 - 100.0 / (1.0 + rs))
        })
        .collect()
}

/// MACD line, signal line and histogram.
#[derive(Debug, Clone, PartialEq)]
pub struct Macd {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

pub fn macd(values: &[f64], fast: usize, slow: usize, signal: usize) -> Macd {
    let line: Vec<f64> = ema(values, fast)
        .into_iter()
        .zip(ema(values, slow))
        .map(|(f, s)| f - s)
        .collect();
    let signal_line = ema(&line, signal);
    let histogram = line.iter().zip(&signal_line).map(|(m, s)| m - s).collect();
    Macd {
        macd: line,
        signal: signal_line,
        histogram,
    }
}

/// One bar with its indicator values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorRow {
    pub date: NaiveDate,
    pub close: f64,
    pub sma_20: Option<f64>,
    pub sma_50: Option<f64>,
    pub rsi: Option<f64>,
    pub macd: f64,
    pub signal_line: f64,
}

/// SMA(20), SMA(50), RSI(14) and MACD(12, 26, 9) for every bar.
pub fn compute_indicators(bars: &[PriceBar]) -> Vec<IndicatorRow> {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let sma_20 = sma(&closes, 20);
    let sma_50 = sma(&closes, 50);
    let rsi_14 = rsi(&closes, 14);
    let macd = macd(&closes, 12, 26, 9);

    bars.iter()
        .enumerate()
        .map(|(i, bar)| IndicatorRow {
            date: bar.date,
            close: bar.close,
            sma_20: sma_20[i],
            sma_50: sma_50[i],
            rsi: rsi_14[i],
            macd: macd.macd[i],
            signal_line: macd.signal[i],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sma_window() {
        let out = sma(&[1.0, 2.0, 3.0, 4.0], 3);
        assert_eq!(out, vec![None, None, Some(2.0), Some(3.0)]);
        assert_eq!(sma(&[1.0], 0), vec![None]);
    }

    #[test]
    fn test_ema_unadjusted() {
        // span 3 -> alpha 0.5
        let out = ema(&[2.0, 4.0, 8.0], 3);
        assert_eq!(out, vec![2.0, 3.0, 5.5]);
        assert!(ema(&[], 3).is_empty());
    }

    #[test]
    fn test_rsi_all_gains_is_near_100() {
        let closes: Vec<f64> = (1..=20).map(|x| x as f64).collect();
        let out = rsi(&closes, 14);
        assert!(out[12].is_none());
        let v = out[13].unwrap();
        assert!(v > 99.99 && v <= 100.0);
    }

    #[test]
    fn test_rsi_balanced_is_50() {
        let closes = vec![10.0, 11.0, 10.0, 11.0, 10.0];
        let out = rsi(&closes, 5);
        // gains: 0,1,0,1,0  losses: 0,0,1,0,1  -> equal means
        assert!((out[4].unwrap() - 50.0).abs() < 1e-6);
    }

    #[test]
    fn test_macd_constant_series_is_zero() {
        let m = macd(&[5.0; 40], 12, 26, 9);
        assert!(m.macd.iter().all(|v| v.abs() < 1e-12));
        assert!(m.histogram.iter().all(|v| v.abs() < 1e-12));
    }
}
