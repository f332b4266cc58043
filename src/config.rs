use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

/// Default news dataset, relative to the working directory.
pub const DEFAULT_DATA_PATH: &str = "Data/raw_analyst_ratings/raw_analyst_ratings.csv";

/// Tickers analysed when none are configured.
pub const DEFAULT_TICKERS: [&str; 7] = ["MSF", "AAPL", "AMZN", "GOOG", "GOOGL", "FB", "NVDA"];

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded at startup via dotenvy. Every value has a default,
/// and command-line flags override whatever is set here.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// News CSV (NEWSLENS_DATA_PATH)
    pub data_path: PathBuf,
    /// Ticker allow-list (NEWSLENS_TICKERS, comma-separated)
    pub tickers: Vec<String>,
    /// Number of topics (NEWSLENS_TOPICS)
    pub n_topics: usize,
    /// Keywords per topic (NEWSLENS_TOP_N)
    pub top_n: usize,
    /// Sampler seed (NEWSLENS_SEED)
    pub seed: u64,
    /// Gibbs sweeps (NEWSLENS_ITERATIONS)
    pub iterations: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            tickers: DEFAULT_TICKERS.iter().map(|t| t.to_string()).collect(),
            n_topics: 5,
            top_n: 10,
            seed: 42,
            iterations: 200,
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from any key lookup. Unset or blank keys keep
    /// their defaults; numeric values that don't parse are an error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            data_path: get("NEWSLENS_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_path),
            tickers: get("NEWSLENS_TICKERS")
                .map(|v| parse_tickers(&v))
                .unwrap_or(defaults.tickers),
            n_topics: parse_or(get("NEWSLENS_TOPICS"), "NEWSLENS_TOPICS", defaults.n_topics)?,
            top_n: parse_or(get("NEWSLENS_TOP_N"), "NEWSLENS_TOP_N", defaults.top_n)?,
            seed: parse_or(get("NEWSLENS_SEED"), "NEWSLENS_SEED", defaults.seed)?,
            iterations: parse_or(
                get("NEWSLENS_ITERATIONS"),
                "NEWSLENS_ITERATIONS",
                defaults.iterations,
            )?,
        })
    }
}

/// Split a comma-separated ticker list, trimming blanks.
pub fn parse_tickers(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(v) => v
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a non-negative integer, got '{v}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.tickers.len(), 7);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("NEWSLENS_TICKERS", " AAPL, TSLA ,,"),
            ("NEWSLENS_TOPICS", "8"),
            ("NEWSLENS_SEED", "7"),
        ]))
        .unwrap();
        assert_eq!(config.tickers, vec!["AAPL", "TSLA"]);
        assert_eq!(config.n_topics, 8);
        assert_eq!(config.seed, 7);
        assert_eq!(config.top_n, 10);
    }

    #[test]
    fn test_bad_number_is_error() {
        let err = Config::from_lookup(lookup(&[("NEWSLENS_TOP_N", "ten")])).unwrap_err();
        assert!(err.to_string().contains("NEWSLENS_TOP_N"));
    }
}
