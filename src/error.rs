// Error taxonomy for the topic pipeline.
//
// Every stage fails fast with one of these variants and the error travels up
// unmodified. Only the top-level `run` catches it, logs it, and turns it into
// the "no result" sentinel.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// The pipeline stage an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Config,
    Load,
    Filter,
    Normalize,
    Vectorize,
    Fit,
    Report,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Config => "config",
            Stage::Load => "load",
            Stage::Filter => "filter",
            Stage::Normalize => "normalize",
            Stage::Vectorize => "vectorize",
            Stage::Fit => "fit",
            Stage::Report => "report",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("data file not found: {}", path.display())]
    DataNotFound { path: PathBuf },

    #[error("missing required column '{column}' in {}", path.display())]
    Schema { column: String, path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("no rows matched the target tickers [{}]", tickers.join(", "))]
    EmptyResult { tickers: Vec<String> },

    #[error("no terms survived vectorization of {documents} documents (corpus too small or too uniform)")]
    EmptyVocabulary { documents: usize },

    #[error("topic model fit failed: {0}")]
    ModelFit(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl PipelineError {
    /// The stage that raised this error.
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::DataNotFound { .. }
            | PipelineError::Schema { .. }
            | PipelineError::Malformed { .. } => Stage::Load,
            PipelineError::EmptyResult { .. } => Stage::Filter,
            PipelineError::EmptyVocabulary { .. } => Stage::Vectorize,
            PipelineError::ModelFit(_) => Stage::Fit,
            PipelineError::InvalidConfig(_) => Stage::Config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_mapping() {
        let err = PipelineError::EmptyResult {
            tickers: vec!["AAPL".to_string()],
        };
        assert_eq!(err.stage(), Stage::Filter);
        assert_eq!(err.to_string(), "no rows matched the target tickers [AAPL]");

        let err = PipelineError::ModelFit("degenerate".to_string());
        assert_eq!(err.stage(), Stage::Fit);
        assert_eq!(err.stage().to_string(), "fit");
    }
}
