// Topic model trait.
//
// The pipeline only needs "document-term matrix in, K x V weights out". The
// default implementation is Gibbs-sampled LDA, but anything that produces
// non-negative per-topic term weights can stand in.

use ndarray::{Array2, ArrayView1, Axis};

use super::matrix::DocumentTermMatrix;
use crate::error::PipelineError;

/// Fitted topic-term weights: one row per topic, one column per vocabulary
/// term. Entries are non-negative and finite. Rows are relative ranking
/// weights, not necessarily probability distributions.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicWeights {
    weights: Array2<f64>,
}

impl TopicWeights {
    /// Wrap a K x V weight matrix, rejecting negative or non-finite entries.
    pub fn new(weights: Array2<f64>) -> Result<Self, PipelineError> {
        if weights.nrows() == 0 {
            return Err(PipelineError::ModelFit("model produced no topics".into()));
        }
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(PipelineError::ModelFit(
                "topic weights must be finite and non-negative".into(),
            ));
        }
        Ok(Self { weights })
    }

    pub fn n_topics(&self) -> usize {
        self.weights.nrows()
    }

    pub fn n_terms(&self) -> usize {
        self.weights.ncols()
    }

    /// Weights of a single topic across the vocabulary.
    pub fn topic(&self, idx: usize) -> ArrayView1<'_, f64> {
        self.weights.row(idx)
    }

    pub fn as_array(&self) -> &Array2<f64> {
        &self.weights
    }

    /// Share of the total weight mass held by each topic.
    pub fn prevalence(&self) -> Vec<f64> {
        let row_sums = self.weights.sum_axis(Axis(1));
        let total: f64 = row_sums.sum();
        row_sums
            .iter()
            .map(|s| if total > 0.0 { s / total } else { 0.0 })
            .collect()
    }
}

/// Trait for fitting a topic model to a document-term matrix.
pub trait TopicModel {
    /// Number of topics this model produces.
    fn n_topics(&self) -> usize;

    /// Fit the model and return its topic-term weights.
    fn fit(&self, matrix: &DocumentTermMatrix) -> Result<TopicWeights, PipelineError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_rejects_negative_weights() {
        assert!(TopicWeights::new(array![[0.5, -0.1]]).is_err());
        assert!(TopicWeights::new(array![[0.5, f64::NAN]]).is_err());
        assert!(TopicWeights::new(Array2::zeros((0, 3))).is_err());
    }

    #[test]
    fn test_prevalence() {
        let w = TopicWeights::new(array![[3.0, 1.0], [0.0, 4.0]]).unwrap();
        let p = w.prevalence();
        assert!((p[0] - 0.5).abs() < 1e-12);
        assert!((p[1] - 0.5).abs() < 1e-12);
        assert_eq!(w.topic(1).to_vec(), vec![0.0, 4.0]);
    }
}
