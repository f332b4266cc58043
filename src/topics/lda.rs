// Latent Dirichlet Allocation via collapsed Gibbs sampling.
//
// Each token in the corpus carries a topic assignment. A sweep visits every
// token, removes it from the counts, and resamples its topic from
//
//   p(t) ∝ (n_dt + alpha) * (n_tw + beta) / (n_t + V * beta)
//
// After the final sweep the topic-term counts plus beta are the topic
// weights. Sampling draws from a seeded `StdRng`, so the same matrix and the
// same seed always produce the same weights.

use indicatif::{ProgressBar, ProgressStyle};
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use super::matrix::DocumentTermMatrix;
use super::traits::{TopicModel, TopicWeights};
use crate::error::PipelineError;

/// LDA configuration.
#[derive(Debug, Clone)]
pub struct LdaConfig {
    /// Number of topics (K)
    pub n_topics: usize,
    /// Document-topic prior; defaults to 1/K
    pub alpha: Option<f64>,
    /// Topic-term prior; defaults to 1/K
    pub beta: Option<f64>,
    /// Number of full Gibbs sweeps
    pub n_iterations: usize,
    /// Seed for topic initialization and sampling
    pub seed: u64,
    /// Draw a progress bar while sampling
    pub show_progress: bool,
}

impl Default for LdaConfig {
    fn default() -> Self {
        Self {
            n_topics: 5,
            alpha: None,
            beta: None,
            n_iterations: 200,
            seed: 42,
            show_progress: false,
        }
    }
}

impl LdaConfig {
    pub fn new(n_topics: usize) -> Self {
        Self {
            n_topics,
            ..Default::default()
        }
    }

    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = Some(alpha);
        self
    }

    pub fn beta(mut self, beta: f64) -> Self {
        self.beta = Some(beta);
        self
    }

    pub fn n_iterations(mut self, n: usize) -> Self {
        self.n_iterations = n;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    fn priors(&self) -> (f64, f64) {
        let default = 1.0 / self.n_topics.max(1) as f64;
        (self.alpha.unwrap_or(default), self.beta.unwrap_or(default))
    }
}

/// Gibbs-sampled LDA topic model.
///
/// Holds configuration only; every `fit` starts from fresh counts.
#[derive(Debug, Clone)]
pub struct GibbsLda {
    config: LdaConfig,
}

impl GibbsLda {
    pub fn new(config: LdaConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LdaConfig {
        &self.config
    }
}

/// Mutable sampler state for one fit.
struct Sampler {
    n_topics: usize,
    n_terms: usize,
    alpha: f64,
    beta: f64,
    /// Term index of every token, grouped by document
    tokens: Vec<Vec<usize>>,
    /// Topic of every token, parallel to `tokens`
    assignments: Vec<Vec<usize>>,
    /// K x V, row-major
    topic_term: Vec<u32>,
    /// D x K, row-major
    doc_topic: Vec<u32>,
    topic_total: Vec<u32>,
    probs: Vec<f64>,
}

impl Sampler {
    fn new(matrix: &DocumentTermMatrix, n_topics: usize, alpha: f64, beta: f64) -> Self {
        let n_docs = matrix.n_documents();
        let n_terms = matrix.n_terms();

        let tokens: Vec<Vec<usize>> = (0..n_docs)
            .map(|doc| {
                matrix
                    .row(doc)
                    .flat_map(|(term, count)| std::iter::repeat(term).take(count as usize))
                    .collect()
            })
            .collect();
        let assignments = tokens.iter().map(|t| vec![0; t.len()]).collect();

        Self {
            n_topics,
            n_terms,
            alpha,
            beta,
            tokens,
            assignments,
            topic_term: vec![0; n_topics * n_terms],
            doc_topic: vec![0; n_docs * n_topics],
            topic_total: vec![0; n_topics],
            probs: vec![0.0; n_topics],
        }
    }

    fn initialize(&mut self, rng: &mut StdRng) {
        for (doc, doc_tokens) in self.tokens.iter().enumerate() {
            for (pos, &term) in doc_tokens.iter().enumerate() {
                let topic = rng.random_range(0..self.n_topics);
                self.assignments[doc][pos] = topic;
                self.topic_term[topic * self.n_terms + term] += 1;
                self.doc_topic[doc * self.n_topics + topic] += 1;
                self.topic_total[topic] += 1;
            }
        }
    }

    fn sweep(&mut self, rng: &mut StdRng) {
        let k = self.n_topics;
        let v = self.n_terms;
        let beta_sum = self.beta * v as f64;

        for doc in 0..self.tokens.len() {
            for pos in 0..self.tokens[doc].len() {
                let term = self.tokens[doc][pos];
                let old = self.assignments[doc][pos];

                self.topic_term[old * v + term] -= 1;
                self.doc_topic[doc * k + old] -= 1;
                self.topic_total[old] -= 1;

                let mut total = 0.0;
                for topic in 0..k {
                    let p = (self.doc_topic[doc * k + topic] as f64 + self.alpha)
                        * (self.topic_term[topic * v + term] as f64 + self.beta)
                        / (self.topic_total[topic] as f64 + beta_sum);
                    total += p;
                    self.probs[topic] = total;
                }

                let threshold = rng.random::<f64>() * total;
                let new = self
                    .probs
                    .iter()
                    .position(|&cumulative| cumulative >= threshold)
                    .unwrap_or(k - 1);

                self.topic_term[new * v + term] += 1;
                self.doc_topic[doc * k + new] += 1;
                self.topic_total[new] += 1;
                self.assignments[doc][pos] = new;
            }
        }
    }

    /// Log-likelihood of the current assignments under the smoothed
    /// topic-term and document-topic estimates.
    fn log_likelihood(&self) -> f64 {
        let k = self.n_topics;
        let v = self.n_terms;
        let beta_sum = self.beta * v as f64;
        let mut ll = 0.0;

        for topic in 0..k {
            let denom = self.topic_total[topic] as f64 + beta_sum;
            for term in 0..v {
                let count = self.topic_term[topic * v + term] as f64;
                if count > 0.0 {
                    ll += count * ((count + self.beta) / denom).ln();
                }
            }
        }

        for (doc, doc_tokens) in self.tokens.iter().enumerate() {
            let denom = doc_tokens.len() as f64 + k as f64 * self.alpha;
            for topic in 0..k {
                let count = self.doc_topic[doc * k + topic] as f64;
                if count > 0.0 {
                    ll += count * ((count + self.alpha) / denom).ln();
                }
            }
        }

        ll
    }

    fn weights(&self) -> Array2<f64> {
        Array2::from_shape_fn((self.n_topics, self.n_terms), |(topic, term)| {
            self.topic_term[topic * self.n_terms + term] as f64 + self.beta
        })
    }
}

impl TopicModel for GibbsLda {
    fn n_topics(&self) -> usize {
        self.config.n_topics
    }

    fn fit(&self, matrix: &DocumentTermMatrix) -> Result<TopicWeights, PipelineError> {
        let n_topics = self.config.n_topics;
        if n_topics == 0 {
            return Err(PipelineError::ModelFit("number of topics must be positive".into()));
        }

        let (alpha, beta) = self.config.priors();
        if !(alpha.is_finite() && alpha > 0.0 && beta.is_finite() && beta > 0.0) {
            return Err(PipelineError::ModelFit(format!(
                "priors must be positive (alpha = {alpha}, beta = {beta})"
            )));
        }

        let n_tokens = matrix.total_count();
        if matrix.n_terms() == 0 || n_tokens == 0 {
            return Err(PipelineError::ModelFit(
                "document-term matrix is empty (no tokens to sample)".into(),
            ));
        }

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let mut sampler = Sampler::new(matrix, n_topics, alpha, beta);
        sampler.initialize(&mut rng);

        let pb = if self.config.show_progress {
            let pb = ProgressBar::new(self.config.n_iterations as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("  Sampling [{bar:30}] {pos}/{len} ({eta})")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            pb
        } else {
            ProgressBar::hidden()
        };

        for iteration in 0..self.config.n_iterations {
            sampler.sweep(&mut rng);
            pb.inc(1);
            if iteration % 50 == 49 {
                debug!(
                    iteration = iteration + 1,
                    log_likelihood = sampler.log_likelihood(),
                    "Gibbs sweep"
                );
            }
        }
        pb.finish_and_clear();

        let ll = sampler.log_likelihood();
        if !ll.is_finite() {
            return Err(PipelineError::ModelFit(format!(
                "sampler diverged (log-likelihood = {ll})"
            )));
        }

        info!(
            topics = n_topics,
            terms = matrix.n_terms(),
            tokens = n_tokens,
            iterations = self.config.n_iterations,
            log_likelihood = ll,
            "Fitted LDA model"
        );

        TopicWeights::new(sampler.weights())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_cluster_matrix() -> DocumentTermMatrix {
        // Terms 0-2 co-occur, terms 3-5 co-occur.
        let mut rows = Vec::new();
        for _ in 0..10 {
            rows.push(vec![(0, 2), (1, 2), (2, 2)]);
            rows.push(vec![(3, 2), (4, 2), (5, 2)]);
        }
        DocumentTermMatrix::from_rows(rows, 6)
    }

    #[test]
    fn test_fit_shape_and_non_negative() {
        let model = GibbsLda::new(LdaConfig::new(2).n_iterations(50));
        let weights = model.fit(&two_cluster_matrix()).unwrap();
        assert_eq!(weights.n_topics(), 2);
        assert_eq!(weights.n_terms(), 6);
        assert!(weights.as_array().iter().all(|&w| w > 0.0));
    }

    #[test]
    fn test_fit_mass_matches_token_count() {
        let matrix = two_cluster_matrix();
        let model = GibbsLda::new(LdaConfig::new(3).beta(0.01).n_iterations(10));
        let weights = model.fit(&matrix).unwrap();
        let mass: f64 = weights.as_array().sum();
        let expected = matrix.total_count() as f64 + 0.01 * 3.0 * 6.0;
        assert!((mass - expected).abs() < 1e-6);
    }

    #[test]
    fn test_fit_separates_clusters() {
        let model = GibbsLda::new(LdaConfig::new(2).n_iterations(100));
        let weights = model.fit(&two_cluster_matrix()).unwrap();
        // Whichever topic holds term 0 should also hold term 1 and not term 3.
        let t = if weights.topic(0)[0] > weights.topic(1)[0] { 0 } else { 1 };
        assert!(weights.topic(t)[1] > weights.topic(t)[3]);
    }

    #[test]
    fn test_same_seed_same_weights() {
        let matrix = two_cluster_matrix();
        let a = GibbsLda::new(LdaConfig::new(2).n_iterations(20)).fit(&matrix).unwrap();
        let b = GibbsLda::new(LdaConfig::new(2).n_iterations(20)).fit(&matrix).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_matrix_fails() {
        let matrix = DocumentTermMatrix::from_rows(vec![vec![], vec![]], 3);
        let err = GibbsLda::new(LdaConfig::new(2)).fit(&matrix).unwrap_err();
        assert!(matches!(err, PipelineError::ModelFit(_)));
    }

    #[test]
    fn test_zero_topics_fails() {
        let err = GibbsLda::new(LdaConfig::new(0))
            .fit(&two_cluster_matrix())
            .unwrap_err();
        assert!(matches!(err, PipelineError::ModelFit(_)));
    }
}
