// The headline topic pipeline.
//
// Each stage is a method that consumes the previous stage's state and returns
// the next one:
//
//   Corpus -> FilteredCorpus -> CleanedCorpus -> VectorizedCorpus
//          -> FittedCorpus -> TopicRun
//
// There is no way to ask for keywords before a model has been fitted, or to
// fit before vectorizing, because those methods only exist on the later
// states. A run owns everything it builds; nothing is shared between runs.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{error, info};

use super::lda::{GibbsLda, LdaConfig};
use super::matrix::DocumentTermMatrix;
use super::normalize::clean_headlines;
use super::report::{extract_keywords, TopicKeywords};
use super::traits::{TopicModel, TopicWeights};
use super::vectorizer::{CountVectorizer, Vocabulary};
use crate::error::{PipelineError, Stage};
use crate::news::filter::filter_by_tickers;
use crate::news::records::{load_records, Record};

/// Inputs to a topic pipeline run.
#[derive(Debug, Clone)]
pub struct TopicConfig {
    pub data_path: PathBuf,
    /// Ticker allow-list (case-sensitive)
    pub tickers: Vec<String>,
    /// Number of topics (K)
    pub n_topics: usize,
    /// Keywords reported per topic
    pub top_n: usize,
    pub seed: u64,
    /// Gibbs sweeps
    pub iterations: usize,
    pub show_progress: bool,
}

impl TopicConfig {
    /// Defaults: 5 topics, 10 keywords, seed 42, 200 sweeps, no progress bar.
    pub fn new(data_path: impl Into<PathBuf>, tickers: Vec<String>) -> Self {
        Self {
            data_path: data_path.into(),
            tickers,
            n_topics: 5,
            top_n: 10,
            seed: 42,
            iterations: 200,
            show_progress: false,
        }
    }

    pub fn n_topics(mut self, n: usize) -> Self {
        self.n_topics = n;
        self
    }

    pub fn top_n(mut self, n: usize) -> Self {
        self.top_n = n;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn iterations(mut self, n: usize) -> Self {
        self.iterations = n;
        self
    }

    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.tickers.is_empty() {
            return Err(PipelineError::InvalidConfig(
                "ticker allow-list must not be empty".into(),
            ));
        }
        if self.n_topics == 0 {
            return Err(PipelineError::InvalidConfig(
                "number of topics must be at least 1".into(),
            ));
        }
        if self.top_n == 0 {
            return Err(PipelineError::InvalidConfig(
                "keywords per topic must be at least 1".into(),
            ));
        }
        if self.iterations == 0 {
            return Err(PipelineError::InvalidConfig(
                "sampling iterations must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// The topic model this configuration describes.
    pub fn model(&self) -> GibbsLda {
        GibbsLda::new(
            LdaConfig::new(self.n_topics)
                .seed(self.seed)
                .n_iterations(self.iterations)
                .show_progress(self.show_progress),
        )
    }
}

/// Loaded records, before filtering.
#[derive(Debug, Clone)]
pub struct Corpus {
    records: Vec<Record>,
}

impl Corpus {
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        Ok(Self::from_records(load_records(path)?))
    }

    pub fn from_records(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn filter(self, tickers: &[String]) -> Result<FilteredCorpus, PipelineError> {
        let total = self.records.len();
        let records = filter_by_tickers(self.records, tickers)?;
        Ok(FilteredCorpus { records, total })
    }
}

/// Records restricted to the target tickers. Never empty.
#[derive(Debug, Clone)]
pub struct FilteredCorpus {
    records: Vec<Record>,
    total: usize,
}

impl FilteredCorpus {
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn normalize(self) -> CleanedCorpus {
        let documents = clean_headlines(&self.records);
        let empty = documents.iter().filter(|d| d.trim().is_empty()).count();
        info!(
            stage = %Stage::Normalize,
            documents = documents.len(),
            empty,
            "Cleaned headlines"
        );
        CleanedCorpus {
            filtered: self.records.len(),
            total: self.total,
            documents,
        }
    }
}

/// One cleaned headline per filtered record, in order.
#[derive(Debug, Clone)]
pub struct CleanedCorpus {
    documents: Vec<String>,
    filtered: usize,
    total: usize,
}

impl CleanedCorpus {
    pub fn documents(&self) -> &[String] {
        &self.documents
    }

    pub fn vectorize(self, vectorizer: &CountVectorizer) -> Result<VectorizedCorpus, PipelineError> {
        let (matrix, vocabulary) = vectorizer.fit_transform(&self.documents)?;
        Ok(VectorizedCorpus {
            matrix,
            vocabulary,
            filtered: self.filtered,
            total: self.total,
        })
    }
}

#[derive(Debug, Clone)]
pub struct VectorizedCorpus {
    matrix: DocumentTermMatrix,
    vocabulary: Vocabulary,
    filtered: usize,
    total: usize,
}

impl VectorizedCorpus {
    pub fn matrix(&self) -> &DocumentTermMatrix {
        &self.matrix
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn fit(self, model: &dyn TopicModel) -> Result<FittedCorpus, PipelineError> {
        let weights = model.fit(&self.matrix)?;
        Ok(FittedCorpus {
            matrix: self.matrix,
            vocabulary: self.vocabulary,
            weights,
            filtered: self.filtered,
            total: self.total,
        })
    }
}

#[derive(Debug, Clone)]
pub struct FittedCorpus {
    matrix: DocumentTermMatrix,
    vocabulary: Vocabulary,
    weights: TopicWeights,
    filtered: usize,
    total: usize,
}

impl FittedCorpus {
    pub fn weights(&self) -> &TopicWeights {
        &self.weights
    }

    pub fn report(self, top_n: usize) -> TopicRun {
        let topics = extract_keywords(&self.weights, &self.vocabulary, top_n);
        info!(
            stage = %Stage::Report,
            topics = topics.len(),
            keywords_per_topic = top_n.min(self.vocabulary.len()),
            "Extracted topic keywords"
        );
        TopicRun {
            topics,
            matrix: self.matrix,
            vocabulary: self.vocabulary,
            weights: self.weights,
            filtered_records: self.filtered,
            total_records: self.total,
        }
    }
}

/// Result of a complete run.
#[derive(Debug, Clone)]
pub struct TopicRun {
    /// Keyword lists in topic order ("Topic 1" first)
    pub topics: Vec<TopicKeywords>,
    /// Document-term matrix, one row per filtered record
    pub matrix: DocumentTermMatrix,
    pub vocabulary: Vocabulary,
    pub weights: TopicWeights,
    pub filtered_records: usize,
    pub total_records: usize,
}

impl TopicRun {
    /// Keywords for a topic label such as "Topic 2".
    pub fn keywords(&self, label: &str) -> Option<&[String]> {
        self.topics
            .iter()
            .find(|t| t.label == label)
            .map(|t| t.keywords.as_slice())
    }

    pub fn summary(&self) -> RunSummary {
        let prevalence = self.weights.prevalence();
        RunSummary {
            total_records: self.total_records,
            filtered_records: self.filtered_records,
            vocabulary_size: self.vocabulary.len(),
            matrix_nonzero: self.matrix.nnz(),
            topics: self
                .topics
                .iter()
                .zip(prevalence)
                .map(|(t, share)| TopicSummary {
                    label: t.label.clone(),
                    prevalence: share,
                    keywords: t
                        .keywords
                        .iter()
                        .map(|term| KeywordSummary {
                            term: term.clone(),
                            documents: self
                                .vocabulary
                                .index_of(term)
                                .and_then(|idx| self.vocabulary.document_frequency(idx))
                                .unwrap_or(0),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

/// Serializable digest of a run, for JSON export.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub total_records: usize,
    pub filtered_records: usize,
    pub vocabulary_size: usize,
    pub matrix_nonzero: usize,
    pub topics: Vec<TopicSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopicSummary {
    pub label: String,
    pub prevalence: f64,
    pub keywords: Vec<KeywordSummary>,
}

/// A keyword and the number of filtered headlines it occurs in.
#[derive(Debug, Clone, Serialize)]
pub struct KeywordSummary {
    pub term: String,
    pub documents: usize,
}

/// Run every stage in order, stopping at the first failure.
pub fn try_run(config: &TopicConfig) -> Result<TopicRun, PipelineError> {
    config.validate()?;

    info!(path = %config.data_path.display(), "Loading and filtering data");
    let filtered = Corpus::load(&config.data_path)?.filter(&config.tickers)?;

    let vectorized = filtered.normalize().vectorize(&CountVectorizer::new())?;

    info!(topics = config.n_topics, seed = config.seed, "Fitting topic model");
    let fitted = vectorized.fit(&config.model())?;

    Ok(fitted.report(config.top_n))
}

/// Run the pipeline, logging any failure and returning `None` in its place.
pub fn run(config: &TopicConfig) -> Option<TopicRun> {
    match try_run(config) {
        Ok(run) => Some(run),
        Err(e) => {
            error!(stage = %e.stage(), error = %e, "Topic pipeline failed");
            None
        }
    }
}
