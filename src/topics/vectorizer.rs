// Bag-of-words count vectorizer.
//
// Tokens are maximal runs of alphanumeric (or underscore) characters at least
// two characters long. Stop words are dropped, then terms are pruned by
// document frequency: a term must occur in at least `min_df` documents and in
// no more than `max_df_ratio` of them. The surviving terms are sorted so that
// column order is independent of input order.
//
// The vectorizer holds configuration only. Every call to `fit_transform`
// builds a fresh vocabulary, so nothing leaks between runs.

use std::collections::{BTreeMap, HashMap, HashSet};

use stop_words::{get, LANGUAGE};
use tracing::info;

use super::matrix::DocumentTermMatrix;
use crate::error::PipelineError;

/// The ordered set of retained terms, aligned with matrix columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Vocabulary {
    terms: Vec<String>,
    document_frequencies: Vec<usize>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    fn new(entries: Vec<(String, usize)>) -> Self {
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, (term, _))| (term.clone(), i))
            .collect();
        let (terms, document_frequencies) = entries.into_iter().unzip();
        Self {
            terms,
            document_frequencies,
            index,
        }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn term(&self, idx: usize) -> Option<&str> {
        self.terms.get(idx).map(String::as_str)
    }

    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    /// How many documents contained the term at `idx`.
    pub fn document_frequency(&self, idx: usize) -> Option<usize> {
        self.document_frequencies.get(idx).copied()
    }
}

/// Count vectorizer with document-frequency pruning.
#[derive(Debug, Clone)]
pub struct CountVectorizer {
    stop_words: HashSet<String>,
    /// Upper bound on the fraction of documents a term may appear in
    pub max_df_ratio: f64,
    /// Minimum number of documents a term must appear in
    pub min_df: usize,
}

impl Default for CountVectorizer {
    fn default() -> Self {
        let stop_words: Vec<String> = get(LANGUAGE::English);
        Self::with_stop_words(stop_words)
    }
}

impl CountVectorizer {
    /// English stop words, `max_df_ratio` 0.95, `min_df` 2.
    pub fn new() -> Self {
        Self::default()
    }

    /// Same thresholds as `new`, with a custom stop-word list.
    pub fn with_stop_words<I, S>(stop_words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            stop_words: stop_words
                .into_iter()
                .map(|w| w.as_ref().to_lowercase())
                .collect(),
            max_df_ratio: 0.95,
            min_df: 2,
        }
    }

    pub fn max_df_ratio(mut self, ratio: f64) -> Self {
        self.max_df_ratio = ratio;
        self
    }

    pub fn min_df(mut self, min_df: usize) -> Self {
        self.min_df = min_df;
        self
    }

    /// Split a document into tokens, dropping stop words.
    pub fn tokenize<'a>(&self, document: &'a str) -> Vec<&'a str> {
        document
            .split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .filter(|t| t.chars().nth(1).is_some())
            .filter(|t| !self.stop_words.contains(*t))
            .collect()
    }

    /// Learn the vocabulary from `documents` and count every term.
    ///
    /// Rows of the returned matrix follow the order of `documents`.
    pub fn fit_transform(
        &self,
        documents: &[String],
    ) -> Result<(DocumentTermMatrix, Vocabulary), PipelineError> {
        let n_docs = documents.len();
        let tokenized: Vec<Vec<&str>> = documents.iter().map(|d| self.tokenize(d)).collect();

        let mut doc_freq: HashMap<&str, usize> = HashMap::new();
        for tokens in &tokenized {
            let unique: HashSet<&str> = tokens.iter().copied().collect();
            for term in unique {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        let max_df = self.max_df_ratio * n_docs as f64;
        let mut kept: Vec<(String, usize)> = doc_freq
            .into_iter()
            .filter(|&(_, df)| df >= self.min_df && df as f64 <= max_df)
            .map(|(term, df)| (term.to_string(), df))
            .collect();

        if kept.is_empty() {
            return Err(PipelineError::EmptyVocabulary { documents: n_docs });
        }

        kept.sort_by(|a, b| a.0.cmp(&b.0));
        let vocabulary = Vocabulary::new(kept);

        let rows: Vec<Vec<(usize, u32)>> = tokenized
            .iter()
            .map(|tokens| {
                let mut counts: BTreeMap<usize, u32> = BTreeMap::new();
                for token in tokens {
                    if let Some(idx) = vocabulary.index_of(token) {
                        *counts.entry(idx).or_insert(0) += 1;
                    }
                }
                counts.into_iter().collect()
            })
            .collect();

        let matrix = DocumentTermMatrix::from_rows(rows, vocabulary.len());

        info!(
            documents = n_docs,
            vocabulary = vocabulary.len(),
            nonzero = matrix.nnz(),
            "Vectorized headlines"
        );

        Ok((matrix, vocabulary))
    }
}
