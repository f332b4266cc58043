// Topic reporter: turn topic weights into ranked keyword lists.

use serde::{Deserialize, Serialize};

use super::traits::TopicWeights;
use super::vectorizer::Vocabulary;

/// Top keywords for one topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicKeywords {
    /// "Topic 1" .. "Topic K"
    pub label: String,
    /// Highest-weight terms first
    pub keywords: Vec<String>,
}

/// Rank vocabulary indices of one topic row by descending weight.
///
/// Equal weights keep ascending vocabulary order.
pub fn rank_terms(weights: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..weights.len()).collect();
    order.sort_by(|&a, &b| weights[b].total_cmp(&weights[a]));
    order
}

/// Extract the `top_n` keywords of every topic, in topic order.
///
/// `top_n` saturates at the vocabulary size.
pub fn extract_keywords(
    weights: &TopicWeights,
    vocabulary: &Vocabulary,
    top_n: usize,
) -> Vec<TopicKeywords> {
    (0..weights.n_topics())
        .map(|topic| {
            let row = weights.topic(topic).to_vec();
            let keywords = rank_terms(&row)
                .into_iter()
                .filter_map(|idx| vocabulary.term(idx).map(str::to_string))
                .take(top_n)
                .collect();
            TopicKeywords {
                label: format!("Topic {}", topic + 1),
                keywords,
            }
        })
        .collect()
}
