// Articles per publisher.

use std::collections::HashMap;

use serde::Serialize;

use crate::news::records::Record;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublisherCount {
    pub publisher: String,
    pub articles: usize,
}

/// Count articles per publisher, most prolific first.
///
/// Publishers with equal counts stay in the order they first appear.
/// Records without a publisher are skipped.
pub fn articles_per_publisher(records: &[Record]) -> Vec<PublisherCount> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<PublisherCount> = Vec::new();

    for publisher in records.iter().filter_map(|r| r.publisher.as_deref()) {
        match index.get(publisher) {
            Some(&i) => counts[i].articles += 1,
            None => {
                index.insert(publisher, counts.len());
                counts.push(PublisherCount {
                    publisher: publisher.to_string(),
                    articles: 1,
                });
            }
        }
    }

    counts.sort_by(|a, b| b.articles.cmp(&a.articles));
    counts
}
