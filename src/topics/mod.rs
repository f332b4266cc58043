// Topic extraction: cleaning, vectorization, LDA, and keyword reporting.

pub mod lda;
pub mod matrix;
pub mod normalize;
pub mod pipeline;
pub mod report;
pub mod traits;
pub mod vectorizer;
