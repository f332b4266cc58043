// newslens: topic modeling and exploratory analysis for financial news
//
// This is the library root. Each module corresponds to one stage or concern
// of the analysis: loading records, cleaning and modeling headlines,
// descriptive statistics, price indicators, and terminal output.

pub mod config;
pub mod error;
pub mod news;
pub mod output;
pub mod stats;
pub mod stocks;
pub mod topics;
