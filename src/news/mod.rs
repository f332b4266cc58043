// News records: loading and ticker filtering.

pub mod filter;
pub mod records;
