// Descriptive statistics over news records.

pub mod dates;
pub mod headlines;
pub mod publishers;
