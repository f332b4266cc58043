// Historical prices and technical indicators.

pub mod indicators;
pub mod prices;
