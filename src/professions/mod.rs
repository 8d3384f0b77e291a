//! Profession taxonomy: direct query mapping plus an ordered rule cascade over posting names.

pub mod classifier;
pub mod rules;
