// src/lib.rs

pub mod config;
pub mod core;
pub mod dataset;
pub mod error;
pub mod persistence;
pub mod professions;
pub mod stats;
pub use crate::config::FeaturesConfig;
pub use crate::core::engine::{FeatureSet, FeaturesEngine};
pub use crate::error::{FeaturesError, Result};
