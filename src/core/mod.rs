pub mod engine;
pub mod matrix;
pub mod normalizer;
pub mod skills;
pub mod types;
