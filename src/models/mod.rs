//! Data models for measurement samples and configuration

pub mod config;
pub mod sample;

// Re-export main model types
pub use config::Config;
pub use sample::{SampleSet, Unit};
