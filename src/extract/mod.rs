//! Sample extraction from raw experiment artifacts

pub mod latency;
pub mod throughput;

pub use throughput::{
    IperfReport, SkipReason, SkippedFile, ThroughputExtraction, ThroughputExtractor,
};
