//! The two analysis pipelines. They share no state.

pub mod latency;
pub mod throughput;

pub use latency::{LatencyPipeline, LatencyReport, ScenarioResult};
pub use throughput::{ConditionResult, ThroughputPipeline, ThroughputReport};
