//! TSN Results Analyzer
//!
//! Offline statistical analysis of traffic-control experiments: sender
//! throughput from iperf3 JSON reports and round-trip latency from ping
//! logs, summarised on the console with an optional comparison chart.

pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod logging;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod plot;
pub mod stats;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use error::{AppError, Result};
pub use models::{Config, SampleSet, Unit};
pub use stats::{BoxPlotSummary, ComparativeAnalysis, LatencySummary, SummaryStatistics, VariabilityChange};
pub use pipeline::{LatencyPipeline, LatencyReport, ThroughputPipeline, ThroughputReport};
pub use output::{ColoredFormatter, OutputFormatter, OutputFormatterFactory, PlainFormatter};

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Default configuration values
pub mod defaults {
    /// Results tree below the user's home directory
    pub const RESULTS_ROOT_SUBDIR: &str = "tsn-emulation-project/results";
    pub const BASELINE_SUBDIR: &str = "baseline";
    pub const INTERMEDIATE_SUBDIR: &str = "intermediate";
    /// Written inside the baseline directory
    pub const PLOT_FILE_NAME: &str = "throughput_comparison.png";

    pub const DEFAULT_LATENCY_PERCENTILE: f64 = 95.0;
    pub const DEFAULT_ENABLE_COLOR: bool = true;
    pub const DEFAULT_ENABLE_PLOT: bool = true;

    pub const BITS_PER_MEGABIT: f64 = 1_000_000.0;

    /// Chart size in pixels (two panels side by side)
    pub const PLOT_WIDTH: u32 = 1800;
    pub const PLOT_HEIGHT: u32 = 750;
}
