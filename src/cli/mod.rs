//! Command-line interface

use crate::{config::EnvManager, output::ColoredFormatter, types::PipelineSelection};
use clap::Parser;
use std::path::PathBuf;

/// Statistical analysis of TSN emulation results: iperf3 throughput with and
/// without traffic control, and ping latency under background load
#[derive(Parser, Debug, Clone)]
#[command(name = "tsn-analyze")]
#[command(version, about, long_about = None)]
#[command(after_help = EnvManager::display_env_help())]
pub struct Cli {
    /// Which analysis to run
    #[arg(value_enum, default_value_t = PipelineSelection::All)]
    pub pipeline: PipelineSelection,

    /// Parent of the baseline/ and intermediate/ result directories
    #[arg(long, value_name = "DIR")]
    pub results_root: Option<PathBuf>,

    /// Directory holding best_effort_*.json and mixed_priority_*.json
    #[arg(long, value_name = "DIR")]
    pub baseline_dir: Option<PathBuf>,

    /// Directory holding the ping logs
    #[arg(long, value_name = "DIR")]
    pub intermediate_dir: Option<PathBuf>,

    /// Latency percentile to report, in (0, 100]
    #[arg(long, value_name = "RANK", value_parser = parse_percentile)]
    pub percentile: Option<f64>,

    /// Skip rendering the throughput chart
    #[arg(long)]
    pub no_plot: bool,

    /// Force colored output
    #[arg(long)]
    pub color: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Validate CLI arguments for conflicts
    pub fn validate(&self) -> Result<(), String> {
        if self.color && self.no_color {
            return Err("Cannot specify both --color and --no-color".to_string());
        }

        if self.results_root.is_some() && self.baseline_dir.is_some() && self.intermediate_dir.is_some() {
            return Err("--results-root has no effect when both --baseline-dir and --intermediate-dir are given".to_string());
        }

        Ok(())
    }

    /// Explicit color choice, if any flag was given
    pub fn color_override(&self) -> Option<bool> {
        if self.color {
            Some(true)
        } else if self.no_color {
            Some(false)
        } else {
            None
        }
    }

    /// Check if colors should be enabled
    pub fn use_colors(&self) -> bool {
        self.color_override().unwrap_or_else(ColoredFormatter::supports_color)
    }
}

/// Parse a percentile rank in (0, 100]
fn parse_percentile(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("Invalid percentile: {}", s))?;

    if !value.is_finite() || value <= 0.0 || value > 100.0 {
        return Err(format!("Percentile must be in (0, 100], got {}", s));
    }
    Ok(value)
}
