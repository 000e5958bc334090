//! Configuration data model and validation

use crate::types::{AppError, LatencyScenario, Result, TrafficCondition};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the iperf3 JSON reports (throughput pipeline)
    #[serde(default = "default_baseline_dir")]
    pub baseline_dir: PathBuf,

    /// Directory holding the ping logs (latency pipeline)
    #[serde(default = "default_intermediate_dir")]
    pub intermediate_dir: PathBuf,

    /// Percentile reported for each latency scenario
    #[serde(default = "default_latency_percentile")]
    pub latency_percentile: f64,

    /// Render the throughput comparison chart
    #[serde(default = "default_enable_plot")]
    pub enable_plot: bool,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            baseline_dir: default_baseline_dir(),
            intermediate_dir: default_intermediate_dir(),
            latency_percentile: default_latency_percentile(),
            enable_plot: default_enable_plot(),
            enable_color: default_enable_color(),
            verbose: false,
            debug: false,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Point both results directories at the standard subdirectories of `root`
    pub fn set_results_root(&mut self, root: &Path) {
        let root = expand_home(root);
        self.baseline_dir = root.join(crate::defaults::BASELINE_SUBDIR);
        self.intermediate_dir = root.join(crate::defaults::INTERMEDIATE_SUBDIR);
    }

    /// Glob pattern matching the reports of one traffic condition.
    ///
    /// The directory part is escaped so that brackets or asterisks in the
    /// path are matched literally.
    pub fn throughput_pattern(&self, condition: TrafficCondition) -> String {
        let dir = glob::Pattern::escape(&self.baseline_dir.to_string_lossy());
        let separator = if dir.ends_with(std::path::MAIN_SEPARATOR) { "" } else { std::path::MAIN_SEPARATOR_STR };
        format!("{}{}{}", dir, separator, condition.file_pattern())
    }

    /// Output path of the throughput comparison chart
    pub fn plot_path(&self) -> PathBuf {
        self.baseline_dir.join(crate::defaults::PLOT_FILE_NAME)
    }

    /// Path of the ping log for one scenario
    pub fn latency_log_path(&self, scenario: LatencyScenario) -> PathBuf {
        self.intermediate_dir.join(scenario.file_name())
    }

    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Result<()> {
        if self.baseline_dir.as_os_str().is_empty() {
            return Err(AppError::validation("Baseline results directory cannot be empty"));
        }

        if self.intermediate_dir.as_os_str().is_empty() {
            return Err(AppError::validation("Intermediate results directory cannot be empty"));
        }

        if !self.latency_percentile.is_finite()
            || self.latency_percentile <= 0.0
            || self.latency_percentile > 100.0
        {
            return Err(AppError::validation(format!(
                "Latency percentile must be in (0, 100], got: {}",
                self.latency_percentile
            )));
        }

        Ok(())
    }

    /// Merge environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        self.merge_from_source(|key| std::env::var(key).ok())
    }

    /// Merge values from an arbitrary key lookup (environment, tests)
    pub fn merge_from_source<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(root) = lookup("TSN_RESULTS_ROOT").filter(|s| !s.trim().is_empty()) {
            self.set_results_root(Path::new(root.trim()));
        }

        if let Some(dir) = lookup("TSN_BASELINE_DIR").filter(|s| !s.trim().is_empty()) {
            self.baseline_dir = expand_home(Path::new(dir.trim()));
        }

        if let Some(dir) = lookup("TSN_INTERMEDIATE_DIR").filter(|s| !s.trim().is_empty()) {
            self.intermediate_dir = expand_home(Path::new(dir.trim()));
        }

        if let Some(percentile) = lookup("LATENCY_PERCENTILE") {
            self.latency_percentile = percentile.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid LATENCY_PERCENTILE value '{}': {}", percentile, e)))?;
        }

        if let Some(enable_plot) = lookup("ENABLE_PLOT") {
            self.enable_plot = enable_plot.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid ENABLE_PLOT value '{}': {}", enable_plot, e)))?;
        }

        if let Some(enable_color) = lookup("ENABLE_COLOR") {
            self.enable_color = enable_color.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid ENABLE_COLOR value '{}': {}", enable_color, e)))?;
        }

        Ok(())
    }
}

/// Expand a leading `~` against the invoking user's home directory
pub fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => home_dir().join(rest),
        Err(_) => path.to_path_buf(),
    }
}

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

fn default_results_root() -> PathBuf {
    home_dir().join(crate::defaults::RESULTS_ROOT_SUBDIR)
}

// Default value functions for serde
fn default_baseline_dir() -> PathBuf {
    default_results_root().join(crate::defaults::BASELINE_SUBDIR)
}

fn default_intermediate_dir() -> PathBuf {
    default_results_root().join(crate::defaults::INTERMEDIATE_SUBDIR)
}

fn default_latency_percentile() -> f64 {
    crate::defaults::DEFAULT_LATENCY_PERCENTILE
}

fn default_enable_plot() -> bool {
    crate::defaults::DEFAULT_ENABLE_PLOT
}

fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}
