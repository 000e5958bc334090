//! Core formatting trait and the plain text implementation
//!
//! The trait supplies small rendering primitives. The report layouts are
//! default methods built on those primitives, so every formatter prints the
//! same report and only the styling differs.

use crate::{
    error::Result,
    pipeline::{ConditionResult, LatencyReport, ScenarioResult, ThroughputReport},
    plot::PlotOutcome,
    stats::{ComparativeAnalysis, VariabilityChange},
    types::{Direction, TrafficCondition},
};

/// Width of the report banner
pub const BANNER_WIDTH: usize = 60;
/// Width of the section separators
pub const SECTION_WIDTH: usize = 40;

/// Configuration options for formatting
#[derive(Debug, Clone, Default)]
pub struct FormattingOptions {
    pub enable_color: bool,
    /// List individual samples and skipped files
    pub verbose_mode: bool,
}

/// Console report rendering
pub trait OutputFormatter {
    /// Title framed by full-width rules
    fn banner(&self, title: &str) -> String;

    /// Blank line, then the title framed by section rules
    fn section(&self, title: &str) -> String;

    /// Sub-heading inside a section
    fn heading(&self, text: &str) -> String;

    /// Indented `label: value` line with the value emphasised
    fn field(&self, label: &str, value: &str) -> String;

    /// Indented plain line
    fn note(&self, text: &str) -> String;

    /// Indented conclusion line
    fn conclusion(&self, text: &str) -> String;

    fn format_error(&self, error: &str) -> Result<String>;

    fn format_warning(&self, warning: &str) -> Result<String>;

    fn format_success(&self, message: &str) -> Result<String>;

    fn options(&self) -> &FormattingOptions;

    /// Full throughput report
    fn format_throughput_report(&self, report: &ThroughputReport) -> Result<String> {
        let mut out = Vec::new();
        out.push(self.banner("INITIAL RESULTS ANALYSIS"));
        out.push(String::new());
        out.push(format!("Analyzing results in: {}", report.results_dir.display()));

        for condition in TrafficCondition::ALL {
            out.push(self.format_condition(report.condition(condition))?);
        }

        match &report.comparison {
            Some(comparison) => {
                out.push(self.format_comparison(comparison)?);
                out.push(self.section("VISUALIZATION"));
                out.push(self.format_plot_outcome(&report.plot)?);
            }
            None => {
                out.push(String::new());
                out.push(self.note("Comparison skipped: insufficient data"));
            }
        }

        Ok(out.join("\n"))
    }

    /// Statistics block for one traffic condition
    fn format_condition(&self, result: &ConditionResult) -> Result<String> {
        let mut out = vec![self.section(result.condition.heading())];

        let Some(stats) = &result.summary else {
            out.push(self.note(&format!("No valid {} data found", result.condition.description())));
            if !result.skipped().is_empty() {
                out.push(self.field("Files skipped", &result.skipped().len().to_string()));
            }
            return Ok(out.join("\n"));
        };

        out.push(self.field("Files processed", &result.extraction.files_processed.to_string()));
        out.push(self.field("Throughput samples", &stats.count.to_string()));
        out.push(self.field("Mean throughput", &format!("{:.2} Mbps", stats.mean)));
        out.push(self.field("Std deviation", &format!("{:.2} Mbps", stats.std_dev)));
        out.push(self.field("Minimum", &format!("{:.2} Mbps", stats.min)));
        out.push(self.field("Maximum", &format!("{:.2} Mbps", stats.max)));
        let cv = result
            .coefficient_of_variation()
            .map(|cv| format!("{:.3}", cv))
            .unwrap_or_else(|| "undefined".to_string());
        out.push(self.field("Coefficient of variation", &cv));

        if !result.skipped().is_empty() {
            out.push(self.field("Files skipped", &result.skipped().len().to_string()));
        }

        if self.options().verbose_mode {
            let values: Vec<String> = result.samples().iter().map(|v| format!("{:.2}", v)).collect();
            out.push(self.field("Samples (Mbps)", &values.join(", ")));
            for skipped in result.skipped() {
                out.push(self.note(&format!("skipped {}: {}", skipped.file_name(), skipped.reason)));
            }
        }

        Ok(out.join("\n"))
    }

    /// Comparison of traffic control against best effort
    fn format_comparison(&self, comparison: &ComparativeAnalysis) -> Result<String> {
        let mut out = vec![self.section("COMPARISON ANALYSIS")];

        let difference = match comparison.percent_difference {
            Some(pct) => format!("{:+.2} Mbps ({:+.1}%)", comparison.mean_difference, pct),
            None => format!("{:+.2} Mbps", comparison.mean_difference),
        };
        out.push(self.field("Throughput difference", &difference));
        out.push(self.field("Throughput variability change", &format!("{:.2}x", comparison.std_ratio)));

        if let Some(pct) = comparison.percent_difference {
            let magnitude = match comparison.throughput_direction {
                Direction::Decreased => -pct,
                Direction::Increased => pct,
            };
            out.push(self.conclusion(&format!(
                "Traffic control {} throughput by {:.1}%",
                comparison.throughput_direction.verb(),
                magnitude
            )));
        }

        let variability = match comparison.variability {
            VariabilityChange::Increased(ratio) => {
                format!("Traffic control increased variability by {:.2}x", ratio)
            }
            VariabilityChange::Decreased(factor) => {
                format!("Traffic control reduced variability by {:.2}x", factor)
            }
            VariabilityChange::Undefined => {
                "Variability change undefined (a condition has zero spread)".to_string()
            }
        };
        out.push(self.conclusion(&variability));

        Ok(out.join("\n"))
    }

    fn format_plot_outcome(&self, outcome: &PlotOutcome) -> Result<String> {
        match outcome {
            PlotOutcome::Saved(path) => Ok(format!("\n{}", self.format_success(&format!("Visualization saved: {}", path.display()))?)),
            PlotOutcome::InsufficientData => Ok(self.note("Not enough data for visualization")),
            PlotOutcome::Disabled => Ok(self.note("Plot disabled")),
            PlotOutcome::Failed(cause) => self.format_warning(&format!("Could not render chart: {}", cause)),
        }
    }

    /// Full latency report
    fn format_latency_report(&self, report: &LatencyReport) -> Result<String> {
        let mut out = vec![self.banner("INTERMEDIATE RESULTS ANALYSIS")];
        out.push(String::new());
        out.push(format!("Analyzing results in: {}", report.results_dir.display()));

        for scenario in &report.scenarios {
            out.push(self.format_scenario(scenario, report.percentile)?);
        }

        Ok(out.join("\n"))
    }

    /// Statistics block for one ping log
    fn format_scenario(&self, result: &ScenarioResult, percentile: f64) -> Result<String> {
        let mut out = vec![String::new(), self.heading(&format!("{}:", result.scenario.label()))];

        let Some(summary) = &result.summary else {
            let reason = if let Some(error) = &result.read_error {
                self.format_warning(&format!("Could not read {}: {}", result.file_name(), error))?
            } else if !result.file_found {
                self.note(&format!("No valid latency data found ({} not found)", result.file_name()))
            } else {
                self.note(&format!("No valid latency data found in {}", result.file_name()))
            };
            out.push(reason);
            return Ok(out.join("\n"));
        };

        let stats = &summary.stats;
        out.push(self.field("Samples", &stats.count.to_string()));
        out.push(self.field("Avg", &format!("{:.3} ms", stats.mean)));
        out.push(self.field("Min/Max", &format!("{:.3}/{:.3} ms", stats.min, stats.max)));
        out.push(self.field("Jitter (std)", &format!("{:.3} ms", summary.jitter())));
        out.push(self.field(
            &format!("{} %ile", percentile_label(percentile)),
            &format!("{:.3} ms", summary.percentile_value),
        ));

        Ok(out.join("\n"))
    }
}

/// Ordinal label for a percentile rank: 95 -> "95th", 99.9 -> "99.9th", 1 -> "1st"
pub fn percentile_label(rank: f64) -> String {
    if rank.fract() != 0.0 {
        return format!("{}th", rank);
    }
    let whole = rank as u64;
    let suffix = match (whole % 10, whole % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", whole, suffix)
}

/// Plain text formatter
pub struct PlainFormatter {
    options: FormattingOptions,
}

impl PlainFormatter {
    pub fn new(options: FormattingOptions) -> Self {
        Self { options }
    }
}

impl OutputFormatter for PlainFormatter {
    fn banner(&self, title: &str) -> String {
        let rule = "=".repeat(BANNER_WIDTH);
        format!("{}\n{}\n{}", rule, title, rule)
    }

    fn section(&self, title: &str) -> String {
        let rule = "=".repeat(SECTION_WIDTH);
        format!("\n{}\n{}\n{}", rule, title, rule)
    }

    fn heading(&self, text: &str) -> String {
        text.to_string()
    }

    fn field(&self, label: &str, value: &str) -> String {
        format!("  {}: {}", label, value)
    }

    fn note(&self, text: &str) -> String {
        format!("  {}", text)
    }

    fn conclusion(&self, text: &str) -> String {
        format!("  → {}", text)
    }

    fn format_error(&self, error: &str) -> Result<String> {
        Ok(format!("  Error: {}", error))
    }

    fn format_warning(&self, warning: &str) -> Result<String> {
        Ok(format!("  Warning: {}", warning))
    }

    fn format_success(&self, message: &str) -> Result<String> {
        Ok(message.to_string())
    }

    fn options(&self) -> &FormattingOptions {
        &self.options
    }
}
