//! Latency analysis over the three fixed ping logs

use crate::{
    error::{AppError, Result},
    extract::latency::extract_file,
    logging::Logger,
    models::{Config, SampleSet, Unit},
    stats::LatencySummary,
    types::LatencyScenario,
};
use std::path::PathBuf;

/// Everything computed for one load scenario
#[derive(Debug, Clone)]
pub struct ScenarioResult {
    pub scenario: LatencyScenario,
    pub path: PathBuf,
    pub file_found: bool,
    /// Set when the file exists but could not be read
    pub read_error: Option<String>,
    pub samples: SampleSet,
    /// `None` when the log held no replies
    pub summary: Option<LatencySummary>,
}

impl ScenarioResult {
    pub fn file_name(&self) -> &'static str {
        self.scenario.file_name()
    }
}

/// Outcome of one latency run
#[derive(Debug, Clone)]
pub struct LatencyReport {
    pub results_dir: PathBuf,
    /// Percentile rank reported for each scenario
    pub percentile: f64,
    /// Baseline, UDP load, TCP load
    pub scenarios: Vec<ScenarioResult>,
}

impl LatencyReport {
    pub fn scenario(&self, scenario: LatencyScenario) -> Option<&ScenarioResult> {
        self.scenarios.iter().find(|r| r.scenario == scenario)
    }

    pub fn has_data(&self) -> bool {
        self.scenarios.iter().any(|r| r.summary.is_some())
    }
}

pub struct LatencyPipeline<'a> {
    config: &'a Config,
    logger: Logger,
}

impl<'a> LatencyPipeline<'a> {
    pub fn new(config: &'a Config, logger: &Logger) -> Self {
        Self {
            config,
            logger: logger.child("latency"),
        }
    }

    pub fn run(&self) -> Result<LatencyReport> {
        let results_dir = &self.config.intermediate_dir;
        if !results_dir.is_dir() {
            return Err(AppError::missing_directory(results_dir));
        }

        let operation = self.logger.start_operation("latency analysis");
        let scenarios = LatencyScenario::ALL
            .iter()
            .map(|&scenario| self.analyze_scenario(scenario))
            .collect();
        self.logger.end_operation(&operation, "latency analysis", true);

        Ok(LatencyReport {
            results_dir: results_dir.clone(),
            percentile: self.config.latency_percentile,
            scenarios,
        })
    }

    fn analyze_scenario(&self, scenario: LatencyScenario) -> ScenarioResult {
        let path = self.config.latency_log_path(scenario);
        let file_found = path.is_file();

        let (values, read_error) = match extract_file(&path) {
            Ok(values) => (values, None),
            Err(e) => {
                self.logger
                    .warn(&format!("Could not read {}: {}", scenario.file_name(), e))
                    .field("file", scenario.file_name())
                    .error_info(&e)
                    .location(file!(), line!(), Some(module_path!()))
                    .log();
                (Vec::new(), Some(e.to_string()))
            }
        };

        if !file_found {
            self.logger
                .info(&format!("{} not found", scenario.file_name()))
                .field("file", scenario.file_name())
                .log();
        }

        let samples = SampleSet::from_values(scenario.label(), Unit::Milliseconds, values);
        let summary = LatencySummary::from_samples(samples.values(), self.config.latency_percentile);

        self.logger
            .debug(&format!("{}: {} sample(s)", scenario, samples.len()))
            .field("scenario", scenario.file_name())
            .field("samples", samples.len())
            .log();

        ScenarioResult {
            scenario,
            path,
            file_found,
            read_error,
            samples,
            summary,
        }
    }
}
