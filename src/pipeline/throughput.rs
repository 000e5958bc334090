//! Throughput analysis: discover reports, summarise each traffic condition,
//! compare them and render the chart

use crate::{
    error::{AppError, Result},
    extract::{SkippedFile, ThroughputExtraction, ThroughputExtractor},
    logging::{Logger, PerformanceLogger},
    models::Config,
    plot::{plot_throughput_comparison, PlotOutcome},
    stats::{ComparativeAnalysis, SummaryStatistics},
    types::TrafficCondition,
};
use std::path::PathBuf;

/// Everything computed for one traffic condition
#[derive(Debug, Clone)]
pub struct ConditionResult {
    pub condition: TrafficCondition,
    pub extraction: ThroughputExtraction,
    /// `None` when no file produced a sample
    pub summary: Option<SummaryStatistics>,
}

impl ConditionResult {
    pub fn samples(&self) -> &[f64] {
        self.extraction.samples.values()
    }

    pub fn skipped(&self) -> &[SkippedFile] {
        &self.extraction.skipped
    }

    /// `None` without data or when the mean is zero
    pub fn coefficient_of_variation(&self) -> Option<f64> {
        self.summary.as_ref()?.coefficient_of_variation().ok()
    }
}

/// Outcome of one throughput run
#[derive(Debug, Clone)]
pub struct ThroughputReport {
    pub results_dir: PathBuf,
    pub no_tc: ConditionResult,
    pub with_tc: ConditionResult,
    /// Present only when both conditions have data
    pub comparison: Option<ComparativeAnalysis>,
    pub plot: PlotOutcome,
}

impl ThroughputReport {
    pub fn condition(&self, condition: TrafficCondition) -> &ConditionResult {
        match condition {
            TrafficCondition::BestEffort => &self.no_tc,
            TrafficCondition::MixedPriority => &self.with_tc,
        }
    }

    pub fn skipped_count(&self) -> usize {
        self.no_tc.skipped().len() + self.with_tc.skipped().len()
    }
}

pub struct ThroughputPipeline<'a> {
    config: &'a Config,
    logger: Logger,
}

impl<'a> ThroughputPipeline<'a> {
    pub fn new(config: &'a Config, logger: &Logger) -> Self {
        Self {
            config,
            logger: logger.child("throughput"),
        }
    }

    /// Run the pipeline.
    ///
    /// A missing results directory is the only fatal condition and is
    /// reported before any file is touched.
    pub fn run(&self) -> Result<ThroughputReport> {
        let results_dir = &self.config.baseline_dir;
        if !results_dir.is_dir() {
            return Err(AppError::missing_directory(results_dir));
        }

        let operation = self.logger.start_operation("throughput analysis");
        let result = self.analyze();
        self.logger.end_operation(&operation, "throughput analysis", result.is_ok());
        result
    }

    fn analyze(&self) -> Result<ThroughputReport> {
        let mut perf = PerformanceLogger::new(&self.logger);
        self.logger
            .info(&format!("Analyzing results in: {}", self.config.baseline_dir.display()))
            .log();

        perf.start_timing("extract");
        let extractor = ThroughputExtractor::new(&self.logger);
        let no_tc = self.analyze_condition(&extractor, TrafficCondition::BestEffort)?;
        let with_tc = self.analyze_condition(&extractor, TrafficCondition::MixedPriority)?;
        perf.end_timing("extract");

        let comparison = match (no_tc.summary, with_tc.summary) {
            (Some(a), Some(b)) => Some(ComparativeAnalysis::from_summaries(a, b)),
            _ => {
                self.logger
                    .info("Skipping comparison: insufficient data")
                    .field("no_tc_samples", no_tc.samples().len())
                    .field("with_tc_samples", with_tc.samples().len())
                    .log();
                None
            }
        };

        perf.start_timing("plot");
        let plot = plot_throughput_comparison(
            self.config.enable_plot,
            no_tc.samples(),
            with_tc.samples(),
            &self.config.plot_path(),
            &self.logger,
        );
        perf.end_timing("plot");

        Ok(ThroughputReport {
            results_dir: self.config.baseline_dir.clone(),
            no_tc,
            with_tc,
            comparison,
            plot,
        })
    }

    fn analyze_condition(
        &self,
        extractor: &ThroughputExtractor<'_>,
        condition: TrafficCondition,
    ) -> Result<ConditionResult> {
        let pattern = self.config.throughput_pattern(condition);
        let extraction = extractor.extract(&pattern, condition.box_label())?;
        let summary = extraction.samples.summary();

        self.logger
            .debug(&format!("{}: {} sample(s)", condition, extraction.samples.len()))
            .field("condition", condition.to_string())
            .field("samples", extraction.samples.len())
            .field("skipped", extraction.skipped.len())
            .log();

        Ok(ConditionResult {
            condition,
            extraction,
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogLevel;
    use crate::stats::VariabilityChange;
    use crate::types::Direction;
    use std::fs;
    use tempfile::TempDir;

    fn quiet_logger() -> Logger {
        let mut logger = Logger::new("test".to_string());
        logger.set_level(LogLevel::Fatal);
        logger
    }

    fn config_for(dir: &std::path::Path) -> Config {
        let mut config = Config::default();
        config.baseline_dir = dir.to_path_buf();
        config.enable_plot = false;
        config
    }

    fn write_report(dir: &std::path::Path, name: &str, bps: f64) {
        let body = format!(r#"{{"end": {{"sum_sent": {{"bits_per_second": {}}}}}}}"#, bps);
        fs::write(dir.join(name), body).unwrap();
    }

    #[test]
    fn test_missing_directory_fails_before_discovery() {
        let dir = TempDir::new().unwrap();
        let config = config_for(&dir.path().join("missing"));
        let logger = quiet_logger();

        let err = ThroughputPipeline::new(&config, &logger).run().unwrap_err();
        assert!(matches!(err, AppError::MissingDirectory { .. }));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_full_comparison() {
        let dir = TempDir::new().unwrap();
        for (i, bps) in [90e6, 100e6, 110e6].iter().enumerate() {
            write_report(dir.path(), &format!("best_effort_{}.json", i + 1), *bps);
        }
        for (i, bps) in [70e6, 90e6, 110e6].iter().enumerate() {
            write_report(dir.path(), &format!("mixed_priority_{}.json", i + 1), *bps);
        }
        fs::write(dir.path().join("mixed_priority_4.json"), "{}").unwrap();

        let config = config_for(dir.path());
        let logger = quiet_logger();
        let report = ThroughputPipeline::new(&config, &logger).run().unwrap();

        assert_eq!(report.no_tc.samples(), &[90.0, 100.0, 110.0]);
        assert_eq!(report.with_tc.samples(), &[70.0, 90.0, 110.0]);
        assert_eq!(report.skipped_count(), 1);
        assert_eq!(report.with_tc.skipped()[0].file_name(), "mixed_priority_4.json");

        let comparison = report.comparison.unwrap();
        assert!((comparison.mean_difference + 10.0).abs() < 1e-9);
        assert_eq!(comparison.throughput_direction, Direction::Decreased);
        assert!(matches!(comparison.variability, VariabilityChange::Increased(_)));
        assert_eq!(report.plot, PlotOutcome::Disabled);
    }

    #[test]
    fn test_one_empty_condition_skips_comparison() {
        let dir = TempDir::new().unwrap();
        write_report(dir.path(), "best_effort_1.json", 941e6);

        let mut config = config_for(dir.path());
        config.enable_plot = true;
        let logger = quiet_logger();
        let report = ThroughputPipeline::new(&config, &logger).run().unwrap();

        assert!(report.no_tc.summary.is_some());
        assert!(report.with_tc.summary.is_none());
        assert!(report.with_tc.coefficient_of_variation().is_none());
        assert!(report.comparison.is_none());
        assert_eq!(report.plot, PlotOutcome::InsufficientData);
        assert!(!config.plot_path().exists());
    }

    #[test]
    fn test_empty_directory_reports_no_data() {
        let dir = TempDir::new().unwrap();
        let config = config_for(dir.path());
        let logger = quiet_logger();
        let report = ThroughputPipeline::new(&config, &logger).run().unwrap();

        assert!(report.no_tc.summary.is_none());
        assert!(report.with_tc.summary.is_none());
        assert_eq!(report.skipped_count(), 0);
    }

    #[test]
    fn test_condition_lookup() {
        let dir = TempDir::new().unwrap();
        write_report(dir.path(), "mixed_priority_1.json", 5e6);
        let config = config_for(dir.path());
        let logger = quiet_logger();
        let report = ThroughputPipeline::new(&config, &logger).run().unwrap();

        assert_eq!(report.condition(TrafficCondition::MixedPriority).samples(), &[5.0]);
        assert!(report.condition(TrafficCondition::BestEffort).samples().is_empty());
    }
}
