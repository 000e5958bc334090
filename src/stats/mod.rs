//! Statistical summaries and two-condition comparison for measurement samples

pub mod quartiles;

pub use quartiles::BoxPlotSummary;

use crate::{
    error::{AppError, Result},
    types::Direction,
    utils::{max_value, min_value, sorted_copy},
};
use serde::{Deserialize, Serialize};

/// Descriptive statistics for one sample set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    /// Number of samples
    pub count: usize,
    /// Arithmetic mean
    pub mean: f64,
    /// Population standard deviation (divides by N)
    pub std_dev: f64,
    /// Smallest sample
    pub min: f64,
    /// Largest sample
    pub max: f64,
}

impl SummaryStatistics {
    /// Compute statistics from a sample slice.
    ///
    /// Returns `None` for an empty slice instead of dividing by zero.
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        let count = samples.len();
        let min = min_value(samples)?;
        let max = max_value(samples)?;

        let mean = samples.iter().sum::<f64>() / count as f64;
        let variance = samples
            .iter()
            .map(|&x| (x - mean).powi(2))
            .sum::<f64>()
            / count as f64;

        Some(Self {
            count,
            mean,
            std_dev: variance.sqrt(),
            min,
            max,
        })
    }

    /// Standard deviation divided by mean
    pub fn coefficient_of_variation(&self) -> Result<f64> {
        if self.mean == 0.0 {
            return Err(AppError::statistics(
                "coefficient of variation is undefined when the mean is zero",
            ));
        }
        Ok(self.std_dev / self.mean)
    }
}

/// Latency statistics: the basic summary plus one high percentile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatencySummary {
    pub stats: SummaryStatistics,
    /// Which percentile was computed, e.g. 95.0
    pub percentile: f64,
    /// Value at that percentile
    pub percentile_value: f64,
}

impl LatencySummary {
    /// Summarise latency samples. `None` when there are no samples.
    pub fn from_samples(samples: &[f64], percentile_rank: f64) -> Option<Self> {
        let stats = SummaryStatistics::from_samples(samples)?;
        let percentile_value = percentile(samples, percentile_rank)?;
        Some(Self {
            stats,
            percentile: percentile_rank,
            percentile_value,
        })
    }

    /// Jitter is the standard deviation of round-trip times
    pub fn jitter(&self) -> f64 {
        self.stats.std_dev
    }
}

/// Linear-interpolated percentile between closest ranks.
///
/// `p` is clamped to `[0, 100]`. Returns `None` for an empty slice.
pub fn percentile(samples: &[f64], p: f64) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    let sorted = sorted_copy(samples);
    Some(percentile_of_sorted(&sorted, p))
}

/// Percentile of an already ascending, non-empty slice
pub(crate) fn percentile_of_sorted(sorted_values: &[f64], p: f64) -> f64 {
    let p = p.clamp(0.0, 100.0);
    let index = (p / 100.0) * (sorted_values.len() as f64 - 1.0);
    let lower_index = index.floor() as usize;
    let upper_index = index.ceil() as usize;

    if lower_index == upper_index {
        sorted_values[lower_index]
    } else {
        let lower_value = sorted_values[lower_index];
        let upper_value = sorted_values[upper_index];
        let weight = index - lower_index as f64;
        lower_value + weight * (upper_value - lower_value)
    }
}

/// How variability moved from condition A to condition B
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum VariabilityChange {
    /// std(B)/std(A) > 1, carrying that ratio
    Increased(f64),
    /// std(B)/std(A) in (0, 1], carrying the inverse factor std(A)/std(B)
    Decreased(f64),
    /// std(A) is zero, or std(B) is zero so the inverse is unbounded
    Undefined,
}

impl VariabilityChange {
    fn from_ratio(ratio: f64) -> Self {
        if ratio > 1.0 {
            Self::Increased(ratio)
        } else if ratio > 0.0 {
            Self::Decreased(1.0 / ratio)
        } else {
            Self::Undefined
        }
    }

    pub fn direction(&self) -> Option<Direction> {
        match self {
            Self::Increased(_) => Some(Direction::Increased),
            Self::Decreased(_) => Some(Direction::Decreased),
            Self::Undefined => None,
        }
    }
}

/// Comparison of condition B (with traffic control) against condition A
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComparativeAnalysis {
    pub baseline: SummaryStatistics,
    pub treatment: SummaryStatistics,
    /// mean(B) - mean(A)
    pub mean_difference: f64,
    /// Mean difference as a percentage of mean(A); `None` if mean(A) is zero
    pub percent_difference: Option<f64>,
    /// std(B) - std(A)
    pub std_difference: f64,
    /// std(B) / std(A), reported as 0 when std(A) is zero
    pub std_ratio: f64,
    pub throughput_direction: Direction,
    pub variability: VariabilityChange,
}

impl ComparativeAnalysis {
    /// Compare two sample sets. `None` when either is empty.
    pub fn compare(baseline: &[f64], treatment: &[f64]) -> Option<Self> {
        let a = SummaryStatistics::from_samples(baseline)?;
        let b = SummaryStatistics::from_samples(treatment)?;
        Some(Self::from_summaries(a, b))
    }

    /// Compare two precomputed summaries
    pub fn from_summaries(baseline: SummaryStatistics, treatment: SummaryStatistics) -> Self {
        let mean_difference = treatment.mean - baseline.mean;
        let percent_difference = if baseline.mean != 0.0 {
            Some(mean_difference / baseline.mean * 100.0)
        } else {
            None
        };

        let std_ratio = if baseline.std_dev > 0.0 {
            treatment.std_dev / baseline.std_dev
        } else {
            0.0
        };

        let throughput_direction = if mean_difference < 0.0 {
            Direction::Decreased
        } else {
            Direction::Increased
        };

        Self {
            baseline,
            treatment,
            mean_difference,
            percent_difference,
            std_difference: treatment.std_dev - baseline.std_dev,
            std_ratio,
            throughput_direction,
            variability: VariabilityChange::from_ratio(std_ratio),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_summary_of_ten_twenty_thirty() {
        let stats = SummaryStatistics::from_samples(&[10.0, 20.0, 30.0]).unwrap();
        assert_eq!(stats.count, 3);
        assert!((stats.mean - 20.0).abs() < EPS);
        assert!((stats.std_dev - 8.164_965_809_277_26).abs() < 1e-9);
        assert_eq!(stats.min, 10.0);
        assert_eq!(stats.max, 30.0);

        let cv = stats.coefficient_of_variation().unwrap();
        assert!((cv - 0.408_248).abs() < 1e-6);
        assert_eq!(format!("{:.3}", cv), "0.408");
    }

    #[test]
    fn test_empty_samples_have_no_summary() {
        assert!(SummaryStatistics::from_samples(&[]).is_none());
        assert!(LatencySummary::from_samples(&[], 95.0).is_none());
        assert!(percentile(&[], 95.0).is_none());
        assert!(ComparativeAnalysis::compare(&[], &[1.0]).is_none());
        assert!(ComparativeAnalysis::compare(&[1.0], &[]).is_none());
    }

    #[test]
    fn test_single_sample() {
        let stats = SummaryStatistics::from_samples(&[42.0]).unwrap();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.mean, 42.0);
        assert_eq!(stats.std_dev, 0.0);
        assert_eq!(stats.min, 42.0);
        assert_eq!(stats.max, 42.0);
    }

    #[test]
    fn test_coefficient_of_variation_zero_mean() {
        let stats = SummaryStatistics::from_samples(&[-1.0, 1.0]).unwrap();
        let err = stats.coefficient_of_variation().unwrap_err();
        assert_eq!(err.category(), "STATS");
    }

    #[test]
    fn test_percentile_calculation() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(percentile(&values, 0.0), Some(1.0));
        assert_eq!(percentile(&values, 50.0), Some(3.0));
        assert_eq!(percentile(&values, 100.0), Some(5.0));
        // rank 0.95 * 4 = 3.8 -> 4 + 0.8 * (5 - 4)
        assert!((percentile(&values, 95.0).unwrap() - 4.8).abs() < EPS);
    }

    #[test]
    fn test_percentile_ignores_insertion_order() {
        let shuffled = [5.0, 1.0, 4.0, 2.0, 3.0];
        assert!((percentile(&shuffled, 95.0).unwrap() - 4.8).abs() < EPS);
    }

    #[test]
    fn test_percentile_clamps_rank() {
        let values = [1.0, 2.0];
        assert_eq!(percentile(&values, 150.0), Some(2.0));
        assert_eq!(percentile(&values, -10.0), Some(1.0));
    }

    #[test]
    fn test_latency_summary() {
        let samples = [0.2, 0.3, 0.25, 0.4];
        let summary = LatencySummary::from_samples(&samples, 95.0).unwrap();
        assert_eq!(summary.stats.count, 4);
        assert!((summary.stats.mean - 0.2875).abs() < EPS);
        assert_eq!(summary.stats.min, 0.2);
        assert_eq!(summary.stats.max, 0.4);
        // sorted [0.2, 0.25, 0.3, 0.4], rank 2.85 -> 0.3 + 0.85 * 0.1
        assert!((summary.percentile_value - 0.385).abs() < EPS);
        assert_eq!(summary.jitter(), summary.stats.std_dev);
    }

    #[test]
    fn test_comparison_with_constant_baseline() {
        let analysis = ComparativeAnalysis::compare(&[10.0, 10.0, 10.0], &[20.0, 20.0, 20.0]).unwrap();
        assert!((analysis.mean_difference - 10.0).abs() < EPS);
        assert!((analysis.percent_difference.unwrap() - 100.0).abs() < EPS);
        assert_eq!(analysis.std_ratio, 0.0);
        assert_eq!(analysis.throughput_direction, Direction::Increased);
        assert_eq!(analysis.variability, VariabilityChange::Undefined);
        assert!(analysis.variability.direction().is_none());
    }

    #[test]
    fn test_comparison_reduced_throughput_increased_variability() {
        let analysis = ComparativeAnalysis::compare(&[90.0, 100.0, 110.0], &[70.0, 90.0, 110.0]).unwrap();
        assert!((analysis.mean_difference + 10.0).abs() < EPS);
        assert!((analysis.percent_difference.unwrap() + 10.0).abs() < EPS);
        assert!((analysis.std_ratio - 2.0).abs() < EPS);
        assert_eq!(analysis.throughput_direction, Direction::Decreased);
        assert!(matches!(analysis.variability, VariabilityChange::Increased(r) if (r - 2.0).abs() < EPS));
    }

    #[test]
    fn test_comparison_reduced_variability_reports_inverse_factor() {
        let analysis = ComparativeAnalysis::compare(&[80.0, 100.0, 120.0], &[95.0, 100.0, 105.0]).unwrap();
        assert!((analysis.std_ratio - 0.25).abs() < EPS);
        assert!(matches!(analysis.variability, VariabilityChange::Decreased(f) if (f - 4.0).abs() < EPS));
        assert_eq!(analysis.variability.direction(), Some(Direction::Decreased));
    }

    #[test]
    fn test_equal_means_classified_as_increase() {
        let analysis = ComparativeAnalysis::compare(&[50.0], &[50.0]).unwrap();
        assert_eq!(analysis.mean_difference, 0.0);
        assert_eq!(analysis.throughput_direction, Direction::Increased);
    }

    #[test]
    fn test_zero_baseline_mean_has_no_percentage() {
        let analysis = ComparativeAnalysis::compare(&[-1.0, 1.0], &[2.0]).unwrap();
        assert!(analysis.percent_difference.is_none());
    }
}
