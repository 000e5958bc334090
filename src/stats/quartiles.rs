//! Five-number summary used to draw box-and-whisker plots

use super::percentile_of_sorted;
use crate::utils::sorted_copy;

/// Whisker reach in multiples of the interquartile range
pub const WHISKER_IQR_FACTOR: f64 = 1.5;

/// Box geometry for one sample set
#[derive(Debug, Clone, PartialEq)]
pub struct BoxPlotSummary {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Smallest sample inside `q1 - 1.5 * IQR`
    pub lower_whisker: f64,
    /// Largest sample inside `q3 + 1.5 * IQR`
    pub upper_whisker: f64,
    /// Samples beyond either whisker
    pub outliers: Vec<f64>,
    pub mean: f64,
}

impl BoxPlotSummary {
    /// `None` for an empty slice
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        let sorted = sorted_copy(samples);
        let q1 = percentile_of_sorted(&sorted, 25.0);
        let median = percentile_of_sorted(&sorted, 50.0);
        let q3 = percentile_of_sorted(&sorted, 75.0);
        let iqr = q3 - q1;
        let low_fence = q1 - WHISKER_IQR_FACTOR * iqr;
        let high_fence = q3 + WHISKER_IQR_FACTOR * iqr;

        let inside: Vec<f64> = sorted
            .iter()
            .copied()
            .filter(|v| *v >= low_fence && *v <= high_fence)
            .collect();
        // Whiskers never end inside the box
        let lower_whisker = inside.first().copied().map_or(q1, |v| v.min(q1));
        let upper_whisker = inside.last().copied().map_or(q3, |v| v.max(q3));

        let outliers = sorted
            .iter()
            .copied()
            .filter(|v| *v < low_fence || *v > high_fence)
            .collect();

        Some(Self {
            q1,
            median,
            q3,
            lower_whisker,
            upper_whisker,
            outliers,
            mean: samples.iter().sum::<f64>() / samples.len() as f64,
        })
    }

    /// Smallest value drawn (whisker or outlier)
    pub fn lowest(&self) -> f64 {
        self.outliers
            .first()
            .copied()
            .map_or(self.lower_whisker, |o| o.min(self.lower_whisker))
    }

    /// Largest value drawn (whisker or outlier)
    pub fn highest(&self) -> f64 {
        self.outliers
            .last()
            .copied()
            .map_or(self.upper_whisker, |o| o.max(self.upper_whisker))
    }
}
