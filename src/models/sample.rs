//! Measurement samples grouped by experimental condition

use crate::stats::{percentile, SummaryStatistics};
use serde::{Deserialize, Serialize};

/// Unit a sample set's values are expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unit {
    /// Megabits per second
    Mbps,
    /// Milliseconds
    Milliseconds,
}

impl Unit {
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Mbps => "Mbps",
            Unit::Milliseconds => "ms",
        }
    }
}

/// Ordered, append-only sequence of scalar observations for one condition.
///
/// Order follows file-discovery order for throughput and line order for
/// latency. It only matters for plot x positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSet {
    /// Condition label, e.g. "No Traffic Control"
    pub label: String,
    /// Unit shared by every sample
    pub unit: Unit,
    samples: Vec<f64>,
}

impl SampleSet {
    /// Create an empty sample set
    pub fn new<S: Into<String>>(label: S, unit: Unit) -> Self {
        Self {
            label: label.into(),
            unit,
            samples: Vec::new(),
        }
    }

    /// Create a sample set from already parsed values
    pub fn from_values<S: Into<String>>(label: S, unit: Unit, samples: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            unit,
            samples,
        }
    }

    /// Append an observation
    pub fn push(&mut self, value: f64) {
        self.samples.push(value);
    }

    /// Observations in insertion order
    pub fn values(&self) -> &[f64] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Summary statistics, or `None` when the set is empty
    pub fn summary(&self) -> Option<SummaryStatistics> {
        SummaryStatistics::from_samples(&self.samples)
    }

    /// Linear-interpolated percentile, or `None` when the set is empty
    pub fn percentile(&self, p: f64) -> Option<f64> {
        percentile(&self.samples, p)
    }
}
