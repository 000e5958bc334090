//! Type definitions and aliases

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use crate::error::{AppError, Result};

/// Experimental condition a throughput sample set was recorded under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrafficCondition {
    /// Best-effort traffic, no traffic control applied
    BestEffort,
    /// Mixed-priority traffic with traffic control applied
    MixedPriority,
}

impl TrafficCondition {
    /// Both conditions in report order
    pub const ALL: [TrafficCondition; 2] = [Self::BestEffort, Self::MixedPriority];

    /// Glob pattern (relative to the results directory) of the iperf3 reports
    pub fn file_pattern(&self) -> &'static str {
        match self {
            Self::BestEffort => "best_effort_*.json",
            Self::MixedPriority => "mixed_priority_*.json",
        }
    }

    /// Section heading used in the console report
    pub fn heading(&self) -> &'static str {
        match self {
            Self::BestEffort => "BEST-EFFORT TRAFFIC (NO TRAFFIC CONTROL)",
            Self::MixedPriority => "MIXED PRIORITY TRAFFIC (WITH TRAFFIC CONTROL)",
        }
    }

    /// Lower-case name used in "No valid ... data found"
    pub fn description(&self) -> &'static str {
        match self {
            Self::BestEffort => "best-effort",
            Self::MixedPriority => "mixed priority",
        }
    }

    /// Category label under each box in the box plot
    pub fn box_label(&self) -> &'static str {
        match self {
            Self::BestEffort => "No Traffic Control",
            Self::MixedPriority => "With Traffic Control",
        }
    }

    /// Short legend label for the scatter panel
    pub fn short_label(&self) -> &'static str {
        match self {
            Self::BestEffort => "No TC",
            Self::MixedPriority => "With TC",
        }
    }
}

impl std::fmt::Display for TrafficCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}

/// Load scenario a ping log was captured under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LatencyScenario {
    /// Idle link
    Baseline,
    /// UDP background load
    UdpLoad,
    /// TCP background load
    TcpLoad,
}

impl LatencyScenario {
    /// All scenarios in report order
    pub const ALL: [LatencyScenario; 3] = [Self::Baseline, Self::UdpLoad, Self::TcpLoad];

    /// Fixed log file name inside the intermediate results directory
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Baseline => "1_baseline_ping.txt",
            Self::UdpLoad => "2_ping_udp_load.txt",
            Self::TcpLoad => "3_ping_tcp_load.txt",
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Baseline => "Baseline (no load)",
            Self::UdpLoad => "With UDP background",
            Self::TcpLoad => "With TCP background",
        }
    }
}

impl std::fmt::Display for LatencyScenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Which analysis pipelines a run executes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum PipelineSelection {
    /// iperf3 throughput comparison only
    Throughput,
    /// ping latency summary only
    Latency,
    /// Throughput first, then latency
    #[default]
    All,
}

impl PipelineSelection {
    pub fn includes_throughput(&self) -> bool {
        matches!(self, Self::Throughput | Self::All)
    }

    pub fn includes_latency(&self) -> bool {
        matches!(self, Self::Latency | Self::All)
    }
}

/// Direction of change between two conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Increased,
    Decreased,
}

impl Direction {
    /// Word used in the natural-language summary
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Increased => "increased",
            Self::Decreased => "reduced",
        }
    }
}
