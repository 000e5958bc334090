//! iperf3 JSON report discovery and sender throughput extraction

use crate::{
    error::Result,
    logging::Logger,
    models::{SampleSet, Unit},
};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Dotted path of the field every report is expected to carry
pub const SENDER_BPS_FIELD: &str = "end.sum_sent.bits_per_second";

/// The subset of an iperf3 `--json` report this tool reads
#[derive(Debug, Default, Deserialize)]
pub struct IperfReport {
    #[serde(default)]
    pub end: Option<IperfEnd>,
}

/// Final summary block of an iperf3 report
#[derive(Debug, Default, Deserialize)]
pub struct IperfEnd {
    #[serde(default)]
    pub sum_sent: Option<IperfSum>,
}

/// Totals for one direction of a test
#[derive(Debug, Default, Deserialize)]
pub struct IperfSum {
    #[serde(default)]
    pub bits_per_second: Option<f64>,
}

impl IperfReport {
    /// Sender-side throughput in bits per second, if the report has one
    pub fn sender_bits_per_second(&self) -> Option<f64> {
        self.end.as_ref()?.sum_sent.as_ref()?.bits_per_second
    }
}

/// Why a report contributed no sample
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// The nested sender field is absent
    MissingField(&'static str),
    /// The field is present but zero or negative
    NonPositive(f64),
    /// The file is not a JSON object of the expected shape
    Malformed(String),
    /// The file could not be opened or read
    Unreadable(String),
}

impl SkipReason {
    /// Short machine-friendly tag used as a log field
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingField(_) => "missing_field",
            Self::NonPositive(_) => "non_positive",
            Self::Malformed(_) => "malformed",
            Self::Unreadable(_) => "unreadable",
        }
    }
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "no {} data", field),
            Self::NonPositive(value) => write!(f, "non-positive throughput ({} bps)", value),
            Self::Malformed(cause) => write!(f, "could not parse JSON: {}", cause),
            Self::Unreadable(cause) => write!(f, "could not read file: {}", cause),
        }
    }
}

/// A report that was discovered but skipped
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: SkipReason,
}

impl SkippedFile {
    /// File name without the directory, as shown in warnings
    pub fn file_name(&self) -> String {
        display_name(&self.path)
    }
}

/// Result of extracting one traffic condition
#[derive(Debug, Clone)]
pub struct ThroughputExtraction {
    /// Throughput samples in Mbps, in discovery order
    pub samples: SampleSet,
    /// Number of files that produced a sample
    pub files_processed: usize,
    /// One entry per skipped file
    pub skipped: Vec<SkippedFile>,
}

/// Convert bits per second to megabits per second
pub fn bps_to_mbps(bits_per_second: f64) -> f64 {
    bits_per_second / crate::defaults::BITS_PER_MEGABIT
}

/// Interpret one parsed report, returning Mbps or the reason it was skipped
pub fn throughput_from_report(report: &IperfReport) -> std::result::Result<f64, SkipReason> {
    match report.sender_bits_per_second() {
        None => Err(SkipReason::MissingField(SENDER_BPS_FIELD)),
        Some(bps) if bps > 0.0 => Ok(bps_to_mbps(bps)),
        Some(bps) => Err(SkipReason::NonPositive(bps)),
    }
}

/// Parse report text, returning Mbps or the reason it was skipped
pub fn parse_report_str(content: &str) -> std::result::Result<f64, SkipReason> {
    let report: IperfReport = serde_json::from_str(content)
        .map_err(|e| SkipReason::Malformed(e.to_string()))?;
    throughput_from_report(&report)
}

/// Extracts sender throughput from every report matching a glob pattern
pub struct ThroughputExtractor<'a> {
    logger: &'a Logger,
}

impl<'a> ThroughputExtractor<'a> {
    pub fn new(logger: &'a Logger) -> Self {
        Self { logger }
    }

    /// Discover files matching `pattern` and extract one sample per usable file.
    ///
    /// Per-file failures are recorded and logged, never returned. Only an
    /// invalid pattern is an error.
    pub fn extract(&self, pattern: &str, label: &str) -> Result<ThroughputExtraction> {
        let paths = discover(pattern)?;
        self.logger
            .debug(&format!("Discovered {} report(s)", paths.len()))
            .field("pattern", pattern)
            .field("count", paths.len())
            .log();

        let mut samples = SampleSet::new(label, Unit::Mbps);
        let mut skipped = Vec::new();

        for path in paths {
            match read_report(&path).and_then(|report| throughput_from_report(&report)) {
                Ok(mbps) => {
                    self.logger
                        .trace(&format!("{}: {:.2} Mbps", display_name(&path), mbps))
                        .field("file", display_name(&path))
                        .field("mbps", mbps)
                        .log();
                    samples.push(mbps);
                }
                Err(reason) => {
                    let skip = SkippedFile { path, reason };
                    self.logger
                        .warn(&format!("Skipping {}: {}", skip.file_name(), skip.reason))
                        .field("file", skip.file_name())
                        .field("reason", skip.reason.kind())
                        .location(file!(), line!(), Some(module_path!()))
                        .log();
                    skipped.push(skip);
                }
            }
        }

        Ok(ThroughputExtraction {
            files_processed: samples.len(),
            samples,
            skipped,
        })
    }
}

/// Sorted list of regular files matching the pattern
fn discover(pattern: &str) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in glob::glob(pattern)? {
        match entry {
            Ok(path) if path.is_file() => paths.push(path),
            Ok(_) => {}
            // Unreadable directory entries are reported when opened
            Err(e) => paths.push(e.path().to_path_buf()),
        }
    }
    paths.sort();
    paths.dedup();
    Ok(paths)
}

/// Open and deserialize one report. The handle is dropped on every return path.
fn read_report(path: &Path) -> std::result::Result<IperfReport, SkipReason> {
    let file = File::open(path).map_err(|e| SkipReason::Unreadable(e.to_string()))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| {
        if e.is_io() {
            SkipReason::Unreadable(e.to_string())
        } else {
            SkipReason::Malformed(e.to_string())
        }
    })
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
