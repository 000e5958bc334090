//! Round-trip time extraction from ping logs

use crate::error::{ErrorContext, Result};
use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;
use std::sync::OnceLock;

/// Matches the `time=<number> ms` token ping prints for every reply
pub const RTT_PATTERN: &str = r"time=([\d.]+)\s*ms";

fn rtt_regex() -> Option<&'static Regex> {
    static RTT: OnceLock<Option<Regex>> = OnceLock::new();
    RTT.get_or_init(|| Regex::new(RTT_PATTERN).ok()).as_ref()
}

/// Round-trip time in milliseconds from one line of ping output.
///
/// Only the first `time=` token counts. Lines without one, and tokens that
/// are not a number such as `time=1.2.3 ms`, yield `None`.
pub fn parse_line(line: &str) -> Option<f64> {
    rtt_regex()?
        .captures(line)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// All round-trip times in a ping log, in file order.
///
/// A file that does not exist yields an empty vector. Other I/O failures
/// are returned so the caller can decide how loudly to report them.
pub fn extract_file(path: &Path) -> Result<Vec<f64>> {
    let file = match File::open(path) {
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        opened => opened.with_context(|| format!("Failed to open {}", path.display()))?,
    };

    let mut samples = Vec::new();
    for line in BufReader::new(file).split(b'\n') {
        let line = line.with_context(|| format!("Failed to read {}", path.display()))?;
        // ping output is ASCII but a stray byte must not abort the file
        if let Some(rtt) = parse_line(&String::from_utf8_lossy(&line)) {
            samples.push(rtt);
        }
    }
    Ok(samples)
}
