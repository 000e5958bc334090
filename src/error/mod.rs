//! Error handling for the results analyzer
//!
//! Only `MissingDirectory`, configuration problems and internal faults end a
//! run. Per-file problems are reported by the extractors as skips and never
//! reach `main`.

use colored::{Color, Colorize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Process exit codes
pub mod exit_codes {
    /// Bad flags, environment or configuration
    pub const USAGE: i32 = 1;
    /// A results directory is missing
    pub const MISSING_INPUT: i32 = 2;
    pub const IO: i32 = 5;
    /// Statistics or chart failure
    pub const ANALYSIS: i32 = 6;
    pub const INTERNAL: i32 = 99;
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// A results directory a pipeline reads from does not exist
    #[error("Results directory not found: {}", path.display())]
    MissingDirectory { path: PathBuf },

    #[error("Invalid value: {0}")]
    Validation(String),

    #[error("I/O failure: {0}")]
    Io(String),

    /// Malformed JSON, numbers or patterns
    #[error("Could not parse: {0}")]
    Parse(String),

    #[error("Cannot compute statistics: {0}")]
    Statistics(String),

    #[error("Chart rendering failed: {0}")]
    Plot(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn missing_directory<P: AsRef<Path>>(path: P) -> Self {
        Self::MissingDirectory {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io(message.into())
    }

    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse(message.into())
    }

    pub fn statistics<S: Into<String>>(message: S) -> Self {
        Self::Statistics(message.into())
    }

    pub fn plot<S: Into<String>>(message: S) -> Self {
        Self::Plot(message.into())
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Short tag used in console output and log fields
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG",
            Self::MissingDirectory { .. } => "DIRECTORY",
            Self::Validation(_) => "VALIDATION",
            Self::Io(_) => "IO",
            Self::Parse(_) => "PARSE",
            Self::Statistics(_) => "STATS",
            Self::Plot(_) => "PLOT",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Whether the error ends the whole run rather than a single file or step
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Config(_) | Self::MissingDirectory { .. } | Self::Validation(_) | Self::Internal(_)
        )
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Validation(_) | Self::Parse(_) => exit_codes::USAGE,
            Self::MissingDirectory { .. } => exit_codes::MISSING_INPUT,
            Self::Io(_) => exit_codes::IO,
            Self::Statistics(_) | Self::Plot(_) => exit_codes::ANALYSIS,
            Self::Internal(_) => exit_codes::INTERNAL,
        }
    }

    fn suggestion(&self) -> &'static str {
        match self {
            Self::Config(_) | Self::Validation(_) => {
                "Check the .env file, the TSN_* / LATENCY_PERCENTILE / ENABLE_* variables and the command line."
            }
            Self::MissingDirectory { .. } => {
                "Run the measurement scripts first, or point --results-root, --baseline-dir or --intermediate-dir at an existing directory."
            }
            Self::Io(_) => "Check file permissions and that the measurement run finished writing its output.",
            Self::Parse(_) => "Reports must come from `iperf3 --json` and logs from plain `ping` output.",
            Self::Statistics(_) => "A condition may have too few valid samples.",
            Self::Plot(_) => "Make sure the baseline directory is writable and fonts are installed, or pass --no-plot.",
            Self::Internal(_) => "This is a bug; please report it together with the command you ran.",
        }
    }

    /// The error followed by a hint on how to fix it
    pub fn user_friendly_message(&self) -> String {
        format!("{}\n\nSuggestion: {}", self, self.suggestion())
    }

    fn console_color(&self) -> Color {
        match self {
            Self::Config(_) | Self::Validation(_) | Self::Parse(_) => Color::Red,
            Self::MissingDirectory { .. } => Color::Yellow,
            Self::Io(_) | Self::Statistics(_) | Self::Plot(_) => Color::Cyan,
            Self::Internal(_) => Color::BrightRed,
        }
    }

    /// One line: `[CATEGORY] message`
    pub fn format_for_console(&self, use_color: bool) -> String {
        if !use_color {
            return format!("[{}] {}", self.category(), self);
        }
        let color = self.console_color();
        format!(
            "[{}] {}",
            self.category().color(color).bold(),
            self.to_string().color(color)
        )
    }

    /// Prefix the message, keeping the variant.
    fn prefixed(self, context: &str) -> Self {
        match self {
            Self::Config(msg) => Self::Config(format!("{}: {}", context, msg)),
            Self::Validation(msg) => Self::Validation(format!("{}: {}", context, msg)),
            Self::Io(msg) => Self::Io(format!("{}: {}", context, msg)),
            Self::Parse(msg) => Self::Parse(format!("{}: {}", context, msg)),
            Self::Statistics(msg) => Self::Statistics(format!("{}: {}", context, msg)),
            Self::Plot(msg) => Self::Plot(format!("{}: {}", context, msg)),
            Self::Internal(msg) => Self::Internal(format!("{}: {}", context, msg)),
            // the path already says everything
            missing @ Self::MissingDirectory { .. } => missing,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<glob::PatternError> for AppError {
    fn from(error: glob::PatternError) -> Self {
        Self::config(format!("bad file pattern ({})", error))
    }
}

impl From<dotenv::Error> for AppError {
    fn from(error: dotenv::Error) -> Self {
        Self::config(format!(".env file ({})", error))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Attach context to a failed operation without losing its category
pub trait ErrorContext<T> {
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;

    fn context(self, message: &'static str) -> Result<T>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<AppError>,
{
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.into().prefixed(&f()))
    }

    fn context(self, message: &'static str) -> Result<T> {
        self.map_err(|e| e.into().prefixed(message))
    }
}

/// Writes fatal errors to stderr
pub struct ErrorReporter {
    use_color: bool,
    verbose: bool,
}

impl ErrorReporter {
    pub fn new(use_color: bool, verbose: bool) -> Self {
        Self { use_color, verbose }
    }

    /// Exactly one line, plus a suggestion block when verbose
    pub fn report_error(&self, error: &AppError) {
        eprintln!("{}", self.render(error));
    }

    fn render(&self, error: &AppError) -> String {
        let line = error.format_for_console(self.use_color);
        if self.verbose {
            format!("{}\n\nSuggestion: {}", line, error.suggestion())
        } else {
            line
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_directory() {
        let error = AppError::missing_directory("/data/results/baseline");
        assert_eq!(error.to_string(), "Results directory not found: /data/results/baseline");
        assert_eq!(error.category(), "DIRECTORY");
        assert!(error.is_fatal());
        assert_eq!(error.exit_code(), 2);
    }

    #[test]
    fn test_categories_and_exit_codes() {
        let cases = [
            (AppError::config("x"), "CONFIG", 1, true),
            (AppError::validation("x"), "VALIDATION", 1, true),
            (AppError::parse("x"), "PARSE", 1, false),
            (AppError::io("x"), "IO", 5, false),
            (AppError::statistics("x"), "STATS", 6, false),
            (AppError::plot("x"), "PLOT", 6, false),
            (AppError::internal("x"), "INTERNAL", 99, true),
        ];

        for (error, category, code, fatal) in cases {
            assert_eq!(error.category(), category);
            assert_eq!(error.exit_code(), code, "{}", category);
            assert_eq!(error.is_fatal(), fatal, "{}", category);
        }
    }

    #[test]
    fn test_user_friendly_message_names_flags() {
        let message = AppError::missing_directory("/results").user_friendly_message();
        assert!(message.starts_with("Results directory not found: /results"));
        assert!(message.contains("--baseline-dir"));

        let message = AppError::plot("no fonts").user_friendly_message();
        assert!(message.contains("--no-plot"));
    }

    #[test]
    fn test_conversions() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(AppError::from(io_error).category(), "IO");

        let pattern_error = glob::Pattern::new("[unclosed").unwrap_err();
        assert_eq!(AppError::from(pattern_error).category(), "CONFIG");
    }

    #[test]
    fn test_context_keeps_category() {
        let result: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "permission denied",
        ));
        let error = result
            .with_context(|| "Failed to open 2_ping_udp_load.txt".to_string())
            .unwrap_err();
        assert_eq!(error.category(), "IO");
        assert_eq!(error.to_string(), "I/O failure: Failed to open 2_ping_udp_load.txt: permission denied");

        let result: Result<()> = Err(AppError::statistics("empty"));
        let error = result.context("best effort").unwrap_err();
        assert_eq!(error.category(), "STATS");
        assert!(error.to_string().contains("best effort: empty"));
    }

    #[test]
    fn test_context_leaves_missing_directory_alone() {
        let result: Result<()> = Err(AppError::missing_directory("/r"));
        let error = result.context("throughput").unwrap_err();
        assert_eq!(error.to_string(), "Results directory not found: /r");
    }

    #[test]
    fn test_console_formatting() {
        let error = AppError::config("bad flag");
        assert_eq!(error.format_for_console(false), "[CONFIG] Configuration error: bad flag");

        colored::control::set_override(true);
        let colored_line = error.format_for_console(true);
        colored::control::unset_override();
        assert!(colored_line.contains("CONFIG"));
        assert!(colored_line.contains("\u{1b}["));
    }

    #[test]
    fn test_reporter_is_single_line_unless_verbose() {
        let error = AppError::missing_directory("/r");
        assert_eq!(ErrorReporter::new(false, false).render(&error).lines().count(), 1);

        let verbose = ErrorReporter::new(false, true).render(&error);
        assert!(verbose.lines().count() > 1);
        assert!(verbose.contains("Suggestion:"));
    }
}
