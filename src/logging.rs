//! Structured logging for the analysis pipelines
//!
//! Entries carry a timestamp, a level, the emitting component and arbitrary
//! JSON fields. They are rendered as console lines, compact lines or JSON
//! objects. Warnings and errors go to stderr, everything else to stdout.

use crate::error::{AppError, Result};
use crate::models::Config;
use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::{Arc, RwLock};
use std::time::Instant;
use uuid::Uuid;

/// Log level enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    Fatal = 5,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Fatal => "FATAL",
        }
    }

    fn colorize(&self, text: &str) -> String {
        match self {
            LogLevel::Trace => text.white().to_string(),
            LogLevel::Debug => text.cyan().to_string(),
            LogLevel::Info => text.green().to_string(),
            LogLevel::Warn => text.yellow().to_string(),
            LogLevel::Error => text.red().to_string(),
            LogLevel::Fatal => text.magenta().bold().to_string(),
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "TRACE" => Ok(LogLevel::Trace),
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            "FATAL" => Ok(LogLevel::Fatal),
            _ => Err(AppError::parse(format!("Invalid log level: {}", s))),
        }
    }
}

/// One structured log record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    /// Component that emitted the entry
    pub logger: String,
    /// Ties together the entries of one pipeline run
    pub correlation_id: Option<String>,
    pub fields: HashMap<String, serde_json::Value>,
    pub location: Option<LogLocation>,
}

/// Source code location information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogLocation {
    pub file: String,
    pub line: u32,
    pub module: Option<String>,
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogFormat {
    /// Human-readable console format
    Console,
    /// One JSON object per line
    Json,
}

#[derive(Debug, Default)]
struct LogContext {
    session_id: Option<String>,
    current_correlation_id: Option<String>,
    context_fields: HashMap<String, serde_json::Value>,
}

/// Structured logger. Cloning shares the session context.
#[derive(Debug, Clone)]
pub struct Logger {
    min_level: LogLevel,
    use_color: bool,
    include_location: bool,
    format: LogFormat,
    name: String,
    context: Arc<RwLock<LogContext>>,
}

impl Logger {
    pub fn new(name: String) -> Self {
        Self {
            min_level: LogLevel::Info,
            use_color: false,
            include_location: false,
            format: LogFormat::Console,
            name,
            context: Arc::new(RwLock::new(LogContext::default())),
        }
    }

    /// Warn by default, Info when verbose, Debug with JSON output when debugging
    pub fn with_config(name: String, config: &Config) -> Self {
        let min_level = if config.debug {
            LogLevel::Debug
        } else if config.verbose {
            LogLevel::Info
        } else {
            LogLevel::Warn
        };

        Self {
            min_level,
            use_color: config.enable_color,
            include_location: config.debug,
            format: if config.debug { LogFormat::Json } else { LogFormat::Console },
            name,
            context: Arc::new(RwLock::new(LogContext::default())),
        }
    }

    /// A logger for another component sharing this one's settings and context
    pub fn child(&self, name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..self.clone()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> LogLevel {
        self.min_level
    }

    pub fn set_level(&mut self, level: LogLevel) {
        self.min_level = level;
    }

    pub fn set_format(&mut self, format: LogFormat) {
        self.format = format;
    }

    pub fn set_color(&mut self, use_color: bool) {
        self.use_color = use_color;
    }

    pub fn set_session_id(&self, session_id: String) {
        if let Ok(mut context) = self.context.write() {
            context.session_id = Some(session_id);
        }
    }

    /// Add a field to every subsequent entry
    pub fn add_context_field<T: Serialize>(&self, key: &str, value: T) {
        if let Ok(json_value) = serde_json::to_value(value) {
            if let Ok(mut context) = self.context.write() {
                context.context_fields.insert(key.to_string(), json_value);
            }
        }
    }

    /// Start a correlated operation and return its id
    pub fn start_operation(&self, operation_name: &str) -> String {
        let correlation_id = Uuid::new_v4().to_string();
        if let Ok(mut context) = self.context.write() {
            context.current_correlation_id = Some(correlation_id.clone());
        }

        self.info(&format!("Started operation: {}", operation_name))
            .correlation_id(&correlation_id)
            .field("operation", operation_name)
            .field("operation_type", "start")
            .log();

        correlation_id
    }

    pub fn end_operation(&self, correlation_id: &str, operation_name: &str, success: bool) {
        self.info(&format!("Completed operation: {} (success: {})", operation_name, success))
            .correlation_id(correlation_id)
            .field("operation", operation_name)
            .field("operation_type", "end")
            .field("success", success)
            .log();

        if let Ok(mut context) = self.context.write() {
            if context.current_correlation_id.as_deref() == Some(correlation_id) {
                context.current_correlation_id = None;
            }
        }
    }

    pub fn current_operation(&self) -> Option<String> {
        self.context
            .read()
            .ok()
            .and_then(|context| context.current_correlation_id.clone())
    }

    pub fn log(&self, level: LogLevel, message: &str) -> LogEntryBuilder<'_> {
        LogEntryBuilder::new(self, level, message.to_string())
    }

    pub fn trace(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Trace, message)
    }

    pub fn debug(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Debug, message)
    }

    pub fn info(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Info, message)
    }

    pub fn warn(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Warn, message)
    }

    pub fn error(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Error, message)
    }

    pub fn fatal(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Fatal, message)
    }

    pub fn would_log(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    fn write_entry(&self, entry: LogEntry) {
        if !self.would_log(entry.level) {
            return;
        }

        let entry = self.with_context(entry);
        let output = self.render(&entry);

        if entry.level >= LogLevel::Warn {
            let _ = writeln!(io::stderr(), "{}", output);
        } else {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }

    /// Attach session and context fields, and the current operation id if none was set
    fn with_context(&self, mut entry: LogEntry) -> LogEntry {
        if let Ok(context) = self.context.read() {
            if let Some(session_id) = &context.session_id {
                entry.fields.insert("session_id".to_string(), serde_json::Value::String(session_id.clone()));
            }
            for (key, value) in &context.context_fields {
                entry.fields.entry(key.clone()).or_insert_with(|| value.clone());
            }
            if entry.correlation_id.is_none() {
                entry.correlation_id = context.current_correlation_id.clone();
            }
        }
        entry
    }

    pub(crate) fn render(&self, entry: &LogEntry) -> String {
        match self.format {
            LogFormat::Console => self.format_console(entry),
            LogFormat::Json => self.format_json(entry),
        }
    }

    fn format_console(&self, entry: &LogEntry) -> String {
        let timestamp = entry.timestamp.format("%Y-%m-%d %H:%M:%S%.3f");
        let level = format!("{:>5}", entry.level.as_str());
        let level = if self.use_color { entry.level.colorize(&level) } else { level };

        let mut output = format!("{} {} [{}] {}", timestamp, level, entry.logger, entry.message);

        if let Some(correlation_id) = &entry.correlation_id {
            let short: String = correlation_id.chars().take(8).collect();
            output.push_str(&format!(" [{}]", short));
        }

        if !entry.fields.is_empty() {
            let mut fields: Vec<String> = entry.fields.iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            fields.sort();
            output.push_str(&format!(" {{{}}}", fields.join(", ")));
        }

        if self.include_location {
            if let Some(location) = &entry.location {
                output.push_str(&format!(" @ {}:{}", location.file, location.line));
            }
        }

        output
    }

    fn format_json(&self, entry: &LogEntry) -> String {
        serde_json::to_string(entry).unwrap_or_else(|_| {
            serde_json::json!({
                "error": "Failed to serialize log entry",
                "message": entry.message,
            })
            .to_string()
        })
    }
}

/// Builder for one log entry
pub struct LogEntryBuilder<'a> {
    logger: &'a Logger,
    entry: LogEntry,
}

impl<'a> LogEntryBuilder<'a> {
    fn new(logger: &'a Logger, level: LogLevel, message: String) -> Self {
        Self {
            logger,
            entry: LogEntry {
                timestamp: Utc::now(),
                level,
                message,
                logger: logger.name.clone(),
                correlation_id: None,
                fields: HashMap::new(),
                location: None,
            },
        }
    }

    pub fn correlation_id(mut self, id: &str) -> Self {
        self.entry.correlation_id = Some(id.to_string());
        self
    }

    pub fn field<T: Serialize>(mut self, key: &str, value: T) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.entry.fields.insert(key.to_string(), json_value);
        }
        self
    }

    pub fn location(mut self, file: &str, line: u32, module: Option<&str>) -> Self {
        self.entry.location = Some(LogLocation {
            file: file.to_string(),
            line,
            module: module.map(String::from),
        });
        self
    }

    pub fn error_info(self, error: &AppError) -> Self {
        self.field("error_category", error.category())
            .field("error_fatal", error.is_fatal())
            .field("error_exit_code", error.exit_code())
    }

    /// The entry as built so far
    pub fn entry(&self) -> &LogEntry {
        &self.entry
    }

    pub fn log(self) {
        self.logger.write_entry(self.entry);
    }
}

/// Times pipeline stages and logs their durations at Debug level
pub struct PerformanceLogger {
    logger: Logger,
    start_times: HashMap<String, Instant>,
}

impl PerformanceLogger {
    pub fn new(logger: &Logger) -> Self {
        Self {
            logger: logger.child("PERF"),
            start_times: HashMap::new(),
        }
    }

    pub fn start_timing(&mut self, stage: &str) {
        self.start_times.insert(stage.to_string(), Instant::now());
        self.logger.trace(&format!("Started timing: {}", stage))
            .field("stage", stage)
            .log();
    }

    /// `None` if the stage was never started
    pub fn end_timing(&mut self, stage: &str) -> Option<std::time::Duration> {
        let Some(start) = self.start_times.remove(stage) else {
            self.logger.debug(&format!("Attempted to end timing for unknown stage: {}", stage))
                .field("stage", stage)
                .log();
            return None;
        };

        let elapsed = start.elapsed();
        self.logger.debug(&format!("Completed {} in {:.3}ms", stage, elapsed.as_secs_f64() * 1000.0))
            .field("stage", stage)
            .field("duration_ms", elapsed.as_secs_f64() * 1000.0)
            .log();
        Some(elapsed)
    }

    pub fn active_stages(&self) -> usize {
        self.start_times.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entry(level: LogLevel) -> LogEntry {
        LogEntry {
            timestamp: Utc::now(),
            level,
            message: "Skipping best_effort_3.json".to_string(),
            logger: "throughput".to_string(),
            correlation_id: Some("0123456789abcdef".to_string()),
            fields: HashMap::from([
                ("reason".to_string(), serde_json::json!("malformed")),
                ("file".to_string(), serde_json::json!("best_effort_3.json")),
            ]),
            location: None,
        }
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!("debug".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert_eq!("WARNING".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Trace < LogLevel::Debug);
        assert!(LogLevel::Warn < LogLevel::Error);
        assert!(LogLevel::Error < LogLevel::Fatal);
    }

    #[test]
    fn test_logger_with_config_levels() {
        let mut config = Config::default();
        let logger = Logger::with_config("t".to_string(), &config);
        assert_eq!(logger.level(), LogLevel::Warn);
        assert!(!logger.would_log(LogLevel::Info));

        config.verbose = true;
        let logger = Logger::with_config("t".to_string(), &config);
        assert_eq!(logger.level(), LogLevel::Info);

        config.debug = true;
        let logger = Logger::with_config("t".to_string(), &config);
        assert_eq!(logger.level(), LogLevel::Debug);
        assert_eq!(logger.format, LogFormat::Json);
    }

    #[test]
    fn test_child_shares_context() {
        let logger = Logger::new("main".to_string());
        let child = logger.child("latency");
        logger.set_session_id("session-1".to_string());

        assert_eq!(child.name(), "latency");
        let entry = child.with_context(sample_entry(LogLevel::Info));
        assert_eq!(entry.fields["session_id"], serde_json::json!("session-1"));
    }

    #[test]
    fn test_operation_correlation() {
        let mut logger = Logger::new("t".to_string());
        logger.set_level(LogLevel::Fatal);

        let id = logger.start_operation("throughput");
        assert_eq!(id.len(), 36);
        assert_eq!(logger.current_operation().as_deref(), Some(id.as_str()));

        let mut entry = sample_entry(LogLevel::Info);
        entry.correlation_id = None;
        assert_eq!(logger.with_context(entry).correlation_id.as_deref(), Some(id.as_str()));

        logger.end_operation(&id, "throughput", true);
        assert!(logger.current_operation().is_none());
    }

    #[test]
    fn test_context_fields_do_not_override_entry_fields() {
        let logger = Logger::new("t".to_string());
        logger.add_context_field("file", "other.json");
        logger.add_context_field("pipeline", "throughput");

        let entry = logger.with_context(sample_entry(LogLevel::Warn));
        assert_eq!(entry.fields["file"], serde_json::json!("best_effort_3.json"));
        assert_eq!(entry.fields["pipeline"], serde_json::json!("throughput"));
    }

    #[test]
    fn test_log_formats() {
        let mut logger = Logger::new("t".to_string());
        let entry = sample_entry(LogLevel::Warn);

        let console = logger.render(&entry);
        assert!(console.contains(" WARN [throughput] Skipping best_effort_3.json [01234567]"));
        assert!(console.contains("{file=\"best_effort_3.json\", reason=\"malformed\"}"));

        logger.set_format(LogFormat::Json);
        let json: serde_json::Value = serde_json::from_str(&logger.render(&entry)).unwrap();
        assert_eq!(json["level"], "Warn");
        assert_eq!(json["fields"]["reason"], "malformed");
    }

    #[test]
    fn test_console_location_only_when_enabled() {
        let logger = Logger::new("t".to_string());
        let mut entry = sample_entry(LogLevel::Info);
        entry.location = Some(LogLocation { file: "src/plot.rs".to_string(), line: 42, module: None });
        assert!(!logger.render(&entry).contains("@ src/plot.rs:42"));

        let mut config = Config::default();
        config.debug = true;
        let mut logger = Logger::with_config("t".to_string(), &config);
        logger.set_format(LogFormat::Console);
        assert!(logger.render(&entry).contains("@ src/plot.rs:42"));
    }

    #[test]
    fn test_entry_builder_fields() {
        let logger = Logger::new("t".to_string());
        let error = AppError::plot("backend unavailable");
        let builder = logger.warn("Plot failed")
            .field("condition", "best_effort")
            .error_info(&error);

        let entry = builder.entry();
        assert_eq!(entry.level, LogLevel::Warn);
        assert_eq!(entry.fields["condition"], serde_json::json!("best_effort"));
        assert_eq!(entry.fields["error_category"], serde_json::json!("PLOT"));
        assert_eq!(entry.fields["error_exit_code"], serde_json::json!(6));
    }

    #[test]
    fn test_performance_timing() {
        let mut logger = Logger::new("t".to_string());
        logger.set_level(LogLevel::Fatal);
        let mut perf = PerformanceLogger::new(&logger);

        perf.start_timing("extract");
        assert_eq!(perf.active_stages(), 1);
        assert!(perf.end_timing("extract").is_some());
        assert_eq!(perf.active_stages(), 0);
        assert!(perf.end_timing("extract").is_none());
    }
}
