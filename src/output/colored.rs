//! Colored formatter implementation with terminal color support

use super::formatter::{FormattingOptions, OutputFormatter, BANNER_WIDTH, SECTION_WIDTH};
use crate::error::Result;
use colored::*;

/// Color scheme configuration
#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub header: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub value: Color,
    pub conclusion: Color,
    pub border: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            header: Color::Blue,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            value: Color::Cyan,
            conclusion: Color::Magenta,
            border: Color::BrightBlack,
        }
    }
}

/// Colored formatter implementation
pub struct ColoredFormatter {
    options: FormattingOptions,
    color_scheme: ColorScheme,
}

impl ColoredFormatter {
    pub fn new(options: FormattingOptions) -> Self {
        Self {
            options,
            color_scheme: ColorScheme::default(),
        }
    }

    /// Apply color to text if colors are enabled
    fn colorize(&self, text: &str, color: Color) -> ColoredString {
        if self.options.enable_color {
            text.color(color)
        } else {
            text.normal()
        }
    }

    fn rule(&self, width: usize) -> ColoredString {
        self.colorize(&"=".repeat(width), self.color_scheme.border)
    }

    fn title(&self, text: &str) -> ColoredString {
        if self.options.enable_color {
            text.bold().color(self.color_scheme.header)
        } else {
            text.normal()
        }
    }

    /// Whether the environment allows colored output.
    ///
    /// `TERM=dumb` and `NO_COLOR` turn colors off, `FORCE_COLOR` turns them
    /// on, otherwise Unix terminals get color.
    pub fn supports_color() -> bool {
        color_allowed(|key| std::env::var(key).ok())
    }
}

fn color_allowed<F>(lookup: F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    if lookup("TERM").is_some_and(|term| term == "dumb") {
        return false;
    }
    if lookup("NO_COLOR").is_some() {
        return false;
    }
    if lookup("FORCE_COLOR").is_some() {
        return true;
    }
    cfg!(unix)
}

impl OutputFormatter for ColoredFormatter {
    fn banner(&self, title: &str) -> String {
        format!("{}\n{}\n{}", self.rule(BANNER_WIDTH), self.title(title), self.rule(BANNER_WIDTH))
    }

    fn section(&self, title: &str) -> String {
        format!("\n{}\n{}\n{}", self.rule(SECTION_WIDTH), self.title(title), self.rule(SECTION_WIDTH))
    }

    fn heading(&self, text: &str) -> String {
        if self.options.enable_color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn field(&self, label: &str, value: &str) -> String {
        format!("  {}: {}", label, self.colorize(value, self.color_scheme.value))
    }

    fn note(&self, text: &str) -> String {
        format!("  {}", text)
    }

    fn conclusion(&self, text: &str) -> String {
        format!("  {} {}", self.colorize("→", self.color_scheme.conclusion), text)
    }

    fn format_error(&self, error: &str) -> Result<String> {
        Ok(format!("  {} {}", self.colorize("Error:", self.color_scheme.error), error))
    }

    fn format_warning(&self, warning: &str) -> Result<String> {
        Ok(format!("  {} {}", self.colorize("Warning:", self.color_scheme.warning), warning))
    }

    fn format_success(&self, message: &str) -> Result<String> {
        Ok(self.colorize(message, self.color_scheme.success).to_string())
    }

    fn options(&self) -> &FormattingOptions {
        &self.options
    }
}
