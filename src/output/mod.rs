//! Console report rendering
//!
//! Both formatters print the same report layout; the colored one adds
//! terminal styling.

mod colored;
mod formatter;

pub use self::colored::{ColorScheme, ColoredFormatter};
pub use formatter::{percentile_label, FormattingOptions, OutputFormatter, PlainFormatter};

use crate::models::Config;

/// Output formatting factory for creating appropriate formatters
pub struct OutputFormatterFactory;

impl OutputFormatterFactory {
    /// Create a formatter based on color support and preferences
    pub fn create_formatter(enable_color: bool, verbose: bool) -> Box<dyn OutputFormatter> {
        let options = FormattingOptions {
            enable_color,
            verbose_mode: verbose,
        };

        if enable_color && ColoredFormatter::supports_color() {
            Box::new(ColoredFormatter::new(options))
        } else {
            Box::new(PlainFormatter::new(FormattingOptions { enable_color: false, ..options }))
        }
    }

    pub fn from_config(config: &Config) -> Box<dyn OutputFormatter> {
        Self::create_formatter(config.enable_color, config.verbose)
    }
}
