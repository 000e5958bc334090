//! Configuration assembly: defaults, then `.env`, then environment, then CLI

use crate::{
    cli::Cli,
    config::env::EnvManager,
    error::Result,
    models::{config::expand_home, Config},
};

/// Configuration parser that combines CLI arguments with environment variables
pub struct ConfigParser {
    cli: Cli,
}

impl ConfigParser {
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Parse and build the complete configuration
    pub fn parse(&self) -> Result<Config> {
        EnvManager::load_env_file()?;
        self.parse_with(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an explicit variable lookup instead of
    /// the process environment
    pub fn parse_with<F>(&self, lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        EnvManager::validate_from_source(&lookup)?;
        config.merge_from_source(&lookup)?;

        self.apply_cli_overrides(&mut config);
        config.validate()?;

        Ok(config)
    }

    fn apply_cli_overrides(&self, config: &mut Config) {
        if let Some(root) = &self.cli.results_root {
            config.set_results_root(root);
        }

        if let Some(dir) = &self.cli.baseline_dir {
            config.baseline_dir = expand_home(dir);
        }

        if let Some(dir) = &self.cli.intermediate_dir {
            config.intermediate_dir = expand_home(dir);
        }

        if let Some(percentile) = self.cli.percentile {
            config.latency_percentile = percentile;
        }

        if self.cli.no_plot {
            config.enable_plot = false;
        }

        if let Some(color) = self.cli.color_override() {
            config.enable_color = color;
        }

        // CLI-only flags
        config.verbose = self.cli.verbose || self.cli.debug;
        config.debug = self.cli.debug;
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    ConfigParser::new(cli).parse()
}

/// Configuration summary for debug output
pub fn display_config_summary(config: &Config) -> String {
    [
        format!("Baseline directory: {}", config.baseline_dir.display()),
        format!("Intermediate directory: {}", config.intermediate_dir.display()),
        format!("Latency percentile: {}", config.latency_percentile),
        format!("Plot: {}", config.enable_plot),
        format!("Color Output: {}", config.enable_color),
        format!("Verbose: {}", config.verbose),
        format!("Debug: {}", config.debug),
    ]
    .join("\n")
}
