//! Environment variable handling and .env file management

use crate::error::{AppError, ErrorContext, Result};
use std::path::Path;

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load `.env` from the working directory if it exists.
    ///
    /// Variables already set in the environment are not overridden.
    pub fn load_env_file() -> Result<bool> {
        Self::load_env_file_from(Path::new(".env"))
    }

    /// Load a specific env file. Returns whether a file was loaded.
    pub fn load_env_file_from(path: &Path) -> Result<bool> {
        if !path.exists() {
            return Ok(false);
        }

        dotenv::from_path(path).with_context(|| format!("Failed to load {}", path.display()))?;
        Ok(true)
    }

    /// Validate one variable's format before it is merged into the configuration
    pub fn validate_env_var(key: &str, value: &str) -> Result<()> {
        match key {
            "TSN_RESULTS_ROOT" | "TSN_BASELINE_DIR" | "TSN_INTERMEDIATE_DIR" => {
                if value.contains('\0') {
                    return Err(AppError::config(format!("{} contains a NUL byte", key)));
                }
            }
            "LATENCY_PERCENTILE" => {
                let rank: f64 = value.trim().parse()
                    .map_err(|e| AppError::config(format!("Invalid LATENCY_PERCENTILE value '{}': {}", value, e)))?;
                if !rank.is_finite() || rank <= 0.0 || rank > 100.0 {
                    return Err(AppError::config(format!(
                        "LATENCY_PERCENTILE must be in (0, 100], got: {}",
                        value
                    )));
                }
            }
            "ENABLE_PLOT" | "ENABLE_COLOR" => {
                value.trim().parse::<bool>()
                    .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", key, value, e)))?;
            }
            _ => {
                // Unknown environment variable, ignore
            }
        }

        Ok(())
    }

    /// Supported variables as (name, description, example)
    pub fn get_supported_env_vars() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            ("TSN_RESULTS_ROOT", "Parent of baseline/ and intermediate/", "~/tsn-emulation-project/results"),
            ("TSN_BASELINE_DIR", "Directory of iperf3 JSON reports", "/data/run1/baseline"),
            ("TSN_INTERMEDIATE_DIR", "Directory of ping logs", "/data/run1/intermediate"),
            ("LATENCY_PERCENTILE", "Latency percentile to report (0-100]", "95"),
            ("ENABLE_PLOT", "Render the throughput chart", "true"),
            ("ENABLE_COLOR", "Enable colored output", "true"),
        ]
    }

    /// Display environment variable help
    pub fn display_env_help() -> String {
        let mut help = String::from("Supported Environment Variables:\n\n");

        for (var, description, example) in Self::get_supported_env_vars() {
            help.push_str(&format!("  {:<22} {}\n", var, description));
            help.push_str(&format!("  {:<22} Example: {}\n\n", "", example));
        }

        help.push_str("Configuration Priority (highest to lowest):\n");
        help.push_str("  1. Command-line arguments\n");
        help.push_str("  2. Environment variables\n");
        help.push_str("  3. .env file values\n");
        help.push_str("  4. Default values\n");

        help
    }

    /// Validate every supported variable present in `lookup`, stopping at the first bad one
    pub fn validate_from_source<F>(lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        for (var_name, _, _) in Self::get_supported_env_vars() {
            if let Some(value) = lookup(var_name) {
                Self::validate_env_var(var_name, &value)?;
            }
        }
        Ok(())
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_validate_percentile() {
        assert!(EnvManager::validate_env_var("LATENCY_PERCENTILE", "95").is_ok());
        assert!(EnvManager::validate_env_var("LATENCY_PERCENTILE", " 99.9 ").is_ok());
        assert!(EnvManager::validate_env_var("LATENCY_PERCENTILE", "0").is_err());
        assert!(EnvManager::validate_env_var("LATENCY_PERCENTILE", "101").is_err());
        assert!(EnvManager::validate_env_var("LATENCY_PERCENTILE", "ninety").is_err());
    }

    #[test]
    fn test_validate_booleans() {
        assert!(EnvManager::validate_env_var("ENABLE_PLOT", "false").is_ok());
        assert!(EnvManager::validate_env_var("ENABLE_COLOR", "true").is_ok());
        let err = EnvManager::validate_env_var("ENABLE_PLOT", "yes").unwrap_err();
        assert_eq!(err.category(), "CONFIG");
        assert!(err.to_string().contains("ENABLE_PLOT"));
    }

    #[test]
    fn test_validate_directories_and_unknown() {
        assert!(EnvManager::validate_env_var("TSN_BASELINE_DIR", "/data/b").is_ok());
        assert!(EnvManager::validate_env_var("TSN_RESULTS_ROOT", "bad\0path").is_err());
        assert!(EnvManager::validate_env_var("SOMETHING_ELSE", "whatever").is_ok());
    }

    #[test]
    fn test_validate_from_source() {
        let ok = |key: &str| (key == "ENABLE_PLOT").then(|| "true".to_string());
        assert!(EnvManager::validate_from_source(ok).is_ok());

        let bad = |key: &str| (key == "LATENCY_PERCENTILE").then(|| "200".to_string());
        assert!(EnvManager::validate_from_source(bad).is_err());
    }

    #[test]
    fn test_load_env_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "# comment lines are ignored").unwrap();
        writeln!(file, "TSN_ANALYZE_TEST_ONLY_VAR=42").unwrap();
        assert!(EnvManager::load_env_file_from(file.path()).unwrap());
        assert_eq!(std::env::var("TSN_ANALYZE_TEST_ONLY_VAR").unwrap(), "42");
    }

    #[test]
    fn test_malformed_env_file_is_a_config_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "TSN_ANALYZE_BROKEN='unterminated").unwrap();
        let err = EnvManager::load_env_file_from(file.path()).unwrap_err();
        assert_eq!(err.category(), "CONFIG");
        assert!(err.to_string().contains("Failed to load"));
    }

    #[test]
    fn test_missing_env_file_is_not_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(!EnvManager::load_env_file_from(&dir.path().join(".env")).unwrap());
    }

    #[test]
    fn test_env_help_lists_priority() {
        let help = EnvManager::display_env_help();
        assert!(help.contains("TSN_RESULTS_ROOT"));
        assert!(help.contains("1. Command-line arguments"));
        for (var, _, _) in EnvManager::get_supported_env_vars() {
            assert!(help.contains(var), "{} missing from help", var);
        }
    }
}
