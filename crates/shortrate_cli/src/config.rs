//! CLI configuration management
//!
//! Settings come from a TOML file, environment variables and command-line
//! flags. Priority (highest to lowest):
//!
//! 1. CLI arguments
//! 2. Environment variables (`SHORTRATE_LOG_LEVEL`, `SHORTRATE_SEED`)
//! 3. Config file (`shortrate.toml`)
//! 4. Default values
//!
//! ```toml
//! log_level = "debug"
//!
//! [calibration]
//! fixed_mean_reversion = 0.1
//! time_limit_secs = 30.0
//!
//! [simulation]
//! seed = 42
//! parallel = false
//! ```

use serde::Deserialize;
use shortrate_optimiser::CalibrationConfig;
use shortrate_simulation::SimulationConfig;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Environment variable overriding the log level.
pub const ENV_LOG_LEVEL: &str = "SHORTRATE_LOG_LEVEL";

/// Environment variable fixing the simulation seed.
pub const ENV_SEED: &str = "SHORTRATE_SEED";

/// Errors raised while assembling the CLI configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown log level '{0}' (expected trace, debug, info, warn or error)")]
    InvalidLogLevel(String),

    #[error("Cannot load {path}: {reason}")]
    FileError { path: String, reason: String },

    #[error("Bad environment override: {0}")]
    EnvError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Verbosity of the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    const ALL: [LogLevel; 5] = [
        LogLevel::Trace,
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
    ];

    /// Directive handed to `EnvFilter`
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        LogLevel::ALL
            .into_iter()
            .find(|level| level.as_filter_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ConfigError::InvalidLogLevel(wanted.to_string()))
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_filter_str())
    }
}

fn deserialize_log_level<'de, D>(deserializer: D) -> Result<LogLevel, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    LogLevel::from_str(&s).map_err(serde::de::Error::custom)
}

/// CLI configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Log level
    #[serde(deserialize_with = "deserialize_log_level")]
    pub log_level: LogLevel,
    /// Calibration settings
    pub calibration: CalibrationConfig,
    /// Simulation settings
    pub simulation: SimulationConfig,
}

impl CliConfig {
    /// Parse TOML text; `origin` names the source in error messages
    pub fn from_toml_str(content: &str, origin: &str) -> Result<Self, ConfigError> {
        let config: CliConfig = toml::from_str(content).map_err(|e| ConfigError::FileError {
            path: origin.to_string(),
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let origin = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileError {
            path: origin.clone(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&content, &origin)
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(log_level) = lookup(ENV_LOG_LEVEL) {
            self.log_level = LogLevel::from_str(&log_level)?;
        }

        if let Some(seed) = lookup(ENV_SEED) {
            let seed = seed.trim().parse::<u64>().map_err(|_| {
                ConfigError::EnvError(format!("{}={} is not an unsigned integer", ENV_SEED, seed))
            })?;
            self.simulation.seed = Some(seed);
        }

        Ok(())
    }

    /// Merge with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli: &CliArgs) -> Result<(), ConfigError> {
        if let Some(log_level) = &cli.log_level {
            self.log_level = LogLevel::from_str(log_level)?;
        } else if cli.verbose {
            self.log_level = LogLevel::Debug;
        }
        if let Some(seed) = cli.seed {
            self.simulation.seed = Some(seed);
        }
        if cli.sequential {
            self.calibration.parallel = false;
            self.simulation.parallel = false;
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.calibration
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}

/// CLI arguments relevant to configuration
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// Config file path
    pub config_file: Option<PathBuf>,
    /// Log level override
    pub log_level: Option<String>,
    /// Raise the log level to debug when no explicit level is given
    pub verbose: bool,
    /// Simulation seed override
    pub seed: Option<u64>,
    /// Disable parallel calibration and simulation
    pub sequential: bool,
}

/// Build configuration from all sources
///
/// A missing config file is not an error; defaults are used instead.
pub fn build_config(cli: &CliArgs) -> Result<CliConfig, ConfigError> {
    let mut config = match &cli.config_file {
        Some(path) if path.exists() => CliConfig::from_file(path)?,
        _ => CliConfig::default(),
    };

    config.apply_env()?;
    config.merge_with_cli(cli)?;
    config.validate()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.calibration, CalibrationConfig::default());
        assert_eq!(config.simulation.seed, None);
        assert!(config.simulation.parallel);
    }

    #[test]
    fn test_log_level_round_trip() {
        for level in LogLevel::ALL {
            assert_eq!(level.to_string().parse::<LogLevel>().unwrap(), level);
        }
        assert_eq!(" WARN ".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert!(matches!(
            "verbose".parse::<LogLevel>(),
            Err(ConfigError::InvalidLogLevel(s)) if s == "verbose"
        ));
    }

    #[test]
    fn test_toml_sections() {
        let config = CliConfig::from_toml_str(
            r#"
            log_level = "warn"

            [calibration]
            fixed_mean_reversion = 0.1
            polish = false

            [simulation]
            seed = 7
            "#,
            "inline",
        )
        .unwrap();

        assert_eq!(config.log_level, LogLevel::Warn);
        assert_eq!(config.calibration.fixed_mean_reversion, Some(0.1));
        assert!(!config.calibration.polish);
        // Unset keys keep their defaults
        assert_eq!(config.calibration.start_points.len(), 9);
        assert_eq!(config.simulation.seed, Some(7));
        assert!(config.simulation.parallel);
    }

    #[test]
    fn test_toml_rejects_bad_values() {
        assert!(matches!(
            CliConfig::from_toml_str("log_level = \"loud\"", "inline"),
            Err(ConfigError::FileError { .. })
        ));
        assert!(matches!(
            CliConfig::from_toml_str("[calibration]\nvolatility_bounds = [0.5, 0.1]", "inline"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let vars = env(&[(ENV_LOG_LEVEL, "trace"), (ENV_SEED, "123")]);
        let mut config = CliConfig::default();
        config.apply_env_from(|k| vars.get(k).cloned()).unwrap();
        assert_eq!(config.log_level, LogLevel::Trace);
        assert_eq!(config.simulation.seed, Some(123));

        let vars = env(&[(ENV_SEED, "abc")]);
        let mut config = CliConfig::default();
        assert!(matches!(
            config.apply_env_from(|k| vars.get(k).cloned()),
            Err(ConfigError::EnvError(_))
        ));
    }

    #[test]
    fn test_cli_takes_precedence() {
        let vars = env(&[(ENV_LOG_LEVEL, "error"), (ENV_SEED, "1")]);
        let mut config = CliConfig::from_toml_str("log_level = \"warn\"", "inline").unwrap();
        config.apply_env_from(|k| vars.get(k).cloned()).unwrap();
        assert_eq!(config.log_level, LogLevel::Error);

        let cli = CliArgs {
            log_level: Some("debug".to_string()),
            seed: Some(99),
            sequential: true,
            ..CliArgs::default()
        };
        config.merge_with_cli(&cli).unwrap();
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.simulation.seed, Some(99));
        assert!(!config.calibration.parallel);
        assert!(!config.simulation.parallel);
    }

    #[test]
    fn test_verbose_only_without_explicit_level() {
        let mut config = CliConfig::default();
        let verbose = CliArgs {
            verbose: true,
            ..CliArgs::default()
        };
        config.merge_with_cli(&verbose).unwrap();
        assert_eq!(config.log_level, LogLevel::Debug);

        let both = CliArgs {
            verbose: true,
            log_level: Some("error".to_string()),
            ..CliArgs::default()
        };
        config.merge_with_cli(&both).unwrap();
        assert_eq!(config.log_level, LogLevel::Error);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let cli = CliArgs {
            config_file: Some(PathBuf::from("/nonexistent/shortrate.toml")),
            ..CliArgs::default()
        };
        let config = build_config(&cli).unwrap();
        assert_eq!(config.calibration, CalibrationConfig::default());
    }
}
