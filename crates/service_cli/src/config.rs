//! Run-file configuration management
//!
//! Handles loading the stay and invoice data from a TOML run file, plus the
//! output settings, with environment variable and CLI overrides.

use proration_core::series::UtilitySeries;
use proration_core::types::StayPeriod;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Environment variable overriding the log level.
pub const ENV_LOG_LEVEL: &str = "PRORATE_LOG_LEVEL";
/// Environment variable overriding the output format.
pub const ENV_FORMAT: &str = "PRORATE_FORMAT";

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid output format: {0}. Must be one of: table, json")]
    InvalidFormat(String),

    #[error("Configuration file error: {0}")]
    FileError(String),

    #[error("Invalid run file: {0}")]
    Validation(String),
}

/// Log levels supported by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[default]
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
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

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

/// How the statement is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" | "text" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(ConfigError::InvalidFormat(s.to_string())),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

fn deserialize_log_level<'de, D>(deserializer: D) -> Result<Option<LogLevel>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|s| LogLevel::from_str(&s).map_err(serde::de::Error::custom))
        .transpose()
}

fn deserialize_format<'de, D>(deserializer: D) -> Result<Option<OutputFormat>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|s| OutputFormat::from_str(&s).map_err(serde::de::Error::custom))
        .transpose()
}

/// Contents of a TOML run file
///
/// ```toml
/// log_level = "info"
/// format = "table"
///
/// [stay]
/// start = "2025-05-11"
/// end = "2025-06-27"
///
/// [[series]]
/// name = "Gas"
/// convention = "inclusive"
/// invoices = [
///   { start = "2025-05-13", end = "2025-06-11", amount = "4284.86" },
/// ]
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct RunFile {
    /// Log level requested by the file
    #[serde(default, deserialize_with = "deserialize_log_level")]
    pub log_level: Option<LogLevel>,
    /// Output format requested by the file
    #[serde(default, deserialize_with = "deserialize_format")]
    pub format: Option<OutputFormat>,
    /// The occupant's stay
    pub stay: StayPeriod,
    /// Utility series to prorate, in report order
    #[serde(default)]
    pub series: Vec<UtilitySeries>,
}

impl RunFile {
    /// Load a run file from TOML
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::FileError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::parse(&content)
    }

    /// Parse run file contents and validate them
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let run_file: RunFile = toml::from_str(content)
            .map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)))?;

        run_file.validate()?;
        Ok(run_file)
    }

    /// Validate the run file
    ///
    /// Only structural problems are checked here. Invoice-level problems
    /// (reversed periods, negative or unspreadable amounts) are reported by
    /// the proration engine itself.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if let Err(e) = self.stay.validate() {
            errors.push(format!("stay: {}", e));
        }

        if self.series.is_empty() {
            errors.push("at least one [[series]] is required".to_string());
        }

        let mut seen = HashSet::new();
        for series in &self.series {
            let name = series.name.trim();
            if name.is_empty() {
                errors.push("series name must not be empty".to_string());
            } else if !seen.insert(name.to_lowercase()) {
                errors.push(format!("duplicate series name '{}'", name));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors.join("; ")))
        }
    }
}

/// CLI arguments relevant to settings resolution
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// Log level override
    pub log_level: Option<String>,
    /// Output format override
    pub format: Option<String>,
    /// Verbose flag (forces at least `debug`)
    pub verbose: bool,
}

/// Resolved output settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Settings {
    /// Log level
    pub log_level: LogLevel,
    /// Output format
    pub format: OutputFormat,
}

impl Settings {
    /// Apply overrides read through `lookup`
    ///
    /// Unset variables leave the current value alone.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.log_level = LogLevel::from_str(&level)?;
        }
        if let Some(format) = lookup(ENV_FORMAT) {
            self.format = OutputFormat::from_str(&format)?;
        }
        Ok(())
    }

    /// Merge with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli: &CliArgs) -> Result<(), ConfigError> {
        if let Some(level) = &cli.log_level {
            self.log_level = LogLevel::from_str(level)?;
        }
        if let Some(format) = &cli.format {
            self.format = OutputFormat::from_str(format)?;
        }
        if cli.verbose && matches!(self.log_level, LogLevel::Info | LogLevel::Warn | LogLevel::Error) {
            self.log_level = LogLevel::Debug;
        }
        Ok(())
    }
}

/// Build settings from all sources
///
/// Priority (highest to lowest):
/// 1. CLI arguments
/// 2. Environment variables
/// 3. Run file
/// 4. Default values
pub fn build_settings(run_file: Option<&RunFile>, cli: &CliArgs) -> Result<Settings, ConfigError> {
    build_settings_with_env(run_file, cli, |key| std::env::var(key).ok())
}

/// [`build_settings`] with an explicit environment lookup
pub fn build_settings_with_env<F>(
    run_file: Option<&RunFile>,
    cli: &CliArgs,
    lookup: F,
) -> Result<Settings, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut settings = Settings::default();

    if let Some(file) = run_file {
        if let Some(level) = file.log_level {
            settings.log_level = level;
        }
        if let Some(format) = file.format {
            settings.format = format;
        }
    }

    settings.apply_env(lookup)?;
    settings.merge_with_cli(cli)?;

    Ok(settings)
}
