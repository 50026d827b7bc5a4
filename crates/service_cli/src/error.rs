//! Error types for the proration CLI.

use proration_core::types::{DateError, ProrationError};
use thiserror::Error;

/// CLI error type
#[derive(Debug, Error)]
pub enum CliError {
    /// Run file or settings problem
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Proration of a series failed
    #[error("Proration failed for {series}: {source}")]
    Proration {
        /// Series being prorated
        series: String,
        /// Engine error
        #[source]
        source: ProrationError,
    },

    /// Engine error not tied to a single series
    #[error("Proration error: {0}")]
    Engine(#[from] ProrationError),

    /// Date handling error
    #[error("Date error: {0}")]
    Date(#[from] DateError),

    /// JSON rendering error
    #[error("Serialisation error: {0}")]
    Serialise(#[from] serde_json::Error),
}

impl CliError {
    /// Attach the series name to an engine error
    pub fn proration(series: impl Into<String>, source: ProrationError) -> Self {
        Self::Proration {
            series: series.into(),
            source,
        }
    }
}

/// Result alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
