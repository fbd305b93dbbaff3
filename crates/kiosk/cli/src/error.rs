//! CLI error types

use thiserror::Error;

/// CLI error types
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] kiosk_bridge::ConfigError),

    /// Bridge wiring error
    #[error("Bridge error: {0}")]
    Bridge(#[from] kiosk_bridge::BridgeError),

    /// A promise was dropped before resolving
    #[error("Query was never answered: {0}")]
    Unanswered(&'static str),

    /// JSON encoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;
