//! Error types for the bridge

use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Loading or deserializing failed
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    /// A value was loaded but makes no sense
    #[error("Invalid configuration value for {field}: {message}")]
    Invalid { field: String, message: String },
}

impl ConfigError {
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Bridge wiring errors
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A required component was not supplied to the builder
    #[error("Missing bridge component: {0}")]
    Missing(&'static str),
}

/// Result type for bridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;
