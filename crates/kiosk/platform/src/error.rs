//! Error types raised at the platform seam

use thiserror::Error;

/// Failures reported by platform calls
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    /// A system service could not be obtained
    #[error("System service unavailable: {service}")]
    ServiceUnavailable { service: String },

    /// The caller lacks the privilege for the call (typically not device owner)
    #[error("Security exception in {operation}: {message}")]
    Security { operation: String, message: String },

    /// The call reached the platform and failed there
    #[error("Platform call {operation} failed: {message}")]
    CallFailed { operation: String, message: String },
}

impl PlatformError {
    pub fn unavailable(service: impl Into<String>) -> Self {
        Self::ServiceUnavailable {
            service: service.into(),
        }
    }

    pub fn security(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Security {
            operation: operation.into(),
            message: message.into(),
        }
    }

    pub fn call_failed(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CallFailed {
            operation: operation.into(),
            message: message.into(),
        }
    }
}

/// Result type for platform calls
pub type PlatformResult<T> = std::result::Result<T, PlatformError>;
