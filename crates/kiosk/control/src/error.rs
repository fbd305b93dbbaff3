//! Error types for the kiosk controller

use kiosk_platform::PlatformError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse classification of a controller failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// No foreground activity to act on
    NoActivity,

    /// The device-policy service could not be obtained
    ServiceUnavailable,

    /// Rejected by the platform, usually because the app is not device owner
    PermissionDenied,

    /// The platform call itself failed
    PlatformCallFailed,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::NoActivity => write!(f, "no_activity"),
            ErrorKind::ServiceUnavailable => write!(f, "service_unavailable"),
            ErrorKind::PermissionDenied => write!(f, "permission_denied"),
            ErrorKind::PlatformCallFailed => write!(f, "platform_call_failed"),
        }
    }
}

/// Kiosk controller errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KioskError {
    /// No activity in the foreground
    #[error("No foreground activity")]
    NoActivity,

    /// Device-policy service unavailable
    #[error("Device policy service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Permission denied by the platform
    #[error("Permission denied in {operation}: {message}")]
    PermissionDenied { operation: String, message: String },

    /// Platform call failed
    #[error("Platform call {operation} failed: {message}")]
    PlatformCallFailed { operation: String, message: String },
}

impl KioskError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            KioskError::NoActivity => ErrorKind::NoActivity,
            KioskError::ServiceUnavailable(_) => ErrorKind::ServiceUnavailable,
            KioskError::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            KioskError::PlatformCallFailed { .. } => ErrorKind::PlatformCallFailed,
        }
    }
}

impl From<PlatformError> for KioskError {
    fn from(err: PlatformError) -> Self {
        match err {
            PlatformError::ServiceUnavailable { service } => KioskError::ServiceUnavailable(service),
            PlatformError::Security { operation, message } => {
                KioskError::PermissionDenied { operation, message }
            }
            PlatformError::CallFailed { operation, message } => {
                KioskError::PlatformCallFailed { operation, message }
            }
        }
    }
}

/// Result type for controller operations
pub type KioskResult<T> = std::result::Result<T, KioskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_errors_map_to_kinds() {
        let cases = [
            (
                PlatformError::unavailable("device_policy"),
                ErrorKind::ServiceUnavailable,
            ),
            (
                PlatformError::security("add_user_restriction", "not owner"),
                ErrorKind::PermissionDenied,
            ),
            (
                PlatformError::call_failed("start_lock_task", "boom"),
                ErrorKind::PlatformCallFailed,
            ),
        ];

        for (platform, kind) in cases {
            assert_eq!(KioskError::from(platform).kind(), kind);
        }
        assert_eq!(KioskError::NoActivity.kind(), ErrorKind::NoActivity);
    }

    #[test]
    fn test_error_message_keeps_operation() {
        let err = KioskError::from(PlatformError::call_failed("stop_lock_task", "binder died"));
        assert_eq!(
            err.to_string(),
            "Platform call stop_lock_task failed: binder died"
        );
    }
}
