//! Policy gateway
//!
//! Resolves the device-policy service for the foreground activity. Resolution
//! never fails loudly: a missing activity or any platform error yields
//! [`PolicyHandle::Unavailable`] and is logged here.

use crate::error::{PlatformError, PlatformResult};
use crate::host::{DevicePolicyService, HostActivity};
use std::sync::Arc;
use tracing::{debug, warn};

/// Name of the device-policy system service
pub const DEVICE_POLICY_SERVICE: &str = "device_policy";

/// Outcome of resolving the device-policy service
#[derive(Clone)]
pub enum PolicyHandle {
    Available(Arc<dyn DevicePolicyService>),
    Unavailable(PlatformError),
}

impl PolicyHandle {
    pub fn is_available(&self) -> bool {
        matches!(self, PolicyHandle::Available(_))
    }

    /// The service, if resolved
    pub fn ok(self) -> Option<Arc<dyn DevicePolicyService>> {
        match self {
            PolicyHandle::Available(service) => Some(service),
            PolicyHandle::Unavailable(_) => None,
        }
    }

    pub fn into_result(self) -> PlatformResult<Arc<dyn DevicePolicyService>> {
        match self {
            PolicyHandle::Available(service) => Ok(service),
            PolicyHandle::Unavailable(err) => Err(err),
        }
    }
}

impl std::fmt::Debug for PolicyHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PolicyHandle::Available(_) => f.write_str("PolicyHandle::Available"),
            PolicyHandle::Unavailable(err) => {
                f.debug_tuple("PolicyHandle::Unavailable").field(err).finish()
            }
        }
    }
}

/// Resolve the device-policy service for `activity`
pub fn policy_handle(activity: Option<&dyn HostActivity>) -> PolicyHandle {
    let Some(activity) = activity else {
        debug!("No foreground activity, device policy service unavailable");
        return PolicyHandle::Unavailable(PlatformError::unavailable(DEVICE_POLICY_SERVICE));
    };

    match activity.device_policy_service() {
        Ok(service) => PolicyHandle::Available(service),
        Err(err) => {
            warn!(
                package = %activity.package_name(),
                error = %err,
                "Failed to resolve device policy service"
            );
            PolicyHandle::Unavailable(err)
        }
    }
}
