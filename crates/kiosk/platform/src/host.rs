//! Platform trait definitions

use crate::error::PlatformResult;
use kiosk_types::{
    AdminComponent, ComponentName, IntentFilter, LockTaskMode, SdkLevel, SystemUiFlags,
    UserRestriction, WindowFlags,
};
use std::sync::Arc;

/// Device-policy service handle
///
/// Every call is synchronous and blocking. Calls that require device-owner
/// privilege fail with [`PlatformError::Security`](crate::PlatformError::Security)
/// when the caller is not the device owner.
pub trait DevicePolicyService: Send + Sync {
    /// Whether `package` is the device owner
    fn is_device_owner_app(&self, package: &str) -> PlatformResult<bool>;

    /// Replace the set of packages allowed to enter full lock task
    fn set_lock_task_packages(
        &self,
        admin: &AdminComponent,
        packages: &[String],
    ) -> PlatformResult<()>;

    /// Enable or disable the keyguard
    fn set_keyguard_disabled(&self, admin: &AdminComponent, disabled: bool) -> PlatformResult<()>;

    /// Make `activity` the persistent preferred handler for `filter`
    fn add_persistent_preferred_activity(
        &self,
        admin: &AdminComponent,
        filter: &IntentFilter,
        activity: &ComponentName,
    ) -> PlatformResult<()>;

    fn add_user_restriction(
        &self,
        admin: &AdminComponent,
        restriction: UserRestriction,
    ) -> PlatformResult<()>;

    fn clear_user_restriction(
        &self,
        admin: &AdminComponent,
        restriction: UserRestriction,
    ) -> PlatformResult<()>;

    /// Give up device-owner status for `package`
    fn clear_device_owner_app(&self, package: &str) -> PlatformResult<()>;
}

/// Window of the foreground activity
///
/// Must only be mutated from the UI thread.
pub trait Window: Send + Sync {
    /// Apply visibility flags to the decor view
    ///
    /// Returns `false` when the window has no decor view yet.
    fn set_system_ui_visibility(&self, flags: SystemUiFlags) -> bool;

    fn add_flags(&self, flags: WindowFlags);

    fn clear_flags(&self, flags: WindowFlags);
}

/// The foreground activity of the hosting application
pub trait HostActivity: Send + Sync {
    /// Package of the running app
    fn package_name(&self) -> &str;

    /// API level of the device
    fn sdk_level(&self) -> SdkLevel;

    /// Resolve the device-policy system service
    fn device_policy_service(&self) -> PlatformResult<Arc<dyn DevicePolicyService>>;

    /// Current lock task mode (API level 23+)
    fn lock_task_mode(&self) -> PlatformResult<LockTaskMode>;

    /// Whether any lock task is in effect (API levels 21 and 22)
    fn is_in_lock_task_mode(&self) -> PlatformResult<bool>;

    /// The activity's window, if it has been attached
    ///
    /// May be called from any thread. The returned handle is moved onto the
    /// UI thread, and only its mutators have to run there.
    fn window(&self) -> Option<Arc<dyn Window>>;

    fn start_lock_task(&self) -> PlatformResult<()>;

    fn stop_lock_task(&self) -> PlatformResult<()>;

    /// Launch the system settings screen
    fn open_settings(&self) -> PlatformResult<()>;
}

/// Admin lifecycle callbacks delivered by the OS
pub trait AdminReceiver: Send + Sync {
    fn on_enabled(&self);

    fn on_disabled(&self);

    fn on_lock_task_mode_entering(&self, package: &str);

    fn on_lock_task_mode_exiting(&self);
}
