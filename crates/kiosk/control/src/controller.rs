//! Kiosk controller
//!
//! Enters and exits kiosk mode by combining UI visibility flags, window flags
//! and device-owner policy calls in a fixed order. The controller keeps no
//! state of its own: whether kiosk mode is active is always read back from
//! the platform.
//!
//! Two layers of API:
//! - `try_*` and `*_transition` return tagged [`KioskError`]s
//! - the plain operations log failures and collapse them to `false`, so a
//!   host never crashes because kiosk enforcement could not be engaged

use crate::error::{ErrorKind, KioskError, KioskResult};
use crate::profile::KioskProfile;
use kiosk_platform::{dispatch, policy_handle, DevicePolicyService, HostActivity, UiReceipt, UiThread};
use kiosk_types::{KioskState, SystemUiFlags, WindowFlags};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outcome of an enter or exit
#[derive(Debug)]
pub struct Transition {
    /// Result of the policy and lock task steps
    pub outcome: KioskResult<()>,

    /// Completion of the dispatched UI mutation; `None` without an activity
    pub ui: Option<UiReceipt>,
}

impl Transition {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }

    fn without_activity() -> Self {
        Self {
            outcome: Err(KioskError::NoActivity),
            ui: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum WindowChange {
    Add,
    Clear,
}

/// Lock task and device-owner lifecycle controller
pub struct KioskController {
    profile: KioskProfile,
    ui: Arc<dyn UiThread>,
}

impl KioskController {
    pub fn new(profile: KioskProfile, ui: Arc<dyn UiThread>) -> Self {
        Self { profile, ui }
    }

    pub fn profile(&self) -> &KioskProfile {
        &self.profile
    }

    // ═══════════════════════════════════════════════════════════════════
    // BOUNDARY OPERATIONS
    // ═══════════════════════════════════════════════════════════════════

    /// Enter kiosk mode; `false` if any policy or lock task step failed
    pub fn enter(&self, activity: Option<&dyn HostActivity>) -> bool {
        let transition = self.enter_transition(activity);
        settle("enter", transition.outcome).is_some()
    }

    /// Exit kiosk mode; `false` if any step failed
    pub fn exit(&self, activity: Option<&dyn HostActivity>) -> bool {
        let transition = self.exit_transition(activity);
        settle("exit", transition.outcome).is_some()
    }

    /// Whether lock task is in effect
    pub fn query_active(&self, activity: Option<&dyn HostActivity>) -> bool {
        settle("query_active", self.try_query_active(activity)).unwrap_or(false)
    }

    /// Whether the foreground app is device owner
    pub fn query_device_owner(&self, activity: Option<&dyn HostActivity>) -> bool {
        settle("query_device_owner", self.try_query_device_owner(activity)).unwrap_or(false)
    }

    /// Give up device-owner status; `true` on success
    pub fn release_device_owner(&self, activity: Option<&dyn HostActivity>) -> bool {
        settle(
            "release_device_owner",
            self.try_release_device_owner(activity),
        )
        .is_some()
    }

    /// Current kiosk state, read from the platform
    pub fn state(&self, activity: Option<&dyn HostActivity>) -> KioskState {
        KioskState::from(self.query_active(activity))
    }

    // ═══════════════════════════════════════════════════════════════════
    // TAGGED OPERATIONS
    // ═══════════════════════════════════════════════════════════════════

    /// Enter kiosk mode, keeping the UI receipt
    ///
    /// The UI mutation is dispatched first and is not rolled back when a later
    /// step fails.
    pub fn enter_transition(&self, activity: Option<&dyn HostActivity>) -> Transition {
        let Some(activity) = activity else {
            return Transition::without_activity();
        };
        let ui = self.dispatch_ui(activity, SystemUiFlags::KIOSK, WindowChange::Add);
        Transition {
            outcome: self.enter_policy(activity),
            ui: Some(ui),
        }
    }

    /// Exit kiosk mode, keeping the UI receipt
    pub fn exit_transition(&self, activity: Option<&dyn HostActivity>) -> Transition {
        let Some(activity) = activity else {
            return Transition::without_activity();
        };
        let ui = self.dispatch_ui(activity, SystemUiFlags::RELAXED, WindowChange::Clear);
        Transition {
            outcome: self.exit_policy(activity),
            ui: Some(ui),
        }
    }

    /// Enter kiosk mode, returning the tagged error
    pub fn try_enter(&self, activity: Option<&dyn HostActivity>) -> KioskResult<()> {
        self.enter_transition(activity).outcome
    }

    /// Exit kiosk mode, returning the tagged error
    pub fn try_exit(&self, activity: Option<&dyn HostActivity>) -> KioskResult<()> {
        self.exit_transition(activity).outcome
    }

    /// Whether lock task is in effect, using the query the API level supports
    pub fn try_query_active(&self, activity: Option<&dyn HostActivity>) -> KioskResult<bool> {
        let activity = activity.ok_or(KioskError::NoActivity)?;
        let sdk = activity.sdk_level();
        if sdk.supports_lock_task_mode_state() {
            Ok(activity.lock_task_mode()?.is_active())
        } else if sdk.supports_lock_task() {
            Ok(activity.is_in_lock_task_mode()?)
        } else {
            Ok(false)
        }
    }

    /// Whether the foreground app is device owner
    pub fn try_query_device_owner(&self, activity: Option<&dyn HostActivity>) -> KioskResult<bool> {
        let activity = activity.ok_or(KioskError::NoActivity)?;
        let service = policy_handle(Some(activity)).into_result()?;
        Ok(service.is_device_owner_app(activity.package_name())?)
    }

    /// Clear device-owner status for the foreground app
    pub fn try_release_device_owner(&self, activity: Option<&dyn HostActivity>) -> KioskResult<()> {
        let activity = activity.ok_or(KioskError::NoActivity)?;
        let service = policy_handle(Some(activity)).into_result()?;
        service.clear_device_owner_app(activity.package_name())?;
        info!(package = %activity.package_name(), "Released device owner");
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════
    // STEPS
    // ═══════════════════════════════════════════════════════════════════

    fn dispatch_ui(
        &self,
        activity: &dyn HostActivity,
        visibility: SystemUiFlags,
        change: WindowChange,
    ) -> UiReceipt {
        // Resolved on the caller; only the mutations run on the UI thread
        let window = activity.window();
        dispatch(self.ui.as_ref(), move || {
            let Some(window) = window else {
                debug!("Activity has no window, skipping UI flags");
                return false;
            };
            if !window.set_system_ui_visibility(visibility) {
                debug!("Window has no decor view, skipping visibility flags");
            }
            match change {
                WindowChange::Add => window.add_flags(WindowFlags::KIOSK),
                WindowChange::Clear => window.clear_flags(WindowFlags::KIOSK),
            }
            true
        })
    }

    fn enter_policy(&self, activity: &dyn HostActivity) -> KioskResult<()> {
        let service = policy_handle(Some(activity)).into_result()?;
        let package = activity.package_name();

        if service.is_device_owner_app(package)? {
            self.apply_owner_policies(service.as_ref(), activity)?;
        } else {
            debug!(package = %package, "Not device owner, lock task will only pin the screen");
        }

        activity.start_lock_task()?;
        info!(package = %package, "Entered kiosk mode");
        Ok(())
    }

    fn apply_owner_policies(
        &self,
        service: &dyn DevicePolicyService,
        activity: &dyn HostActivity,
    ) -> KioskResult<()> {
        let admin = &self.profile.admin;
        let package = activity.package_name();

        service.set_lock_task_packages(admin, &[package.to_string()])?;

        if self.profile.disable_keyguard && activity.sdk_level().supports_keyguard_disable() {
            service.set_keyguard_disabled(admin, true)?;
        }

        service.add_persistent_preferred_activity(
            admin,
            &self.profile.home_filter(),
            &self.profile.home_activity,
        )?;

        for restriction in &self.profile.restrictions {
            service.add_user_restriction(admin, *restriction)?;
        }

        debug!(
            package = %package,
            restrictions = ?self.profile.restrictions,
            "Applied device owner kiosk policies"
        );
        Ok(())
    }

    fn exit_policy(&self, activity: &dyn HostActivity) -> KioskResult<()> {
        let cleared = policy_handle(Some(activity))
            .into_result()
            .map_err(KioskError::from)
            .and_then(|service| self.clear_owner_policies(service.as_ref(), activity));

        // Lock task is stopped even when the policy side failed
        let stopped = activity.stop_lock_task().map_err(KioskError::from);

        cleared.and(stopped)?;
        info!(package = %activity.package_name(), "Exited kiosk mode");
        Ok(())
    }

    /// Clear every profile restriction, attempting all of them
    ///
    /// An owner check that fails is treated as owner: clears are still
    /// attempted so no restriction outlives the lock task.
    fn clear_owner_policies(
        &self,
        service: &dyn DevicePolicyService,
        activity: &dyn HostActivity,
    ) -> KioskResult<()> {
        let mut first_error = None;
        match service.is_device_owner_app(activity.package_name()) {
            Ok(true) => {}
            Ok(false) => return Ok(()),
            Err(err) => {
                warn!(error = %err, "Device owner check failed, clearing restrictions anyway");
                first_error = Some(KioskError::from(err));
            }
        }

        for restriction in &self.profile.restrictions {
            if let Err(err) = service.clear_user_restriction(&self.profile.admin, *restriction) {
                warn!(restriction = %restriction, error = %err, "Failed to clear user restriction");
                first_error.get_or_insert(KioskError::from(err));
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for KioskController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KioskController")
            .field("profile", &self.profile)
            .finish_non_exhaustive()
    }
}

/// Log a failed operation and collapse it
fn settle<T>(operation: &'static str, result: KioskResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) if err.kind() == ErrorKind::NoActivity => {
            debug!(operation, "No foreground activity");
            None
        }
        Err(err) => {
            warn!(operation, kind = %err.kind(), error = %err, "Kiosk operation failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiosk_platform::sim::{CallKind, SimulatedDevice};
    use kiosk_platform::{ChannelUiThread, InlineUiThread};
    use kiosk_types::{AdminComponent, ComponentName, LockTaskMode, UserRestriction};

    const PACKAGE: &str = "com.example.kiosk";

    fn controller() -> KioskController {
        KioskController::new(
            KioskProfile::new(
                AdminComponent::new(PACKAGE, ".KioskAdminReceiver"),
                ComponentName::new(PACKAGE, ".MainActivity"),
            ),
            Arc::new(InlineUiThread),
        )
    }

    #[test]
    fn test_missing_activity_is_tagged() {
        let controller = controller();
        let transition = controller.enter_transition(None);
        assert!(transition.ui.is_none());
        assert_eq!(transition.outcome, Err(KioskError::NoActivity));
        assert!(!controller.exit(None));
        assert!(!controller.release_device_owner(None));
        assert_eq!(controller.state(None), KioskState::Inactive);
    }

    #[test]
    fn test_unavailable_service_still_applies_ui() {
        let device = SimulatedDevice::builder(PACKAGE)
            .policy_service_available(false)
            .build();
        let controller = controller();

        let mut transition = controller.enter_transition(Some(&device));
        assert_eq!(
            transition.outcome.as_ref().unwrap_err().kind(),
            ErrorKind::ServiceUnavailable
        );
        assert_eq!(transition.ui.as_mut().unwrap().try_applied(), Some(true));

        let snapshot = device.snapshot();
        assert_eq!(snapshot.ui_flags, SystemUiFlags::KIOSK);
        assert_eq!(snapshot.window_flags, WindowFlags::KIOSK);
        assert_eq!(device.call_count(CallKind::StartLockTask), 0);
    }

    #[test]
    fn test_keyguard_skipped_below_api_23() {
        let device = SimulatedDevice::builder(PACKAGE)
            .sdk_level(22)
            .device_owner(true)
            .build();
        let controller = controller();

        assert!(controller.enter(Some(&device)));
        assert_eq!(device.call_count(CallKind::SetKeyguardDisabled), 0);
        assert_eq!(device.call_count(CallKind::IsInLockTaskMode), 0);
        assert!(controller.query_active(Some(&device)));
        assert_eq!(device.call_count(CallKind::IsInLockTaskMode), 1);
        assert_eq!(device.call_count(CallKind::LockTaskMode), 0);
    }

    #[test]
    fn test_keyguard_left_alone_when_profile_disables_it() {
        let device = SimulatedDevice::builder(PACKAGE).device_owner(true).build();
        let controller = KioskController::new(
            controller().profile().clone().with_disable_keyguard(false),
            Arc::new(InlineUiThread),
        );

        assert!(controller.enter(Some(&device)));
        assert_eq!(device.call_count(CallKind::SetKeyguardDisabled), 0);
        assert!(!device.snapshot().keyguard_disabled);
    }

    #[test]
    fn test_query_below_lollipop_is_inactive_without_calls() {
        let device = SimulatedDevice::builder(PACKAGE).sdk_level(19).build();
        let controller = controller();
        assert!(!controller.query_active(Some(&device)));
        assert!(device.calls().is_empty());
    }

    #[test]
    fn test_owner_policy_failure_skips_lock_task() {
        let device = SimulatedDevice::builder(PACKAGE)
            .device_owner(true)
            .fail_on(CallKind::AddPersistentPreferredActivity)
            .build();
        let controller = controller();

        let err = controller.try_enter(Some(&device)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PlatformCallFailed);
        assert_eq!(device.call_count(CallKind::StartLockTask), 0);
        assert_eq!(device.call_count(CallKind::AddUserRestriction), 0);
        assert!(!controller.query_active(Some(&device)));
    }

    #[test]
    fn test_deferred_ui_runs_after_policy() {
        let device = SimulatedDevice::builder(PACKAGE).device_owner(true).build();
        let (ui, mut ui_loop) = ChannelUiThread::new();
        let controller = KioskController::new(controller().profile().clone(), Arc::new(ui));

        let mut transition = controller.enter_transition(Some(&device));
        assert!(transition.is_ok());
        let receipt = transition.ui.as_mut().unwrap();
        assert_eq!(receipt.try_applied(), None);
        assert_eq!(device.snapshot().ui_flags, SystemUiFlags::empty());
        assert_eq!(device.snapshot().lock_task_mode, LockTaskMode::Locked);

        ui_loop.run_pending();
        assert_eq!(receipt.try_applied(), Some(true));
        assert_eq!(device.snapshot().ui_flags, SystemUiFlags::KIOSK);
    }

    #[test]
    fn test_no_window_reports_unapplied() {
        let device = SimulatedDevice::builder(PACKAGE).window(false).build();
        let controller = controller();

        let mut transition = controller.enter_transition(Some(&device));
        assert!(transition.is_ok());
        assert_eq!(transition.ui.as_mut().unwrap().try_applied(), Some(false));
    }

    #[test]
    fn test_exit_clears_all_restrictions_despite_failure() {
        let device = SimulatedDevice::builder(PACKAGE).device_owner(true).build();
        let controller = KioskController::new(
            controller()
                .profile()
                .clone()
                .with_restrictions([UserRestriction::AdjustVolume, UserRestriction::SafeBoot]),
            Arc::new(InlineUiThread),
        );
        assert!(controller.enter(Some(&device)));
        assert_eq!(device.snapshot().restrictions.len(), 2);

        // Every clear fails, yet each is attempted and lock task still stops
        device.fail_on(CallKind::ClearUserRestriction);
        let err = controller.try_exit(Some(&device)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PlatformCallFailed);
        assert_eq!(device.call_count(CallKind::ClearUserRestriction), 2);
        assert_eq!(device.call_count(CallKind::StopLockTask), 1);
        assert!(!controller.query_active(Some(&device)));

        device.clear_faults();
        assert!(controller.exit(Some(&device)));
        assert!(device.snapshot().restrictions.is_empty());
    }

    #[test]
    fn test_exit_clears_restrictions_when_owner_check_fails() {
        let device = SimulatedDevice::builder(PACKAGE).device_owner(true).build();
        let controller = controller();
        assert!(controller.enter(Some(&device)));

        device.fail_on(CallKind::IsDeviceOwnerApp);
        let err = controller.try_exit(Some(&device)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PlatformCallFailed);
        assert_eq!(device.call_count(CallKind::ClearUserRestriction), 1);
        assert!(device.snapshot().restrictions.is_empty());
        assert!(!controller.query_active(Some(&device)));
    }

    #[test]
    fn test_exit_stops_lock_task_without_policy_service() {
        let device = SimulatedDevice::builder(PACKAGE).build();
        let controller = controller();
        assert!(controller.enter(Some(&device)));

        device.set_policy_service_available(false);
        let err = controller.try_exit(Some(&device)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ServiceUnavailable);
        assert_eq!(device.call_count(CallKind::StopLockTask), 1);
        assert!(!controller.query_active(Some(&device)));
    }

    #[test]
    fn test_release_device_owner() {
        let device = SimulatedDevice::builder(PACKAGE).device_owner(true).build();
        let controller = controller();

        assert!(controller.query_device_owner(Some(&device)));
        assert!(controller.release_device_owner(Some(&device)));
        assert!(!controller.query_device_owner(Some(&device)));

        // Not owner any more: the platform rejects a second release
        let err = controller.try_release_device_owner(Some(&device)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PermissionDenied);
    }
}
