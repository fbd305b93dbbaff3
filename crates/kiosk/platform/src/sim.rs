//! In-memory simulated device
//!
//! Implements [`HostActivity`], [`Window`] and [`DevicePolicyService`] over a
//! single shared device state. Every platform call is journaled in order and
//! any call kind can be made to fail, which is what the controller and bridge
//! tests assert against.
//!
//! Device-owner semantics follow the platform: privileged policy calls are
//! rejected with a security error unless the app is device owner, and lock
//! task entered by an allowlisted owner package is `Locked` while anything
//! else only pins the screen. Admin callbacks are delivered to the registered
//! [`AdminReceiver`] after the device state lock is released.

use crate::error::{PlatformError, PlatformResult};
use crate::gateway::DEVICE_POLICY_SERVICE;
use crate::host::{AdminReceiver, DevicePolicyService, HostActivity, Window};
use kiosk_types::{
    AdminComponent, ComponentName, IntentFilter, LockTaskMode, SdkLevel, SystemUiFlags,
    UserRestriction, WindowFlags,
};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use tracing::debug;

/// Kind of platform call, used for fault injection and journal queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CallKind {
    ResolvePolicyService,
    IsDeviceOwnerApp,
    SetLockTaskPackages,
    SetKeyguardDisabled,
    AddPersistentPreferredActivity,
    AddUserRestriction,
    ClearUserRestriction,
    ClearDeviceOwnerApp,
    LockTaskMode,
    IsInLockTaskMode,
    StartLockTask,
    StopLockTask,
    SetSystemUiVisibility,
    AddWindowFlags,
    ClearWindowFlags,
    OpenSettings,
}

impl CallKind {
    pub fn name(&self) -> &'static str {
        match self {
            CallKind::ResolvePolicyService => "resolve_policy_service",
            CallKind::IsDeviceOwnerApp => "is_device_owner_app",
            CallKind::SetLockTaskPackages => "set_lock_task_packages",
            CallKind::SetKeyguardDisabled => "set_keyguard_disabled",
            CallKind::AddPersistentPreferredActivity => "add_persistent_preferred_activity",
            CallKind::AddUserRestriction => "add_user_restriction",
            CallKind::ClearUserRestriction => "clear_user_restriction",
            CallKind::ClearDeviceOwnerApp => "clear_device_owner_app",
            CallKind::LockTaskMode => "lock_task_mode",
            CallKind::IsInLockTaskMode => "is_in_lock_task_mode",
            CallKind::StartLockTask => "start_lock_task",
            CallKind::StopLockTask => "stop_lock_task",
            CallKind::SetSystemUiVisibility => "set_system_ui_visibility",
            CallKind::AddWindowFlags => "add_window_flags",
            CallKind::ClearWindowFlags => "clear_window_flags",
            CallKind::OpenSettings => "open_settings",
        }
    }

    /// Look up a call kind by name
    pub fn from_name(name: &str) -> Option<CallKind> {
        ALL_CALL_KINDS.into_iter().find(|kind| kind.name() == name)
    }
}

impl std::fmt::Display for CallKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Every call kind
pub const ALL_CALL_KINDS: [CallKind; 16] = [
    CallKind::ResolvePolicyService,
    CallKind::IsDeviceOwnerApp,
    CallKind::SetLockTaskPackages,
    CallKind::SetKeyguardDisabled,
    CallKind::AddPersistentPreferredActivity,
    CallKind::AddUserRestriction,
    CallKind::ClearUserRestriction,
    CallKind::ClearDeviceOwnerApp,
    CallKind::LockTaskMode,
    CallKind::IsInLockTaskMode,
    CallKind::StartLockTask,
    CallKind::StopLockTask,
    CallKind::SetSystemUiVisibility,
    CallKind::AddWindowFlags,
    CallKind::ClearWindowFlags,
    CallKind::OpenSettings,
];

/// A journaled platform call with its arguments
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum PlatformCall {
    ResolvePolicyService,
    IsDeviceOwnerApp { package: String },
    SetLockTaskPackages { packages: Vec<String> },
    SetKeyguardDisabled { disabled: bool },
    AddPersistentPreferredActivity { filter: IntentFilter, activity: ComponentName },
    AddUserRestriction { restriction: UserRestriction },
    ClearUserRestriction { restriction: UserRestriction },
    ClearDeviceOwnerApp { package: String },
    LockTaskMode,
    IsInLockTaskMode,
    StartLockTask,
    StopLockTask,
    SetSystemUiVisibility { flags: SystemUiFlags },
    AddWindowFlags { flags: WindowFlags },
    ClearWindowFlags { flags: WindowFlags },
    OpenSettings,
}

impl PlatformCall {
    pub fn kind(&self) -> CallKind {
        match self {
            PlatformCall::ResolvePolicyService => CallKind::ResolvePolicyService,
            PlatformCall::IsDeviceOwnerApp { .. } => CallKind::IsDeviceOwnerApp,
            PlatformCall::SetLockTaskPackages { .. } => CallKind::SetLockTaskPackages,
            PlatformCall::SetKeyguardDisabled { .. } => CallKind::SetKeyguardDisabled,
            PlatformCall::AddPersistentPreferredActivity { .. } => {
                CallKind::AddPersistentPreferredActivity
            }
            PlatformCall::AddUserRestriction { .. } => CallKind::AddUserRestriction,
            PlatformCall::ClearUserRestriction { .. } => CallKind::ClearUserRestriction,
            PlatformCall::ClearDeviceOwnerApp { .. } => CallKind::ClearDeviceOwnerApp,
            PlatformCall::LockTaskMode => CallKind::LockTaskMode,
            PlatformCall::IsInLockTaskMode => CallKind::IsInLockTaskMode,
            PlatformCall::StartLockTask => CallKind::StartLockTask,
            PlatformCall::StopLockTask => CallKind::StopLockTask,
            PlatformCall::SetSystemUiVisibility { .. } => CallKind::SetSystemUiVisibility,
            PlatformCall::AddWindowFlags { .. } => CallKind::AddWindowFlags,
            PlatformCall::ClearWindowFlags { .. } => CallKind::ClearWindowFlags,
            PlatformCall::OpenSettings => CallKind::OpenSettings,
        }
    }
}

/// Point-in-time view of the simulated device
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceSnapshot {
    pub package: String,
    pub sdk_level: SdkLevel,
    pub device_owner: bool,
    pub lock_task_mode: LockTaskMode,
    pub lock_task_packages: Vec<String>,
    pub keyguard_disabled: bool,
    pub preferred_home: Option<ComponentName>,
    pub restrictions: Vec<UserRestriction>,
    pub ui_flags: SystemUiFlags,
    pub window_flags: WindowFlags,
    pub settings_opened: u32,
}

enum Callback {
    Enabled,
    Disabled,
    Entering(String),
    Exiting,
}

#[derive(Debug, Default)]
struct DeviceState {
    device_owner: bool,
    lock_task_mode: LockTaskMode,
    lock_task_packages: Vec<String>,
    keyguard_disabled: bool,
    preferred_activities: Vec<(IntentFilter, ComponentName)>,
    restrictions: BTreeSet<UserRestriction>,
    ui_flags: SystemUiFlags,
    window_flags: WindowFlags,
    has_window: bool,
    has_decor_view: bool,
    policy_service_available: bool,
    faults: HashSet<CallKind>,
    calls: Vec<PlatformCall>,
    settings_opened: u32,
}

impl DeviceState {
    /// Journal `call` and fail it if its kind has an injected fault
    fn record(&mut self, call: PlatformCall) -> PlatformResult<()> {
        let kind = call.kind();
        self.calls.push(call);
        if self.faults.contains(&kind) {
            return Err(PlatformError::call_failed(kind.name(), "injected fault"));
        }
        Ok(())
    }

    fn require_owner(&self, operation: CallKind, package: &str, admin_package: &str) -> PlatformResult<()> {
        if !self.device_owner || package != admin_package {
            return Err(PlatformError::security(
                operation.name(),
                format!("{} is not the device owner", admin_package),
            ));
        }
        Ok(())
    }

    fn clear_owner_policies(&mut self) {
        self.lock_task_packages.clear();
        self.keyguard_disabled = false;
        self.preferred_activities.clear();
        self.restrictions.clear();
    }
}

struct Shared {
    package: String,
    sdk_level: SdkLevel,
    state: Mutex<DeviceState>,
    receiver: RwLock<Option<Arc<dyn AdminReceiver>>>,
}

impl Shared {
    fn deliver(&self, callback: Option<Callback>) {
        let Some(callback) = callback else {
            return;
        };
        let receiver = self.receiver.read().clone();
        let Some(receiver) = receiver else {
            debug!("No admin receiver registered, callback not delivered");
            return;
        };
        match callback {
            Callback::Enabled => receiver.on_enabled(),
            Callback::Disabled => receiver.on_disabled(),
            Callback::Entering(package) => receiver.on_lock_task_mode_entering(&package),
            Callback::Exiting => receiver.on_lock_task_mode_exiting(),
        }
    }
}

/// Builder for [`SimulatedDevice`]
#[derive(Debug)]
pub struct SimulatedDeviceBuilder {
    package: String,
    sdk_level: SdkLevel,
    device_owner: bool,
    policy_service_available: bool,
    has_window: bool,
    has_decor_view: bool,
    faults: HashSet<CallKind>,
}

impl SimulatedDeviceBuilder {
    pub fn sdk_level(mut self, level: u32) -> Self {
        self.sdk_level = SdkLevel::new(level);
        self
    }

    pub fn device_owner(mut self, owner: bool) -> Self {
        self.device_owner = owner;
        self
    }

    pub fn policy_service_available(mut self, available: bool) -> Self {
        self.policy_service_available = available;
        self
    }

    /// Whether the activity has a window attached
    pub fn window(mut self, attached: bool) -> Self {
        self.has_window = attached;
        self
    }

    /// Whether the window has a decor view
    pub fn decor_view(mut self, present: bool) -> Self {
        self.has_decor_view = present;
        self
    }

    /// Make every call of `kind` fail
    pub fn fail_on(mut self, kind: CallKind) -> Self {
        self.faults.insert(kind);
        self
    }

    pub fn build(self) -> SimulatedDevice {
        let state = DeviceState {
            device_owner: self.device_owner,
            has_window: self.has_window,
            has_decor_view: self.has_decor_view,
            policy_service_available: self.policy_service_available,
            faults: self.faults,
            ..Default::default()
        };
        SimulatedDevice {
            shared: Arc::new(Shared {
                package: self.package,
                sdk_level: self.sdk_level,
                state: Mutex::new(state),
                receiver: RwLock::new(None),
            }),
        }
    }
}

/// A simulated device running one app in the foreground
///
/// Cheap to clone; clones share the same device.
#[derive(Clone)]
pub struct SimulatedDevice {
    shared: Arc<Shared>,
}

impl SimulatedDevice {
    /// Start building a device whose foreground app is `package`
    pub fn builder(package: impl Into<String>) -> SimulatedDeviceBuilder {
        SimulatedDeviceBuilder {
            package: package.into(),
            sdk_level: SdkLevel::default(),
            device_owner: false,
            policy_service_available: true,
            has_window: true,
            has_decor_view: true,
            faults: HashSet::new(),
        }
    }

    /// Register the receiver for admin callbacks
    pub fn register_admin_receiver(&self, receiver: Arc<dyn AdminReceiver>) {
        *self.shared.receiver.write() = Some(receiver);
    }

    pub fn unregister_admin_receiver(&self) {
        *self.shared.receiver.write() = None;
    }

    /// Grant or revoke device-owner status, as provisioning would
    pub fn set_device_owner(&self, owner: bool) {
        let callback = {
            let mut state = self.shared.state.lock();
            if state.device_owner == owner {
                None
            } else {
                state.device_owner = owner;
                if owner {
                    Some(Callback::Enabled)
                } else {
                    state.clear_owner_policies();
                    Some(Callback::Disabled)
                }
            }
        };
        self.shared.deliver(callback);
    }

    pub fn set_policy_service_available(&self, available: bool) {
        self.shared.state.lock().policy_service_available = available;
    }

    /// Make every call of `kind` fail from now on
    pub fn fail_on(&self, kind: CallKind) {
        self.shared.state.lock().faults.insert(kind);
    }

    pub fn clear_faults(&self) {
        self.shared.state.lock().faults.clear();
    }

    /// Every call made so far, in order
    pub fn calls(&self) -> Vec<PlatformCall> {
        self.shared.state.lock().calls.clone()
    }

    /// Number of calls of `kind` made so far
    pub fn call_count(&self, kind: CallKind) -> usize {
        self.shared
            .state
            .lock()
            .calls
            .iter()
            .filter(|call| call.kind() == kind)
            .count()
    }

    pub fn clear_calls(&self) {
        self.shared.state.lock().calls.clear();
    }

    pub fn snapshot(&self) -> DeviceSnapshot {
        let state = self.shared.state.lock();
        let preferred_home = state
            .preferred_activities
            .iter()
            .find(|(filter, _)| filter.has_category(kiosk_types::component::CATEGORY_HOME))
            .map(|(_, activity)| activity.clone());
        DeviceSnapshot {
            package: self.shared.package.clone(),
            sdk_level: self.shared.sdk_level,
            device_owner: state.device_owner,
            lock_task_mode: state.lock_task_mode,
            lock_task_packages: state.lock_task_packages.clone(),
            keyguard_disabled: state.keyguard_disabled,
            preferred_home,
            restrictions: state.restrictions.iter().copied().collect(),
            ui_flags: state.ui_flags,
            window_flags: state.window_flags,
            settings_opened: state.settings_opened,
        }
    }
}

impl std::fmt::Debug for SimulatedDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatedDevice")
            .field("package", &self.shared.package)
            .field("sdk_level", &self.shared.sdk_level)
            .finish_non_exhaustive()
    }
}

impl HostActivity for SimulatedDevice {
    fn package_name(&self) -> &str {
        &self.shared.package
    }

    fn sdk_level(&self) -> SdkLevel {
        self.shared.sdk_level
    }

    fn device_policy_service(&self) -> PlatformResult<Arc<dyn DevicePolicyService>> {
        let mut state = self.shared.state.lock();
        state.record(PlatformCall::ResolvePolicyService)?;
        if !state.policy_service_available {
            return Err(PlatformError::unavailable(DEVICE_POLICY_SERVICE));
        }
        Ok(Arc::new(SimulatedPolicyService {
            shared: Arc::clone(&self.shared),
        }))
    }

    fn lock_task_mode(&self) -> PlatformResult<LockTaskMode> {
        let mut state = self.shared.state.lock();
        state.record(PlatformCall::LockTaskMode)?;
        if !self.shared.sdk_level.supports_lock_task_mode_state() {
            return Err(PlatformError::call_failed(
                CallKind::LockTaskMode.name(),
                format!("not available on {}", self.shared.sdk_level),
            ));
        }
        Ok(state.lock_task_mode)
    }

    fn is_in_lock_task_mode(&self) -> PlatformResult<bool> {
        let mut state = self.shared.state.lock();
        state.record(PlatformCall::IsInLockTaskMode)?;
        Ok(state.lock_task_mode.is_active())
    }

    fn window(&self) -> Option<Arc<dyn Window>> {
        if !self.shared.state.lock().has_window {
            return None;
        }
        Some(Arc::new(SimulatedWindow {
            shared: Arc::clone(&self.shared),
        }))
    }

    fn start_lock_task(&self) -> PlatformResult<()> {
        let callback = {
            let mut state = self.shared.state.lock();
            state.record(PlatformCall::StartLockTask)?;
            if !self.shared.sdk_level.supports_lock_task() {
                return Err(PlatformError::call_failed(
                    CallKind::StartLockTask.name(),
                    format!("lock task not available on {}", self.shared.sdk_level),
                ));
            }
            if state.lock_task_mode.is_active() {
                None
            } else {
                let allowlisted = state.device_owner
                    && state.lock_task_packages.contains(&self.shared.package);
                if allowlisted {
                    state.lock_task_mode = LockTaskMode::Locked;
                    Some(Callback::Entering(self.shared.package.clone()))
                } else {
                    state.lock_task_mode = LockTaskMode::Pinned;
                    None
                }
            }
        };
        self.shared.deliver(callback);
        Ok(())
    }

    fn stop_lock_task(&self) -> PlatformResult<()> {
        let callback = {
            let mut state = self.shared.state.lock();
            state.record(PlatformCall::StopLockTask)?;
            let previous = std::mem::take(&mut state.lock_task_mode);
            (previous == LockTaskMode::Locked).then_some(Callback::Exiting)
        };
        self.shared.deliver(callback);
        Ok(())
    }

    fn open_settings(&self) -> PlatformResult<()> {
        let mut state = self.shared.state.lock();
        state.record(PlatformCall::OpenSettings)?;
        state.settings_opened += 1;
        Ok(())
    }
}

struct SimulatedWindow {
    shared: Arc<Shared>,
}

impl Window for SimulatedWindow {
    fn set_system_ui_visibility(&self, flags: SystemUiFlags) -> bool {
        let mut state = self.shared.state.lock();
        if state
            .record(PlatformCall::SetSystemUiVisibility { flags })
            .is_err()
            || !state.has_decor_view
        {
            return false;
        }
        state.ui_flags = flags;
        true
    }

    fn add_flags(&self, flags: WindowFlags) {
        let mut state = self.shared.state.lock();
        if state.record(PlatformCall::AddWindowFlags { flags }).is_ok() {
            state.window_flags.insert(flags);
        }
    }

    fn clear_flags(&self, flags: WindowFlags) {
        let mut state = self.shared.state.lock();
        if state.record(PlatformCall::ClearWindowFlags { flags }).is_ok() {
            state.window_flags.remove(flags);
        }
    }
}

struct SimulatedPolicyService {
    shared: Arc<Shared>,
}

impl DevicePolicyService for SimulatedPolicyService {
    fn is_device_owner_app(&self, package: &str) -> PlatformResult<bool> {
        let mut state = self.shared.state.lock();
        state.record(PlatformCall::IsDeviceOwnerApp {
            package: package.to_string(),
        })?;
        Ok(state.device_owner && package == self.shared.package)
    }

    fn set_lock_task_packages(
        &self,
        admin: &AdminComponent,
        packages: &[String],
    ) -> PlatformResult<()> {
        let mut state = self.shared.state.lock();
        state.record(PlatformCall::SetLockTaskPackages {
            packages: packages.to_vec(),
        })?;
        state.require_owner(CallKind::SetLockTaskPackages, &self.shared.package, admin.package())?;
        state.lock_task_packages = packages.to_vec();
        Ok(())
    }

    fn set_keyguard_disabled(&self, admin: &AdminComponent, disabled: bool) -> PlatformResult<()> {
        let mut state = self.shared.state.lock();
        state.record(PlatformCall::SetKeyguardDisabled { disabled })?;
        if !self.shared.sdk_level.supports_keyguard_disable() {
            return Err(PlatformError::call_failed(
                CallKind::SetKeyguardDisabled.name(),
                format!("not available on {}", self.shared.sdk_level),
            ));
        }
        state.require_owner(CallKind::SetKeyguardDisabled, &self.shared.package, admin.package())?;
        state.keyguard_disabled = disabled;
        Ok(())
    }

    fn add_persistent_preferred_activity(
        &self,
        admin: &AdminComponent,
        filter: &IntentFilter,
        activity: &ComponentName,
    ) -> PlatformResult<()> {
        let mut state = self.shared.state.lock();
        state.record(PlatformCall::AddPersistentPreferredActivity {
            filter: filter.clone(),
            activity: activity.clone(),
        })?;
        state.require_owner(
            CallKind::AddPersistentPreferredActivity,
            &self.shared.package,
            admin.package(),
        )?;
        state.preferred_activities.retain(|(existing, _)| existing != filter);
        state
            .preferred_activities
            .push((filter.clone(), activity.clone()));
        Ok(())
    }

    fn add_user_restriction(
        &self,
        admin: &AdminComponent,
        restriction: UserRestriction,
    ) -> PlatformResult<()> {
        let mut state = self.shared.state.lock();
        state.record(PlatformCall::AddUserRestriction { restriction })?;
        state.require_owner(CallKind::AddUserRestriction, &self.shared.package, admin.package())?;
        state.restrictions.insert(restriction);
        Ok(())
    }

    fn clear_user_restriction(
        &self,
        admin: &AdminComponent,
        restriction: UserRestriction,
    ) -> PlatformResult<()> {
        let mut state = self.shared.state.lock();
        state.record(PlatformCall::ClearUserRestriction { restriction })?;
        state.require_owner(CallKind::ClearUserRestriction, &self.shared.package, admin.package())?;
        state.restrictions.remove(&restriction);
        Ok(())
    }

    fn clear_device_owner_app(&self, package: &str) -> PlatformResult<()> {
        let callback = {
            let mut state = self.shared.state.lock();
            state.record(PlatformCall::ClearDeviceOwnerApp {
                package: package.to_string(),
            })?;
            state.require_owner(CallKind::ClearDeviceOwnerApp, &self.shared.package, package)?;
            state.device_owner = false;
            state.clear_owner_policies();
            Callback::Disabled
        };
        self.shared.deliver(Some(callback));
        Ok(())
    }
}
