//! The bridge module exposed to the application layer

use crate::promise::Promise;
use kiosk_control::KioskController;
use kiosk_platform::HostActivity;
use kiosk_relay::LifecycleEventRelay;
use kiosk_types::KioskState;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Name the module is registered under
pub const MODULE_NAME: &str = "DeviceControllerModule";

/// Supplies the activity currently in the foreground, if any
pub trait ActivityProvider: Send + Sync {
    fn current_activity(&self) -> Option<Arc<dyn HostActivity>>;
}

/// Slot the host updates as activities resume and pause
#[derive(Default)]
pub struct ForegroundActivity {
    current: RwLock<Option<Arc<dyn HostActivity>>>,
}

impl ForegroundActivity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot already holding `activity`
    pub fn with(activity: Arc<dyn HostActivity>) -> Self {
        Self {
            current: RwLock::new(Some(activity)),
        }
    }

    /// An activity came to the foreground
    pub fn resumed(&self, activity: Arc<dyn HostActivity>) {
        *self.current.write() = Some(activity);
    }

    /// The foreground activity went away
    pub fn paused(&self) {
        *self.current.write() = None;
    }
}

impl ActivityProvider for ForegroundActivity {
    fn current_activity(&self) -> Option<Arc<dyn HostActivity>> {
        self.current.read().clone()
    }
}

/// Kiosk operations as seen by the application layer
///
/// Every call resolves the foreground activity afresh. With none in the
/// foreground, commands do nothing and queries report `false`.
pub struct KioskModule {
    controller: KioskController,
    activities: Arc<dyn ActivityProvider>,
    relay: Arc<LifecycleEventRelay>,
    listeners: AtomicUsize,
}

impl KioskModule {
    pub fn new(
        controller: KioskController,
        activities: Arc<dyn ActivityProvider>,
        relay: Arc<LifecycleEventRelay>,
    ) -> Self {
        Self {
            controller,
            activities,
            relay,
            listeners: AtomicUsize::new(0),
        }
    }

    /// Name the module is registered under
    pub fn name(&self) -> &'static str {
        MODULE_NAME
    }

    pub fn controller(&self) -> &KioskController {
        &self.controller
    }

    pub fn relay(&self) -> &Arc<LifecycleEventRelay> {
        &self.relay
    }

    /// Enter kiosk mode on the foreground activity
    pub fn start_lock_task(&self) {
        let activity = self.activities.current_activity();
        self.controller.enter(activity.as_deref());
    }

    /// Exit kiosk mode on the foreground activity
    pub fn stop_lock_task(&self) {
        let activity = self.activities.current_activity();
        self.controller.exit(activity.as_deref());
    }

    /// Give up device-owner status. Returns whether it was cleared.
    pub fn clear_device_owner(&self) -> bool {
        let activity = self.activities.current_activity();
        self.controller.release_device_owner(activity.as_deref())
    }

    /// Resolve `promise` with whether the app is device owner
    pub fn is_device_owner(&self, promise: Promise<bool>) {
        let activity = self.activities.current_activity();
        promise.resolve(self.controller.query_device_owner(activity.as_deref()));
    }

    /// Resolve `promise` with whether lock task is in effect
    pub fn is_lock_task_active(&self, promise: Promise<bool>) {
        let activity = self.activities.current_activity();
        promise.resolve(self.controller.query_active(activity.as_deref()));
    }

    /// Current kiosk state of the foreground activity
    pub fn kiosk_state(&self) -> KioskState {
        let activity = self.activities.current_activity();
        self.controller.state(activity.as_deref())
    }

    /// Open the platform settings screen from the foreground activity
    pub fn open_device_settings(&self) {
        let Some(activity) = self.activities.current_activity() else {
            tracing::debug!("No foreground activity, settings not opened");
            return;
        };
        if let Err(err) = activity.open_settings() {
            tracing::warn!(error = %err, "Failed to open device settings");
        }
    }

    /// Listener bookkeeping; the relay delivers regardless of the count
    pub fn add_listener(&self, event_name: &str) {
        let count = self.listeners.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::trace!(event = event_name, listeners = count, "Listener added");
    }

    pub fn remove_listeners(&self, count: usize) {
        let previous = self
            .listeners
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| {
                Some(n.saturating_sub(count))
            })
            .unwrap_or_else(|n| n);
        tracing::trace!(
            removed = count,
            listeners = previous.saturating_sub(count),
            "Listeners removed"
        );
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.load(Ordering::Relaxed)
    }
}

impl std::fmt::Debug for KioskModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KioskModule")
            .field("name", &MODULE_NAME)
            .field("controller", &self.controller)
            .field("listeners", &self.listener_count())
            .finish()
    }
}
