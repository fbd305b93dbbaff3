//! Lifecycle event relay
//!
//! Implements the platform's admin receiver and forwards each callback to
//! the attached sink. Delivery is at-most-once.

use crate::notifier::{AdminNotifier, Notices};
use crate::sink::EventSink;
use kiosk_platform::AdminReceiver;
use kiosk_types::{EventEnvelope, KioskEvent};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Delivery counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RelayStats {
    pub delivered: u64,
    pub dropped: u64,
}

/// Forwards admin and lock task callbacks to the current event sink
pub struct LifecycleEventRelay {
    sink: RwLock<Option<Arc<dyn EventSink>>>,
    notifier: Option<Arc<dyn AdminNotifier>>,
    notices: Notices,
    delivered: AtomicU64,
    dropped: AtomicU64,
}

impl LifecycleEventRelay {
    /// Relay delivering to `sink`
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self::with_slot(Some(sink))
    }

    /// Relay with no sink; events are dropped until one is attached
    pub fn detached() -> Self {
        Self::with_slot(None)
    }

    fn with_slot(sink: Option<Arc<dyn EventSink>>) -> Self {
        Self {
            sink: RwLock::new(sink),
            notifier: None,
            notices: Notices::default(),
            delivered: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
        }
    }

    /// Show `notices` through `notifier` when admin is granted or revoked
    pub fn with_notifier(mut self, notifier: Arc<dyn AdminNotifier>, notices: Notices) -> Self {
        self.notifier = Some(notifier);
        self.notices = notices;
        self
    }

    /// Replace the current sink
    pub fn attach(&self, sink: Arc<dyn EventSink>) {
        *self.sink.write() = Some(sink);
        tracing::debug!("Event sink attached");
    }

    /// Remove the current sink, returning it
    pub fn detach(&self) -> Option<Arc<dyn EventSink>> {
        let previous = self.sink.write().take();
        if previous.is_some() {
            tracing::debug!("Event sink detached");
        }
        previous
    }

    pub fn is_attached(&self) -> bool {
        self.sink.read().is_some()
    }

    /// Forward one event. Returns whether a sink received it.
    pub fn relay(&self, event: KioskEvent) -> bool {
        // Clone the handle so the sink runs without the slot locked
        let sink = self.sink.read().clone();
        match sink {
            Some(sink) => {
                sink.emit(EventEnvelope::new(event));
                self.delivered.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(event = event.name(), "Lifecycle event relayed");
                true
            }
            None => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(event = event.name(), "No event sink attached, event dropped");
                false
            }
        }
    }

    pub fn stats(&self) -> RelayStats {
        RelayStats {
            delivered: self.delivered.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
        }
    }

    fn notify(&self, text: &str) {
        if let Some(notifier) = &self.notifier {
            notifier.notify(text);
        }
    }
}

impl Default for LifecycleEventRelay {
    fn default() -> Self {
        Self::detached()
    }
}

impl std::fmt::Debug for LifecycleEventRelay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleEventRelay")
            .field("attached", &self.is_attached())
            .field("notifier", &self.notifier.is_some())
            .field("stats", &self.stats())
            .finish()
    }
}

impl AdminReceiver for LifecycleEventRelay {
    fn on_enabled(&self) {
        tracing::info!("Device admin enabled");
        self.relay(KioskEvent::AdminEnabled);
        self.notify(&self.notices.admin_enabled);
    }

    fn on_disabled(&self) {
        tracing::info!("Device admin disabled");
        self.relay(KioskEvent::AdminDisabled);
        self.notify(&self.notices.admin_disabled);
    }

    fn on_lock_task_mode_entering(&self, package: &str) {
        tracing::info!(package, "Lock task mode entering");
        self.relay(KioskEvent::LockTaskEntering);
    }

    fn on_lock_task_mode_exiting(&self) {
        tracing::info!("Lock task mode exiting");
        self.relay(KioskEvent::LockTaskExiting);
    }
}
