//! Lifecycle events relayed to the application layer

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Admin and lock task lifecycle notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KioskEvent {
    /// The app was granted device admin
    AdminEnabled,

    /// Device admin was revoked
    AdminDisabled,

    /// Lock task mode is being entered
    LockTaskEntering,

    /// Lock task mode is being left
    LockTaskExiting,
}

impl KioskEvent {
    pub const ALL: [KioskEvent; 4] = [
        KioskEvent::AdminEnabled,
        KioskEvent::AdminDisabled,
        KioskEvent::LockTaskEntering,
        KioskEvent::LockTaskExiting,
    ];

    /// Event name seen by application listeners
    pub fn name(&self) -> &'static str {
        match self {
            KioskEvent::AdminEnabled => "DeviceAdminEnabledEvent",
            KioskEvent::AdminDisabled => "DeviceAdminDisabledEvent",
            KioskEvent::LockTaskEntering => "LockTaskModeEnteringEvent",
            KioskEvent::LockTaskExiting => "LockTaskModeExitingEvent",
        }
    }

    /// Look up an event by its listener name
    pub fn from_name(name: &str) -> Option<KioskEvent> {
        Self::ALL.into_iter().find(|event| event.name() == name)
    }
}

impl std::fmt::Display for KioskEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Standard envelope wrapping every relayed event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Unique event ID
    pub id: Uuid,

    /// Event timestamp
    pub timestamp: chrono::DateTime<chrono::Utc>,

    /// The event
    pub event: KioskEvent,

    /// Listener-facing payload, always an empty object
    pub payload: serde_json::Map<String, serde_json::Value>,
}

impl EventEnvelope {
    pub fn new(event: KioskEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: chrono::Utc::now(),
            event,
            payload: serde_json::Map::new(),
        }
    }

    /// Name the event is emitted under
    pub fn name(&self) -> &'static str {
        self.event.name()
    }
}
