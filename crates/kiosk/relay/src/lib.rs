//! Kiosk lifecycle event relay
//!
//! Receives admin and lock task callbacks from the platform and forwards
//! each one to the currently attached [`EventSink`] as an [`EventEnvelope`].
//! There is no buffering: with no sink attached an event is dropped.
//!
//! Built-in sinks:
//! - [`BroadcastSink`] fans events out to in-process tokio subscribers
//! - [`MemorySink`] records events for inspection

pub mod notifier;
pub mod relay;
pub mod sink;

pub use notifier::{AdminNotifier, LogNotifier, Notices};
pub use relay::{LifecycleEventRelay, RelayStats};
pub use sink::{BroadcastSink, EventSink, MemorySink};

pub use kiosk_types::{EventEnvelope, KioskEvent};
