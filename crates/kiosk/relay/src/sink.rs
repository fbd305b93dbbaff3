//! Event sinks
//!
//! A sink is whatever the application layer listens on. The relay holds at
//! most one at a time.

use kiosk_types::{EventEnvelope, KioskEvent};
use parking_lot::Mutex;
use tokio::sync::broadcast;

/// Destination for relayed lifecycle events
pub trait EventSink: Send + Sync {
    /// Deliver one event. Must not block on the listener.
    fn emit(&self, envelope: EventEnvelope);
}

/// Default capacity of a [`BroadcastSink`] channel
pub const DEFAULT_BROADCAST_CAPACITY: usize = 64;

/// Fans events out to every subscribed receiver
pub struct BroadcastSink {
    sender: broadcast::Sender<EventEnvelope>,
}

impl BroadcastSink {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_BROADCAST_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribe to events emitted from now on
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for BroadcastSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for BroadcastSink {
    fn emit(&self, envelope: EventEnvelope) {
        // No receivers is not an error
        if self.sender.send(envelope).is_err() {
            tracing::trace!("Broadcast sink has no subscribers");
        }
    }
}

/// Records every event it receives
#[derive(Default)]
pub struct MemorySink {
    events: Mutex<Vec<EventEnvelope>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every envelope received so far, in order
    pub fn envelopes(&self) -> Vec<EventEnvelope> {
        self.events.lock().clone()
    }

    /// Just the event kinds, in order
    pub fn events(&self) -> Vec<KioskEvent> {
        self.events.lock().iter().map(|e| e.event).collect()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl EventSink for MemorySink {
    fn emit(&self, envelope: EventEnvelope) {
        self.events.lock().push(envelope);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_records_in_order() {
        let sink = MemorySink::new();
        sink.emit(EventEnvelope::new(KioskEvent::AdminEnabled));
        sink.emit(EventEnvelope::new(KioskEvent::LockTaskEntering));

        assert_eq!(
            sink.events(),
            vec![KioskEvent::AdminEnabled, KioskEvent::LockTaskEntering]
        );
        sink.clear();
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn test_broadcast_reaches_every_subscriber() {
        let sink = BroadcastSink::new();
        let mut first = sink.subscribe();
        let mut second = sink.subscribe();
        assert_eq!(sink.subscriber_count(), 2);

        sink.emit(EventEnvelope::new(KioskEvent::LockTaskExiting));

        assert_eq!(first.recv().await.unwrap().event, KioskEvent::LockTaskExiting);
        assert_eq!(second.recv().await.unwrap().event, KioskEvent::LockTaskExiting);
    }

    #[test]
    fn test_broadcast_without_subscribers_is_silent() {
        let sink = BroadcastSink::with_capacity(0);
        sink.emit(EventEnvelope::new(KioskEvent::AdminDisabled));
        assert_eq!(sink.subscriber_count(), 0);
    }
}
