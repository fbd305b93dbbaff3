//! Builder for the kiosk bridge
//!
//! Wires profile, UI thread, activity provider, event sink and notifier into
//! a [`KioskModule`] and the [`LifecycleEventRelay`] the platform delivers
//! admin callbacks to.

use crate::config::KioskConfig;
use crate::error::{BridgeError, Result};
use crate::module::{ActivityProvider, KioskModule};
use kiosk_control::{KioskController, KioskProfile};
use kiosk_platform::{InlineUiThread, UiThread};
use kiosk_relay::{AdminNotifier, EventSink, LifecycleEventRelay, LogNotifier, Notices};
use std::sync::Arc;

/// A wired module and the relay to register as admin receiver
#[derive(Debug, Clone)]
pub struct KioskBridge {
    pub module: Arc<KioskModule>,
    pub relay: Arc<LifecycleEventRelay>,
}

/// Builder for constructing a [`KioskBridge`]
pub struct KioskBridgeBuilder {
    profile: KioskProfile,
    notices: Notices,
    ui: Option<Arc<dyn UiThread>>,
    activities: Option<Arc<dyn ActivityProvider>>,
    sink: Option<Arc<dyn EventSink>>,
    notifier: Option<Arc<dyn AdminNotifier>>,
}

impl KioskBridgeBuilder {
    /// Create a new builder for the given profile
    pub fn new(profile: KioskProfile) -> Self {
        Self {
            profile,
            notices: Notices::default(),
            ui: None,
            activities: None,
            sink: None,
            notifier: None,
        }
    }

    /// Builder for the profile and notices in `config`
    pub fn from_config(config: &KioskConfig) -> Self {
        Self::new(config.profile()).with_notices(config.notices.clone())
    }

    /// Set the UI thread mutations are dispatched to
    pub fn with_ui_thread(mut self, ui: Arc<dyn UiThread>) -> Self {
        self.ui = Some(ui);
        self
    }

    /// Set the foreground activity provider
    pub fn with_activity_provider(mut self, activities: Arc<dyn ActivityProvider>) -> Self {
        self.activities = Some(activities);
        self
    }

    /// Attach an event sink from the start
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Set the notifier for admin notices
    pub fn with_notifier(mut self, notifier: Arc<dyn AdminNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn with_notices(mut self, notices: Notices) -> Self {
        self.notices = notices;
        self
    }

    /// Build the bridge
    pub fn build(self) -> Result<KioskBridge> {
        let activities = self
            .activities
            .ok_or(BridgeError::Missing("activity_provider"))?;
        let ui = self.ui.unwrap_or_else(|| Arc::new(InlineUiThread));
        let notifier = self.notifier.unwrap_or_else(|| Arc::new(LogNotifier));

        let relay = match self.sink {
            Some(sink) => LifecycleEventRelay::new(sink),
            None => LifecycleEventRelay::detached(),
        };
        let relay = Arc::new(relay.with_notifier(notifier, self.notices));

        tracing::debug!(
            admin = %self.profile.admin.component(),
            restrictions = self.profile.restrictions.len(),
            "Kiosk bridge built"
        );

        let controller = KioskController::new(self.profile, ui);
        let module = Arc::new(KioskModule::new(controller, activities, relay.clone()));
        Ok(KioskBridge { module, relay })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::ForegroundActivity;

    #[test]
    fn test_activity_provider_required() {
        let result = KioskBridgeBuilder::from_config(&KioskConfig::default()).build();
        assert!(matches!(
            result,
            Err(BridgeError::Missing("activity_provider"))
        ));
    }

    #[test]
    fn test_build_without_sink_is_detached() {
        let bridge = KioskBridgeBuilder::from_config(&KioskConfig::default())
            .with_activity_provider(Arc::new(ForegroundActivity::new()))
            .build()
            .unwrap();
        assert!(!bridge.relay.is_attached());
        assert_eq!(bridge.module.name(), "DeviceControllerModule");
        assert!(Arc::ptr_eq(bridge.module.relay(), &bridge.relay));
    }
}
