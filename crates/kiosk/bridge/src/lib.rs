//! Kiosk application bridge
//!
//! Exposes the kiosk controller and lifecycle relay to an application layer
//! under the module name [`MODULE_NAME`]. The bridge owns no platform state:
//! each call asks the [`ActivityProvider`] for the foreground activity and
//! delegates to the controller.
//!
//! [`KioskConfig`] loads the kiosk profile from defaults, an optional file
//! and `KIOSK_` environment variables. [`KioskBridgeBuilder`] wires the
//! module and relay together.

pub mod builder;
pub mod config;
pub mod error;
pub mod module;
pub mod promise;

pub use builder::{KioskBridge, KioskBridgeBuilder};
pub use crate::config::{AdminConfig, KioskConfig, LoggingConfig};
pub use error::{BridgeError, ConfigError, Result};
pub use module::{ActivityProvider, ForegroundActivity, KioskModule, MODULE_NAME};
pub use promise::{Pending, Promise};
