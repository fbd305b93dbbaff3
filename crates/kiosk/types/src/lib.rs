//! Kiosk core types
//!
//! Shared vocabulary for the kiosk orchestration crates:
//! - Lock task modes and the derived kiosk state
//! - Platform API levels and the features they gate
//! - System UI and window flag sets
//! - Component identities and intent filters
//! - User restrictions applied while kiosk mode is active
//! - Lifecycle events and the envelope they travel in

pub mod component;
pub mod event;
pub mod flags;
pub mod restriction;
pub mod sdk;
pub mod state;

pub use component::{AdminComponent, ComponentName, ComponentParseError, IntentFilter};
pub use event::{EventEnvelope, KioskEvent};
pub use flags::{SystemUiFlags, WindowFlags};
pub use restriction::UserRestriction;
pub use sdk::SdkLevel;
pub use state::{KioskState, LockTaskMode};
