//! Kiosk platform seams
//!
//! Everything the kiosk controller needs from the operating system, expressed
//! as traits:
//! - [`HostActivity`]: the foreground activity and its lock task primitives
//! - [`Window`]: window and decor view flag mutation
//! - [`DevicePolicyService`]: device-owner policy calls
//! - [`UiThread`]: marshalling of UI mutations onto the UI execution context
//! - [`AdminReceiver`]: admin lifecycle callbacks delivered by the OS
//!
//! The [`gateway`] module resolves the device-policy service and fails closed.
//! With the `sim` feature, [`sim::SimulatedDevice`] implements every seam in
//! memory for tests and local harnesses.

pub mod error;
pub mod gateway;
pub mod host;
pub mod ui;

#[cfg(feature = "sim")]
pub mod sim;

pub use error::{PlatformError, PlatformResult};
pub use gateway::{policy_handle, PolicyHandle};
pub use host::{AdminReceiver, DevicePolicyService, HostActivity, Window};
pub use ui::{dispatch, ChannelUiThread, InlineUiThread, UiLoop, UiReceipt, UiTask, UiThread};
