//! Kiosk lifecycle controller
//!
//! Orchestrates lock task and device-owner policy for the foreground app:
//!
//! - **Enter**: immersive UI flags, owner-only policies (lock task allowlist,
//!   keyguard, home activity, user restrictions), then lock task
//! - **Exit**: relaxed UI flags, restriction cleanup, then stop lock task
//! - **Queries**: lock task state and device-owner status, always read live
//!
//! Failures are tagged internally with [`ErrorKind`] and collapse to `false`
//! only at the boundary operations.

pub mod controller;
pub mod error;
pub mod profile;

pub use controller::{KioskController, Transition};
pub use error::{ErrorKind, KioskError, KioskResult};
pub use profile::KioskProfile;
