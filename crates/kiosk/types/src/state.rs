//! Lock task mode and derived kiosk state

use serde::{Deserialize, Serialize};

/// Lock task mode as reported by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LockTaskMode {
    /// Not in lock task mode
    #[default]
    None,

    /// Full lock task, authorized through the device owner's package allowlist
    Locked,

    /// Screen pinning; the user can escape it
    Pinned,
}

impl LockTaskMode {
    /// Whether any form of lock task is in effect
    pub fn is_active(&self) -> bool {
        !matches!(self, LockTaskMode::None)
    }
}

impl std::fmt::Display for LockTaskMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LockTaskMode::None => write!(f, "none"),
            LockTaskMode::Locked => write!(f, "locked"),
            LockTaskMode::Pinned => write!(f, "pinned"),
        }
    }
}

/// Kiosk state of the foreground app
///
/// Never stored. It is re-derived from the platform's lock task mode on
/// every query so it cannot drift from what the OS actually enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum KioskState {
    #[default]
    Inactive,
    Active,
}

impl KioskState {
    pub fn is_active(&self) -> bool {
        matches!(self, KioskState::Active)
    }
}

impl From<LockTaskMode> for KioskState {
    fn from(mode: LockTaskMode) -> Self {
        if mode.is_active() {
            KioskState::Active
        } else {
            KioskState::Inactive
        }
    }
}

impl From<bool> for KioskState {
    fn from(active: bool) -> Self {
        if active {
            KioskState::Active
        } else {
            KioskState::Inactive
        }
    }
}

impl std::fmt::Display for KioskState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KioskState::Inactive => write!(f, "inactive"),
            KioskState::Active => write!(f, "active"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pinned_and_locked_are_active() {
        assert!(!LockTaskMode::None.is_active());
        assert!(LockTaskMode::Locked.is_active());
        assert!(LockTaskMode::Pinned.is_active());
    }

    #[test]
    fn test_state_from_mode() {
        assert_eq!(KioskState::from(LockTaskMode::None), KioskState::Inactive);
        assert_eq!(KioskState::from(LockTaskMode::Pinned), KioskState::Active);
        assert_eq!(KioskState::from(LockTaskMode::Locked), KioskState::Active);
    }

    #[test]
    fn test_state_serialization() {
        let json = serde_json::to_string(&KioskState::Active).unwrap();
        assert_eq!(json, "\"active\"");

        let mode: LockTaskMode = serde_json::from_str("\"pinned\"").unwrap();
        assert_eq!(mode, LockTaskMode::Pinned);
    }
}
