//! Platform API levels

use serde::{Deserialize, Serialize};

/// Platform API level of the running device
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SdkLevel(pub u32);

impl SdkLevel {
    /// First level with lock task support and the boolean lock task query
    pub const LOLLIPOP: SdkLevel = SdkLevel(21);

    /// First level with lock task mode state and keyguard disabling
    pub const M: SdkLevel = SdkLevel(23);

    pub fn new(level: u32) -> Self {
        Self(level)
    }

    pub fn supports_lock_task(&self) -> bool {
        *self >= Self::LOLLIPOP
    }

    /// Whether the lock task mode state query exists
    pub fn supports_lock_task_mode_state(&self) -> bool {
        *self >= Self::M
    }

    pub fn supports_keyguard_disable(&self) -> bool {
        *self >= Self::M
    }
}

impl Default for SdkLevel {
    fn default() -> Self {
        SdkLevel(33)
    }
}

impl std::fmt::Display for SdkLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "api-{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_gates() {
        let kitkat = SdkLevel::new(19);
        assert!(!kitkat.supports_lock_task());
        assert!(!kitkat.supports_keyguard_disable());

        let lollipop = SdkLevel::new(22);
        assert!(lollipop.supports_lock_task());
        assert!(!lollipop.supports_lock_task_mode_state());
        assert!(!lollipop.supports_keyguard_disable());

        assert!(SdkLevel::M.supports_lock_task_mode_state());
        assert!(SdkLevel::M.supports_keyguard_disable());
    }
}
