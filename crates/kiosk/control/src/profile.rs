//! Kiosk profile
//!
//! The immutable identity and policy set a controller applies. Built once at
//! startup.

use kiosk_types::{AdminComponent, ComponentName, IntentFilter, UserRestriction};
use serde::{Deserialize, Serialize};

/// What entering kiosk mode applies on behalf of a device owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KioskProfile {
    /// Admin receiver authorizing policy calls
    pub admin: AdminComponent,

    /// Activity pinned as persistent home handler
    pub home_activity: ComponentName,

    /// Restrictions added on entry and cleared on exit
    pub restrictions: Vec<UserRestriction>,

    /// Disable the keyguard on entry where the platform supports it
    pub disable_keyguard: bool,
}

impl KioskProfile {
    /// Profile with the default restriction set and keyguard disabling
    pub fn new(admin: AdminComponent, home_activity: ComponentName) -> Self {
        Self {
            admin,
            home_activity,
            restrictions: UserRestriction::kiosk_defaults(),
            disable_keyguard: true,
        }
    }

    /// Replace the restriction set; duplicates are dropped
    pub fn with_restrictions(mut self, restrictions: impl IntoIterator<Item = UserRestriction>) -> Self {
        self.restrictions.clear();
        for restriction in restrictions {
            if !self.restrictions.contains(&restriction) {
                self.restrictions.push(restriction);
            }
        }
        self
    }

    pub fn with_disable_keyguard(mut self, disable: bool) -> Self {
        self.disable_keyguard = disable;
        self
    }

    /// Intent filter the home activity is registered for
    pub fn home_filter(&self) -> IntentFilter {
        IntentFilter::home()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let profile = KioskProfile::new(
            AdminComponent::new("com.example.kiosk", ".KioskAdminReceiver"),
            ComponentName::new("com.example.kiosk", ".MainActivity"),
        );
        assert_eq!(profile.restrictions, vec![UserRestriction::AdjustVolume]);
        assert!(profile.disable_keyguard);
    }

    #[test]
    fn test_restrictions_are_deduplicated() {
        let profile = KioskProfile::new(
            AdminComponent::new("com.example.kiosk", ".KioskAdminReceiver"),
            ComponentName::new("com.example.kiosk", ".MainActivity"),
        )
        .with_restrictions([
            UserRestriction::AdjustVolume,
            UserRestriction::SafeBoot,
            UserRestriction::AdjustVolume,
        ]);
        assert_eq!(
            profile.restrictions,
            vec![UserRestriction::AdjustVolume, UserRestriction::SafeBoot]
        );
    }
}
