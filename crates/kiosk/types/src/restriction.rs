//! User restrictions a device owner can toggle

use serde::{Deserialize, Serialize};

/// A named system-level user restriction
///
/// Serialized with the platform's restriction key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UserRestriction {
    #[serde(rename = "no_adjust_volume")]
    AdjustVolume,

    #[serde(rename = "no_safe_boot")]
    SafeBoot,

    #[serde(rename = "no_factory_reset")]
    FactoryReset,

    #[serde(rename = "no_add_user")]
    AddUser,

    #[serde(rename = "no_physical_media")]
    MountPhysicalMedia,

    #[serde(rename = "no_usb_file_transfer")]
    UsbFileTransfer,
}

impl UserRestriction {
    /// Platform key for this restriction
    pub fn key(&self) -> &'static str {
        match self {
            UserRestriction::AdjustVolume => "no_adjust_volume",
            UserRestriction::SafeBoot => "no_safe_boot",
            UserRestriction::FactoryReset => "no_factory_reset",
            UserRestriction::AddUser => "no_add_user",
            UserRestriction::MountPhysicalMedia => "no_physical_media",
            UserRestriction::UsbFileTransfer => "no_usb_file_transfer",
        }
    }

    /// Restrictions applied by default while kiosk mode is active
    pub fn kiosk_defaults() -> Vec<UserRestriction> {
        vec![UserRestriction::AdjustVolume]
    }
}

impl std::fmt::Display for UserRestriction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}
