//! System UI visibility and window flag sets
//!
//! Bit values match the platform's view and window layout constants so a
//! host binding can pass them through unchanged.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// System UI visibility flags applied to the decor view
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct SystemUiFlags: u32 {
        const LOW_PROFILE = 0x0000_0001;
        const HIDE_NAVIGATION = 0x0000_0002;
        const FULLSCREEN = 0x0000_0004;
        const LAYOUT_STABLE = 0x0000_0100;
        const LAYOUT_HIDE_NAVIGATION = 0x0000_0200;
        const LAYOUT_FULLSCREEN = 0x0000_0400;
        const IMMERSIVE_STICKY = 0x0000_1000;
    }
}

impl SystemUiFlags {
    /// Immersive full-screen visibility used while kiosk mode is active
    pub const KIOSK: SystemUiFlags = SystemUiFlags::LAYOUT_STABLE
        .union(SystemUiFlags::LAYOUT_HIDE_NAVIGATION)
        .union(SystemUiFlags::LAYOUT_FULLSCREEN)
        .union(SystemUiFlags::HIDE_NAVIGATION)
        .union(SystemUiFlags::FULLSCREEN)
        .union(SystemUiFlags::IMMERSIVE_STICKY)
        .union(SystemUiFlags::LOW_PROFILE);

    /// Stable layout with the system bars visible again
    pub const RELAXED: SystemUiFlags = SystemUiFlags::LAYOUT_STABLE
        .union(SystemUiFlags::LAYOUT_HIDE_NAVIGATION)
        .union(SystemUiFlags::LAYOUT_FULLSCREEN);
}

bitflags! {
    /// Window layout flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct WindowFlags: u32 {
        const KEEP_SCREEN_ON = 0x0000_0080;
        const LAYOUT_NO_LIMITS = 0x0000_0200;
    }
}

impl WindowFlags {
    /// Added on entry, cleared on exit
    pub const KIOSK: WindowFlags = WindowFlags::LAYOUT_NO_LIMITS.union(WindowFlags::KEEP_SCREEN_ON);
}
