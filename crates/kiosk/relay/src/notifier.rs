//! User-visible notices for admin grant and revoke

use serde::{Deserialize, Serialize};

/// Texts shown when device admin changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Notices {
    pub admin_enabled: String,
    pub admin_disabled: String,
}

impl Default for Notices {
    fn default() -> Self {
        Self {
            admin_enabled: "The app is now a device admin.".to_string(),
            admin_disabled: "The app is no longer a device admin.".to_string(),
        }
    }
}

/// Shows a short notice to the user
pub trait AdminNotifier: Send + Sync {
    fn notify(&self, text: &str);
}

/// Notifier that writes notices to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl AdminNotifier for LogNotifier {
    fn notify(&self, text: &str) {
        tracing::info!(notice = text, "Admin notice");
    }
}
