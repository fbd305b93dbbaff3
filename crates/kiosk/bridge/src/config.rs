//! Configuration for the kiosk bridge
//!
//! Sources, later ones winning:
//! 1. Built-in defaults
//! 2. An optional configuration file (format picked from its extension)
//! 3. `KIOSK_` environment variables. Nested keys use `__`, so
//!    `KIOSK_ADMIN__PACKAGE` sets `admin.package`. `KIOSK_RESTRICTIONS`
//!    takes a comma separated list.

use crate::error::ConfigError;
use kiosk_control::KioskProfile;
use kiosk_relay::Notices;
use kiosk_types::{AdminComponent, ComponentName, UserRestriction};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "KIOSK";

/// Main bridge configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KioskConfig {
    /// Admin receiver identity
    #[serde(default)]
    pub admin: AdminConfig,

    /// Activity registered as persistent home handler. A leading `.` is
    /// relative to the admin package.
    #[serde(default = "default_home_activity")]
    pub home_activity: String,

    /// Restrictions applied while kiosk mode is active
    #[serde(default = "UserRestriction::kiosk_defaults")]
    pub restrictions: Vec<UserRestriction>,

    /// Disable the keyguard on entry
    #[serde(default = "default_true")]
    pub disable_keyguard: bool,

    /// Texts shown when admin is granted or revoked
    #[serde(default)]
    pub notices: Notices,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for KioskConfig {
    fn default() -> Self {
        Self {
            admin: AdminConfig::default(),
            home_activity: default_home_activity(),
            restrictions: UserRestriction::kiosk_defaults(),
            disable_keyguard: true,
            notices: Notices::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Admin receiver configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Package owning the receiver, also the package allowed in lock task
    #[serde(default = "default_package")]
    pub package: String,

    /// Receiver class, relative to `package` when it starts with `.`
    #[serde(default = "default_receiver")]
    pub receiver: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            package: default_package(),
            receiver: default_receiver(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level or filter directive
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_package() -> String {
    "com.example.kiosk".to_string()
}

fn default_receiver() -> String {
    ".KioskAdminReceiver".to_string()
}

fn default_home_activity() -> String {
    ".MainActivity".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl KioskConfig {
    /// Load configuration from defaults, `path` and the environment
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = ::config::Config::builder();

        builder = builder.add_source(::config::Config::try_from(&KioskConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(::config::File::from(path).required(true));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("restrictions")
                .try_parsing(true),
        );

        let config: KioskConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.admin.package.trim().is_empty() {
            return Err(ConfigError::invalid("admin.package", "must not be empty"));
        }
        if self.admin.receiver.trim().is_empty() {
            return Err(ConfigError::invalid("admin.receiver", "must not be empty"));
        }
        if self.home_activity.trim().is_empty() {
            return Err(ConfigError::invalid("home_activity", "must not be empty"));
        }
        Ok(())
    }

    /// Kiosk profile described by this configuration
    pub fn profile(&self) -> KioskProfile {
        KioskProfile::new(
            AdminComponent::new(&self.admin.package, &self.admin.receiver),
            ComponentName::new(&self.admin.package, &self.home_activity),
        )
        .with_restrictions(self.restrictions.iter().copied())
        .with_disable_keyguard(self.disable_keyguard)
    }
}
