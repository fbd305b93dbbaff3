//! Component identities and intent filters

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Intent action for an app's main entry point
pub const ACTION_MAIN: &str = "android.intent.action.MAIN";

/// Category marking a launcher / home screen activity
pub const CATEGORY_HOME: &str = "android.intent.category.HOME";

/// Category accepted by implicit intents
pub const CATEGORY_DEFAULT: &str = "android.intent.category.DEFAULT";

/// A package + class pair naming an activity or receiver
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComponentName {
    pub package: String,
    pub class_name: String,
}

impl ComponentName {
    /// Create a component name
    ///
    /// A class name starting with `.` is resolved against the package.
    pub fn new(package: impl Into<String>, class_name: impl Into<String>) -> Self {
        let package = package.into();
        let class_name = class_name.into();
        let class_name = match class_name.strip_prefix('.') {
            Some(short) => format!("{}.{}", package, short),
            None => class_name,
        };
        Self {
            package,
            class_name,
        }
    }

    /// Flattened `package/class` form, shortening the class when it lives in the package
    pub fn flatten_to_short_string(&self) -> String {
        match self
            .class_name
            .strip_prefix(self.package.as_str())
            .filter(|rest| rest.starts_with('.'))
        {
            Some(rest) => format!("{}/{}", self.package, rest),
            None => self.to_string(),
        }
    }
}

impl std::fmt::Display for ComponentName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.package, self.class_name)
    }
}

/// Errors parsing a flattened component name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComponentParseError {
    #[error("Missing '/' separator in component name: {0}")]
    MissingSeparator(String),

    #[error("Empty package or class in component name: {0}")]
    Empty(String),
}

impl FromStr for ComponentName {
    type Err = ComponentParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (package, class_name) = s
            .split_once('/')
            .ok_or_else(|| ComponentParseError::MissingSeparator(s.to_string()))?;
        let package = package.trim();
        let class_name = class_name.trim();
        if package.is_empty() || class_name.is_empty() || class_name == "." {
            return Err(ComponentParseError::Empty(s.to_string()));
        }
        Ok(ComponentName::new(package, class_name))
    }
}

/// Identity of the device admin receiver that authorizes policy calls
///
/// Built once at startup and immutable for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdminComponent(ComponentName);

impl AdminComponent {
    pub fn new(package: impl Into<String>, receiver_class: impl Into<String>) -> Self {
        Self(ComponentName::new(package, receiver_class))
    }

    pub fn package(&self) -> &str {
        &self.0.package
    }

    pub fn receiver_class(&self) -> &str {
        &self.0.class_name
    }

    pub fn component(&self) -> &ComponentName {
        &self.0
    }
}

impl From<ComponentName> for AdminComponent {
    fn from(component: ComponentName) -> Self {
        Self(component)
    }
}

impl std::fmt::Display for AdminComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Action + categories an activity registers for
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntentFilter {
    pub action: String,
    pub categories: Vec<String>,
}

impl IntentFilter {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            categories: Vec::new(),
        }
    }

    /// Add a category
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        let category = category.into();
        if !self.categories.contains(&category) {
            self.categories.push(category);
        }
        self
    }

    /// Filter matched by the home button: MAIN + HOME + DEFAULT
    pub fn home() -> Self {
        Self::new(ACTION_MAIN)
            .with_category(CATEGORY_HOME)
            .with_category(CATEGORY_DEFAULT)
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }
}
