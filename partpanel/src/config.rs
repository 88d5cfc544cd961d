//! Panel settings.
//!
//! The host owns settings persistence; this module only reads raw values
//! through [`ConfigProvider`] and applies the documented defaults. Values are
//! read per request and never cached.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

pub const ENABLE_PART_PANEL: &str = "ENABLE_PART_PANEL";
pub const DATASHEET_COMMENT_KEYWORD: &str = "DATASHEET_COMMENT_KEYWORD";
pub const MAX_PARAMETERS: &str = "MAX_PARAMETERS";

pub const DEFAULT_KEYWORD: &str = "datasheet";
pub const DEFAULT_MAX_PARAMETERS: usize = 25;

/// A recognized setting, for listings and help output.
#[derive(Debug, Clone, Copy)]
pub struct SettingSpec {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub default: &'static str,
}

pub const SETTINGS: [SettingSpec; 3] = [
    SettingSpec {
        key: ENABLE_PART_PANEL,
        name: "Enable Part Panel",
        description: "Display the datasheet and parameter panel for part detail views",
        default: "true",
    },
    SettingSpec {
        key: DATASHEET_COMMENT_KEYWORD,
        name: "Datasheet Comment Keyword",
        description:
            "Only attachments whose comment contains this value will be treated as datasheets",
        default: DEFAULT_KEYWORD,
    },
    SettingSpec {
        key: MAX_PARAMETERS,
        name: "Maximum Parameters",
        description: "Limit how many parameters are forwarded to the UI (0 disables the limit)",
        default: "25",
    },
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse settings JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Settings must be a JSON object")]
    NotAnObject,
    #[error("Unsupported value for setting {0}: expected a string, number or boolean")]
    UnsupportedValue(String),
}

/// Source of raw setting values, keyed by the constants in this module.
pub trait ConfigProvider: Send + Sync {
    /// Raw value for `key`, or `None` when the setting was never stored.
    fn get_setting(&self, key: &str) -> Option<String>;
}

/// How many parameters a panel may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParameterLimit {
    Unbounded,
    AtMost(usize),
}

impl ParameterLimit {
    /// Maps the stored setting (0 = no limit) to a limit.
    pub fn from_setting(value: usize) -> Self {
        match value {
            0 => ParameterLimit::Unbounded,
            n => ParameterLimit::AtMost(n),
        }
    }

    pub fn as_setting(&self) -> usize {
        match self {
            ParameterLimit::Unbounded => 0,
            ParameterLimit::AtMost(n) => *n,
        }
    }

    /// Truncate an already ordered list.
    pub fn apply<T>(&self, items: &mut Vec<T>) {
        if let ParameterLimit::AtMost(n) = self {
            items.truncate(*n);
        }
    }
}

impl Default for ParameterLimit {
    fn default() -> Self {
        ParameterLimit::AtMost(DEFAULT_MAX_PARAMETERS)
    }
}

/// Typed view of the three panel settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelSettings {
    pub enabled: bool,
    pub datasheet_keyword: String,
    pub max_parameters: usize,
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            datasheet_keyword: DEFAULT_KEYWORD.to_string(),
            max_parameters: DEFAULT_MAX_PARAMETERS,
        }
    }
}

impl PanelSettings {
    /// Read all settings from a provider, falling back to defaults.
    pub fn resolve(provider: &dyn ConfigProvider) -> Self {
        Self {
            enabled: panel_enabled(provider),
            datasheet_keyword: datasheet_keyword(provider),
            max_parameters: parameter_limit(provider).as_setting(),
        }
    }

    pub fn parameter_limit(&self) -> ParameterLimit {
        ParameterLimit::from_setting(self.max_parameters)
    }
}

impl ConfigProvider for PanelSettings {
    fn get_setting(&self, key: &str) -> Option<String> {
        match key {
            ENABLE_PART_PANEL => Some(self.enabled.to_string()),
            DATASHEET_COMMENT_KEYWORD => Some(self.datasheet_keyword.clone()),
            MAX_PARAMETERS => Some(self.max_parameters.to_string()),
            _ => None,
        }
    }
}

/// `ENABLE_PART_PANEL`, default `true` when unset.
///
/// A stored value outside the recognized spellings (including `""`) disables
/// the panel, matching how the host reads boolean settings.
pub fn panel_enabled(provider: &dyn ConfigProvider) -> bool {
    match provider.get_setting(ENABLE_PART_PANEL) {
        None => true,
        Some(raw) => parse_bool(&raw).unwrap_or_else(|| {
            tracing::warn!("Unrecognized {} value {:?}, disabling", ENABLE_PART_PANEL, raw);
            false
        }),
    }
}

/// `DATASHEET_COMMENT_KEYWORD` as stored; normalization happens at selection time.
pub fn datasheet_keyword(provider: &dyn ConfigProvider) -> String {
    provider
        .get_setting(DATASHEET_COMMENT_KEYWORD)
        .unwrap_or_else(|| DEFAULT_KEYWORD.to_string())
}

/// `MAX_PARAMETERS`, default 25. Negative or non-numeric values are rejected.
pub fn parameter_limit(provider: &dyn ConfigProvider) -> ParameterLimit {
    match provider.get_setting(MAX_PARAMETERS) {
        None => ParameterLimit::default(),
        Some(raw) => match raw.trim().parse::<usize>() {
            Ok(value) => ParameterLimit::from_setting(value),
            Err(_) => {
                tracing::warn!("Invalid {} value {:?}, using default", MAX_PARAMETERS, raw);
                ParameterLimit::default()
            }
        },
    }
}

/// Lenient boolean parsing in the style of host setting validators.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "y" | "yes" | "t" | "true" | "on" | "ok" => Some(true),
        "0" | "n" | "no" | "f" | "false" | "off" => Some(false),
        _ => None,
    }
}

/// In-memory string settings, e.g. loaded from a JSON settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsMap {
    values: BTreeMap<String, String>,
}

impl SettingsMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_string(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Parse a JSON object such as `{"MAX_PARAMETERS": 10, "ENABLE_PART_PANEL": true}`.
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let value: serde_json::Value = serde_json::from_str(content)?;
        let object = value.as_object().ok_or(ConfigError::NotAnObject)?;

        let mut settings = Self::new();
        for (key, value) in object {
            let raw = match value {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Bool(b) => b.to_string(),
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Null => continue,
                _ => return Err(ConfigError::UnsupportedValue(key.clone())),
            };
            settings.insert(key, raw);
        }
        Ok(settings)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let settings = Self::from_json_str(&content)?;
        tracing::info!("Loaded {} settings from {:?}", settings.values.len(), path);
        Ok(settings)
    }
}

impl ConfigProvider for SettingsMap {
    fn get_setting(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Stack of providers; the first one holding a key wins.
#[derive(Default)]
pub struct LayeredConfig<'a> {
    layers: Vec<&'a dyn ConfigProvider>,
}

impl<'a> LayeredConfig<'a> {
    pub fn new() -> Self {
        Self { layers: Vec::new() }
    }

    /// Add a layer below the existing ones.
    pub fn layer(mut self, provider: &'a dyn ConfigProvider) -> Self {
        self.layers.push(provider);
        self
    }
}

impl ConfigProvider for LayeredConfig<'_> {
    fn get_setting(&self, key: &str) -> Option<String> {
        self.layers.iter().find_map(|layer| layer.get_setting(key))
    }
}
