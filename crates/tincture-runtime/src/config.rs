#![forbid(unsafe_code)]

//! Provider configuration as data.
//!
//! [`ProviderConfig`] captures what a top-level [`PaletteProvider`] needs
//! (accent, theme, extra scalar fields) so that an application can ship its
//! palette choice in a file instead of in code.
//!
//! # Loading
//!
//! ```toml
//! # tincture.toml
//! accent = "#E81123"
//! theme = "dark"
//!
//! [fields]
//! density = "compact"
//! corner_radius = 4
//! ```
//!
//! ```rust,ignore
//! let config = ProviderConfig::from_toml_file("tincture.toml")?;
//! let provider = PaletteProvider::new(config.into_props()?, &Ambient::root())?;
//! ```
//!
//! # Defaults
//!
//! `ProviderConfig::default()` converts to `ProviderProps::default()`.
//!
//! [`PaletteProvider`]: crate::PaletteProvider

use std::collections::BTreeMap;
#[cfg(feature = "provider-config")]
use std::path::Path;

#[cfg(feature = "provider-config")]
use serde::{Deserialize, Serialize};

use tincture_style::{DEFAULT_ACCENT, Rgba, Theme};

use crate::provider::ProviderProps;
use crate::value::{ACCENT_KEY, CHILDREN_KEY, PALETTE_KEY, THEME_KEY, Value};

// ---------------------------------------------------------------------------
// ProviderConfig
// ---------------------------------------------------------------------------

/// Serializable provider settings.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "provider-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "provider-config", serde(default))]
pub struct ProviderConfig {
    /// Accent color in any CSS notation. Default: `#0078D7`.
    pub accent: String,

    /// Light or dark. Default: light.
    pub theme: Theme,

    /// Extra ambient fields published alongside the palette.
    pub fields: BTreeMap<String, ConfigValue>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            accent: DEFAULT_ACCENT.to_string(),
            theme: Theme::Light,
            fields: BTreeMap::new(),
        }
    }
}

impl ProviderConfig {
    /// Load from a TOML string.
    #[cfg(feature = "provider-config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "provider-config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "provider-config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "provider-config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Check the accent and field names.
    ///
    /// Returns every problem found; an empty list means the config is usable.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if let Err(e) = Rgba::parse(&self.accent) {
            errors.push(format!("accent: {e}"));
        }
        for key in [ACCENT_KEY, THEME_KEY, PALETTE_KEY, CHILDREN_KEY] {
            if self.fields.contains_key(key) {
                errors.push(format!("fields.{key} is reserved"));
            }
        }

        errors
    }

    /// Validate and convert into provider props.
    pub fn into_props(self) -> Result<ProviderProps, ConfigError> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(ConfigError::Validation(errors));
        }
        Ok(ProviderProps {
            accent: self.accent,
            theme: self.theme,
            fields: self
                .fields
                .into_iter()
                .map(|(k, v)| (k, Value::from(v)))
                .collect(),
        })
    }
}

/// A scalar extra field.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "provider-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "provider-config", serde(untagged))]
pub enum ConfigValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl From<ConfigValue> for Value {
    fn from(value: ConfigValue) -> Self {
        match value {
            ConfigValue::Bool(b) => Value::Bool(b),
            ConfigValue::Int(i) => Value::Int(i),
            ConfigValue::Float(x) => Value::Float(x),
            ConfigValue::Str(s) => Value::from(s),
        }
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that can occur when loading a provider configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading a file.
    #[error("I/O error: {0}")]
    Io(#[source] std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "provider-config")]
    #[error("TOML parse error: {0}")]
    Toml(#[source] toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "provider-config")]
    #[error("JSON parse error: {0}")]
    Json(#[source] serde_json::Error),
    /// Validation errors.
    #[error("invalid provider config: {}", .0.join("; "))]
    Validation(Vec<String>),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
