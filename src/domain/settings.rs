use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_CURRENCY: &str = "$";
pub const DEFAULT_LANGUAGE: &str = "en";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme '{}'", other)),
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Display preferences. Keys other than the three recognized ones are kept
/// verbatim in `extra` so that nothing written by another client is lost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            theme: Theme::default(),
            language: default_language(),
            extra: BTreeMap::new(),
        }
    }
}

impl Settings {
    /// Merge a patch into these settings. Keys absent from the patch are preserved.
    pub fn merge(&mut self, patch: SettingsPatch) {
        if let Some(currency) = patch.currency {
            self.currency = currency;
        }
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
        if let Some(language) = patch.language {
            self.language = language;
        }
        self.extra.extend(patch.extra);
    }

    /// Look up any setting by key as a display string.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "currency" => Some(self.currency.clone()),
            "theme" => Some(self.theme.to_string()),
            "language" => Some(self.language.clone()),
            _ => self.extra.get(key).map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsPatch {
    pub currency: Option<String>,
    pub theme: Option<Theme>,
    pub language: Option<String>,
    pub extra: BTreeMap<String, Value>,
}

impl SettingsPatch {
    /// Build a single-key patch from string input, routing recognized keys to
    /// their typed fields.
    pub fn from_pair(key: &str, value: &str) -> Result<Self, String> {
        let mut patch = Self::default();
        match key {
            "currency" => patch.currency = Some(value.to_string()),
            "theme" => patch.theme = Some(value.parse()?),
            "language" => patch.language = Some(value.to_string()),
            "" => return Err("setting key must not be empty".to_string()),
            other => {
                patch
                    .extra
                    .insert(other.to_string(), Value::String(value.to_string()));
            }
        }
        Ok(patch)
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = Some(theme);
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}
