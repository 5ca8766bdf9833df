use crate::EditorError;
use serde::{Deserialize, Serialize};

/// Shortest allowed gap between handled mouse moves
pub const MIN_HOVER_THROTTLE_MS: f64 = 10.0;

/// Builder configuration, usually passed in as JSON by the host page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuilderConfig {
    /// Locale non-localizable fields may be edited in
    #[serde(default = "default_master_locale")]
    pub master_locale: String,

    #[serde(default = "default_hover_throttle_ms")]
    pub hover_throttle_ms: f64,

    /// Prefix for every class name the builder adds to the page
    #[serde(default = "default_class_prefix")]
    pub class_prefix: String,

    /// Initial audience-mode flag
    #[serde(default)]
    pub audience_mode: bool,
}

fn default_master_locale() -> String {
    "en-us".to_string()
}

fn default_hover_throttle_ms() -> f64 {
    MIN_HOVER_THROTTLE_MS
}

fn default_class_prefix() -> String {
    "visual-builder".to_string()
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            master_locale: default_master_locale(),
            hover_throttle_ms: default_hover_throttle_ms(),
            class_prefix: default_class_prefix(),
            audience_mode: false,
        }
    }
}

impl BuilderConfig {
    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        let config: BuilderConfig = serde_json::from_str(json)?;
        Ok(config)
    }

    pub fn hover_interval_ms(&self) -> f64 {
        self.hover_throttle_ms.max(MIN_HOVER_THROTTLE_MS)
    }

    /// `<prefix><suffix>`, e.g. `class("__hover-outline")`
    pub fn class(&self, suffix: &str) -> String {
        format!("{}{}", self.class_prefix, suffix)
    }
}
