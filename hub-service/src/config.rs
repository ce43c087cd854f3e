//! Hub configuration. Every section deserializes from JSON with full
//! defaults, so a config file only needs to state what it changes.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    /// URI authority for everything the hub mints.
    pub base_uri: String,
    /// Fallback language for untagged literals and translation sources.
    pub default_language: String,
    /// Upper bound on free-slot probing before giving up.
    pub max_slot_probes: usize,
    /// Batch partition size for repair/sync/clear.
    pub partition_size: usize,
    pub translation: TranslationConfig,
    pub indexing: IndexingConfig,
    pub validation: ValidationConfig,
    pub upload: UploadConfig,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            base_uri: "http://localhost:8080".to_string(),
            default_language: "en".to_string(),
            max_slot_probes: 1000,
            partition_size: 1000,
            translation: TranslationConfig::default(),
            indexing: IndexingConfig::default(),
            validation: ValidationConfig::default(),
            upload: UploadConfig::default(),
        }
    }
}

impl HubConfig {
    pub fn from_json(value: serde_json::Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    pub enabled: bool,
    pub service_url: String,
    /// Base URL the translation service calls back on.
    pub callback_url: String,
    /// Target languages to request.
    pub languages: Vec<String>,
    pub api_key: Option<String>,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            service_url: "http://localhost:8090/translate".to_string(),
            callback_url: "http://localhost:8080".to_string(),
            languages: Vec::new(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IndexingConfig {
    pub enabled: bool,
    pub service_url: String,
    pub api_key: Option<String>,
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            service_url: "http://localhost:8085".to_string(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub enabled: bool,
    pub pipe_name: String,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            pipe_name: "validating".to_string(),
        }
    }
}

/// Hosted data: when enabled, freshly created distributions get their
/// access URL pointed at the upload service instead of their own URI.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub enabled: bool,
    pub service_url: String,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            service_url: "http://localhost:8095".to_string(),
        }
    }
}
