//! Machine translation round trip: building the flat dictionary sent to
//! the translation service, language-tagging the results, and merging
//! deliveries back into stored graphs.

pub mod delta;
pub mod error;
pub mod http;
pub mod memory;
pub mod merge;
pub mod tags;

pub use error::{Result, TranslationError};
pub use http::HttpTranslationClient;
pub use memory::MemoryTranslationClient;

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A translation job. The service calls back asynchronously with a
/// [`TranslationDelivery`]; `callback.payload` is echoed verbatim so the
/// hub can route the delivery to the right dataset.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TranslationRequest {
    pub original_language: String,
    pub languages: Vec<String>,
    pub callback: TranslationCallback,
    pub data_dict: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TranslationCallback {
    pub url: String,
    pub method: String,
    pub payload: Value,
}

/// What the translation service posts back: per target language, the
/// translated dictionary fields.
#[derive(Debug, Clone, Deserialize)]
pub struct TranslationDelivery {
    pub original_language: String,
    pub translations: BTreeMap<String, BTreeMap<String, String>>,
    #[serde(default)]
    pub payload: Value,
}

#[async_trait]
pub trait TranslationClient: Send + Sync {
    async fn request_translation(&self, request: &TranslationRequest) -> Result<()>;
}
