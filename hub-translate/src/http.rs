//! HTTP client for the translation service.

use async_trait::async_trait;
use tracing::debug;

use crate::error::{Result, TranslationError};
use crate::{TranslationClient, TranslationRequest};

pub struct HttpTranslationClient {
    client: reqwest::Client,
    service_url: String,
    api_key: Option<String>,
}

impl HttpTranslationClient {
    pub fn new(service_url: &str, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            service_url: service_url.to_string(),
            api_key,
        }
    }
}

#[async_trait]
impl TranslationClient for HttpTranslationClient {
    async fn request_translation(&self, request: &TranslationRequest) -> Result<()> {
        let mut builder = self.client.post(&self.service_url).json(request);
        if let Some(key) = &self.api_key {
            builder = builder.header("Authorization", key);
        }
        let response = builder.send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(TranslationError::Response { status, message });
        }
        debug!(
            fields = request.data_dict.len(),
            languages = request.languages.len(),
            "translation requested"
        );
        Ok(())
    }
}
