//! Seam to the external validation pipeline. Launches are fire-and-forget
//! from the orchestrator's perspective: validation results come back later
//! as metrics submissions.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::json;

use crate::error::{HubError, Result};

/// What a validation run receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationPayload {
    pub body: String,
    pub content_type: String,
    pub dataset_uri: String,
    pub catalogue_id: String,
}

#[async_trait]
pub trait ValidationPipeline: Send + Sync {
    /// Whether the named pipe is configured and reachable.
    async fn is_available(&self, pipe: &str) -> bool;

    async fn launch(&self, pipe: &str, payload: ValidationPayload) -> Result<()>;
}

/// Used when no pipeline infrastructure is deployed.
#[derive(Debug, Default, Clone)]
pub struct NoopPipeline;

#[async_trait]
impl ValidationPipeline for NoopPipeline {
    async fn is_available(&self, _pipe: &str) -> bool {
        false
    }

    async fn launch(&self, _pipe: &str, _payload: ValidationPayload) -> Result<()> {
        Ok(())
    }
}

/// Launches pipes on a remote pipeline service.
pub struct HttpPipeline {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPipeline {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ValidationPipeline for HttpPipeline {
    async fn is_available(&self, pipe: &str) -> bool {
        let url = format!("{}/pipes/{pipe}", self.base_url);
        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    async fn launch(&self, pipe: &str, payload: ValidationPayload) -> Result<()> {
        let url = format!("{}/pipes/{pipe}/launch", self.base_url);
        let body = json!({
            "body": payload.body,
            "contentType": payload.content_type,
            "dataInfo": {
                "datasetUri": payload.dataset_uri,
                "catalogue": payload.catalogue_id,
            },
        });
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| HubError::Upstream(e.to_string()))?;
        if !response.status().is_success() {
            return Err(HubError::Upstream(format!(
                "pipeline responded {}",
                response.status()
            )));
        }
        Ok(())
    }
}

/// Recording pipeline for tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryPipeline {
    available: Arc<RwLock<bool>>,
    launches: Arc<RwLock<Vec<(String, ValidationPayload)>>>,
}

impl MemoryPipeline {
    pub fn new(available: bool) -> Self {
        Self {
            available: Arc::new(RwLock::new(available)),
            launches: Arc::default(),
        }
    }

    pub fn launches(&self) -> Vec<(String, ValidationPayload)> {
        self.launches.read().clone()
    }
}

#[async_trait]
impl ValidationPipeline for MemoryPipeline {
    async fn is_available(&self, _pipe: &str) -> bool {
        *self.available.read()
    }

    async fn launch(&self, pipe: &str, payload: ValidationPayload) -> Result<()> {
        self.launches.write().push((pipe.to_string(), payload));
        Ok(())
    }
}
