//! HTTP client for the search index service.

use std::collections::HashSet;

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde_json::Value;
use tracing::debug;

use crate::error::{IndexError, Result};
use crate::IndexClient;

pub struct HttpIndexClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpIndexClient {
    pub fn new(base_url: &str, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.header("Authorization", key),
            None => request,
        }
    }

    async fn check(response: Response) -> Result<Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let message = response.text().await.unwrap_or_default();
        Err(IndexError::Response { status, message })
    }

    fn document_id(document: &Value) -> Result<&str> {
        document
            .get("id")
            .and_then(Value::as_str)
            .ok_or(IndexError::MissingId)
    }
}

#[async_trait]
impl IndexClient for HttpIndexClient {
    async fn upsert_dataset(&self, document: &Value) -> Result<()> {
        let id = Self::document_id(document)?;
        let url = format!("{}/datasets/{id}", self.base_url);
        let request = self.authorize(self.client.put(&url).json(document));
        Self::check(request.send().await?).await?;
        debug!(id, "dataset indexed");
        Ok(())
    }

    async fn delete_dataset(&self, id: &str) -> Result<()> {
        let url = format!("{}/datasets/{id}", self.base_url);
        let response = self.authorize(self.client.delete(&url)).send().await?;
        // deleting something the index never saw is not a failure
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        Self::check(response).await?;
        Ok(())
    }

    async fn upsert_catalogue(&self, document: &Value) -> Result<()> {
        let id = Self::document_id(document)?;
        let url = format!("{}/catalogues/{id}", self.base_url);
        let request = self.authorize(self.client.put(&url).json(document));
        Self::check(request.send().await?).await?;
        Ok(())
    }

    async fn delete_catalogue(&self, id: &str) -> Result<()> {
        let url = format!("{}/catalogues/{id}", self.base_url);
        let response = self.authorize(self.client.delete(&url)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        Self::check(response).await?;
        Ok(())
    }

    async fn dataset_ids(&self, catalogue_id: &str) -> Result<HashSet<String>> {
        let url = format!("{}/catalogues/{catalogue_id}/datasets", self.base_url);
        let response = self.authorize(self.client.get(&url)).send().await?;
        let response = Self::check(response).await?;
        let ids: Vec<String> = response.json().await.map_err(|e| IndexError::Decode {
            message: e.to_string(),
        })?;
        Ok(ids.into_iter().collect())
    }
}
