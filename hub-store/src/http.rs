//! SPARQL protocol client over HTTP, with basic auth, bounded
//! linear-backoff retries and a circuit breaker.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use oxrdf::Graph;
use oxrdfio::RdfFormat;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::breaker::{BreakerConfig, CircuitBreaker};
use crate::error::{Result, StoreError};
use crate::gateway::{GraphStatus, SelectRow, SparqlTerm, TripleStoreGateway};

const NTRIPLES: &str = "application/n-triples";
const SPARQL_JSON: &str = "application/sparql-results+json";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Base endpoint of the triple store, e.g. `http://store:3030/hub`.
    pub endpoint: String,
    /// Graph-store protocol path, relative to the endpoint.
    pub data_path: String,
    /// Query protocol path.
    pub query_path: String,
    /// Update protocol path.
    pub update_path: String,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Retries after the initial attempt, for connection errors and 5xx.
    pub max_retries: u32,
    /// Backoff grows linearly: `retry_backoff_ms * attempt`.
    pub retry_backoff_ms: u64,
    pub breaker_failure_threshold: u32,
    pub breaker_reset_timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:3030/hub".to_string(),
            data_path: "/data".to_string(),
            query_path: "/query".to_string(),
            update_path: "/update".to_string(),
            username: None,
            password: None,
            max_retries: 3,
            retry_backoff_ms: 500,
            breaker_failure_threshold: 5,
            breaker_reset_timeout_secs: 30,
        }
    }
}

pub struct HttpGateway {
    client: reqwest::Client,
    config: GatewayConfig,
    breaker: CircuitBreaker,
}

impl HttpGateway {
    pub fn new(config: GatewayConfig) -> Self {
        let breaker = CircuitBreaker::new(BreakerConfig {
            failure_threshold: config.breaker_failure_threshold,
            reset_timeout: Duration::from_secs(config.breaker_reset_timeout_secs),
        });
        Self {
            client: reqwest::Client::new(),
            config,
            breaker,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.endpoint, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.username {
            Some(user) => request.basic_auth(user, self.config.password.as_deref()),
            None => request,
        }
    }

    /// Sends a request, retrying connection errors and 5xx responses with
    /// linear backoff. The breaker sees every attempt.
    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let mut attempt: u32 = 0;
        loop {
            self.breaker.try_acquire()?;
            let cloned = request.try_clone().ok_or_else(|| StoreError::Decode {
                message: "request body not clonable".to_string(),
            })?;
            match cloned.send().await {
                Ok(response) if response.status().is_server_error() => {
                    self.breaker.record_failure();
                    if attempt >= self.config.max_retries {
                        let status = response.status().as_u16();
                        let message = response.text().await.unwrap_or_default();
                        return Err(StoreError::Response { status, message });
                    }
                    warn!(attempt, status = status_of(&response), "store returned a server error, retrying");
                }
                Ok(response) => {
                    self.breaker.record_success();
                    return Ok(response);
                }
                Err(e) if e.is_connect() || e.is_timeout() => {
                    self.breaker.record_failure();
                    if attempt >= self.config.max_retries {
                        return Err(e.into());
                    }
                    warn!(attempt, error = %e, "store unreachable, retrying");
                }
                Err(e) => {
                    self.breaker.record_failure();
                    return Err(e.into());
                }
            }
            attempt += 1;
            tokio::time::sleep(Duration::from_millis(
                self.config.retry_backoff_ms * u64::from(attempt),
            ))
            .await;
        }
    }
}

fn status_of(response: &Response) -> u16 {
    response.status().as_u16()
}

async fn error_response(response: Response) -> StoreError {
    let status = response.status().as_u16();
    let message = response.text().await.unwrap_or_default();
    StoreError::Response { status, message }
}

#[derive(Deserialize)]
struct SelectResponse {
    results: SelectResults,
}

#[derive(Deserialize)]
struct SelectResults {
    bindings: Vec<HashMap<String, Binding>>,
}

#[derive(Deserialize)]
struct Binding {
    #[serde(rename = "type")]
    kind: String,
    value: String,
}

#[derive(Deserialize)]
struct AskResponse {
    boolean: bool,
}

#[async_trait]
impl TripleStoreGateway for HttpGateway {
    async fn get_graph(&self, name: &str) -> Result<Graph> {
        let request = self
            .client
            .get(self.url(&self.config.data_path))
            .query(&[("graph", name)])
            .header(ACCEPT, NTRIPLES);
        let response = self.send(self.authorize(request)).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::GraphNotFound {
                name: name.to_string(),
            });
        }
        if !response.status().is_success() {
            return Err(error_response(response).await);
        }
        let body = response.bytes().await?;
        hub_core::rdf::read_graph(&body, RdfFormat::NTriples).map_err(|e| StoreError::Rdf {
            message: e.to_string(),
        })
    }

    async fn put_graph(&self, name: &str, graph: &Graph) -> Result<GraphStatus> {
        let body =
            hub_core::rdf::write_graph(graph, RdfFormat::NTriples).map_err(|e| StoreError::Rdf {
                message: e.to_string(),
            })?;
        let request = self
            .client
            .put(self.url(&self.config.data_path))
            .query(&[("graph", name)])
            .header(CONTENT_TYPE, NTRIPLES)
            .body(body);
        let response = self.send(self.authorize(request)).await?;
        match response.status() {
            StatusCode::CREATED => {
                debug!(graph = name, "graph created");
                Ok(GraphStatus::Created)
            }
            status if status.is_success() => {
                debug!(graph = name, "graph replaced");
                Ok(GraphStatus::Updated)
            }
            _ => Err(error_response(response).await),
        }
    }

    async fn delete_graph(&self, name: &str) -> Result<()> {
        let request = self
            .client
            .delete(self.url(&self.config.data_path))
            .query(&[("graph", name)]);
        let response = self.send(self.authorize(request)).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::GraphNotFound {
                name: name.to_string(),
            });
        }
        if !response.status().is_success() {
            return Err(error_response(response).await);
        }
        Ok(())
    }

    async fn ask(&self, query: &str) -> Result<bool> {
        let request = self
            .client
            .get(self.url(&self.config.query_path))
            .query(&[("query", query)])
            .header(ACCEPT, SPARQL_JSON);
        let response = self.send(self.authorize(request)).await?;
        if !response.status().is_success() {
            return Err(error_response(response).await);
        }
        let parsed: AskResponse = response.json().await.map_err(|e| StoreError::Decode {
            message: e.to_string(),
        })?;
        Ok(parsed.boolean)
    }

    async fn select(&self, query: &str) -> Result<Vec<SelectRow>> {
        let request = self
            .client
            .get(self.url(&self.config.query_path))
            .query(&[("query", query)])
            .header(ACCEPT, SPARQL_JSON);
        let response = self.send(self.authorize(request)).await?;
        if !response.status().is_success() {
            return Err(error_response(response).await);
        }
        let parsed: SelectResponse = response.json().await.map_err(|e| StoreError::Decode {
            message: e.to_string(),
        })?;
        Ok(parsed
            .results
            .bindings
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|(var, binding)| {
                        let term = SparqlTerm {
                            is_iri: binding.kind == "uri",
                            value: binding.value,
                        };
                        (var, term)
                    })
                    .collect()
            })
            .collect())
    }

    async fn update(&self, update: &str) -> Result<()> {
        let request = self
            .client
            .post(self.url(&self.config.update_path))
            .form(&[("update", update)]);
        let response = self.send(self.authorize(request)).await?;
        if !response.status().is_success() {
            return Err(error_response(response).await);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = GatewayConfig::default();
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.data_path, "/data");
        assert!(config.username.is_none());
    }

    #[test]
    fn config_deserializes_partially() {
        let config: GatewayConfig = serde_json::from_str(
            r#"{"endpoint": "http://store:3030/hub", "username": "hub", "password": "secret"}"#,
        )
        .unwrap();
        assert_eq!(config.endpoint, "http://store:3030/hub");
        assert_eq!(config.username.as_deref(), Some("hub"));
        assert_eq!(config.max_retries, 3);
    }
}
