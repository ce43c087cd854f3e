//! In-memory index double for the orchestrator and batch test suites.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;

use crate::error::{IndexError, Result};
use crate::IndexClient;

#[derive(Debug, Default, Clone)]
pub struct MemoryIndexClient {
    datasets: Arc<RwLock<HashMap<String, Value>>>,
    catalogues: Arc<RwLock<HashMap<String, Value>>>,
    /// When set, every write fails; lets tests exercise the best-effort
    /// indexing path.
    failing: Arc<RwLock<bool>>,
}

impl MemoryIndexClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        *self.failing.write() = failing;
    }

    pub fn dataset(&self, id: &str) -> Option<Value> {
        self.datasets.read().get(id).cloned()
    }

    pub fn dataset_count(&self) -> usize {
        self.datasets.read().len()
    }

    pub fn catalogue(&self, id: &str) -> Option<Value> {
        self.catalogues.read().get(id).cloned()
    }

    fn fail_if_requested(&self) -> Result<()> {
        if *self.failing.read() {
            return Err(IndexError::Response {
                status: 503,
                message: "index unavailable".to_string(),
            });
        }
        Ok(())
    }

    fn id_of(document: &Value) -> Result<String> {
        document
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or(IndexError::MissingId)
    }
}

#[async_trait]
impl IndexClient for MemoryIndexClient {
    async fn upsert_dataset(&self, document: &Value) -> Result<()> {
        self.fail_if_requested()?;
        let id = Self::id_of(document)?;
        self.datasets.write().insert(id, document.clone());
        Ok(())
    }

    async fn delete_dataset(&self, id: &str) -> Result<()> {
        self.fail_if_requested()?;
        self.datasets.write().remove(id);
        Ok(())
    }

    async fn upsert_catalogue(&self, document: &Value) -> Result<()> {
        self.fail_if_requested()?;
        let id = Self::id_of(document)?;
        self.catalogues.write().insert(id, document.clone());
        Ok(())
    }

    async fn delete_catalogue(&self, id: &str) -> Result<()> {
        self.fail_if_requested()?;
        self.catalogues.write().remove(id);
        Ok(())
    }

    async fn dataset_ids(&self, catalogue_id: &str) -> Result<HashSet<String>> {
        self.fail_if_requested()?;
        Ok(self
            .datasets
            .read()
            .iter()
            .filter(|(_, doc)| {
                doc.pointer("/catalog/id").and_then(Value::as_str) == Some(catalogue_id)
            })
            .map(|(id, _)| id.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn tracks_documents_per_catalogue() {
        let index = MemoryIndexClient::new();
        index
            .upsert_dataset(&json!({"id": "a", "catalog": {"id": "cat-1"}}))
            .await
            .unwrap();
        index
            .upsert_dataset(&json!({"id": "b", "catalog": {"id": "cat-2"}}))
            .await
            .unwrap();
        assert_eq!(
            index.dataset_ids("cat-1").await.unwrap(),
            HashSet::from(["a".to_string()])
        );
        index.delete_dataset("a").await.unwrap();
        assert!(index.dataset_ids("cat-1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failing_mode_rejects_writes() {
        let index = MemoryIndexClient::new();
        index.set_failing(true);
        let err = index.upsert_dataset(&json!({"id": "a"})).await.unwrap_err();
        assert!(matches!(err, IndexError::Response { status: 503, .. }));
    }
}
