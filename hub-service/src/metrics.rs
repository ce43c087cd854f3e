//! Metrics writes: quality measurements land in a sibling graph of the
//! dataset they describe, with the same checksum-based skip as datasets.

use std::sync::Arc;

use tracing::{debug, info};

use hub_core::{canonical_hash, rdf, MetricsEnvelope, UriScheme};
use hub_store::{GraphStatus, MetadataStore};

use crate::config::HubConfig;
use crate::error::{HubError, Result, UpdateOutcome};
use crate::locks::KeyedLocks;

pub struct MetricsService<S> {
    store: Arc<S>,
    scheme: UriScheme,
    locks: KeyedLocks,
}

impl<S: MetadataStore + 'static> MetricsService<S> {
    pub fn new(store: Arc<S>, config: &HubConfig) -> Result<Self> {
        let scheme = UriScheme::new(&config.base_uri)?;
        Ok(Self {
            store,
            scheme,
            locks: KeyedLocks::new(),
        })
    }

    pub async fn put_metrics(
        &self,
        dataset_id: &str,
        content: &[u8],
        content_type: &str,
    ) -> Result<UpdateOutcome> {
        let envelope = MetricsEnvelope::parse(content, content_type, dataset_id, &self.scheme)?;
        // metrics describe a dataset the hub must already hold
        let dataset_graph = self.scheme.dataset_graph(envelope.dataset_id());
        if !self.store.graph_exists(&dataset_graph).await? {
            return Err(HubError::NotFound(format!(
                "dataset {} not found",
                envelope.dataset_id()
            )));
        }

        let graph_name = envelope.graph_name();
        let _guard = self.locks.acquire(&graph_name).await;
        if self.store.graph_exists(&graph_name).await? {
            let old_graph = self.store.get_graph(&graph_name).await?;
            if canonical_hash(&old_graph) == envelope.hash() {
                debug!(dataset = envelope.dataset_id(), "metrics unchanged, skipping");
                return Ok(UpdateOutcome::Skipped);
            }
        }
        let status = self.store.put_graph(&graph_name, envelope.graph()).await?;
        let location = graph_name.clone();
        match status {
            GraphStatus::Created => {
                info!(dataset = envelope.dataset_id(), "metrics created");
                Ok(UpdateOutcome::Created {
                    id: envelope.dataset_id().to_string(),
                    location,
                })
            }
            GraphStatus::Updated => {
                info!(dataset = envelope.dataset_id(), "metrics updated");
                Ok(UpdateOutcome::Updated { location })
            }
        }
    }

    pub async fn get_metrics(&self, dataset_id: &str, accept: &str) -> Result<String> {
        let format = rdf::format_from_content_type(accept)
            .ok_or_else(|| HubError::BadRequest(format!("unsupported content type: {accept}")))?;
        let graph = self
            .store
            .get_graph(&self.scheme.metrics_graph(&UriScheme::normalize_id(dataset_id)))
            .await?;
        rdf::write_graph(&graph, format).map_err(Into::into)
    }

    pub async fn delete_metrics(&self, dataset_id: &str) -> Result<()> {
        let graph_name = self
            .scheme
            .metrics_graph(&UriScheme::normalize_id(dataset_id));
        let _guard = self.locks.acquire(&graph_name).await;
        self.store.delete_graph(&graph_name).await?;
        Ok(())
    }
}
