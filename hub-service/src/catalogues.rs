//! Catalogue writes: the same engine as datasets, minus distributions
//! and the record envelope.

use std::sync::Arc;

use tracing::{debug, info, warn};

use hub_core::catalogue::comparable_hash;
use hub_core::{rdf, CatalogueEnvelope, UriScheme};
use hub_index::{catalogue_document, IndexClient};
use hub_store::MetadataStore;

use crate::config::HubConfig;
use crate::error::{HubError, Result, UpdateOutcome};
use crate::locks::KeyedLocks;

pub struct CatalogueService<S, I> {
    store: Arc<S>,
    index: Arc<I>,
    scheme: UriScheme,
    config: HubConfig,
    locks: KeyedLocks,
}

impl<S, I> CatalogueService<S, I>
where
    S: MetadataStore + 'static,
    I: IndexClient + 'static,
{
    pub fn new(store: Arc<S>, index: Arc<I>, config: HubConfig) -> Result<Self> {
        let scheme = UriScheme::new(&config.base_uri)?;
        Ok(Self {
            store,
            index,
            scheme,
            config,
            locks: KeyedLocks::new(),
        })
    }

    pub async fn put_catalogue(
        &self,
        id: &str,
        content: &[u8],
        content_type: &str,
    ) -> Result<UpdateOutcome> {
        let mut envelope = CatalogueEnvelope::parse(content, content_type, id, &self.scheme)?;
        let graph_name = envelope.graph_name();
        let _guard = self.locks.acquire(&graph_name).await;

        let existing = if self.store.graph_exists(&graph_name).await? {
            Some(self.store.get_graph(&graph_name).await?)
        } else {
            None
        };
        let created = match existing {
            Some(old_graph) => {
                if comparable_hash(&old_graph, &envelope.uri()) == envelope.content_hash() {
                    debug!(id = envelope.id(), "catalogue unchanged, skipping");
                    return Ok(UpdateOutcome::Skipped);
                }
                envelope.apply_update(&old_graph);
                false
            }
            None => {
                envelope.init();
                true
            }
        };

        if self.config.indexing.enabled {
            let document = catalogue_document(
                envelope.graph(),
                &self.scheme,
                envelope.id(),
                &self.config.default_language,
            );
            if let Err(e) = self.index.upsert_catalogue(&document).await {
                warn!(id = envelope.id(), error = %e, "catalogue indexing failed, continuing");
            }
        }
        self.store.put_graph(&graph_name, envelope.graph()).await?;

        let location = envelope.uri().into_string();
        if created {
            info!(id = envelope.id(), "catalogue created");
            Ok(UpdateOutcome::Created {
                id: envelope.id().to_string(),
                location,
            })
        } else {
            info!(id = envelope.id(), "catalogue updated");
            Ok(UpdateOutcome::Updated { location })
        }
    }

    pub async fn get_catalogue(&self, id: &str, accept: &str) -> Result<String> {
        let format = rdf::format_from_content_type(accept)
            .ok_or_else(|| HubError::BadRequest(format!("unsupported content type: {accept}")))?;
        let graph = self
            .store
            .get_graph(&self.scheme.catalogue_graph(&UriScheme::normalize_id(id)))
            .await?;
        rdf::write_graph(&graph, format).map_err(Into::into)
    }

    /// Deletes the catalogue graph and its index entry. Member datasets
    /// are untouched; run the batch `clear` first to cascade.
    pub async fn delete_catalogue(&self, id: &str) -> Result<()> {
        let id = UriScheme::normalize_id(id);
        let graph_name = self.scheme.catalogue_graph(&id);
        let _guard = self.locks.acquire(&graph_name).await;

        self.store.delete_graph(&graph_name).await?;
        if self.config.indexing.enabled {
            if let Err(e) = self.index.delete_catalogue(&id).await {
                warn!(%id, error = %e, "catalogue index deletion failed, continuing");
            }
        }
        info!(%id, "catalogue deleted");
        Ok(())
    }

    pub async fn list_catalogues(&self) -> Result<Vec<String>> {
        let uris = self.store.list_catalogues().await?;
        Ok(uris
            .iter()
            .filter_map(|uri| self.scheme.catalogue_id(uri))
            .collect())
    }
}
