//! The per-submission update orchestrator.
//!
//! A dataset write runs through a fixed sequence: catalogue existence
//! check, change detection against the stored record's checksum,
//! distribution reconciliation, optional translation request, best-effort
//! indexing, the fatal store write, the membership link, and an optional
//! fire-and-forget validation launch. Writes for the same submission
//! identity are serialized on a keyed lock; everything else runs
//! concurrently.

use std::sync::Arc;

use oxrdf::{Graph, Literal, NamedNode, TripleRef};
use oxrdfio::RdfFormat;
use serde_json::json;
use tracing::{debug, info, warn};

use hub_vocab::{dcat, dcterms};

use hub_core::dataset::DataUploader;
use hub_core::{canonical_hash, dataset, rdf, record, DatasetEnvelope, UriScheme};
use hub_index::{dataset_document, IndexClient};
use hub_store::{CatalogueInfo, MetadataStore, StoreError};
use hub_translate::{
    delta, merge, tags, TranslationCallback, TranslationClient, TranslationDelivery,
    TranslationRequest,
};

use crate::config::HubConfig;
use crate::error::{HubError, Result, UpdateOutcome};
use crate::locks::KeyedLocks;
use crate::pipeline::{ValidationPayload, ValidationPipeline};
use crate::upload::HostedDataUrls;

pub struct DatasetService<S, I, T, P> {
    store: Arc<S>,
    index: Arc<I>,
    translator: Arc<T>,
    pipeline: Arc<P>,
    scheme: UriScheme,
    config: HubConfig,
    uploader: Option<HostedDataUrls>,
    locks: KeyedLocks,
}

impl<S, I, T, P> DatasetService<S, I, T, P>
where
    S: MetadataStore + 'static,
    I: IndexClient + 'static,
    T: TranslationClient + 'static,
    P: ValidationPipeline + 'static,
{
    pub fn new(
        store: Arc<S>,
        index: Arc<I>,
        translator: Arc<T>,
        pipeline: Arc<P>,
        config: HubConfig,
    ) -> Result<Self> {
        let scheme = UriScheme::new(&config.base_uri)?;
        let uploader = config
            .upload
            .enabled
            .then(|| HostedDataUrls::new(&config.upload.service_url));
        Ok(Self {
            store,
            index,
            translator,
            pipeline,
            scheme,
            config,
            uploader,
            locks: KeyedLocks::new(),
        })
    }

    pub fn scheme(&self) -> &UriScheme {
        &self.scheme
    }

    fn uploader(&self) -> Option<&dyn DataUploader> {
        self.uploader.as_ref().map(|u| u as &dyn DataUploader)
    }

    /// Stores a dataset under an externally supplied identifier.
    pub async fn put_dataset(
        &self,
        id: &str,
        content: &[u8],
        content_type: &str,
        catalogue_id: &str,
    ) -> Result<UpdateOutcome> {
        let mut envelope =
            DatasetEnvelope::parse(content, content_type, id, catalogue_id, &self.scheme)?;
        let catalogue_uri = envelope.catalogue_uri();
        let info = self
            .store
            .catalogue_info(catalogue_uri.as_str())
            .await
            .map_err(|e| match e {
                StoreError::GraphNotFound { .. } => HubError::NotFound(format!(
                    "catalogue {} not found",
                    envelope.catalogue_id()
                )),
                other => other.into(),
            })?;

        // keyed on the normalized id: distinct external ids that collapse
        // onto the same slot must contend for the same lock
        let key = format!("{}|{}", envelope.catalogue_graph_name(), envelope.id());
        let _guard = self.locks.acquire(&key).await;

        let existing = self
            .store
            .find_record(catalogue_uri.as_str(), envelope.external_id())
            .await?;
        match existing {
            Some(pointer) if pointer.checksum.as_deref() == Some(envelope.hash()) => {
                debug!(id = envelope.external_id(), "content unchanged, skipping");
                Ok(UpdateOutcome::Skipped)
            }
            Some(pointer) => {
                let record_uri =
                    NamedNode::new(pointer.record_uri.as_str()).map_err(|e| {
                        HubError::Upstream(format!("stored record URI is invalid: {e}"))
                    })?;
                let slot = self.scheme.record_id(record_uri.as_str()).ok_or_else(|| {
                    HubError::Upstream(format!(
                        "stored record URI {record_uri} is outside the hub scheme"
                    ))
                })?;
                let old_graph = self
                    .store
                    .get_graph(&self.scheme.dataset_graph(&slot))
                    .await?;
                envelope.apply_update(&old_graph, &record_uri)?;
                envelope.set_access_urls(self.uploader());
                self.commit(envelope, Some(old_graph), info, false).await
            }
            None => {
                let slot = self.free_slot(envelope.id()).await?;
                envelope.init(&slot)?;
                envelope.set_access_urls(self.uploader());
                self.commit(envelope, None, info, true).await
            }
        }
    }

    /// Stores a dataset without an external identifier. A payload that
    /// brings its own `dcat:CatalogRecord` identifier keeps it; otherwise
    /// one is minted.
    pub async fn post_dataset(
        &self,
        content: &[u8],
        content_type: &str,
        catalogue_id: &str,
    ) -> Result<UpdateOutcome> {
        let id = match requested_format(content_type)
            .ok()
            .and_then(|format| rdf::read_graph(content, format).ok())
            .as_ref()
            .and_then(dataset::embedded_record_id)
        {
            Some(embedded) => embedded,
            None => UriScheme::mint_id(),
        };
        self.put_dataset(&id, content, content_type, catalogue_id)
            .await
    }

    pub async fn get_dataset(&self, id: &str, accept: &str) -> Result<String> {
        let format = requested_format(accept)?;
        let graph = self
            .store
            .get_graph(&self.scheme.dataset_graph(&UriScheme::normalize_id(id)))
            .await?;
        rdf::write_graph(&graph, format).map_err(Into::into)
    }

    /// Serves the provenance record alone.
    pub async fn get_record(&self, id: &str, accept: &str) -> Result<String> {
        let format = requested_format(accept)?;
        let id = UriScheme::normalize_id(id);
        let graph = self
            .store
            .get_graph(&self.scheme.dataset_graph(&id))
            .await?;
        let record_uri = self.scheme.record_uri(&id);
        let record = rdf::extract_resource(&graph, (&record_uri).into());
        if record.is_empty() {
            return Err(HubError::NotFound(format!("no record for dataset {id}")));
        }
        rdf::write_graph(&record, format).map_err(Into::into)
    }

    /// Removes a dataset: its graph (fatal if absent), its index entry
    /// (best-effort), its membership links and its metrics graph.
    pub async fn delete_dataset(&self, id: &str, catalogue_id: &str) -> Result<()> {
        let id = UriScheme::normalize_id(id);
        let graph_name = self.scheme.dataset_graph(&id);
        let _guard = self.locks.acquire(&graph_name).await;

        self.store.delete_graph(&graph_name).await?;
        if self.config.indexing.enabled {
            if let Err(e) = self.index.delete_dataset(&id).await {
                warn!(%id, error = %e, "index deletion failed, continuing");
            }
        }
        let catalogue_id = UriScheme::normalize_id(catalogue_id);
        self.store
            .unlink_dataset(
                &self.scheme.catalogue_graph(&catalogue_id),
                self.scheme.catalogue_uri(&catalogue_id).as_str(),
                self.scheme.dataset_uri(&id).as_str(),
                self.scheme.record_uri(&id).as_str(),
            )
            .await?;
        match self
            .store
            .delete_graph(&self.scheme.metrics_graph(&id))
            .await
        {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e.into()),
        }
        info!(%id, "dataset deleted");
        Ok(())
    }

    /// Re-projects a stored dataset into the index, bypassing change
    /// detection. Failures here are the caller's problem.
    pub async fn index_dataset(&self, id: &str, catalogue_id: Option<&str>) -> Result<()> {
        let id = UriScheme::normalize_id(id);
        let graph = self
            .store
            .get_graph(&self.scheme.dataset_graph(&id))
            .await?;
        let document = dataset_document(
            &graph,
            &self.scheme,
            &id,
            catalogue_id,
            &self.config.default_language,
        );
        self.index.upsert_dataset(&document).await.map_err(Into::into)
    }

    /// Merges an asynchronous translation delivery into the stored graph
    /// and refreshes the index entry.
    pub async fn receive_translation(
        &self,
        dataset_id: &str,
        catalogue_id: Option<&str>,
        delivery: &TranslationDelivery,
    ) -> Result<()> {
        let id = UriScheme::normalize_id(dataset_id);
        let graph_name = self.scheme.dataset_graph(&id);
        let _guard = self.locks.acquire(&graph_name).await;

        let mut graph = self.store.get_graph(&graph_name).await?;
        merge::apply_translations(&mut graph, &self.scheme, &id, delivery)?;
        let record_uri = self.scheme.record_uri(&id);
        record::mark_translation_received(&mut graph, record_uri.as_ref());
        self.store.put_graph(&graph_name, &graph).await?;

        if self.config.indexing.enabled {
            let document = dataset_document(
                &graph,
                &self.scheme,
                &id,
                catalogue_id,
                &self.config.default_language,
            );
            if let Err(e) = self.index.upsert_dataset(&document).await {
                warn!(%id, error = %e, "re-indexing after translation failed, continuing");
            }
        }
        info!(%id, "translation delivery merged");
        Ok(())
    }

    /// Adds one distribution to a stored dataset. Create-only: a payload
    /// whose identity key matches an existing distribution is rejected
    /// with `Conflict`; updates go through `put_distribution`.
    pub async fn post_distribution(
        &self,
        dataset_id: &str,
        content: &[u8],
        content_type: &str,
    ) -> Result<UpdateOutcome> {
        let format = requested_format(content_type)?;
        let mut payload = rdf::read_graph(content, format)?;
        let subject = dataset::single_distribution(&payload)?;
        let key = dataset::identity_key(&payload, subject.as_ref()).ok_or_else(|| {
            HubError::BadRequest(format!(
                "distribution {subject} has no identifier, URI, title or access URL"
            ))
        })?;

        let id = UriScheme::normalize_id(dataset_id);
        let graph_name = self.scheme.dataset_graph(&id);
        let _guard = self.locks.acquire(&graph_name).await;

        let mut graph = self.store.get_graph(&graph_name).await?;
        if dataset::distribution_identity_map(&graph).contains_key(&key) {
            return Err(HubError::Conflict(format!(
                "distribution {key} already exists in dataset {id}, use PUT to update"
            )));
        }

        let dist_id = UriScheme::mint_id();
        let target = self.scheme.distribution_uri(&dist_id);
        rdf::rename_resource(&mut payload, &subject, target.as_ref());
        ensure_identifier(&mut payload, &target, &key);
        for t in payload.iter() {
            graph.insert(t);
        }
        graph.insert(TripleRef::new(
            &self.scheme.dataset_uri(&id),
            dcat::DISTRIBUTION,
            &target,
        ));
        dataset::fill_access_urls(&mut graph, &self.scheme, self.uploader());
        self.touch_provenance(&mut graph, &id);

        self.store.put_graph(&graph_name, &graph).await?;
        self.refresh_index(&id, &graph).await;
        info!(dataset = %id, distribution = dist_id, "distribution added");
        Ok(UpdateOutcome::Created {
            id: dist_id,
            location: target.into_string(),
        })
    }

    /// Serves one distribution's concise bounded description.
    pub async fn get_distribution(&self, id: &str, accept: &str) -> Result<String> {
        let format = requested_format(accept)?;
        let dist_uri = self.scheme.distribution_uri(id);
        let (graph, _, _) = self.locate_distribution(&dist_uri).await?;
        let cbd = rdf::extract_resource(&graph, (&dist_uri).into());
        rdf::write_graph(&cbd, format).map_err(Into::into)
    }

    /// Replaces one distribution's description in place. The distribution
    /// keeps its URI, and a payload without an identifier keeps the
    /// stored one so identity matching stays stable.
    pub async fn put_distribution(
        &self,
        id: &str,
        content: &[u8],
        content_type: &str,
    ) -> Result<UpdateOutcome> {
        let format = requested_format(content_type)?;
        let mut payload = rdf::read_graph(content, format)?;
        let subject = dataset::single_distribution(&payload)?;

        let dist_uri = self.scheme.distribution_uri(id);
        let (_, graph_name, dataset_id) = self.locate_distribution(&dist_uri).await?;
        let _guard = self.locks.acquire(&graph_name).await;

        let mut graph = self.store.get_graph(&graph_name).await?;
        let old_cbd = rdf::extract_resource(&graph, (&dist_uri).into());
        if old_cbd.is_empty() {
            return Err(HubError::NotFound(format!(
                "distribution {dist_uri} not found"
            )));
        }
        rdf::rename_resource(&mut payload, &subject, dist_uri.as_ref());
        if let Some(old_key) = rdf::first_literal(&old_cbd, (&dist_uri).into(), dcterms::IDENTIFIER)
        {
            ensure_identifier(&mut payload, &dist_uri, &old_key);
        }
        for t in old_cbd.iter() {
            graph.remove(t);
        }
        for t in payload.iter() {
            graph.insert(t);
        }
        dataset::fill_access_urls(&mut graph, &self.scheme, self.uploader());
        self.touch_provenance(&mut graph, &dataset_id);

        self.store.put_graph(&graph_name, &graph).await?;
        self.refresh_index(&dataset_id, &graph).await;
        info!(dataset = %dataset_id, distribution = %id, "distribution updated");
        Ok(UpdateOutcome::Updated {
            location: dist_uri.into_string(),
        })
    }

    /// Removes one distribution from its dataset.
    pub async fn delete_distribution(&self, id: &str) -> Result<()> {
        let dist_uri = self.scheme.distribution_uri(id);
        let (_, graph_name, dataset_id) = self.locate_distribution(&dist_uri).await?;
        let _guard = self.locks.acquire(&graph_name).await;

        let mut graph = self.store.get_graph(&graph_name).await?;
        let cbd = rdf::extract_resource(&graph, (&dist_uri).into());
        if cbd.is_empty() {
            return Err(HubError::NotFound(format!(
                "distribution {dist_uri} not found"
            )));
        }
        for t in cbd.iter() {
            graph.remove(t);
        }
        graph.remove(TripleRef::new(
            &self.scheme.dataset_uri(&dataset_id),
            dcat::DISTRIBUTION,
            &dist_uri,
        ));
        self.touch_provenance(&mut graph, &dataset_id);

        self.store.put_graph(&graph_name, &graph).await?;
        self.refresh_index(&dataset_id, &graph).await;
        info!(dataset = %dataset_id, distribution = %id, "distribution removed");
        Ok(())
    }

    /// Finds the dataset graph a distribution lives in and checks the
    /// distribution is actually described there.
    async fn locate_distribution(
        &self,
        dist_uri: &NamedNode,
    ) -> Result<(Graph, String, String)> {
        let not_found = || HubError::NotFound(format!("distribution {dist_uri} not found"));
        let graph_name = self
            .store
            .graph_containing(dist_uri.as_str())
            .await?
            .ok_or_else(not_found)?;
        let dataset_id = self.scheme.dataset_id(&graph_name).ok_or_else(|| {
            HubError::Upstream(format!(
                "distribution {dist_uri} found outside a dataset graph ({graph_name})"
            ))
        })?;
        let graph = self.store.get_graph(&graph_name).await?;
        if rdf::extract_resource(&graph, dist_uri.into()).is_empty() {
            return Err(not_found());
        }
        Ok((graph, graph_name, dataset_id))
    }

    /// Distribution edits change stored content outside a full
    /// submission; the record checksum moves to the stored graph's
    /// canonical hash so the next harvester resubmission registers as
    /// changed.
    fn touch_provenance(&self, graph: &mut Graph, dataset_id: &str) {
        let record_uri = self.scheme.record_uri(dataset_id);
        let hash = canonical_hash(graph);
        record::touch_record(graph, record_uri.as_ref(), &hash);
    }

    /// Best-effort index refresh after an in-place edit.
    async fn refresh_index(&self, dataset_id: &str, graph: &Graph) {
        if !self.config.indexing.enabled {
            return;
        }
        let dataset_uri = self.scheme.dataset_uri(dataset_id);
        let catalogue_id = match self.store.catalogue_of_dataset(dataset_uri.as_str()).await {
            Ok(uri) => uri.and_then(|u| self.scheme.catalogue_id(&u)),
            Err(e) => {
                warn!(id = dataset_id, error = %e, "catalogue lookup for indexing failed");
                None
            }
        };
        let document = dataset_document(
            graph,
            &self.scheme,
            dataset_id,
            catalogue_id.as_deref(),
            &self.config.default_language,
        );
        if let Err(e) = self.index.upsert_dataset(&document).await {
            warn!(id = dataset_id, error = %e, "indexing failed, continuing");
        }
    }

    async fn free_slot(&self, base_id: &str) -> Result<String> {
        for attempt in 0..self.config.max_slot_probes {
            let candidate = UriScheme::slot_candidate(base_id, attempt);
            let uri = self.scheme.dataset_uri(&candidate);
            if !self.store.dataset_slot_occupied(uri.as_str()).await? {
                if attempt > 0 {
                    debug!(base_id, candidate, "dataset slot taken, probed a suffix");
                }
                return Ok(candidate);
            }
        }
        Err(HubError::Upstream(format!(
            "no free slot for dataset {base_id} within {} probes",
            self.config.max_slot_probes
        )))
    }

    async fn commit(
        &self,
        mut envelope: DatasetEnvelope,
        old_graph: Option<Graph>,
        info: CatalogueInfo,
        created: bool,
    ) -> Result<UpdateOutcome> {
        let fallback = info
            .source_language
            .unwrap_or_else(|| self.config.default_language.clone());

        if self.config.translation.enabled {
            self.request_translation(&mut envelope, old_graph.as_ref(), &fallback)
                .await;
        }
        if self.config.indexing.enabled {
            let document = dataset_document(
                envelope.graph(),
                &self.scheme,
                envelope.id(),
                Some(envelope.catalogue_id()),
                &fallback,
            );
            if let Err(e) = self.index.upsert_dataset(&document).await {
                warn!(id = envelope.id(), error = %e, "indexing failed, continuing");
            }
        }

        self.store
            .put_graph(&envelope.graph_name(), envelope.graph())
            .await?;
        self.store
            .link_dataset(
                &envelope.catalogue_graph_name(),
                envelope.catalogue_uri().as_str(),
                envelope.uri().as_str(),
                envelope.record_uri().as_str(),
            )
            .await?;
        self.spawn_validation(&envelope).await;

        let location = envelope.uri().into_string();
        if created {
            info!(id = envelope.id(), "dataset created");
            Ok(UpdateOutcome::Created {
                id: envelope.id().to_string(),
                location,
            })
        } else {
            info!(id = envelope.id(), "dataset updated");
            Ok(UpdateOutcome::Updated { location })
        }
    }

    /// Requests translations for changed fields. Failure is logged and
    /// swallowed; the next content change retries naturally.
    async fn request_translation(
        &self,
        envelope: &mut DatasetEnvelope,
        old_graph: Option<&Graph>,
        fallback: &str,
    ) {
        let dataset_uri = envelope.uri();
        let original =
            tags::original_language(envelope.graph(), (&dataset_uri).into(), fallback);
        let fields = delta::translation_delta(
            envelope.graph(),
            old_graph,
            &self.scheme,
            envelope.id(),
            &original,
        );
        if fields.is_empty() {
            return;
        }
        let languages: Vec<String> = self
            .config
            .translation
            .languages
            .iter()
            .filter(|l| !l.eq_ignore_ascii_case(&original))
            .cloned()
            .collect();
        if languages.is_empty() {
            return;
        }

        let record_uri = envelope.record_uri();
        record::mark_translation_in_process(envelope.graph_mut(), record_uri.as_ref());
        let request = TranslationRequest {
            original_language: original,
            languages,
            callback: TranslationCallback {
                url: format!(
                    "{}/datasets/{}/translations",
                    self.config.translation.callback_url,
                    envelope.id()
                ),
                method: "POST".to_string(),
                payload: json!({
                    "id": envelope.id(),
                    "catalogue": envelope.catalogue_id(),
                }),
            },
            data_dict: fields,
        };
        if let Err(e) = self.translator.request_translation(&request).await {
            warn!(id = envelope.id(), error = %e, "translation request failed, continuing");
        }
    }

    /// Validation sees the dataset graph and, when present, its metrics
    /// graph, merged into one TriG payload.
    async fn spawn_validation(&self, envelope: &DatasetEnvelope) {
        if !self.config.validation.enabled {
            return;
        }
        let pipe = self.config.validation.pipe_name.clone();
        if !self.pipeline.is_available(&pipe).await {
            debug!(pipe, "validation pipe unavailable");
            return;
        }
        let metrics = match self.store.get_graph(&envelope.metrics_graph_name()).await {
            Ok(graph) => Some(graph),
            Err(e) if e.is_not_found() => None,
            Err(e) => {
                warn!(id = envelope.id(), error = %e, "metrics unavailable for validation");
                None
            }
        };
        let mut graphs = vec![(self.scheme.dataset_uri(envelope.id()), envelope.graph())];
        if let Some(metrics) = &metrics {
            graphs.push((self.scheme.metrics_uri(envelope.id()), metrics));
        }
        let body = match rdf::write_named_graphs(&graphs, RdfFormat::TriG) {
            Ok(body) => body,
            Err(e) => {
                warn!(id = envelope.id(), error = %e, "could not serialize for validation");
                return;
            }
        };
        let payload = ValidationPayload {
            body,
            content_type: "application/trig".to_string(),
            dataset_uri: envelope.uri().into_string(),
            catalogue_id: envelope.catalogue_id().to_string(),
        };
        let pipeline = self.pipeline.clone();
        tokio::spawn(async move {
            if let Err(e) = pipeline.launch(&pipe, payload).await {
                warn!(error = %e, "validation launch failed");
            }
        });
    }
}

fn ensure_identifier(graph: &mut Graph, target: &NamedNode, key: &str) {
    if rdf::first_literal(graph, target.into(), dcterms::IDENTIFIER).is_none()
        && rdf::first_named_object(graph, target.into(), dcterms::IDENTIFIER).is_none()
    {
        let literal = Literal::new_simple_literal(key);
        graph.insert(TripleRef::new(target, dcterms::IDENTIFIER, &literal));
    }
}

fn requested_format(accept: &str) -> Result<RdfFormat> {
    rdf::format_from_content_type(accept)
        .ok_or_else(|| HubError::BadRequest(format!("unsupported content type: {accept}")))
}
