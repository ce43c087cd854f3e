//! Catalogue-wide reconciliation: `repair` drops membership links whose
//! graphs are gone, `sync` re-aligns the search index with the store,
//! `clear` removes every member dataset, and `launch` re-runs the
//! validation pipeline over the whole catalogue.
//!
//! Members are processed in fixed-size partitions; within a partition the
//! per-dataset work runs concurrently and the partition joins before the
//! next one starts, so a huge catalogue never floods the store.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;
use oxrdf::{Graph, NamedNode, TermRef, TripleRef};
use oxrdfio::RdfFormat;
use tracing::{info, warn};

use hub_core::{rdf, UriScheme};
use hub_index::{catalogue_document, dataset_document, IndexClient};
use hub_store::MetadataStore;
use hub_vocab::dcat;

use crate::config::HubConfig;
use crate::error::{HubError, Result};
use crate::pipeline::{ValidationPayload, ValidationPipeline};

/// What a batch run did. `errors` holds one line per failed member;
/// a failure never aborts the rest of the partition.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub processed: usize,
    pub removed: usize,
    pub failed: usize,
    pub errors: Vec<String>,
}

pub struct BatchReconciler<S, I, P> {
    store: Arc<S>,
    index: Arc<I>,
    pipeline: Arc<P>,
    scheme: UriScheme,
    partition_size: usize,
    default_language: String,
    pipe_name: String,
}

enum SyncItem {
    Indexed(String),
    Missing(NamedNode),
    Failed(String),
}

impl<S, I, P> BatchReconciler<S, I, P>
where
    S: MetadataStore + 'static,
    I: IndexClient + 'static,
    P: ValidationPipeline + 'static,
{
    pub fn new(
        store: Arc<S>,
        index: Arc<I>,
        pipeline: Arc<P>,
        config: &HubConfig,
    ) -> Result<Self> {
        let scheme = UriScheme::new(&config.base_uri)?;
        Ok(Self {
            store,
            index,
            pipeline,
            scheme,
            partition_size: config.partition_size.max(1),
            default_language: config.default_language.clone(),
            pipe_name: config.validation.pipe_name.clone(),
        })
    }

    /// Drops membership links pointing at graphs that no longer exist,
    /// then orphaned record links, and persists the catalogue once.
    pub async fn repair(&self, catalogue_id: &str) -> Result<BatchReport> {
        let id = UriScheme::normalize_id(catalogue_id);
        let catalogue_uri = self.scheme.catalogue_uri(&id);
        let graph_name = self.scheme.catalogue_graph(&id);
        let mut catalogue_graph = self.store.get_graph(&graph_name).await?;

        let mut report = BatchReport::default();
        let datasets = member_datasets(&catalogue_graph, &catalogue_uri);
        for partition in datasets.chunks(self.partition_size) {
            let checks = join_all(partition.iter().map(|dataset| async move {
                (dataset, self.store.graph_exists(dataset.as_str()).await)
            }))
            .await;
            for (dataset, existence) in checks {
                match existence {
                    Ok(true) => report.processed += 1,
                    Ok(false) => {
                        catalogue_graph.remove(TripleRef::new(
                            &catalogue_uri,
                            dcat::DATASET,
                            dataset,
                        ));
                        if let Some(dataset_id) = self.scheme.dataset_id(dataset.as_str()) {
                            let record = self.scheme.record_uri(&dataset_id);
                            catalogue_graph.remove(TripleRef::new(
                                &catalogue_uri,
                                dcat::RECORD,
                                &record,
                            ));
                        }
                        report.removed += 1;
                    }
                    Err(e) => {
                        report.failed += 1;
                        report.errors.push(format!("{dataset}: {e}"));
                    }
                }
            }
        }

        // record links whose dataset link is gone
        let remaining: HashSet<String> = member_datasets(&catalogue_graph, &catalogue_uri)
            .iter()
            .filter_map(|d| self.scheme.dataset_id(d.as_str()))
            .collect();
        for record in member_records(&catalogue_graph, &catalogue_uri) {
            let orphaned = match self.scheme.record_id(record.as_str()) {
                Some(record_id) => !remaining.contains(&record_id),
                None => true,
            };
            if orphaned {
                catalogue_graph.remove(TripleRef::new(&catalogue_uri, dcat::RECORD, &record));
                report.removed += 1;
            }
        }

        self.store.put_graph(&graph_name, &catalogue_graph).await?;
        info!(catalogue = %id, processed = report.processed, removed = report.removed,
              failed = report.failed, "repair finished");
        Ok(report)
    }

    /// Pushes the catalogue and every member dataset into the index, then
    /// deletes index entries the store no longer backs.
    pub async fn sync(&self, catalogue_id: &str) -> Result<BatchReport> {
        let id = UriScheme::normalize_id(catalogue_id);
        let catalogue_uri = self.scheme.catalogue_uri(&id);
        let graph_name = self.scheme.catalogue_graph(&id);
        let mut catalogue_graph = self.store.get_graph(&graph_name).await?;

        let mut report = BatchReport::default();
        let document =
            catalogue_document(&catalogue_graph, &self.scheme, &id, &self.default_language);
        if let Err(e) = self.index.upsert_catalogue(&document).await {
            report.failed += 1;
            report.errors.push(format!("catalogue {id}: {e}"));
        }

        let mut stored_ids: HashSet<String> = HashSet::new();
        let datasets = member_datasets(&catalogue_graph, &catalogue_uri);
        for partition in datasets.chunks(self.partition_size) {
            let items = join_all(
                partition
                    .iter()
                    .map(|dataset| self.sync_one(dataset, &id)),
            )
            .await;
            for item in items {
                match item {
                    SyncItem::Indexed(dataset_id) => {
                        stored_ids.insert(dataset_id);
                        report.processed += 1;
                    }
                    SyncItem::Missing(dataset) => {
                        catalogue_graph.remove(TripleRef::new(
                            &catalogue_uri,
                            dcat::DATASET,
                            &dataset,
                        ));
                        if let Some(dataset_id) = self.scheme.dataset_id(dataset.as_str()) {
                            let record = self.scheme.record_uri(&dataset_id);
                            catalogue_graph.remove(TripleRef::new(
                                &catalogue_uri,
                                dcat::RECORD,
                                &record,
                            ));
                            if let Err(e) = self.index.delete_dataset(&dataset_id).await {
                                warn!(dataset = dataset_id, error = %e, "stale index entry survived");
                            }
                        }
                        report.removed += 1;
                    }
                    SyncItem::Failed(message) => {
                        report.failed += 1;
                        report.errors.push(message);
                    }
                }
            }
        }

        // entries the index holds but the store does not
        match self.index.dataset_ids(&id).await {
            Ok(indexed) => {
                for stale in indexed.difference(&stored_ids) {
                    match self.index.delete_dataset(stale).await {
                        Ok(()) => report.removed += 1,
                        Err(e) => {
                            report.failed += 1;
                            report.errors.push(format!("index {stale}: {e}"));
                        }
                    }
                }
            }
            Err(e) => {
                report.failed += 1;
                report.errors.push(format!("index listing: {e}"));
            }
        }

        self.store.put_graph(&graph_name, &catalogue_graph).await?;
        info!(catalogue = %id, processed = report.processed, removed = report.removed,
              failed = report.failed, "sync finished");
        Ok(report)
    }

    async fn sync_one(&self, dataset: &NamedNode, catalogue_id: &str) -> SyncItem {
        let Some(dataset_id) = self.scheme.dataset_id(dataset.as_str()) else {
            return SyncItem::Failed(format!("{dataset}: outside the hub scheme"));
        };
        match self.store.get_graph(dataset.as_str()).await {
            Ok(graph) => {
                let document = dataset_document(
                    &graph,
                    &self.scheme,
                    &dataset_id,
                    Some(catalogue_id),
                    &self.default_language,
                );
                match self.index.upsert_dataset(&document).await {
                    Ok(()) => SyncItem::Indexed(dataset_id),
                    Err(e) => SyncItem::Failed(format!("{dataset}: {e}")),
                }
            }
            Err(e) if e.is_not_found() => SyncItem::Missing(dataset.clone()),
            Err(e) => SyncItem::Failed(format!("{dataset}: {e}")),
        }
    }

    /// Deletes every member dataset (graph, metrics, index entry unless
    /// `keep_index`) and empties the catalogue's membership.
    pub async fn clear(&self, catalogue_id: &str, keep_index: bool) -> Result<BatchReport> {
        let id = UriScheme::normalize_id(catalogue_id);
        let catalogue_uri = self.scheme.catalogue_uri(&id);
        let graph_name = self.scheme.catalogue_graph(&id);
        let mut catalogue_graph = self.store.get_graph(&graph_name).await?;

        let mut report = BatchReport::default();
        let datasets = member_datasets(&catalogue_graph, &catalogue_uri);
        for partition in datasets.chunks(self.partition_size) {
            let results = join_all(
                partition
                    .iter()
                    .map(|dataset| self.clear_one(dataset, keep_index)),
            )
            .await;
            for (dataset, result) in partition.iter().zip(results) {
                match result {
                    Ok(()) => {
                        catalogue_graph.remove(TripleRef::new(
                            &catalogue_uri,
                            dcat::DATASET,
                            dataset,
                        ));
                        if let Some(dataset_id) = self.scheme.dataset_id(dataset.as_str()) {
                            let record = self.scheme.record_uri(&dataset_id);
                            catalogue_graph.remove(TripleRef::new(
                                &catalogue_uri,
                                dcat::RECORD,
                                &record,
                            ));
                        }
                        report.processed += 1;
                    }
                    Err(message) => {
                        report.failed += 1;
                        report.errors.push(message);
                    }
                }
            }
        }

        self.store.put_graph(&graph_name, &catalogue_graph).await?;
        info!(catalogue = %id, processed = report.processed, failed = report.failed,
              "clear finished");
        Ok(report)
    }

    async fn clear_one(
        &self,
        dataset: &NamedNode,
        keep_index: bool,
    ) -> std::result::Result<(), String> {
        match self.store.delete_graph(dataset.as_str()).await {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(format!("{dataset}: {e}")),
        }
        if let Some(dataset_id) = self.scheme.dataset_id(dataset.as_str()) {
            match self
                .store
                .delete_graph(&self.scheme.metrics_graph(&dataset_id))
                .await
            {
                Ok(()) => {}
                Err(e) if e.is_not_found() => {}
                Err(e) => return Err(format!("{dataset} metrics: {e}")),
            }
            if !keep_index {
                if let Err(e) = self.index.delete_dataset(&dataset_id).await {
                    return Err(format!("{dataset} index: {e}"));
                }
            }
        }
        Ok(())
    }

    /// Re-runs the validation pipeline for every member dataset. Unlike
    /// the per-submission fire-and-forget launch, the batch waits for each
    /// launch so the report reflects what actually went out.
    pub async fn launch(&self, catalogue_id: &str) -> Result<BatchReport> {
        let id = UriScheme::normalize_id(catalogue_id);
        let catalogue_uri = self.scheme.catalogue_uri(&id);
        let graph_name = self.scheme.catalogue_graph(&id);
        let catalogue_graph = self.store.get_graph(&graph_name).await?;

        if !self.pipeline.is_available(&self.pipe_name).await {
            return Err(HubError::Upstream(format!(
                "validation pipe {} is unavailable",
                self.pipe_name
            )));
        }

        let mut report = BatchReport::default();
        let datasets = member_datasets(&catalogue_graph, &catalogue_uri);
        for partition in datasets.chunks(self.partition_size) {
            let results = join_all(
                partition
                    .iter()
                    .map(|dataset| self.launch_one(dataset, &id)),
            )
            .await;
            for result in results {
                match result {
                    Ok(()) => report.processed += 1,
                    Err(message) => {
                        report.failed += 1;
                        report.errors.push(message);
                    }
                }
            }
        }
        info!(catalogue = %id, processed = report.processed, failed = report.failed,
              "launch finished");
        Ok(report)
    }

    async fn launch_one(
        &self,
        dataset: &NamedNode,
        catalogue_id: &str,
    ) -> std::result::Result<(), String> {
        let Some(dataset_id) = self.scheme.dataset_id(dataset.as_str()) else {
            return Err(format!("{dataset}: outside the hub scheme"));
        };
        let graph = self
            .store
            .get_graph(dataset.as_str())
            .await
            .map_err(|e| format!("{dataset}: {e}"))?;
        let metrics = match self
            .store
            .get_graph(&self.scheme.metrics_graph(&dataset_id))
            .await
        {
            Ok(graph) => Some(graph),
            Err(e) if e.is_not_found() => None,
            Err(e) => return Err(format!("{dataset} metrics: {e}")),
        };
        let mut graphs = vec![(self.scheme.dataset_uri(&dataset_id), &graph)];
        if let Some(metrics) = &metrics {
            graphs.push((self.scheme.metrics_uri(&dataset_id), metrics));
        }
        let body = rdf::write_named_graphs(&graphs, RdfFormat::TriG)
            .map_err(|e| format!("{dataset}: {e}"))?;
        let payload = ValidationPayload {
            body,
            content_type: "application/trig".to_string(),
            dataset_uri: dataset.as_str().to_string(),
            catalogue_id: catalogue_id.to_string(),
        };
        self.pipeline
            .launch(&self.pipe_name, payload)
            .await
            .map_err(|e| format!("{dataset}: {e}"))
    }
}

fn member_datasets(graph: &Graph, catalogue_uri: &NamedNode) -> Vec<NamedNode> {
    graph
        .objects_for_subject_predicate(catalogue_uri, dcat::DATASET)
        .filter_map(|o| match o {
            TermRef::NamedNode(n) => Some(n.into_owned()),
            _ => None,
        })
        .collect()
}

fn member_records(graph: &Graph, catalogue_uri: &NamedNode) -> Vec<NamedNode> {
    graph
        .objects_for_subject_predicate(catalogue_uri, dcat::RECORD)
        .filter_map(|o| match o {
            TermRef::NamedNode(n) => Some(n.into_owned()),
            _ => None,
        })
        .collect()
}
