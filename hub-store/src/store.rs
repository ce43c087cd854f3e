//! The hub's semantic view of the triple store: record lookup, catalogue
//! membership, slot probes and listings, phrased as SPARQL against the
//! gateway.

use async_trait::async_trait;
use oxrdf::Graph;

use hub_vocab::lang;

use crate::error::{Result, StoreError};
use crate::gateway::{GraphStatus, TripleStoreGateway};

/// Where the previous revision of a dataset lives and what content it had.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordPointer {
    pub record_uri: String,
    /// Absent on damaged records; treated as "changed".
    pub checksum: Option<String>,
}

/// The declarations the hub inherits from a catalogue on every dataset
/// submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogueInfo {
    pub source_type: Option<String>,
    /// ISO 639-1 code.
    pub source_language: Option<String>,
}

/// Hub-level store operations. `SparqlStore` is the production
/// implementation; `MemoryStore` backs the test suites.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    async fn get_graph(&self, name: &str) -> Result<Graph>;

    async fn put_graph(&self, name: &str, graph: &Graph) -> Result<GraphStatus>;

    async fn delete_graph(&self, name: &str) -> Result<()>;

    async fn graph_exists(&self, name: &str) -> Result<bool>;

    /// Fails with `GraphNotFound` when the catalogue does not exist.
    async fn catalogue_info(&self, catalogue_uri: &str) -> Result<CatalogueInfo>;

    /// Looks up the record a catalogue holds for an externally supplied
    /// dataset identifier.
    async fn find_record(
        &self,
        catalogue_uri: &str,
        external_id: &str,
    ) -> Result<Option<RecordPointer>>;

    /// Whether a dataset URI is already taken, either by a stored graph or
    /// by a membership link.
    async fn dataset_slot_occupied(&self, dataset_uri: &str) -> Result<bool>;

    /// The name of a graph that describes the given resource, if any.
    /// Used to locate the dataset graph a distribution lives in.
    async fn graph_containing(&self, resource_uri: &str) -> Result<Option<String>>;

    /// The URI of the catalogue holding a membership link to the dataset.
    async fn catalogue_of_dataset(&self, dataset_uri: &str) -> Result<Option<String>>;

    /// Replaces the membership links for a dataset in its catalogue.
    /// Idempotent: stale links for the same pair are dropped first.
    async fn link_dataset(
        &self,
        catalogue_graph: &str,
        catalogue_uri: &str,
        dataset_uri: &str,
        record_uri: &str,
    ) -> Result<()>;

    async fn unlink_dataset(
        &self,
        catalogue_graph: &str,
        catalogue_uri: &str,
        dataset_uri: &str,
        record_uri: &str,
    ) -> Result<()>;

    /// URIs of all stored catalogues.
    async fn list_catalogues(&self) -> Result<Vec<String>>;
}

/// Escapes a string for use inside a quoted SPARQL literal.
fn escape_literal(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

pub struct SparqlStore<G> {
    gateway: G,
}

impl<G: TripleStoreGateway> SparqlStore<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }
}

#[async_trait]
impl<G: TripleStoreGateway> MetadataStore for SparqlStore<G> {
    async fn get_graph(&self, name: &str) -> Result<Graph> {
        self.gateway.get_graph(name).await
    }

    async fn put_graph(&self, name: &str, graph: &Graph) -> Result<GraphStatus> {
        self.gateway.put_graph(name, graph).await
    }

    async fn delete_graph(&self, name: &str) -> Result<()> {
        self.gateway.delete_graph(name).await
    }

    async fn graph_exists(&self, name: &str) -> Result<bool> {
        self.gateway
            .ask(&format!("ASK {{ GRAPH <{name}> {{ ?s ?p ?o }} }}"))
            .await
    }

    async fn catalogue_info(&self, catalogue_uri: &str) -> Result<CatalogueInfo> {
        if !self.graph_exists(catalogue_uri).await? {
            return Err(StoreError::GraphNotFound {
                name: catalogue_uri.to_string(),
            });
        }
        let query = format!(
            "SELECT ?type ?lang WHERE {{ GRAPH <{catalogue_uri}> {{ \
             OPTIONAL {{ <{catalogue_uri}> <http://purl.org/dc/terms/type> ?type }} \
             OPTIONAL {{ <{catalogue_uri}> <http://purl.org/dc/terms/language> ?lang }} \
             }} }} LIMIT 1"
        );
        let rows = self.gateway.select(&query).await?;
        let mut info = CatalogueInfo::default();
        if let Some(row) = rows.into_iter().next() {
            info.source_type = row.get("type").map(|t| t.value.clone());
            info.source_language = row.get("lang").map(|t| {
                if t.is_iri {
                    lang::iso_code(&t.value)
                        .map(str::to_string)
                        .unwrap_or_else(|| t.value.clone())
                } else {
                    t.value.to_lowercase()
                }
            });
        }
        Ok(info)
    }

    async fn find_record(
        &self,
        catalogue_uri: &str,
        external_id: &str,
    ) -> Result<Option<RecordPointer>> {
        let id = escape_literal(external_id);
        let query = format!(
            "SELECT ?record ?hash WHERE {{ \
             GRAPH <{catalogue_uri}> {{ <{catalogue_uri}> <http://www.w3.org/ns/dcat#record> ?record }} \
             GRAPH ?g {{ ?record <http://purl.org/dc/terms/identifier> \"{id}\" . \
             OPTIONAL {{ ?record <http://spdx.org/rdf/terms#checksum>/<http://spdx.org/rdf/terms#checksumValue> ?hash }} }} \
             }} LIMIT 1"
        );
        let rows = self.gateway.select(&query).await?;
        Ok(rows.into_iter().next().and_then(|row| {
            let record = row.get("record")?;
            Some(RecordPointer {
                record_uri: record.value.clone(),
                checksum: row.get("hash").map(|t| t.value.clone()),
            })
        }))
    }

    async fn dataset_slot_occupied(&self, dataset_uri: &str) -> Result<bool> {
        let query = format!(
            "ASK {{ {{ GRAPH <{dataset_uri}> {{ ?s ?p ?o }} }} UNION \
             {{ GRAPH ?g {{ ?c <http://www.w3.org/ns/dcat#dataset> <{dataset_uri}> }} }} }}"
        );
        self.gateway.ask(&query).await
    }

    async fn graph_containing(&self, resource_uri: &str) -> Result<Option<String>> {
        let query = format!(
            "SELECT ?g WHERE {{ GRAPH ?g {{ <{resource_uri}> ?p ?o }} }} LIMIT 1"
        );
        let rows = self.gateway.select(&query).await?;
        Ok(rows
            .into_iter()
            .next()
            .and_then(|row| row.get("g").map(|t| t.value.clone())))
    }

    async fn catalogue_of_dataset(&self, dataset_uri: &str) -> Result<Option<String>> {
        let query = format!(
            "SELECT ?c WHERE {{ GRAPH ?g {{ \
             ?c <http://www.w3.org/ns/dcat#dataset> <{dataset_uri}> }} }} LIMIT 1"
        );
        let rows = self.gateway.select(&query).await?;
        Ok(rows
            .into_iter()
            .next()
            .and_then(|row| row.get("c").map(|t| t.value.clone())))
    }

    async fn link_dataset(
        &self,
        catalogue_graph: &str,
        catalogue_uri: &str,
        dataset_uri: &str,
        record_uri: &str,
    ) -> Result<()> {
        let update = format!(
            "DELETE WHERE {{ GRAPH <{catalogue_graph}> {{ \
             <{catalogue_uri}> <http://www.w3.org/ns/dcat#dataset> <{dataset_uri}> }} }} ; \
             DELETE WHERE {{ GRAPH <{catalogue_graph}> {{ \
             <{catalogue_uri}> <http://www.w3.org/ns/dcat#record> <{record_uri}> }} }} ; \
             INSERT DATA {{ GRAPH <{catalogue_graph}> {{ \
             <{catalogue_uri}> <http://www.w3.org/ns/dcat#dataset> <{dataset_uri}> . \
             <{catalogue_uri}> <http://www.w3.org/ns/dcat#record> <{record_uri}> }} }}"
        );
        self.gateway.update(&update).await
    }

    async fn unlink_dataset(
        &self,
        catalogue_graph: &str,
        catalogue_uri: &str,
        dataset_uri: &str,
        record_uri: &str,
    ) -> Result<()> {
        let update = format!(
            "DELETE DATA {{ GRAPH <{catalogue_graph}> {{ \
             <{catalogue_uri}> <http://www.w3.org/ns/dcat#dataset> <{dataset_uri}> . \
             <{catalogue_uri}> <http://www.w3.org/ns/dcat#record> <{record_uri}> }} }}"
        );
        self.gateway.update(&update).await
    }

    async fn list_catalogues(&self) -> Result<Vec<String>> {
        let query = "SELECT DISTINCT ?g WHERE { GRAPH ?g { \
                     ?g <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> \
                     <http://www.w3.org/ns/dcat#Catalog> } }";
        let rows = self.gateway.select(query).await?;
        Ok(rows
            .into_iter()
            .filter_map(|row| row.get("g").map(|t| t.value.clone()))
            .collect())
    }
}
