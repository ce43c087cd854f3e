//! In-memory `MetadataStore` used by the orchestrator and batch test
//! suites. Same semantics as `SparqlStore`, held in a map of graphs.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use oxrdf::{Graph, NamedNode, TermRef, TripleRef};
use parking_lot::RwLock;

use hub_core::{catalogue, rdf, record};
use hub_vocab::{dcat, dcterms, rdf as rdf_vocab};

use crate::error::{Result, StoreError};
use crate::gateway::GraphStatus;
use crate::store::{CatalogueInfo, MetadataStore, RecordPointer};

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    graphs: Arc<RwLock<HashMap<String, Graph>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Test setup shortcut that bypasses the async trait.
    pub fn insert_graph(&self, name: &str, graph: Graph) {
        self.graphs.write().insert(name.to_string(), graph);
    }

    pub fn graph_names(&self) -> Vec<String> {
        self.graphs.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.graphs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.graphs.read().is_empty()
    }
}

#[async_trait]
impl MetadataStore for MemoryStore {
    async fn get_graph(&self, name: &str) -> Result<Graph> {
        self.graphs
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::GraphNotFound {
                name: name.to_string(),
            })
    }

    async fn put_graph(&self, name: &str, graph: &Graph) -> Result<GraphStatus> {
        match self.graphs.write().insert(name.to_string(), graph.clone()) {
            Some(_) => Ok(GraphStatus::Updated),
            None => Ok(GraphStatus::Created),
        }
    }

    async fn delete_graph(&self, name: &str) -> Result<()> {
        self.graphs
            .write()
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| StoreError::GraphNotFound {
                name: name.to_string(),
            })
    }

    async fn graph_exists(&self, name: &str) -> Result<bool> {
        Ok(self.graphs.read().contains_key(name))
    }

    async fn catalogue_info(&self, catalogue_uri: &str) -> Result<CatalogueInfo> {
        let graphs = self.graphs.read();
        let graph = graphs
            .get(catalogue_uri)
            .ok_or_else(|| StoreError::GraphNotFound {
                name: catalogue_uri.to_string(),
            })?;
        let uri = NamedNode::new(catalogue_uri).map_err(|e| StoreError::Decode {
            message: e.to_string(),
        })?;
        let source_type = rdf::first_literal(graph, (&uri).into(), dcterms::TYPE).or_else(|| {
            rdf::first_named_object(graph, (&uri).into(), dcterms::TYPE).map(|n| n.into_string())
        });
        Ok(CatalogueInfo {
            source_type,
            source_language: catalogue::source_language(graph, &uri),
        })
    }

    async fn find_record(
        &self,
        catalogue_uri: &str,
        external_id: &str,
    ) -> Result<Option<RecordPointer>> {
        let graphs = self.graphs.read();
        let Some(catalogue_graph) = graphs.get(catalogue_uri) else {
            return Ok(None);
        };
        let Ok(catalogue) = NamedNode::new(catalogue_uri) else {
            return Ok(None);
        };
        for object in catalogue_graph.objects_for_subject_predicate(&catalogue, dcat::RECORD) {
            let TermRef::NamedNode(record_uri) = object else {
                continue;
            };
            for graph in graphs.values() {
                let id = rdf::first_literal(graph, record_uri.into(), dcterms::IDENTIFIER);
                if id.as_deref() == Some(external_id) {
                    return Ok(Some(RecordPointer {
                        record_uri: record_uri.as_str().to_string(),
                        checksum: record::record_checksum(graph, record_uri),
                    }));
                }
            }
        }
        Ok(None)
    }

    async fn dataset_slot_occupied(&self, dataset_uri: &str) -> Result<bool> {
        let graphs = self.graphs.read();
        if graphs.contains_key(dataset_uri) {
            return Ok(true);
        }
        let Ok(dataset) = NamedNode::new(dataset_uri) else {
            return Ok(false);
        };
        Ok(graphs.values().any(|g| {
            g.subjects_for_predicate_object(dcat::DATASET, &dataset)
                .next()
                .is_some()
        }))
    }

    async fn graph_containing(&self, resource_uri: &str) -> Result<Option<String>> {
        let Ok(resource) = NamedNode::new(resource_uri) else {
            return Ok(None);
        };
        let graphs = self.graphs.read();
        let mut names: Vec<&String> = graphs
            .iter()
            .filter(|(_, g)| g.triples_for_subject(&resource).next().is_some())
            .map(|(name, _)| name)
            .collect();
        // deterministic pick when several graphs mention the resource
        names.sort();
        Ok(names.first().map(|n| n.to_string()))
    }

    async fn catalogue_of_dataset(&self, dataset_uri: &str) -> Result<Option<String>> {
        let Ok(dataset) = NamedNode::new(dataset_uri) else {
            return Ok(None);
        };
        let graphs = self.graphs.read();
        for graph in graphs.values() {
            if let Some(subject) = graph
                .subjects_for_predicate_object(dcat::DATASET, &dataset)
                .next()
            {
                if let oxrdf::SubjectRef::NamedNode(catalogue) = subject {
                    return Ok(Some(catalogue.as_str().to_string()));
                }
            }
        }
        Ok(None)
    }

    async fn link_dataset(
        &self,
        catalogue_graph: &str,
        catalogue_uri: &str,
        dataset_uri: &str,
        record_uri: &str,
    ) -> Result<()> {
        let catalogue = parse_iri(catalogue_uri)?;
        let dataset = parse_iri(dataset_uri)?;
        let record = parse_iri(record_uri)?;
        let mut graphs = self.graphs.write();
        let graph = graphs
            .get_mut(catalogue_graph)
            .ok_or_else(|| StoreError::GraphNotFound {
                name: catalogue_graph.to_string(),
            })?;
        graph.insert(TripleRef::new(&catalogue, dcat::DATASET, &dataset));
        graph.insert(TripleRef::new(&catalogue, dcat::RECORD, &record));
        Ok(())
    }

    async fn unlink_dataset(
        &self,
        catalogue_graph: &str,
        catalogue_uri: &str,
        dataset_uri: &str,
        record_uri: &str,
    ) -> Result<()> {
        let catalogue = parse_iri(catalogue_uri)?;
        let dataset = parse_iri(dataset_uri)?;
        let record = parse_iri(record_uri)?;
        let mut graphs = self.graphs.write();
        if let Some(graph) = graphs.get_mut(catalogue_graph) {
            graph.remove(TripleRef::new(&catalogue, dcat::DATASET, &dataset));
            graph.remove(TripleRef::new(&catalogue, dcat::RECORD, &record));
        }
        Ok(())
    }

    async fn list_catalogues(&self) -> Result<Vec<String>> {
        let graphs = self.graphs.read();
        let mut catalogues: Vec<String> = graphs
            .iter()
            .filter(|(name, graph)| {
                NamedNode::new(name.as_str()).is_ok_and(|node| {
                    graph.contains(TripleRef::new(&node, rdf_vocab::TYPE, dcat::CATALOG))
                })
            })
            .map(|(name, _)| name.clone())
            .collect();
        catalogues.sort();
        Ok(catalogues)
    }
}

fn parse_iri(iri: &str) -> Result<NamedNode> {
    NamedNode::new(iri).map_err(|e| StoreError::Decode {
        message: e.to_string(),
    })
}
