//! The wire-level contract with the triple store.

use std::collections::HashMap;

use async_trait::async_trait;
use oxrdf::Graph;

use crate::error::Result;

/// Whether a graph write created the graph or replaced an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphStatus {
    Created,
    Updated,
}

/// One bound term in a SPARQL select result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SparqlTerm {
    pub value: String,
    pub is_iri: bool,
}

pub type SelectRow = HashMap<String, SparqlTerm>;

/// SPARQL graph-store, query and update protocols against one endpoint.
///
/// Implementations own transport concerns: authentication, retries and
/// availability tracking. Callers see graphs and result rows.
#[async_trait]
pub trait TripleStoreGateway: Send + Sync {
    async fn get_graph(&self, name: &str) -> Result<Graph>;

    async fn put_graph(&self, name: &str, graph: &Graph) -> Result<GraphStatus>;

    async fn delete_graph(&self, name: &str) -> Result<()>;

    async fn ask(&self, query: &str) -> Result<bool>;

    async fn select(&self, query: &str) -> Result<Vec<SelectRow>>;

    async fn update(&self, update: &str) -> Result<()>;
}
