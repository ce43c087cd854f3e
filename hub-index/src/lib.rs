//! Search index synchronization: a client trait for the index service,
//! an HTTP implementation, an in-memory test double, and the projection
//! of RDF graphs onto flat search documents.

pub mod error;
pub mod http;
pub mod memory;
pub mod projection;

pub use error::{IndexError, Result};
pub use http::HttpIndexClient;
pub use memory::MemoryIndexClient;
pub use projection::{catalogue_document, dataset_document};

use std::collections::HashSet;

use async_trait::async_trait;
use serde_json::Value;

/// The hub's contract with the search index. Index writes are best-effort
/// from the orchestrator's point of view; the batch reconciler exists to
/// catch up whatever was missed.
#[async_trait]
pub trait IndexClient: Send + Sync {
    async fn upsert_dataset(&self, document: &Value) -> Result<()>;

    async fn delete_dataset(&self, id: &str) -> Result<()>;

    async fn upsert_catalogue(&self, document: &Value) -> Result<()>;

    async fn delete_catalogue(&self, id: &str) -> Result<()>;

    /// Ids of all datasets the index currently holds for a catalogue.
    async fn dataset_ids(&self, catalogue_id: &str) -> Result<HashSet<String>>;
}
