//! Persistence for the metadata hub.
//!
//! Two layers: [`TripleStoreGateway`] speaks the SPARQL graph-store,
//! query and update protocols to a remote triple store, and
//! [`MetadataStore`] provides the hub's semantic operations (record
//! lookup, membership links, slot probes) on top of it. `MemoryStore`
//! implements the semantic layer in process for tests.

pub mod breaker;
pub mod error;
pub mod gateway;
pub mod http;
pub mod memory;
pub mod store;

pub use breaker::{BreakerConfig, CircuitBreaker};
pub use error::{Result, StoreError};
pub use gateway::{GraphStatus, SelectRow, SparqlTerm, TripleStoreGateway};
pub use http::{GatewayConfig, HttpGateway};
pub use memory::MemoryStore;
pub use store::{CatalogueInfo, MetadataStore, RecordPointer, SparqlStore};
