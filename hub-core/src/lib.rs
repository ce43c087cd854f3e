//! Core building blocks of the metadata hub: the URI scheme, RDF parsing
//! and serialization glue, canonical checksums, catalog-record provenance,
//! and the versioned envelopes for datasets, catalogues and metrics.
//!
//! Everything in this crate is synchronous and store-agnostic. The async
//! orchestration lives in `hub-service`; persistence lives in `hub-store`.

pub mod canon;
pub mod catalogue;
pub mod dataset;
pub mod error;
pub mod metrics;
pub mod rdf;
pub mod record;
pub mod scheme;

pub use canon::{canonical_hash, canonical_ntriples};
pub use catalogue::CatalogueEnvelope;
pub use dataset::DatasetEnvelope;
pub use error::{CoreError, Result};
pub use metrics::MetricsEnvelope;
pub use scheme::UriScheme;
