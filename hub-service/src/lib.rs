//! Update orchestration for the metadata hub: dataset, catalogue and
//! metrics write paths, the validation pipeline seam, and catalogue-wide
//! batch reconciliation.
//!
//! Services are generic over the store, index, translation and pipeline
//! traits, so the whole engine runs against in-memory implementations in
//! tests and against SPARQL/HTTP in production.

pub mod batch;
pub mod catalogues;
pub mod config;
pub mod datasets;
pub mod error;
pub mod locks;
pub mod metrics;
pub mod pipeline;
pub mod upload;

pub use batch::{BatchReconciler, BatchReport};
pub use catalogues::CatalogueService;
pub use config::{
    HubConfig, IndexingConfig, TranslationConfig, UploadConfig, ValidationConfig,
};
pub use datasets::DatasetService;
pub use error::{HubError, Result, UpdateOutcome};
pub use metrics::MetricsService;
pub use pipeline::{
    HttpPipeline, MemoryPipeline, NoopPipeline, ValidationPayload, ValidationPipeline,
};
pub use upload::HostedDataUrls;
