use thiserror::Error;

use hub_core::CoreError;
use hub_index::IndexError;
use hub_store::StoreError;
use hub_translate::TranslationError;

/// The service-level error taxonomy. Everything a caller can get back
/// collapses into these four classes; the HTTP layer (not part of this
/// workspace) maps them onto 404/400/409/502.
#[derive(Debug, Error)]
pub enum HubError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("upstream failure: {0}")]
    Upstream(String),
}

impl From<CoreError> for HubError {
    fn from(e: CoreError) -> Self {
        HubError::BadRequest(e.to_string())
    }
}

impl From<StoreError> for HubError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::GraphNotFound { .. } => HubError::NotFound(e.to_string()),
            other => HubError::Upstream(other.to_string()),
        }
    }
}

impl From<IndexError> for HubError {
    fn from(e: IndexError) -> Self {
        HubError::Upstream(e.to_string())
    }
}

impl From<TranslationError> for HubError {
    fn from(e: TranslationError) -> Self {
        match e {
            TranslationError::UnknownField { .. } => HubError::BadRequest(e.to_string()),
            other => HubError::Upstream(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, HubError>;

/// What a write request did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    Created { id: String, location: String },
    Updated { location: String },
    /// Content identical to the stored revision; nothing written.
    Skipped,
}
