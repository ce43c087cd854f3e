use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("graph not found: {name}")]
    GraphNotFound { name: String },

    #[error("circuit breaker open, store considered unavailable")]
    CircuitOpen,

    #[error("store request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("store responded {status}: {message}")]
    Response { status: u16, message: String },

    #[error("unreadable store response: {message}")]
    Decode { message: String },

    #[error("invalid graph payload: {message}")]
    Rdf { message: String },
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::GraphNotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
