use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("index request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("index responded {status}: {message}")]
    Response { status: u16, message: String },

    #[error("unreadable index response: {message}")]
    Decode { message: String },

    #[error("document has no id")]
    MissingId,
}

pub type Result<T> = std::result::Result<T, IndexError>;
