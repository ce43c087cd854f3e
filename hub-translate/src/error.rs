use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("translation request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("translation service responded {status}: {message}")]
    Response { status: u16, message: String },

    #[error("delivery references unknown field key: {key}")]
    UnknownField { key: String },
}

pub type Result<T> = std::result::Result<T, TranslationError>;
