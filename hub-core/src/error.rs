use thiserror::Error;

/// Errors raised while parsing, transforming or serializing metadata
/// envelopes. These are all client-input problems; the service layer maps
/// them onto its own taxonomy.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unsupported content type: {content_type}")]
    UnsupportedContentType { content_type: String },

    #[error("malformed RDF payload: {message}")]
    Parse { message: String },

    #[error("serialization failed: {message}")]
    Serialize { message: String },

    #[error("payload contains no {class} resource")]
    MissingResource { class: &'static str },

    #[error("payload contains more than one {class} resource")]
    AmbiguousResource { class: &'static str },

    #[error("distribution {subject} has no identifier, URI, title or access URL")]
    DistributionWithoutIdentity { subject: String },

    #[error("invalid base URI: {uri}")]
    InvalidBaseUri { uri: String },
}

pub type Result<T> = std::result::Result<T, CoreError>;
