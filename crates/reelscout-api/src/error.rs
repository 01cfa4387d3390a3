use bytes::Bytes;
use thiserror::Error;

/// Errors from the movie metadata API layer.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The transport handed back a fully buffered body instead of a chunked one.
    /// The body travels with the error so the caller can parse it directly.
    #[error("response body is not available as a chunked stream")]
    StreamUnsupported { body: Bytes },

    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

impl ApiError {
    /// Whether the response arrived but could not be decoded.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedPayload(_))
    }
}
