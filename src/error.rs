//! Error types for reply extraction

use std::string::FromUtf8Error;
use thiserror::Error;

/// Errors that can occur while extracting a reply
///
/// The string-returning entry points never surface these: they log the error
/// and fall back to the input. The `try_*` variants and the MIME front door
/// return them as is.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Failed to parse the MIME structure of a raw message
    #[error("Failed to parse message structure: {0}")]
    Structure(String),

    /// Failed to decode a body part
    #[error("Failed to decode content: {0}")]
    Decode(String),

    /// Content type other than `text/plain` or `text/html`
    #[error("Unsupported content type: {0}")]
    UnsupportedContentType(String),

    /// The DOM provider produced a tree without a required element
    #[error("Document has no <{0}> element")]
    MissingElement(&'static str),

    /// Writing the document back to markup failed
    #[error("Failed to serialize document: {0}")]
    Serialize(#[from] std::io::Error),

    /// Serialized markup was not valid UTF-8
    #[error("Serialized document is not valid UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),

    /// Options could not be read from JSON
    #[error("Invalid extraction options: {0}")]
    Options(#[from] serde_json::Error),
}

/// Result type for extraction operations
pub type Result<T> = std::result::Result<T, ExtractError>;
