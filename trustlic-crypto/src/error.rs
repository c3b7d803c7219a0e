//! Error types for the signature codec.

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Structural errors raised while building, canonicalizing or signing documents.
///
/// A signature that simply does not match is not an error; verification
/// reports it as `Ok(false)`.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Document root is not a JSON object.
    #[error("document root must be an object")]
    NotAnObject,

    /// No signature element under the document root.
    #[error("document has no signature element")]
    MissingSignature,

    /// Document already carries a signature element.
    #[error("document is already signed")]
    AlreadySigned,

    /// Signature element is present but has the wrong shape.
    #[error("malformed signature element: {0}")]
    MalformedSignature(String),

    /// Canonical serialization failed.
    #[error("canonicalization failed: {0}")]
    Canonicalization(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
