//! Error types for the licensing module.

use thiserror::Error;
use trustlic_crypto::CodecError;

use crate::fault::ValidationFault;

/// Licensing-specific errors.
#[derive(Debug, Error)]
pub enum LicenseError {
    /// Document text is not a well-formed license document.
    #[error("invalid license document: {0}")]
    InvalidDocument(String),

    /// Document fields are missing or do not match the payload type.
    #[error("license deserialization failed: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// Signature envelope error (missing or malformed signature element).
    #[error("signature codec error: {0}")]
    Codec(#[from] CodecError),

    /// No signed document is cached on the license.
    #[error("license has not been signed or loaded from a signed document")]
    NotSigned,

    /// A validation step failed while raise-on-failure was enabled.
    #[error("license validation failed: {message}")]
    Validation {
        fault: ValidationFault,
        message: String,
    },
}

impl LicenseError {
    /// Returns the validation fault, if this is a validation failure.
    #[must_use]
    pub fn fault(&self) -> Option<ValidationFault> {
        match self {
            Self::Validation { fault, .. } => Some(*fault),
            _ => None,
        }
    }
}

/// Result type for license operations.
pub type LicenseResult<T> = Result<T, LicenseError>;

/// Errors from machine identity probes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// The host has no provisioned machine identifier.
    #[error("machine identity not found: {0}")]
    NotFound(String),

    /// The machine identifier exists but is not a valid UUID.
    #[error("invalid machine identity: {0}")]
    InvalidData(String),
}
