//! License identifiers.
//!
//! Identifiers are random (UUID v4) and carry no issuance time. Documents
//! store them in lowercase hyphenated form; parsing also accepts the simple
//! 32 hex digit form and braced or URN forms.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Error returned when text is not a license identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid license identifier '{input}': {reason}")]
pub struct IdError {
    input: String,
    reason: String,
}

/// Unique identifier of an issued license.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LicenseId(Uuid);

impl LicenseId {
    /// Draws a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }

    /// Parses an identifier, ignoring surrounding whitespace.
    pub fn parse(s: &str) -> Result<Self, IdError> {
        Uuid::parse_str(s.trim()).map(Self).map_err(|e| IdError {
            input: s.to_string(),
            reason: e.to_string(),
        })
    }
}

impl From<Uuid> for LicenseId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<LicenseId> for Uuid {
    fn from(id: LicenseId) -> Self {
        id.0
    }
}

impl fmt::Display for LicenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

impl FromStr for LicenseId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
