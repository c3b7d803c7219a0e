use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a validation step rejected a license.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValidationFault {
    /// A caller-supplied payload predicate failed.
    Generic,
    /// The embedded signature does not verify.
    InvalidSignature,
    /// The check time is outside the validity window.
    Expired,
    /// The module version is outside the licensed range.
    IncorrectVersion,
}

impl fmt::Display for ValidationFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Generic => "Generic",
            Self::InvalidSignature => "InvalidSignature",
            Self::Expired => "Expired",
            Self::IncorrectVersion => "IncorrectVersion",
        };
        f.write_str(name)
    }
}
