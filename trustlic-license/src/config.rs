//! Validation configuration.
//!
//! Options are threaded into each validator rather than held in process-wide
//! state, so two chains in one process can run with different strictness.
//! The struct deserializes from a host application's config file with every
//! field optional.

use serde::{Deserialize, Serialize};

/// Options applied to a validation chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationOptions {
    /// Return [`LicenseError::Validation`](crate::LicenseError::Validation)
    /// from the first step that leaves the chain failed, instead of only
    /// recording the failure. Off by default.
    pub raise_on_failure: bool,
}

impl ValidationOptions {
    /// Options with raise-on-failure enabled.
    #[must_use]
    pub const fn raising() -> Self {
        Self {
            raise_on_failure: true,
        }
    }

    /// Sets raise-on-failure.
    #[must_use]
    pub const fn with_raise_on_failure(mut self, raise: bool) -> Self {
        self.raise_on_failure = raise;
        self
    }
}
