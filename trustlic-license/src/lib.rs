//! License records, signing and validation for trustlic.
//!
//! This module handles:
//! - Fluent construction of licenses bound to a validity window, a module
//!   version range and a caller-defined payload
//! - Signing licenses into self-verifying documents
//! - Reconstructing licenses from received documents
//! - Chained validation against time, version, payload predicates and the
//!   embedded signature
//! - Machine identity probes for binding a payload to a host
//!
//! # Lifecycle
//!
//! ```text
//! License::create() -> LicenseBuilder -> License<T> -> sign() -> Document
//!                                                                  |
//!        bool <- LicenseValidator <- License::validate_against() <-+
//! ```
//!
//! # Validation chains
//!
//! Every check runs and AND-accumulates into one result; a failed check never
//! skips later ones. With [`ValidationOptions::raise_on_failure`] a check that
//! leaves the result false returns [`LicenseError::Validation`] carrying a
//! [`ValidationFault`] instead.

mod builder;
mod config;
mod device;
mod error;
mod fault;
mod license;
mod validator;

pub use builder::LicenseBuilder;
pub use config::ValidationOptions;
pub use device::{DeviceInfo, MachineId};
pub use error::{IdentityError, LicenseError, LicenseResult};
pub use fault::ValidationFault;
pub use license::License;
pub use validator::{LicenseValidator, GENERIC_STEP};

pub use trustlic_crypto::{Document, KeyPair, SigningKey, VerifyingKey};
pub use trustlic_types::{IdError, LicenseId, ModuleVersion, VersionError};
