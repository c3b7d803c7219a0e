//! Core value types for trustlic.
//!
//! This crate defines the plain, crypto-agnostic values shared by the
//! signing layer and the license engine:
//! - License identifiers (UUID v4)
//! - Four-component module versions with optional build/revision fields

mod ids;
mod version;

pub use ids::{IdError, LicenseId};
pub use version::{ModuleVersion, VersionError, VersionResult};
