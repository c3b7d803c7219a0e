//! The license record and its document form.
//!
//! Documents use PascalCase members:
//!
//! ```text
//! {
//!   "UniqueIdentifier": "…uuid…",
//!   "Validity": "2026-01-01T00:00:00Z",
//!   "Expiry": "2027-01-01T00:00:00Z",
//!   "MinimumVersion": {"Major": 1, "Minor": 0, "Build": -1, "Revision": -1},
//!   "MaximumVersion": {"Major": 2, "Minor": 0, "Build": -1, "Revision": -1},
//!   "DataObject": …payload…,
//!   "Signature": { … }            // after signing
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;
use trustlic_crypto::{sign_document, Document, SigningKey};
use trustlic_types::{LicenseId, ModuleVersion};

use crate::builder::LicenseBuilder;
use crate::config::ValidationOptions;
use crate::error::{LicenseError, LicenseResult};
use crate::validator::LicenseValidator;

/// A license bound to a validity window, a module version range and a payload.
///
/// The window and range are not checked for ordering; an inverted window or
/// range simply never validates.
#[derive(Debug, Clone)]
pub struct License<T> {
    pub(crate) id: LicenseId,
    pub(crate) valid_from: DateTime<Utc>,
    pub(crate) valid_until: DateTime<Utc>,
    pub(crate) min_version: ModuleVersion,
    pub(crate) max_version: ModuleVersion,
    pub(crate) payload: T,
    /// Signed document last produced by `sign` or last loaded. Never merged,
    /// only replaced, and not refreshed by later edits.
    pub(crate) cached_document: Option<Document>,
}

/// Serialized view of a license.
#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct LicenseFieldsRef<'a, T> {
    unique_identifier: LicenseId,
    validity: DateTime<Utc>,
    expiry: DateTime<Utc>,
    minimum_version: ModuleVersion,
    maximum_version: ModuleVersion,
    data_object: &'a T,
}

/// Deserialized license fields; unknown members such as `Signature` are ignored.
#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct LicenseFields<T> {
    unique_identifier: LicenseId,
    validity: DateTime<Utc>,
    expiry: DateTime<Utc>,
    minimum_version: ModuleVersion,
    maximum_version: ModuleVersion,
    data_object: T,
}

impl<T: Default> License<T> {
    /// Starts building a license with a fresh random identifier.
    #[must_use]
    pub fn create() -> LicenseBuilder<T> {
        Self::create_with_id(LicenseId::generate())
    }

    /// Starts building a license with a caller-supplied identifier.
    #[must_use]
    pub fn create_with_id(id: LicenseId) -> LicenseBuilder<T> {
        LicenseBuilder::new(Self::empty(id))
    }

    fn empty(id: LicenseId) -> Self {
        Self {
            id,
            valid_from: DateTime::<Utc>::default(),
            valid_until: DateTime::<Utc>::default(),
            min_version: ModuleVersion::default(),
            max_version: ModuleVersion::default(),
            payload: T::default(),
            cached_document: None,
        }
    }
}

impl<T> License<T> {
    /// Returns the unique identifier.
    #[must_use]
    pub fn id(&self) -> LicenseId {
        self.id
    }

    /// Returns the first instant the license is valid (inclusive).
    #[must_use]
    pub fn valid_from(&self) -> DateTime<Utc> {
        self.valid_from
    }

    /// Returns the instant the license stops being valid (exclusive).
    #[must_use]
    pub fn valid_until(&self) -> DateTime<Utc> {
        self.valid_until
    }

    /// Returns the lowest licensed module version (inclusive).
    #[must_use]
    pub fn min_version(&self) -> ModuleVersion {
        self.min_version
    }

    /// Returns the highest licensed module version (inclusive).
    #[must_use]
    pub fn max_version(&self) -> ModuleVersion {
        self.max_version
    }

    /// Returns the payload.
    #[must_use]
    pub fn payload(&self) -> &T {
        &self.payload
    }

    /// Returns the cached signed document, if any.
    #[must_use]
    pub fn cached_document(&self) -> Option<&Document> {
        self.cached_document.as_ref()
    }

    /// Returns true if a signed document is cached on this license.
    #[must_use]
    pub fn is_signed(&self) -> bool {
        self.cached_document.is_some()
    }

    /// Reopens a builder over this license.
    ///
    /// The cached document is kept as-is: after editing, `validate_for_self`
    /// checks the edited fields but verifies the previously signed document.
    /// Sign again to refresh it.
    #[must_use]
    pub fn edit(self) -> LicenseBuilder<T> {
        LicenseBuilder::new(self)
    }

    /// Starts a validation chain over this license and its cached document.
    #[must_use]
    pub fn validate_for_self(&self) -> LicenseValidator<'_, T> {
        self.validate_for_self_with(ValidationOptions::default())
    }

    /// Like [`validate_for_self`](Self::validate_for_self) with explicit options.
    #[must_use]
    pub fn validate_for_self_with(&self, options: ValidationOptions) -> LicenseValidator<'_, T> {
        LicenseValidator::borrowed(self, options)
    }
}

impl<T: Serialize> License<T> {
    /// Converts the license into an unsigned document.
    pub fn to_document(&self) -> LicenseResult<Document> {
        let fields = LicenseFieldsRef {
            unique_identifier: self.id,
            validity: self.valid_from,
            expiry: self.valid_until,
            minimum_version: self.min_version,
            maximum_version: self.max_version,
            data_object: &self.payload,
        };
        Ok(Document::from_serializable(&fields)?)
    }

    /// Canonical (RFC 8785) text of the unsigned document.
    pub fn to_canonical_string(&self) -> LicenseResult<String> {
        Ok(self.to_document()?.to_canonical_string()?)
    }

    /// Signs the license, caches the signed document and returns a copy of it.
    ///
    /// The returned document is independent of the cached one.
    pub fn sign(&mut self, key: &SigningKey) -> LicenseResult<Document> {
        let signed = sign_document(self.to_document()?, key)?;
        debug!(license_id = %self.id, "License signed");
        self.cached_document = Some(signed.clone());
        Ok(signed)
    }
}

impl<T: DeserializeOwned> License<T> {
    /// Reconstructs a license from a document and caches the document on it.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::Deserialization`] if a member is missing or the
    /// payload does not match `T`.
    pub fn from_document(document: Document) -> LicenseResult<Self> {
        let fields: LicenseFields<T> =
            serde_json::from_value(serde_json::Value::Object(document.as_object().clone()))?;
        debug!(
            license_id = %fields.unique_identifier,
            signed = document.is_signed(),
            "License loaded from document"
        );

        Ok(Self {
            id: fields.unique_identifier,
            valid_from: fields.validity,
            valid_until: fields.expiry,
            min_version: fields.minimum_version,
            max_version: fields.maximum_version,
            payload: fields.data_object,
            cached_document: Some(document),
        })
    }

    /// Parses document text and reconstructs the license from it.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::InvalidDocument`] if the text is not a JSON
    /// object, otherwise as [`from_document`](Self::from_document).
    pub fn from_canonical_string(s: &str) -> LicenseResult<Self> {
        let document = s
            .parse::<Document>()
            .map_err(|e| LicenseError::InvalidDocument(e.to_string()))?;
        Self::from_document(document)
    }

    /// Reconstructs a license from a received document and starts a
    /// validation chain that owns it.
    ///
    /// The license is reachable through [`LicenseValidator::license`] and
    /// [`LicenseValidator::into_license`].
    pub fn validate_against<'a>(document: Document) -> LicenseResult<LicenseValidator<'a, T>>
    where
        T: 'a,
    {
        Self::validate_against_with(document, ValidationOptions::default())
    }

    /// Like [`validate_against`](Self::validate_against) with explicit options.
    pub fn validate_against_with<'a>(
        document: Document,
        options: ValidationOptions,
    ) -> LicenseResult<LicenseValidator<'a, T>>
    where
        T: 'a,
    {
        Ok(LicenseValidator::owned(Self::from_document(document)?, options))
    }
}

impl<T> fmt::Display for License<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}
