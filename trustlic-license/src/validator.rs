//! Validation chains.
//!
//! A chain starts with an accumulated result of `true`. Every step evaluates
//! its check, even after an earlier step failed, and ANDs the outcome into the
//! result. Payload predicates therefore always run exactly once per call.
//!
//! With raise-on-failure enabled, a step that leaves the accumulated result
//! false returns [`LicenseError::Validation`] with that step's fault. The
//! validator stays usable and keeps its failed result, so a caller that
//! catches the error and continues chaining gets one error per later step.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use trustlic_crypto::{verify_document, verify_document_with_key, VerifyingKey};
use trustlic_types::ModuleVersion;

use crate::config::ValidationOptions;
use crate::error::{LicenseError, LicenseResult};
use crate::fault::ValidationFault;
use crate::license::License;

/// Step name reported for payload predicates without an explicit name.
pub const GENERIC_STEP: &str = "Generic";

#[derive(Debug)]
enum Subject<'a, T> {
    Borrowed(&'a License<T>),
    Owned(License<T>),
}

/// A validation chain over one license and its signed document.
#[derive(Debug)]
pub struct LicenseValidator<'a, T> {
    subject: Subject<'a, T>,
    options: ValidationOptions,
    result: bool,
}

impl<'a, T> LicenseValidator<'a, T> {
    pub(crate) fn borrowed(license: &'a License<T>, options: ValidationOptions) -> Self {
        Self {
            subject: Subject::Borrowed(license),
            options,
            result: true,
        }
    }

    pub(crate) fn owned(license: License<T>, options: ValidationOptions) -> Self {
        Self {
            subject: Subject::Owned(license),
            options,
            result: true,
        }
    }

    /// Returns the license under validation.
    #[must_use]
    pub fn license(&self) -> &License<T> {
        match &self.subject {
            Subject::Borrowed(license) => *license,
            Subject::Owned(license) => license,
        }
    }

    /// Returns the options this chain runs with.
    #[must_use]
    pub fn options(&self) -> ValidationOptions {
        self.options
    }

    /// Checks that the license is valid now.
    pub fn for_validity_time(&mut self) -> LicenseResult<&mut Self> {
        self.for_validity_time_at(Utc::now())
    }

    /// Checks `valid_from <= at < valid_until`.
    pub fn for_validity_time_at(&mut self, at: DateTime<Utc>) -> LicenseResult<&mut Self> {
        let license = self.license();
        let passed = license.valid_from <= at && license.valid_until > at;
        self.accumulate(
            passed,
            ValidationFault::Expired,
            "validity_time",
            "the license is expired or not yet valid",
        )
    }

    /// Checks `min_version <= version <= max_version`.
    pub fn for_version(&mut self, version: &ModuleVersion) -> LicenseResult<&mut Self> {
        let license = self.license();
        let passed = license.min_version <= *version && license.max_version >= *version;
        self.accumulate(
            passed,
            ValidationFault::IncorrectVersion,
            "version",
            "the license was not issued for this release",
        )
    }

    /// Checks a predicate over the payload under the generic step name.
    pub fn for_payload<F>(&mut self, predicate: F) -> LicenseResult<&mut Self>
    where
        F: FnOnce(&T) -> bool,
    {
        self.for_payload_step(GENERIC_STEP, predicate)
    }

    /// Checks a named predicate over the payload.
    pub fn for_payload_step<F>(&mut self, step: &str, predicate: F) -> LicenseResult<&mut Self>
    where
        F: FnOnce(&T) -> bool,
    {
        let passed = predicate(self.license().payload());
        self.accumulate(
            passed,
            ValidationFault::Generic,
            step,
            &format!(
                "the license was invalidated by generic validation (validation step: '{step}')"
            ),
        )
    }

    /// Returns the accumulated result without checking the signature.
    #[must_use]
    pub fn result(&self) -> bool {
        self.result
    }

    /// Verifies the signed document against its embedded key and returns the
    /// final accumulated result.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::NotSigned`] if the license has no cached
    /// document and [`LicenseError::Codec`] if the document has no usable
    /// signature element. These propagate regardless of options.
    pub fn verify(&mut self) -> LicenseResult<bool> {
        let document = self
            .license()
            .cached_document()
            .ok_or(LicenseError::NotSigned)?;
        let passed = verify_document(document)?;
        self.finish_signature(passed)
    }

    /// Like [`verify`](Self::verify), additionally requiring the document to
    /// be signed by `issuer`.
    pub fn verify_with_key(&mut self, issuer: &VerifyingKey) -> LicenseResult<bool> {
        let document = self
            .license()
            .cached_document()
            .ok_or(LicenseError::NotSigned)?;
        let passed = verify_document_with_key(document, issuer)?;
        self.finish_signature(passed)
    }

    /// Consumes the chain and returns the license.
    pub fn into_license(self) -> License<T>
    where
        T: Clone,
    {
        match self.subject {
            Subject::Borrowed(license) => license.clone(),
            Subject::Owned(license) => license,
        }
    }

    fn finish_signature(&mut self, passed: bool) -> LicenseResult<bool> {
        self.accumulate(
            passed,
            ValidationFault::InvalidSignature,
            "signature",
            "the license does not have a valid signature",
        )?;
        Ok(self.result)
    }

    fn accumulate(
        &mut self,
        passed: bool,
        fault: ValidationFault,
        step: &str,
        reason: &str,
    ) -> LicenseResult<&mut Self> {
        self.result &= passed;
        let license_id = self.license().id();

        if !passed {
            debug!(license_id = %license_id, step, %fault, "Validation step failed");
        }

        if self.options.raise_on_failure && !self.result {
            warn!(license_id = %license_id, step, %fault, "License rejected");
            return Err(LicenseError::Validation {
                fault,
                message: reason.to_string(),
            });
        }
        Ok(self)
    }
}
