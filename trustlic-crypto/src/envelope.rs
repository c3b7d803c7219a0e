//! Enveloped signatures over canonical documents.
//!
//! Signing digests the canonical form of the document (which must not yet
//! carry a signature), signs the canonical `SignedInfo` block, and appends the
//! `Signature` element to the root. Verification strips that element, recomputes
//! the digest, and checks the signature with the inline key.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::document::{CanonicalBytes, Document};
use crate::error::{CodecError, CodecResult};
use crate::signing::{Signature, SigningKey, VerifyingKey};

/// RFC 8785 JSON Canonicalization Scheme.
pub const CANONICALIZATION_METHOD: &str = "urn:ietf:rfc:8785";

/// Signature algorithm identifier.
pub const SIGNATURE_METHOD: &str = "ed25519";

/// Digest algorithm identifier.
pub const DIGEST_METHOD: &str = "sha256";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SignatureElement {
    signed_info: SignedInfo,
    signature_value: String,
    key_info: KeyInfo,
}

/// The block the signature is computed over.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SignedInfo {
    canonicalization_method: String,
    signature_method: String,
    digest_method: String,
    digest_value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct KeyInfo {
    public_key: String,
}

/// Signs `document` and returns it with the signature element appended.
///
/// # Errors
///
/// Returns [`CodecError::AlreadySigned`] if the document already carries a
/// signature element; a document is signed exactly once.
pub fn sign_document(mut document: Document, key: &SigningKey) -> CodecResult<Document> {
    if document.is_signed() {
        return Err(CodecError::AlreadySigned);
    }

    let signed_info = SignedInfo {
        canonicalization_method: CANONICALIZATION_METHOD.to_string(),
        signature_method: SIGNATURE_METHOD.to_string(),
        digest_method: DIGEST_METHOD.to_string(),
        digest_value: BASE64.encode(content_digest(&document)?),
    };
    let signature = key.sign(CanonicalBytes::new(&signed_info)?.as_bytes());

    let element = SignatureElement {
        signed_info,
        signature_value: signature.to_base64(),
        key_info: KeyInfo {
            public_key: key.verifying_key().to_base64(),
        },
    };
    debug!(digest = %element.signed_info.digest_value, "Document signed");

    document.insert_signature(serde_json::to_value(&element)?);
    Ok(document)
}

/// Verifies the enveloped signature against its inline public key.
///
/// Returns `Ok(false)` on any cryptographic mismatch.
///
/// # Errors
///
/// Returns [`CodecError::MissingSignature`] if there is no signature element
/// and [`CodecError::MalformedSignature`] if it lacks required members.
pub fn verify_document(document: &Document) -> CodecResult<bool> {
    let element = signature_element(document)?;
    match VerifyingKey::from_base64(&element.key_info.public_key) {
        Ok(key) => check(document, &element, &key),
        Err(e) => {
            debug!(error = %e, "Embedded public key unusable");
            Ok(false)
        }
    }
}

/// Verifies the enveloped signature and requires the inline key to be `trusted`.
///
/// A document re-signed by anyone else carries a different inline key and is
/// rejected even though it is internally consistent.
pub fn verify_document_with_key(document: &Document, trusted: &VerifyingKey) -> CodecResult<bool> {
    let element = signature_element(document)?;
    match VerifyingKey::from_base64(&element.key_info.public_key) {
        Ok(key) if key == *trusted => check(document, &element, trusted),
        _ => {
            warn!("Embedded public key does not match the trusted issuer key");
            Ok(false)
        }
    }
}

/// Returns the public key embedded in a signed document.
pub fn embedded_key(document: &Document) -> CodecResult<VerifyingKey> {
    let element = signature_element(document)?;
    VerifyingKey::from_base64(&element.key_info.public_key)
}

fn signature_element(document: &Document) -> CodecResult<SignatureElement> {
    let value = document.signature().ok_or(CodecError::MissingSignature)?;
    serde_json::from_value(value.clone())
        .map_err(|e| CodecError::MalformedSignature(e.to_string()))
}

fn check(document: &Document, element: &SignatureElement, key: &VerifyingKey) -> CodecResult<bool> {
    let info = &element.signed_info;
    if info.canonicalization_method != CANONICALIZATION_METHOD
        || info.signature_method != SIGNATURE_METHOD
        || info.digest_method != DIGEST_METHOD
    {
        debug!(
            canonicalization = %info.canonicalization_method,
            signature = %info.signature_method,
            digest = %info.digest_method,
            "Unsupported signature algorithm"
        );
        return Ok(false);
    }

    let expected = content_digest(&document.without_signature())?;
    match BASE64.decode(&info.digest_value) {
        Ok(actual) if actual == expected => {}
        _ => {
            debug!("Document digest mismatch");
            return Ok(false);
        }
    }

    let signature = match Signature::from_base64(&element.signature_value) {
        Ok(signature) => signature,
        Err(e) => {
            debug!(error = %e, "Signature value unusable");
            return Ok(false);
        }
    };

    let signed = CanonicalBytes::new(info)?;
    Ok(key.verify(signed.as_bytes(), &signature))
}

fn content_digest(document: &Document) -> CodecResult<Vec<u8>> {
    let canonical = document.canonical_bytes()?;
    Ok(Sha256::digest(canonical.as_bytes()).to_vec())
}
