//! Canonical documents and enveloped signatures for trustlic.
//!
//! A license travels as a JSON object (the [`Document`]). Signing embeds a
//! `Signature` member directly under the root:
//!
//! ```text
//! "Signature": {
//!   "SignedInfo": {
//!     "CanonicalizationMethod": "urn:ietf:rfc:8785",
//!     "SignatureMethod": "ed25519",
//!     "DigestMethod": "sha256",
//!     "DigestValue": base64(sha256(canonical(root without Signature)))
//!   },
//!   "SignatureValue": base64(ed25519(canonical(SignedInfo))),
//!   "KeyInfo": { "PublicKey": base64(verifying key) }
//! }
//! ```
//!
//! The signature covers everything except itself (enveloped semantics) and
//! carries the public key inline so a document verifies without a key store.
//! Callers that pin an issuer key use [`verify_document_with_key`].

mod document;
mod envelope;
mod error;
mod signing;

pub use document::{CanonicalBytes, Document, SIGNATURE_ELEMENT};
pub use envelope::{
    embedded_key, sign_document, verify_document, verify_document_with_key,
    CANONICALIZATION_METHOD, DIGEST_METHOD, SIGNATURE_METHOD,
};
pub use error::{CodecError, CodecResult};
pub use signing::{KeyPair, Signature, SigningKey, VerifyingKey};
