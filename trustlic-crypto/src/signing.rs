//! Ed25519 keys and raw signatures.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use ed25519_dalek::{
    Signature as DalekSignature, Signer as _, SigningKey as DalekSigningKey, Verifier as _,
    VerifyingKey as DalekVerifyingKey,
};
use rand::rngs::OsRng;
use std::fmt;

use crate::error::{CodecError, CodecResult};

/// Ed25519 signing key (secret). Used by issuers to sign license documents.
#[derive(Clone)]
pub struct SigningKey(DalekSigningKey);

/// Ed25519 verifying key (public). Embedded in every signed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifyingKey(DalekVerifyingKey);

/// Ed25519 signature bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature(DalekSignature);

/// A keypair for signing and verification.
#[derive(Debug, Clone)]
pub struct KeyPair {
    pub signing_key: SigningKey,
    pub verifying_key: VerifyingKey,
}

impl KeyPair {
    /// Generates a new random Ed25519 keypair.
    #[must_use]
    pub fn generate() -> Self {
        Self::from_signing_key(SigningKey(DalekSigningKey::generate(&mut OsRng)))
    }

    /// Builds a keypair around an existing signing key.
    #[must_use]
    pub fn from_signing_key(signing_key: SigningKey) -> Self {
        let verifying_key = signing_key.verifying_key();
        Self {
            signing_key,
            verifying_key,
        }
    }
}

impl SigningKey {
    /// Creates a signing key from raw 32-byte secret.
    #[must_use]
    pub fn from_bytes(bytes: &[u8; 32]) -> Self {
        Self(DalekSigningKey::from_bytes(bytes))
    }

    /// Returns the raw 32-byte secret key.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.to_bytes()
    }

    /// Signs a message and returns the signature.
    #[must_use]
    pub fn sign(&self, message: &[u8]) -> Signature {
        Signature(self.0.sign(message))
    }

    /// Returns the corresponding verifying key.
    #[must_use]
    pub fn verifying_key(&self) -> VerifyingKey {
        VerifyingKey(self.0.verifying_key())
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SigningKey(<private>)")
    }
}

impl VerifyingKey {
    /// Creates a verifying key from raw 32-byte public key.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MalformedSignature`] if the bytes are not a
    /// valid curve point.
    pub fn from_bytes(bytes: &[u8; 32]) -> CodecResult<Self> {
        DalekVerifyingKey::from_bytes(bytes)
            .map(Self)
            .map_err(|_| CodecError::MalformedSignature("invalid public key".to_string()))
    }

    /// Returns the raw 32-byte public key.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.to_bytes()
    }

    /// Decodes a standard base64 public key as embedded in `KeyInfo`.
    pub fn from_base64(encoded: &str) -> CodecResult<Self> {
        let bytes = BASE64
            .decode(encoded)
            .map_err(|e| CodecError::MalformedSignature(format!("invalid public key base64: {e}")))?;
        let array: [u8; 32] = bytes.as_slice().try_into().map_err(|_| {
            CodecError::MalformedSignature(format!(
                "public key must be 32 bytes, got {}",
                bytes.len()
            ))
        })?;
        Self::from_bytes(&array)
    }

    /// Encodes the public key as standard base64.
    #[must_use]
    pub fn to_base64(&self) -> String {
        BASE64.encode(self.to_bytes())
    }

    /// Returns true if `signature` is valid for `message` under this key.
    #[must_use]
    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        self.0.verify(message, &signature.0).is_ok()
    }
}

impl Signature {
    /// Creates a signature from raw 64-byte value.
    #[must_use]
    pub fn from_bytes(bytes: &[u8; 64]) -> Self {
        Self(DalekSignature::from_bytes(bytes))
    }

    /// Returns the raw 64-byte signature.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; 64] {
        self.0.to_bytes()
    }

    /// Decodes a standard base64 signature as embedded in `SignatureValue`.
    pub fn from_base64(encoded: &str) -> CodecResult<Self> {
        let bytes = BASE64
            .decode(encoded)
            .map_err(|e| CodecError::MalformedSignature(format!("invalid signature base64: {e}")))?;
        DalekSignature::from_slice(&bytes)
            .map(Self)
            .map_err(|_| CodecError::MalformedSignature("invalid signature length".to_string()))
    }

    /// Encodes the signature as standard base64.
    #[must_use]
    pub fn to_base64(&self) -> String {
        BASE64.encode(self.to_bytes())
    }
}
