//! License documents and their canonical byte form.
//!
//! A [`Document`] is a JSON object. Its canonical form is RFC 8785 (JCS):
//! sorted keys, compact separators, deterministic number formatting. Digests
//! and signatures are only ever computed over [`CanonicalBytes`], so member
//! order and whitespace in transit do not affect verification.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::{CodecError, CodecResult};

/// Name of the root member holding the enveloped signature.
pub const SIGNATURE_ELEMENT: &str = "Signature";

/// Bytes produced exclusively by JCS canonicalization.
///
/// The inner buffer is private; the only constructor is [`CanonicalBytes::new`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Canonicalizes any serializable value.
    pub fn new(value: &impl Serialize) -> CodecResult<Self> {
        let s = serde_jcs::to_string(value)
            .map_err(|e| CodecError::Canonicalization(e.to_string()))?;
        Ok(Self(s.into_bytes()))
    }

    /// Access the canonical bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the length of the canonical byte sequence.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the canonical byte sequence is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// A license document: a JSON object root, optionally carrying a signature.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Map<String, Value>);

impl Document {
    /// Wraps a JSON value, which must be an object.
    pub fn from_value(value: Value) -> CodecResult<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(CodecError::NotAnObject),
        }
    }

    /// Serializes a value into a document.
    pub fn from_serializable(value: &impl Serialize) -> CodecResult<Self> {
        Self::from_value(serde_json::to_value(value)?)
    }

    /// Returns the root object.
    #[must_use]
    pub fn as_object(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Returns the root object for in-place edits.
    pub fn as_object_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.0
    }

    /// Returns a root member.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Converts the document back into a JSON value.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Returns the embedded signature element, if any.
    #[must_use]
    pub fn signature(&self) -> Option<&Value> {
        self.0.get(SIGNATURE_ELEMENT)
    }

    /// Returns true if the document carries a signature element.
    #[must_use]
    pub fn is_signed(&self) -> bool {
        self.0.contains_key(SIGNATURE_ELEMENT)
    }

    /// Canonical bytes of the whole document, signature included.
    pub fn canonical_bytes(&self) -> CodecResult<CanonicalBytes> {
        CanonicalBytes::new(&self.0)
    }

    /// Canonical text of the whole document.
    pub fn to_canonical_string(&self) -> CodecResult<String> {
        let bytes = self.canonical_bytes()?;
        String::from_utf8(bytes.0).map_err(|e| CodecError::Canonicalization(e.to_string()))
    }

    /// Compact JSON text, member order preserved as stored.
    #[must_use]
    pub fn to_json_string(&self) -> String {
        self.to_string()
    }

    /// Indented JSON text for humans.
    pub fn to_pretty_string(&self) -> CodecResult<String> {
        Ok(serde_json::to_string_pretty(&self.0)?)
    }

    /// The signed content: a copy of the document minus its signature element.
    pub(crate) fn without_signature(&self) -> Self {
        let mut map = self.0.clone();
        map.remove(SIGNATURE_ELEMENT);
        Self(map)
    }

    pub(crate) fn insert_signature(&mut self, element: Value) {
        self.0.insert(SIGNATURE_ELEMENT.to_string(), element);
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `Value`'s Display is compact JSON and cannot fail.
        write!(f, "{}", Value::Object(self.0.clone()))
    }
}

impl FromStr for Document {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_value(serde_json::from_str(s)?)
    }
}

impl TryFrom<Value> for Document {
    type Error = CodecError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

impl From<Document> for Value {
    fn from(doc: Document) -> Self {
        doc.into_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn canonical_bytes_sort_keys() {
        let doc = Document::from_value(json!({"b": 2, "a": 1, "c": "hello"})).unwrap();
        assert_eq!(doc.to_canonical_string().unwrap(), r#"{"a":1,"b":2,"c":"hello"}"#);
    }

    #[test]
    fn canonical_bytes_nested() {
        let doc = Document::from_value(json!({"outer": {"b": 2, "a": 1}, "list": [3, 2, 1]}))
            .unwrap();
        assert_eq!(
            doc.to_canonical_string().unwrap(),
            r#"{"list":[3,2,1],"outer":{"a":1,"b":2}}"#
        );
    }

    #[test]
    fn non_object_rejected() {
        assert!(matches!(
            Document::from_value(json!([1, 2])),
            Err(CodecError::NotAnObject)
        ));
        assert!(matches!(
            "\"text\"".parse::<Document>(),
            Err(CodecError::NotAnObject)
        ));
    }

    #[test]
    fn without_signature_leaves_original_intact() {
        let doc = Document::from_value(json!({"a": 1, "Signature": {"x": 1}})).unwrap();
        let stripped = doc.without_signature();
        assert!(doc.is_signed());
        assert!(!stripped.is_signed());
        assert_eq!(stripped.get("a"), Some(&json!(1)));
    }
}
