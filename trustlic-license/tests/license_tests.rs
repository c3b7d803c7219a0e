mod common;

use chrono::{Duration, Utc};
use common::{sample_customer, sample_license, t0, test_signing_key, Customer};
use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};
use serde_json::json;
use trustlic_license::{
    Document, KeyPair, License, LicenseError, LicenseId, ModuleVersion,
};

// ── Construction ─────────────────────────────────────────────────

#[test]
fn create_assigns_random_id() {
    let a: License<Customer> = License::create().build();
    let b: License<Customer> = License::create().build();
    assert_ne!(a.id(), b.id());
}

#[test]
fn create_with_id_keeps_id() {
    let id = LicenseId::generate();
    let license: License<Customer> = License::create_with_id(id).build();
    assert_eq!(license.id(), id);
}

#[test]
fn unbuilt_fields_have_defaults() {
    let license: License<Customer> = License::create().build();
    assert_eq!(license.valid_from(), license.valid_until());
    assert_eq!(license.min_version(), ModuleVersion::default());
    assert_eq!(license.payload(), &Customer::default());
    assert!(!license.is_signed());
}

#[test]
fn display_renders_id() {
    let license = sample_license();
    assert_eq!(license.to_string(), license.id().to_string());
}

// ── Builder ──────────────────────────────────────────────────────

#[test]
fn validity_time_starts_now() {
    let before = Utc::now();
    let license: License<Customer> = License::create()
        .validity_time(Duration::days(20))
        .build();
    let after = Utc::now();

    assert!(license.valid_from() >= before && license.valid_from() <= after);
    assert_eq!(license.valid_until() - license.valid_from(), Duration::days(20));
}

#[test]
fn validity_time_from_measures_from_start() {
    let from = t0();
    assert!(from < Utc::now() - Duration::days(1));

    let license: License<Customer> = License::create()
        .validity_time_from(from, Duration::days(20))
        .build();

    assert_eq!(license.valid_from(), from);
    assert_eq!(license.valid_until(), from + Duration::days(20));
}

#[test]
fn validity_time_overloads_differ() {
    let from = t0();
    let relative: License<Customer> = License::create()
        .validity_time(Duration::days(20))
        .build();
    let anchored: License<Customer> = License::create()
        .validity_time_from(from, Duration::days(20))
        .build();
    assert_ne!(relative.valid_until(), anchored.valid_until());
}

#[test]
fn validity_time_between_allows_inverted_window() {
    let license: License<Customer> = License::create()
        .validity_time_between(t0() + Duration::days(1), t0())
        .build();
    assert!(license.valid_from() > license.valid_until());
}

#[test]
fn for_version_sets_both_bounds() {
    let v = ModuleVersion::new(1, 2);
    let license: License<Customer> = License::create().for_version(v).build();
    assert_eq!(license.min_version(), v);
    assert_eq!(license.max_version(), v);
}

#[test]
fn for_version_range_allows_inverted_range() {
    let license: License<Customer> = License::create()
        .for_version_range(ModuleVersion::new(3, 0), ModuleVersion::new(1, 0))
        .build();
    assert!(license.min_version() > license.max_version());
}

#[test]
fn assign_data_sets_payload() {
    let license = sample_license();
    assert_eq!(license.payload(), &sample_customer());
}

// ── Documents ────────────────────────────────────────────────────

#[test]
fn document_has_expected_members() {
    let license = sample_license();
    let doc = license.to_document().unwrap();

    assert_eq!(doc.get("UniqueIdentifier"), Some(&json!(license.id().to_string())));
    assert_eq!(doc.get("Validity"), Some(&json!("2026-01-01T00:00:00Z")));
    assert_eq!(doc.get("Expiry"), Some(&json!("2026-01-01T00:00:10Z")));
    assert_eq!(
        doc.get("MinimumVersion"),
        Some(&json!({"Major": 1, "Minor": 0, "Build": -1, "Revision": -1}))
    );
    assert_eq!(doc.get("DataObject").and_then(|d| d.get("seats")), Some(&json!(5)));
    assert!(!doc.is_signed());
}

#[test]
fn document_roundtrip_preserves_fields() {
    let license = sample_license();
    let restored: License<Customer> = License::from_document(license.to_document().unwrap()).unwrap();

    assert_eq!(restored.id(), license.id());
    assert_eq!(restored.valid_from(), license.valid_from());
    assert_eq!(restored.valid_until(), license.valid_until());
    assert_eq!(restored.min_version(), license.min_version());
    assert_eq!(restored.max_version(), license.max_version());
    assert_eq!(restored.payload(), license.payload());
}

#[test]
fn sub_second_timestamps_roundtrip() {
    let from = t0() + Duration::nanoseconds(123_456_789);
    let license: License<Customer> = License::create()
        .validity_time_from(from, Duration::milliseconds(1500))
        .build();
    let restored: License<Customer> =
        License::from_document(license.to_document().unwrap()).unwrap();
    assert_eq!(restored.valid_from(), from);
    assert_eq!(restored.valid_until(), license.valid_until());
}

#[test]
fn canonical_string_roundtrip() {
    let license = sample_license();
    let text = license.to_canonical_string().unwrap();
    let restored: License<Customer> = License::from_canonical_string(&text).unwrap();
    assert_eq!(restored.id(), license.id());
    assert_eq!(restored.payload(), license.payload());
}

#[test]
fn canonical_string_is_sorted_and_compact() {
    let text = sample_license().to_canonical_string().unwrap();
    assert!(text.starts_with("{\"DataObject\":{\"machine_id\":"));
    assert!(text.contains("\"Expiry\":\"2026-01-01T00:00:10Z\",\"MaximumVersion\":"));
    assert!(!text.contains('\n'));
}

#[test]
fn from_document_caches_document() {
    let doc = sample_license().to_document().unwrap();
    let restored: License<Customer> = License::from_document(doc.clone()).unwrap();
    assert_eq!(restored.cached_document(), Some(&doc));
}

#[test]
fn from_canonical_string_rejects_malformed_text() {
    let result: Result<License<Customer>, _> = License::from_canonical_string("{not json");
    assert!(matches!(result, Err(LicenseError::InvalidDocument(_))));

    let result: Result<License<Customer>, _> = License::from_canonical_string("[1, 2, 3]");
    assert!(matches!(result, Err(LicenseError::InvalidDocument(_))));
}

#[test]
fn from_document_rejects_missing_members() {
    let mut doc = sample_license().to_document().unwrap();
    doc.as_object_mut().remove("Expiry");
    let result: Result<License<Customer>, _> = License::from_document(doc);
    assert!(matches!(result, Err(LicenseError::Deserialization(_))));
}

#[test]
fn from_document_rejects_bad_version() {
    let mut doc = sample_license().to_document().unwrap();
    doc.as_object_mut()["MinimumVersion"]["Build"] = json!(-5);
    let result: Result<License<Customer>, _> = License::from_document(doc);
    assert!(matches!(result, Err(LicenseError::Deserialization(_))));
}

#[test]
fn from_document_rejects_incompatible_payload() {
    #[derive(Debug, Default, Serialize, Deserialize)]
    struct Other {
        serial: u64,
        tier: String,
    }

    let doc = sample_license().to_document().unwrap();
    let result: Result<License<Other>, _> = License::from_document(doc);
    assert!(matches!(result, Err(LicenseError::Deserialization(_))));
}

#[test]
fn from_document_does_not_coerce_payload_types() {
    let mut doc = sample_license().to_document().unwrap();
    doc.as_object_mut()["DataObject"]["seats"] = json!("5");
    let result: Result<License<Customer>, _> = License::from_document(doc);
    assert!(matches!(result, Err(LicenseError::Deserialization(_))));
}

#[test]
fn unit_payload_supported() {
    let license: License<()> = License::create()
        .validity_time(Duration::hours(1))
        .build();
    let restored: License<()> = License::from_document(license.to_document().unwrap()).unwrap();
    assert_eq!(restored.id(), license.id());
}

// ── Signing ──────────────────────────────────────────────────────

#[test]
fn sign_caches_document() {
    let mut license = sample_license();
    let signed = license.sign(&test_signing_key()).unwrap();
    assert!(signed.is_signed());
    assert!(license.is_signed());
    assert_eq!(license.cached_document(), Some(&signed));
}

#[test]
fn sign_returns_independent_copy() {
    let mut license = sample_license();
    let mut signed = license.sign(&test_signing_key()).unwrap();

    signed.as_object_mut()["DataObject"]["seats"] = json!(9000);

    let cached = license.cached_document().unwrap();
    assert_eq!(cached.get("DataObject").and_then(|d| d.get("seats")), Some(&json!(5)));
    assert!(license.validate_for_self().verify().unwrap());
}

#[test]
fn resign_replaces_cached_document() {
    let mut license = sample_license();
    let first = license.sign(&test_signing_key()).unwrap();
    let other = KeyPair::generate();
    let second = license.sign(&other.signing_key).unwrap();

    assert_ne!(first, second);
    assert_eq!(license.cached_document(), Some(&second));
}

#[test]
fn signed_document_roundtrip_preserves_signature() {
    let mut license = sample_license();
    let signed = license.sign(&test_signing_key()).unwrap();

    let restored: License<Customer> = License::from_document(signed.clone()).unwrap();
    let cached = restored.cached_document().unwrap();
    assert_eq!(cached.signature(), signed.signature());

    let regenerated = restored.to_document().unwrap();
    for (key, value) in regenerated.as_object() {
        assert_eq!(signed.get(key), Some(value));
    }
}

#[test]
fn signed_text_roundtrip_verifies() {
    let mut license = sample_license();
    let text = license.sign(&test_signing_key()).unwrap().to_pretty_string().unwrap();

    let doc: Document = text.parse().unwrap();
    let mut validator = License::<Customer>::validate_against(doc).unwrap();
    assert!(validator.verify().unwrap());
}

// ── Cached document quirk ────────────────────────────────────────

#[test]
fn edit_after_sign_keeps_stale_cached_document() {
    let mut license = sample_license();
    let signed = license.sign(&test_signing_key()).unwrap();

    let edited = license
        .edit()
        .for_version(ModuleVersion::new(9, 0))
        .build();

    // Field checks see the edit, the signature check still sees the old document.
    assert_eq!(edited.cached_document(), Some(&signed));
    let mut validator = edited.validate_for_self();
    validator.for_version(&ModuleVersion::new(9, 0)).unwrap();
    assert!(validator.verify().unwrap());

    let cached: License<Customer> =
        License::from_document(edited.cached_document().unwrap().clone()).unwrap();
    assert_eq!(cached.min_version(), ModuleVersion::new(1, 0));
}
