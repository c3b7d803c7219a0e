//! Shared test helpers for license tests.

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use trustlic_license::{License, MachineId, ModuleVersion, SigningKey};

/// Payload used across the license tests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    pub machine_id: Option<MachineId>,
    pub seats: u32,
}

/// Returns a deterministic signing key from a fixed seed.
pub fn test_signing_key() -> SigningKey {
    let seed: [u8; 32] = [
        1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24,
        25, 26, 27, 28, 29, 30, 31, 32,
    ];
    SigningKey::from_bytes(&seed)
}

/// Fixed machine identity for binding tests.
pub fn test_machine_id() -> MachineId {
    MachineId::parse("6f1c2d3e4f5a4b6c8d7e9f0a1b2c3d4e").unwrap()
}

/// 2026-01-01T00:00:00Z
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
}

pub fn sample_customer() -> Customer {
    Customer {
        name: "Testkunde Deutschland GmbH".to_string(),
        machine_id: Some(test_machine_id()),
        seats: 5,
    }
}

/// License valid for `[t0, t0 + 10s)` and versions `1.0..=2.0`.
pub fn sample_license() -> License<Customer> {
    License::create()
        .validity_time_from(t0(), Duration::seconds(10))
        .for_version_range(ModuleVersion::new(1, 0), ModuleVersion::new(2, 0))
        .assign_data(sample_customer())
        .build()
}

/// Installs a test subscriber honoring `RUST_LOG`; safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
