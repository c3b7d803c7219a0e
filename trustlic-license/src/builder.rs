use chrono::{DateTime, Duration, Utc};
use trustlic_types::ModuleVersion;

use crate::license::License;

/// Fluent builder over a single license.
///
/// Each setter consumes the builder and returns it; [`build`](Self::build)
/// hands back the license. No ordering checks are made on windows or ranges.
#[derive(Debug)]
#[must_use = "a builder does nothing until `build` is called"]
pub struct LicenseBuilder<T> {
    license: License<T>,
}

impl<T> LicenseBuilder<T> {
    pub(crate) fn new(license: License<T>) -> Self {
        Self { license }
    }

    /// Valid from now for `lifespan`.
    pub fn validity_time(self, lifespan: Duration) -> Self {
        let now = Utc::now();
        self.validity_time_between(now, offset(now, lifespan))
    }

    /// Valid from `from` for `lifespan`, measured from `from` rather than now.
    pub fn validity_time_from(self, from: DateTime<Utc>, lifespan: Duration) -> Self {
        self.validity_time_between(from, offset(from, lifespan))
    }

    /// Valid from `from` (inclusive) until `until` (exclusive).
    pub fn validity_time_between(mut self, from: DateTime<Utc>, until: DateTime<Utc>) -> Self {
        self.license.valid_from = from;
        self.license.valid_until = until;
        self
    }

    /// Licenses exactly one module version.
    pub fn for_version(self, version: ModuleVersion) -> Self {
        self.for_version_range(version, version)
    }

    /// Licenses the inclusive range `min..=max`.
    pub fn for_version_range(mut self, min: ModuleVersion, max: ModuleVersion) -> Self {
        self.license.min_version = min;
        self.license.max_version = max;
        self
    }

    /// Sets the payload.
    pub fn assign_data(mut self, payload: T) -> Self {
        self.license.payload = payload;
        self
    }

    /// Returns the built license.
    #[must_use]
    pub fn build(self) -> License<T> {
        self.license
    }
}

/// `from + lifespan`, saturating at the representable bounds.
fn offset(from: DateTime<Utc>, lifespan: Duration) -> DateTime<Utc> {
    from.checked_add_signed(lifespan).unwrap_or(if lifespan < Duration::zero() {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    })
}
