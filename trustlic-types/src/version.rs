//! Four-component module versions.
//!
//! A version is `major.minor[.build[.revision]]`. Build and revision are
//! optional; an absent component orders before any present one, so
//! `1.2 < 1.2.0 < 1.2.1`.
//!
//! On the wire the optional components use the sentinel `-1` for "absent",
//! matching the document format licenses are signed in.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Wire value for an absent build or revision component.
const ABSENT: i64 = -1;

/// Errors produced while parsing or formatting versions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    /// Malformed version string (wrong field count or non-numeric field).
    #[error("invalid version format: {0}")]
    Format(String),

    /// Negative component or an impossible field-count request.
    #[error("version component out of range: {0}")]
    Range(String),
}

/// Result type for version operations.
pub type VersionResult<T> = Result<T, VersionError>;

/// A module version `major.minor[.build[.revision]]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "VersionRepr", into = "VersionRepr")]
pub struct ModuleVersion {
    major: u32,
    minor: u32,
    build: Option<u32>,
    revision: Option<u32>,
}

impl ModuleVersion {
    /// Creates a two-component version.
    #[must_use]
    pub const fn new(major: u32, minor: u32) -> Self {
        Self {
            major,
            minor,
            build: None,
            revision: None,
        }
    }

    /// Creates a three-component version.
    #[must_use]
    pub const fn with_build(major: u32, minor: u32, build: u32) -> Self {
        Self {
            major,
            minor,
            build: Some(build),
            revision: None,
        }
    }

    /// Creates a four-component version.
    #[must_use]
    pub const fn with_revision(major: u32, minor: u32, build: u32, revision: u32) -> Self {
        Self {
            major,
            minor,
            build: Some(build),
            revision: Some(revision),
        }
    }

    /// Parses `major.minor[.build[.revision]]`.
    ///
    /// # Errors
    ///
    /// Returns [`VersionError::Format`] if the string does not have 2 to 4
    /// fields or a field is not a number, and [`VersionError::Range`] if a
    /// field is negative or exceeds `u32::MAX`.
    pub fn parse(s: &str) -> VersionResult<Self> {
        let parts: Vec<&str> = s.split('.').collect();
        if !(2..=4).contains(&parts.len()) {
            return Err(VersionError::Format(format!(
                "expected 2 to 4 dot-separated fields in '{s}', found {}",
                parts.len()
            )));
        }

        Ok(Self {
            major: parse_component(parts[0], "major")?,
            minor: parse_component(parts[1], "minor")?,
            build: parts
                .get(2)
                .map(|p| parse_component(p, "build"))
                .transpose()?,
            revision: parts
                .get(3)
                .map(|p| parse_component(p, "revision"))
                .transpose()?,
        })
    }

    /// Lenient parse that never fails loudly.
    ///
    /// Succeeds when the field count is valid and both major and minor are
    /// non-negative numbers. A build or revision field that does not parse is
    /// left absent while the remaining fields are still populated, so
    /// `"1.2.x.4"` yields `1.2` with revision `4` and no build.
    #[must_use]
    pub fn try_parse(s: &str) -> Option<Self> {
        let parts: Vec<&str> = s.split('.').collect();
        if !(2..=4).contains(&parts.len()) {
            return None;
        }

        let major = parse_component(parts[0], "major").ok()?;
        let minor = parse_component(parts[1], "minor").ok()?;
        let lenient = |idx: usize, name: &str| {
            parts
                .get(idx)
                .and_then(|p| parse_component(p, name).ok())
        };

        Some(Self {
            major,
            minor,
            build: lenient(2, "build"),
            revision: lenient(3, "revision"),
        })
    }

    /// Returns the major component.
    #[must_use]
    pub const fn major(&self) -> u32 {
        self.major
    }

    /// Returns the minor component.
    #[must_use]
    pub const fn minor(&self) -> u32 {
        self.minor
    }

    /// Returns the build component, if present.
    #[must_use]
    pub const fn build(&self) -> Option<u32> {
        self.build
    }

    /// Returns the revision component, if present.
    #[must_use]
    pub const fn revision(&self) -> Option<u32> {
        self.revision
    }

    /// Number of leading fields that are populated (2, 3 or 4).
    #[must_use]
    pub const fn field_count(&self) -> usize {
        match (self.build, self.revision) {
            (None, _) => 2,
            (Some(_), None) => 3,
            (Some(_), Some(_)) => 4,
        }
    }

    /// Formats exactly `field_count` dot-joined fields.
    ///
    /// `0` yields the empty string.
    ///
    /// # Errors
    ///
    /// Returns [`VersionError::Range`] if `field_count` is greater than 4 or
    /// requests a component that is absent.
    pub fn to_string_with(&self, field_count: usize) -> VersionResult<String> {
        if field_count > 4 {
            return Err(VersionError::Range(format!(
                "field count {field_count} is outside 0..=4"
            )));
        }
        if field_count > self.field_count() {
            return Err(VersionError::Range(format!(
                "field count {field_count} requested but only {} fields are present",
                self.field_count()
            )));
        }

        let fields = [
            Some(self.major),
            Some(self.minor),
            self.build,
            self.revision,
        ];
        Ok(fields[..field_count]
            .iter()
            .flatten()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join("."))
    }
}

fn parse_component(field: &str, name: &str) -> VersionResult<u32> {
    let value: i64 = field.parse().map_err(|_| {
        VersionError::Format(format!("{name} component '{field}' is not a number"))
    })?;
    u32::try_from(value)
        .map_err(|_| VersionError::Range(format!("{name} component {value} is out of range")))
}

impl PartialOrd for ModuleVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ModuleVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        // `None < Some(_)` gives "absent sorts before 0".
        self.major
            .cmp(&other.major)
            .then_with(|| self.minor.cmp(&other.minor))
            .then_with(|| self.build.cmp(&other.build))
            .then_with(|| self.revision.cmp(&other.revision))
    }
}

impl fmt::Display for ModuleVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)?;
        if let Some(build) = self.build {
            write!(f, ".{build}")?;
            if let Some(revision) = self.revision {
                write!(f, ".{revision}")?;
            }
        }
        Ok(())
    }
}

impl FromStr for ModuleVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Document representation with sentinel-encoded optional components.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct VersionRepr {
    major: u32,
    minor: u32,
    build: i64,
    revision: i64,
}

impl From<ModuleVersion> for VersionRepr {
    fn from(v: ModuleVersion) -> Self {
        Self {
            major: v.major,
            minor: v.minor,
            build: v.build.map_or(ABSENT, i64::from),
            revision: v.revision.map_or(ABSENT, i64::from),
        }
    }
}

impl TryFrom<VersionRepr> for ModuleVersion {
    type Error = VersionError;

    fn try_from(repr: VersionRepr) -> Result<Self, Self::Error> {
        let optional = |value: i64, name: &str| -> VersionResult<Option<u32>> {
            if value == ABSENT {
                return Ok(None);
            }
            u32::try_from(value).map(Some).map_err(|_| {
                VersionError::Range(format!("{name} component {value} is out of range"))
            })
        };

        Ok(Self {
            major: repr.major,
            minor: repr.minor,
            build: optional(repr.build, "build")?,
            revision: optional(repr.revision, "revision")?,
        })
    }
}
