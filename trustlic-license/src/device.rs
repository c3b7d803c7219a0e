//! Host identity probes for binding a license payload to a machine.
//!
//! [`MachineId`] reads the identifier the OS provisions for this installation.
//! [`DeviceInfo`] is a coarse inventory (machine ID, OS and version, host name,
//! architecture) that issuers can embed in a payload for display or soft checks.

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;
use tracing::debug;
use uuid::Uuid;

use crate::error::IdentityError;

/// The machine identifier provisioned by the host OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MachineId(Uuid);

impl MachineId {
    /// Reads the identifier of the current machine.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::NotFound`] if the host has no provisioned
    /// identifier (or the platform has no probe), and
    /// [`IdentityError::InvalidData`] if the identifier is not a UUID.
    pub fn current() -> Result<Self, IdentityError> {
        let raw = probe_machine_id().ok_or_else(|| {
            IdentityError::NotFound(format!("no machine identifier on {}", env::consts::OS))
        })?;
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(IdentityError::NotFound(
                "machine identifier is empty".to_string(),
            ));
        }
        Self::parse(raw)
    }

    /// Parses a machine identifier in hyphenated or simple (32 hex digit) form.
    pub fn parse(s: &str) -> Result<Self, IdentityError> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|e| IdentityError::InvalidData(format!("'{s}': {e}")))
    }

    /// Creates a machine ID from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for MachineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MachineId {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Coarse inventory of the host, suitable for embedding in a payload.
///
/// Probes that fail leave their field empty rather than failing the whole
/// collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeviceInfo {
    pub machine_id: Option<MachineId>,
    /// `std::env::consts::OS`, e.g. `linux`.
    pub os: String,
    pub os_version: Option<String>,
    pub host_name: Option<String>,
    /// `std::env::consts::ARCH`, e.g. `x86_64`.
    pub arch: String,
}

impl DeviceInfo {
    /// Probes the current host.
    #[must_use]
    pub fn collect() -> Self {
        let info = Self {
            machine_id: MachineId::current().ok(),
            os: env::consts::OS.to_string(),
            os_version: probe_os_version(),
            host_name: hostname::get()
                .ok()
                .and_then(|h| h.into_string().ok())
                .filter(|h| !h.is_empty()),
            arch: env::consts::ARCH.to_string(),
        };
        debug!(
            os = %info.os,
            arch = %info.arch,
            has_machine_id = info.machine_id.is_some(),
            "Collected device info"
        );
        info
    }
}

/// Value of `key` in os-release(5) content, unquoted.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn os_release_value(content: &str, key: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let (k, v) = line.split_once('=')?;
        (k.trim() == key).then(|| v.trim().trim_matches(|c| c == '"' || c == '\'').to_string())
    })
}

fn probe_os_version() -> Option<String> {
    #[cfg(target_os = "linux")]
    let version = std::fs::read_to_string("/etc/os-release")
        .ok()
        .and_then(|content| os_release_value(&content, "VERSION_ID"));

    #[cfg(target_os = "macos")]
    let version = std::process::Command::new("sw_vers")
        .arg("-productVersion")
        .output()
        .ok()
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string());

    #[cfg(not(any(target_os = "linux", target_os = "macos")))]
    let version: Option<String> = None;

    version.filter(|v| !v.is_empty())
}

fn probe_machine_id() -> Option<String> {
    #[cfg(target_os = "linux")]
    let raw = ["/etc/machine-id", "/var/lib/dbus/machine-id"]
        .iter()
        .find_map(|path| std::fs::read_to_string(path).ok());

    // `"IOPlatformUUID" = "XXXXXXXX-..."`
    #[cfg(target_os = "macos")]
    let raw = std::process::Command::new("ioreg")
        .args(["-rd1", "-c", "IOPlatformExpertDevice"])
        .output()
        .ok()
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .and_then(|out| {
            out.lines()
                .find(|l| l.contains("IOPlatformUUID"))
                .and_then(|l| l.rsplit('"').nth(1))
                .map(str::to_string)
        });

    // TODO: read HKLM\SOFTWARE\Microsoft\Cryptography\MachineGuid on Windows.
    #[cfg(not(any(target_os = "linux", target_os = "macos")))]
    let raw: Option<String> = None;

    raw
}
