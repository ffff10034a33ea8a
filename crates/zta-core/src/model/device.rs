// ── Device domain types ──

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::error::CoreError;

/// Kind of simulated IoT device.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DeviceType {
    Thermostat,
    Camera,
    Lock,
}

/// Security mode a simulated device talks to the gateway in.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DeviceMode {
    Insecure,
    Secure,
    Replay,
}

impl DeviceType {
    /// Wire name (`"thermostat"`, ...).
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

impl DeviceMode {
    /// Wire name (`"insecure"`, ...).
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Operator-supplied device identifier. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DeviceId(String);

impl DeviceId {
    pub fn new(raw: impl Into<String>) -> Result<Self, CoreError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(CoreError::InvalidDevice {
                reason: "device_id must not be empty".into(),
            });
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for DeviceId {
    type Error = CoreError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<DeviceId> for String {
    fn from(id: DeviceId) -> Self {
        id.0
    }
}

impl AsRef<str> for DeviceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A registered device as last seen on the gateway.
///
/// Records are replaced wholesale on every resync, never edited in place.
/// The gateway's shared secret is not part of client state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub device_id: DeviceId,
    pub device_type: DeviceType,
    pub mode: DeviceMode,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn enums_use_lowercase_wire_names() {
        let types: Vec<&str> = DeviceType::iter().map(DeviceType::as_str).collect();
        assert_eq!(types, ["thermostat", "camera", "lock"]);
        let modes: Vec<&str> = DeviceMode::iter().map(DeviceMode::as_str).collect();
        assert_eq!(modes, ["insecure", "secure", "replay"]);
    }

    #[test]
    fn enums_parse_case_insensitively() {
        assert_eq!(DeviceType::from_str("Camera").unwrap(), DeviceType::Camera);
        assert_eq!(DeviceMode::from_str("REPLAY").unwrap(), DeviceMode::Replay);
        assert!(DeviceType::from_str("toaster").is_err());
    }

    #[test]
    fn device_id_rejects_blank() {
        assert!(DeviceId::new("").is_err());
        assert!(DeviceId::new("   ").is_err());
        assert_eq!(DeviceId::new("cam-1").unwrap().as_str(), "cam-1");
    }

    #[test]
    fn device_id_deserialize_validates() {
        let ok: Result<DeviceId, _> = serde_json::from_str("\"lock-2\"");
        assert!(ok.is_ok());
        let blank: Result<DeviceId, _> = serde_json::from_str("\"\"");
        assert!(blank.is_err());
    }
}
