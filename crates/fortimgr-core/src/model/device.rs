// ── Managed device types ──

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// A FortiGate managed by the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagedDevice {
    pub name: String,
    pub serial: String,
    pub platform: String,
    pub connection_status: String,
    /// Owning ADOM. Only known when the device came from the cross-domain
    /// device index; omitted from per-domain listings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

/// Outcome of a device lookup by name.
///
/// "Not found" is a normal result, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceLookup {
    Found(ManagedDevice),
    NotFound { name: String },
}

impl DeviceLookup {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// The device, if one matched.
    pub fn into_device(self) -> Option<ManagedDevice> {
        match self {
            Self::Found(device) => Some(device),
            Self::NotFound { .. } => None,
        }
    }
}

/// `{"found": true, "device": {...}}` or `{"found": false, "name": "..."}`.
impl Serialize for DeviceLookup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("DeviceLookup", 2)?;
        match self {
            Self::Found(device) => {
                state.serialize_field("found", &true)?;
                state.serialize_field("device", device)?;
            }
            Self::NotFound { name } => {
                state.serialize_field("found", &false)?;
                state.serialize_field("name", name)?;
            }
        }
        state.end()
    }
}
