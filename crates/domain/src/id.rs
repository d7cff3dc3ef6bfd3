//! Identifiers: bus-derived device ids, property ids, and UUID-backed event ids.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::property::PropertyKey;

macro_rules! define_id {
    ($(#[doc = $doc:expr])* $name:ident) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(uuid::Uuid);

        impl Default for $name {
            fn default() -> Self {
                Self(uuid::Uuid::new_v4())
            }
        }

        impl $name {
            /// Generate a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self::default()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                uuid::Uuid::parse_str(s).map(Self)
            }
        }
    };
}

define_id!(
    /// Unique identifier for an [`Event`](crate::event::Event).
    EventId
);

/// The integration a device is addressed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    /// A device republished by a zigbee2mqtt bridge.
    Zigbee2Mqtt,
}

impl DeviceType {
    /// Wire/storage tag of the device type.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Zigbee2Mqtt => "zigbee2mqtt",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "zigbee2mqtt" => Ok(Self::Zigbee2Mqtt),
            other => Err(ValidationError::UnknownDeviceType(other.to_string())),
        }
    }
}

/// Identity of a device as addressed on the bus.
///
/// The external id is whatever the bridge uses in its topics (usually the
/// friendly name). It is never validated against a catalog.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DeviceId {
    pub external_id: String,
    pub device_type: DeviceType,
}

impl DeviceId {
    #[must_use]
    pub fn new(external_id: impl Into<String>, device_type: DeviceType) -> Self {
        Self {
            external_id: external_id.into(),
            device_type,
        }
    }

    /// Check that the id can address a device.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyDeviceId`] when the external id is empty.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.external_id.is_empty() {
            return Err(ValidationError::EmptyDeviceId);
        }
        Ok(())
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.device_type, self.external_id)
    }
}

/// One observable/controllable facet of a device.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DevicePropertyId {
    pub device_id: DeviceId,
    pub key: PropertyKey,
}

impl DevicePropertyId {
    #[must_use]
    pub fn new(device_id: DeviceId, key: PropertyKey) -> Self {
        Self { device_id, key }
    }
}

impl fmt::Display for DevicePropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.device_id, self.key)
    }
}
