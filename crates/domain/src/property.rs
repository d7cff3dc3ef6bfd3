//! Device properties — typed, timestamped facets of a device.
//!
//! A property is materialized on a device the first time its value is
//! observed; a property that a device never reports is never created.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::alarm::AlarmState;
use crate::error::ValidationError;
use crate::id::DevicePropertyId;
use crate::time::{Timestamp, now};

/// Fixed vocabulary of property keys.
///
/// Declaration order is the order in which a device lists its properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKey {
    Battery,
    Illumination,
    Temperature,
    Humidity,
    Motion,
    Relay,
    Window,
    Smoke,
    Co2,
    Alarm,
}

impl PropertyKey {
    pub const ALL: [Self; 10] = [
        Self::Battery,
        Self::Illumination,
        Self::Temperature,
        Self::Humidity,
        Self::Motion,
        Self::Relay,
        Self::Window,
        Self::Smoke,
        Self::Co2,
        Self::Alarm,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Battery => "battery",
            Self::Illumination => "illumination",
            Self::Temperature => "temperature",
            Self::Humidity => "humidity",
            Self::Motion => "motion",
            Self::Relay => "relay",
            Self::Window => "window",
            Self::Smoke => "smoke",
            Self::Co2 => "co2",
            Self::Alarm => "alarm",
        }
    }

    /// Human readable name, used to build property labels.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Battery => "Battery Level",
            Self::Illumination => "Illumination",
            Self::Temperature => "Temperature",
            Self::Humidity => "Humidity",
            Self::Motion => "Motion State",
            Self::Relay => "Relay",
            Self::Window => "Window State",
            Self::Smoke => "Smoke State",
            Self::Co2 => "Co2",
            Self::Alarm => "Alarm State",
        }
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownPropertyKey(s.to_string()))
    }
}

/// A typed property value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum PropertyValue {
    /// Battery level in percent (0–100).
    BatteryLevel(u8),
    /// Illuminance in lux.
    Illuminance(u32),
    /// Temperature in degrees Celsius.
    Temperature(f64),
    /// Relative humidity in percent.
    Humidity(f64),
    Motion(bool),
    WindowOpen(bool),
    Smoke(bool),
    /// Relay on (`true`) or off.
    Relay(bool),
    Alarm(AlarmState),
    /// CO2 concentration in ppm.
    Co2(u32),
}

impl PropertyValue {
    /// The property key this kind of value is stored under.
    #[must_use]
    pub fn key(&self) -> PropertyKey {
        match self {
            Self::BatteryLevel(_) => PropertyKey::Battery,
            Self::Illuminance(_) => PropertyKey::Illumination,
            Self::Temperature(_) => PropertyKey::Temperature,
            Self::Humidity(_) => PropertyKey::Humidity,
            Self::Motion(_) => PropertyKey::Motion,
            Self::WindowOpen(_) => PropertyKey::Window,
            Self::Smoke(_) => PropertyKey::Smoke,
            Self::Relay(_) => PropertyKey::Relay,
            Self::Alarm(_) => PropertyKey::Alarm,
            Self::Co2(_) => PropertyKey::Co2,
        }
    }
}

/// A value together with the wall-clock time it was observed at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub value: PropertyValue,
    pub observed_at: Timestamp,
}

impl Observation {
    #[must_use]
    pub fn new(value: PropertyValue, observed_at: Timestamp) -> Self {
        Self { value, observed_at }
    }

    /// Observe `value` now.
    #[must_use]
    pub fn now(value: PropertyValue) -> Self {
        Self::new(value, now())
    }
}

/// A materialized property of a device and its latest observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceProperty {
    pub id: DevicePropertyId,
    pub label: String,
    pub value: Observation,
}

impl DeviceProperty {
    /// Materialize a property from its first observation.
    ///
    /// The label is derived from the device's external id and the key.
    #[must_use]
    pub fn materialize(id: DevicePropertyId, value: Observation) -> Self {
        let label = format!("{}: {}", id.device_id.external_id, id.key.label());
        Self { id, label, value }
    }

    /// Replace the latest observation, returning the previous one.
    pub fn update(&mut self, value: Observation) -> Observation {
        std::mem::replace(&mut self.value, value)
    }
}
