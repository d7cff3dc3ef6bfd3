//! Typed view of a zigbee2mqtt device state payload.

use serde::{Deserialize, Deserializer};

/// Read a JSON number and drop its fractional part.
fn whole<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Option::<f64>::deserialize(deserializer).map(|value| value.map(f64::trunc))
}

// float to int casts saturate, NaN becomes 0
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_u8<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u8>, D::Error> {
    Ok(whole(deserializer)?.map(|value| value as u8))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    Ok(whole(deserializer)?.map(|value| value as u32))
}

/// The fields zigbridge understands in a device state report.
///
/// Every field is optional; `null` counts as absent and unknown fields
/// are ignored. Integer readings accept fractional numbers and truncate them.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Zigbee2MqttMessage {
    /// Battery level in percent.
    #[serde(deserialize_with = "whole_u8")]
    pub battery: Option<u8>,
    #[serde(deserialize_with = "whole_u32")]
    pub illuminance_lux: Option<u32>,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    /// Relay state, `"ON"` / `"OFF"`.
    pub state: Option<String>,
    pub occupancy: Option<bool>,
    /// `true` while the reed contact is closed.
    pub contact: Option<bool>,
    /// CO2 concentration in ppm.
    #[serde(deserialize_with = "whole_u32")]
    pub co2: Option<u32>,
    pub smoke: Option<bool>,
    #[serde(alias = "sirenState")]
    pub siren_state: Option<String>,
}

impl Zigbee2MqttMessage {
    /// Parse a raw payload.
    ///
    /// # Errors
    ///
    /// Fails when the payload is not a JSON object or a known field has the
    /// wrong JSON type.
    pub fn from_slice(payload: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(payload)
    }
}
