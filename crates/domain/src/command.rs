//! Commands the platform can send to a controllable property.

use serde::{Deserialize, Serialize};

use crate::alarm::AlarmState;
use crate::property::PropertyKey;

/// A control-plane intent directed at one property of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum PropertyCommand {
    /// Switch a relay on or off.
    Relay { on: bool },
    /// Drive a siren into the given alarm state.
    Alarm { state: AlarmState },
}

impl PropertyCommand {
    /// The property this command controls.
    #[must_use]
    pub fn key(&self) -> PropertyKey {
        match self {
            Self::Relay { .. } => PropertyKey::Relay,
            Self::Alarm { .. } => PropertyKey::Alarm,
        }
    }
}
