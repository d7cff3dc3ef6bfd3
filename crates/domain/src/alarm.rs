//! Alarm state — platform-level states of a siren/alarm device.
//!
//! Bus-specific tokens are not known here; each integration maps its own
//! wire vocabulary onto these states.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// State of an alarm (siren) property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlarmState {
    Off,
    PreAlarm,
    Fire,
    Burglar,
    Silenced,
}

impl AlarmState {
    /// Every alarm state, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Off,
        Self::PreAlarm,
        Self::Fire,
        Self::Burglar,
        Self::Silenced,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::PreAlarm => "PRE_ALARM",
            Self::Fire => "FIRE",
            Self::Burglar => "BURGLAR",
            Self::Silenced => "SILENCED",
        }
    }
}

impl fmt::Display for AlarmState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlarmState {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|state| state.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ValidationError::UnknownAlarmState(s.to_string()))
    }
}
