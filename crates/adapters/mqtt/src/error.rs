//! MQTT adapter error types.

use zigbridge_domain::error::BridgeError;

/// Errors specific to the MQTT adapter.
#[derive(Debug, thiserror::Error)]
pub enum MqttError {
    /// The MQTT client has not been initialised yet.
    #[error("MQTT client not connected")]
    NotConnected,

    /// The rumqttc client returned an error.
    #[error("MQTT client error")]
    Client(#[source] rumqttc::ClientError),

    /// Failed to parse an incoming MQTT payload as JSON.
    #[error("failed to parse MQTT payload")]
    PayloadParse(#[source] serde_json::Error),

    /// The siren reported an alarm token we have no state for.
    #[error("unsupported alarm token {0:?}")]
    UnsupportedAlarmToken(String),

    /// A domain-level error (validation, not-found, etc.).
    #[error("domain error")]
    Domain(#[source] BridgeError),
}

impl MqttError {
    /// Convert into a [`BridgeError::Integration`] for propagation across
    /// port boundaries.
    pub fn into_domain(self) -> BridgeError {
        match self {
            Self::Domain(err) => err,
            other => BridgeError::Integration(Box::new(other)),
        }
    }
}

impl From<MqttError> for BridgeError {
    fn from(err: MqttError) -> Self {
        err.into_domain()
    }
}

impl From<BridgeError> for MqttError {
    fn from(err: BridgeError) -> Self {
        Self::Domain(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zigbridge_domain::error::ValidationError;

    #[test]
    fn should_display_not_connected_error() {
        let err = MqttError::NotConnected;
        assert_eq!(err.to_string(), "MQTT client not connected");
    }

    #[test]
    fn should_convert_not_connected_to_integration_error() {
        let err: BridgeError = MqttError::NotConnected.into();
        assert!(matches!(err, BridgeError::Integration(_)));
    }

    #[test]
    fn should_convert_domain_error_back_to_domain() {
        let mqtt_err = MqttError::Domain(BridgeError::Validation(ValidationError::EmptyDeviceId));
        let back: BridgeError = mqtt_err.into();
        assert!(matches!(back, BridgeError::Validation(_)));
    }

    #[test]
    fn should_display_payload_parse_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{{bad").unwrap_err();
        let err = MqttError::PayloadParse(json_err);
        assert_eq!(err.to_string(), "failed to parse MQTT payload");
    }

    #[test]
    fn should_name_unsupported_alarm_token() {
        let err = MqttError::UnsupportedAlarmToken("wail".to_string());
        assert_eq!(err.to_string(), "unsupported alarm token \"wail\"");
    }
}
