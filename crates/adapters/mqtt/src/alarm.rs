//! Siren alarm tokens as spoken on the bus.
//!
//! The inbound and outbound vocabularies differ: a siren reports `clear`
//! when idle but is switched off with `stop`.

use zigbridge_domain::alarm::AlarmState;

use crate::error::MqttError;

const INBOUND: [(&str, AlarmState); 5] = [
    ("clear", AlarmState::Off),
    ("pre-alarm", AlarmState::PreAlarm),
    ("fire", AlarmState::Fire),
    ("burglar", AlarmState::Burglar),
    ("silenced", AlarmState::Silenced),
];

/// Decode a reported `siren_state` token, ignoring case.
///
/// # Errors
///
/// Returns [`MqttError::UnsupportedAlarmToken`] for anything outside the
/// known vocabulary.
pub fn decode(token: &str) -> Result<AlarmState, MqttError> {
    INBOUND
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(token))
        .map(|(_, state)| *state)
        .ok_or_else(|| MqttError::UnsupportedAlarmToken(token.to_string()))
}

/// Token sent in an `alarm` command.
#[must_use]
pub fn encode(state: AlarmState) -> &'static str {
    match state {
        AlarmState::Off => "stop",
        AlarmState::PreAlarm => "pre_alarm",
        AlarmState::Fire => "fire",
        AlarmState::Burglar => "burglar",
        AlarmState::Silenced => "silenced",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_decode_every_inbound_token() {
        assert_eq!(decode("clear").unwrap(), AlarmState::Off);
        assert_eq!(decode("pre-alarm").unwrap(), AlarmState::PreAlarm);
        assert_eq!(decode("fire").unwrap(), AlarmState::Fire);
        assert_eq!(decode("burglar").unwrap(), AlarmState::Burglar);
        assert_eq!(decode("silenced").unwrap(), AlarmState::Silenced);
    }

    #[test]
    fn should_ignore_case_when_decoding() {
        assert_eq!(decode("FIRE").unwrap(), AlarmState::Fire);
        assert_eq!(decode("Pre-Alarm").unwrap(), AlarmState::PreAlarm);
    }

    #[test]
    fn should_reject_unknown_token() {
        assert!(matches!(
            decode("unknown"),
            Err(MqttError::UnsupportedAlarmToken(token)) if token == "unknown"
        ));
        assert!(decode("stop").is_err());
        assert!(decode("pre_alarm").is_err());
    }

    #[test]
    fn should_encode_off_as_stop() {
        assert_eq!(encode(AlarmState::Off), "stop");
        assert_eq!(encode(AlarmState::PreAlarm), "pre_alarm");
    }

    #[test]
    fn should_keep_active_states_stable_across_directions() {
        for state in [AlarmState::Fire, AlarmState::Burglar, AlarmState::Silenced] {
            assert_eq!(decode(encode(state)).unwrap(), state);
        }
    }
}
