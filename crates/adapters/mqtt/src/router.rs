//! Property router: turns one state payload into ordered property updates.

use zigbridge_app::ports::IntegrationContext;
use zigbridge_domain::id::DeviceId;
use zigbridge_domain::property::{Observation, PropertyValue};

use crate::alarm;
use crate::error::MqttError;
use crate::payload::Zigbee2MqttMessage;

/// Values carried by `message`, in reporting order.
///
/// Absent fields yield nothing. The alarm comes last, so a bad alarm token
/// only fails after every other field has been yielded.
pub fn decode(
    message: &Zigbee2MqttMessage,
) -> impl Iterator<Item = Result<PropertyValue, MqttError>> + '_ {
    let plain = [
        message.battery.map(PropertyValue::BatteryLevel),
        message.illuminance_lux.map(PropertyValue::Illuminance),
        message.temperature.map(PropertyValue::Temperature),
        message.humidity.map(PropertyValue::Humidity),
        message
            .state
            .as_deref()
            .map(|state| PropertyValue::Relay(state.eq_ignore_ascii_case("ON"))),
        message.occupancy.map(PropertyValue::Motion),
        message.contact.map(|closed| PropertyValue::WindowOpen(!closed)),
        message.co2.map(PropertyValue::Co2),
        message.smoke.map(PropertyValue::Smoke),
    ];
    let siren = message
        .siren_state
        .as_deref()
        .map(|token| alarm::decode(token).map(PropertyValue::Alarm));

    plain.into_iter().flatten().map(Ok).chain(siren)
}

/// Parse `payload` and record each present field on `device_id`.
///
/// Returns how many properties were updated.
///
/// # Errors
///
/// A malformed payload fails before any update. An unsupported alarm token
/// fails after the fields preceding it were applied.
#[tracing::instrument(skip(ctx, device_id, payload), fields(device_id = %device_id))]
pub async fn route<C: IntegrationContext>(
    ctx: &C,
    device_id: &DeviceId,
    payload: &[u8],
) -> Result<usize, MqttError> {
    let message = Zigbee2MqttMessage::from_slice(payload).map_err(MqttError::PayloadParse)?;

    let mut applied = 0;
    for value in decode(&message) {
        let value = value?;
        ctx.record(device_id.clone(), Observation::now(value))
            .await?;
        applied += 1;
    }
    tracing::debug!(applied, "payload routed");
    Ok(applied)
}
