//! Command translator: platform commands to zigbee2mqtt `set` messages.

use std::future::Future;

use zigbridge_app::ports::PropertyController;
use zigbridge_domain::alarm::AlarmState;
use zigbridge_domain::command::PropertyCommand;
use zigbridge_domain::error::BridgeError;
use zigbridge_domain::id::DeviceId;

use crate::alarm;
use crate::error::MqttError;
use crate::topic::Namespace;

/// A message ready to be published on the bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub topic: String,
    pub body: String,
}

/// Publishing side of the bus client.
///
/// Fire-and-forget: implementations enqueue the message and return without
/// waiting for the broker.
pub trait BusClient {
    fn publish(
        &self,
        message: OutboundMessage,
    ) -> impl Future<Output = Result<(), MqttError>> + Send;
}

/// Builds `set` messages for devices of one namespace.
#[derive(Debug, Clone, Default)]
pub struct CommandTranslator {
    namespace: Namespace,
}

impl CommandTranslator {
    #[must_use]
    pub fn new(namespace: Namespace) -> Self {
        Self { namespace }
    }

    /// `{"state":"ON"}` or `{"state":"OFF"}`.
    #[must_use]
    pub fn relay_command(&self, device_id: &DeviceId, on: bool) -> OutboundMessage {
        let state = if on { "ON" } else { "OFF" };
        self.message(device_id, &serde_json::json!({ "state": state }))
    }

    /// `{"alarm":"<token>"}` using the outbound token vocabulary.
    #[must_use]
    pub fn alarm_command(&self, device_id: &DeviceId, state: AlarmState) -> OutboundMessage {
        self.message(device_id, &serde_json::json!({ "alarm": alarm::encode(state) }))
    }

    /// Translate a platform command.
    #[must_use]
    pub fn translate(&self, device_id: &DeviceId, command: PropertyCommand) -> OutboundMessage {
        match command {
            PropertyCommand::Relay { on } => self.relay_command(device_id, on),
            PropertyCommand::Alarm { state } => self.alarm_command(device_id, state),
        }
    }

    fn message(&self, device_id: &DeviceId, body: &serde_json::Value) -> OutboundMessage {
        OutboundMessage {
            topic: self.namespace.command_topic(&device_id.external_id),
            body: body.to_string(),
        }
    }
}

/// [`PropertyController`] sending commands to zigbee2mqtt devices.
#[derive(Debug, Clone)]
pub struct Zigbee2MqttController<B> {
    translator: CommandTranslator,
    bus: B,
}

impl<B> Zigbee2MqttController<B> {
    pub fn new(translator: CommandTranslator, bus: B) -> Self {
        Self { translator, bus }
    }
}

impl<B: BusClient + Send + Sync> PropertyController for Zigbee2MqttController<B> {
    async fn execute(
        &self,
        device_id: &DeviceId,
        command: PropertyCommand,
    ) -> Result<(), BridgeError> {
        let message = self.translator.translate(device_id, command);
        tracing::debug!(topic = %message.topic, body = %message.body, "publishing command");
        self.bus.publish(message).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use zigbridge_domain::id::DeviceType;

    #[derive(Clone, Default)]
    struct RecordingBus {
        sent: Arc<Mutex<Vec<OutboundMessage>>>,
    }

    impl BusClient for RecordingBus {
        fn publish(
            &self,
            message: OutboundMessage,
        ) -> impl Future<Output = Result<(), MqttError>> + Send {
            self.sent.lock().unwrap().push(message);
            async { Ok(()) }
        }
    }

    struct DisconnectedBus;

    impl BusClient for DisconnectedBus {
        fn publish(
            &self,
            _message: OutboundMessage,
        ) -> impl Future<Output = Result<(), MqttError>> + Send {
            async { Err(MqttError::NotConnected) }
        }
    }

    fn frontdoor() -> DeviceId {
        DeviceId::new("frontdoor", DeviceType::Zigbee2Mqtt)
    }

    #[test]
    fn should_build_relay_commands() {
        let translator = CommandTranslator::default();

        let on = translator.relay_command(&frontdoor(), true);
        let off = translator.relay_command(&frontdoor(), false);

        assert_eq!(on.topic, "zigbee2mqtt/frontdoor/set");
        assert_eq!(on.body, r#"{"state":"ON"}"#);
        assert_eq!(off.body, r#"{"state":"OFF"}"#);
    }

    #[test]
    fn should_build_silence_command() {
        let message = CommandTranslator::default().alarm_command(&frontdoor(), AlarmState::Silenced);

        assert_eq!(
            message,
            OutboundMessage {
                topic: "zigbee2mqtt/frontdoor/set".to_string(),
                body: r#"{"alarm":"silenced"}"#.to_string(),
            }
        );
    }

    #[test]
    fn should_send_stop_to_switch_alarm_off() {
        let message = CommandTranslator::default().alarm_command(&frontdoor(), AlarmState::Off);
        assert_eq!(message.body, r#"{"alarm":"stop"}"#);
    }

    #[test]
    fn should_use_configured_namespace() {
        let message =
            CommandTranslator::new(Namespace::new("z2m")).relay_command(&frontdoor(), true);
        assert_eq!(message.topic, "z2m/frontdoor/set");
    }

    #[tokio::test]
    async fn should_publish_translated_command() {
        let bus = RecordingBus::default();
        let controller = Zigbee2MqttController::new(CommandTranslator::default(), bus.clone());

        controller
            .execute(
                &frontdoor(),
                PropertyCommand::Alarm {
                    state: AlarmState::PreAlarm,
                },
            )
            .await
            .unwrap();

        let sent = bus.sent.lock().unwrap().clone();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].body, r#"{"alarm":"pre_alarm"}"#);
    }

    #[tokio::test]
    async fn should_surface_bus_failure_as_integration_error() {
        let controller = Zigbee2MqttController::new(CommandTranslator::default(), DisconnectedBus);

        let result = controller
            .execute(&frontdoor(), PropertyCommand::Relay { on: true })
            .await;

        assert!(matches!(result, Err(BridgeError::Integration(_))));
    }
}
