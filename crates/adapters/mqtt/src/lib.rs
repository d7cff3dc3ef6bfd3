//! # zigbridge-adapter-mqtt
//!
//! zigbee2mqtt integration — bridges devices republished by a zigbee2mqtt
//! bridge into zigbridge.
//!
//! ## Responsibilities
//! - Subscribe to `<namespace>/#` and classify topics ([`topic`])
//! - Create devices lazily on first sighting ([`dispatcher`])
//! - Decode state payloads into ordered property updates ([`router`])
//! - Translate relay/alarm commands into `<namespace>/<device>/set`
//!   messages ([`command`])
//!
//! ## Dependency rule
//! Depends on `zigbridge-app` (port traits) and `zigbridge-domain` only.

pub mod alarm;
pub mod client;
pub mod command;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod payload;
pub mod router;
pub mod topic;

use std::time::Duration;

use rumqttc::{AsyncClient, EventLoop};
use tokio::task::JoinHandle;

use zigbridge_app::ports::{Integration, IntegrationContext};
use zigbridge_domain::device::Device;
use zigbridge_domain::error::BridgeError;
use zigbridge_domain::id::DeviceId;

pub use client::MqttBus;
pub use command::{CommandTranslator, Zigbee2MqttController};
pub use config::MqttConfig;
pub use dispatcher::Dispatcher;
pub use error::MqttError;
pub use topic::Namespace;

/// Constructor registered in the `DeviceFactory` for zigbee2mqtt devices.
///
/// # Errors
///
/// Fails for an empty external id.
pub fn zigbee2mqtt_device(id: &DeviceId) -> Result<Device, BridgeError> {
    Device::builder()
        .id(id.clone())
        .display_name(id.external_id.clone())
        .build()
}

/// The zigbee2mqtt [`Integration`].
pub struct Zigbee2MqttIntegration {
    config: MqttConfig,
    client: Option<AsyncClient>,
    event_loop: Option<EventLoop>,
    task: Option<JoinHandle<()>>,
}

impl Zigbee2MqttIntegration {
    #[must_use]
    pub fn new(config: MqttConfig) -> Self {
        Self {
            config,
            client: None,
            event_loop: None,
            task: None,
        }
    }

    fn namespace(&self) -> Namespace {
        Namespace::new(self.config.base_topic.clone())
    }
}

impl Integration for Zigbee2MqttIntegration {
    type Controller = Zigbee2MqttController<MqttBus>;

    fn name(&self) -> &'static str {
        "zigbee2mqtt"
    }

    async fn setup(&mut self) -> Result<(), BridgeError> {
        let (client, event_loop) = client::connect(&self.config);
        tracing::info!(
            host = %self.config.broker_host,
            port = self.config.broker_port,
            namespace = %self.config.base_topic,
            "MQTT client configured"
        );
        self.client = Some(client);
        self.event_loop = Some(event_loop);
        Ok(())
    }

    async fn start_background(
        &mut self,
        ctx: impl IntegrationContext + Clone + 'static,
    ) -> Result<(), BridgeError> {
        let client = self.client.clone().ok_or(MqttError::NotConnected)?;
        let event_loop = self.event_loop.take().ok_or(MqttError::NotConnected)?;
        let dispatcher = Dispatcher::new(self.namespace(), ctx);
        let delay = Duration::from_secs(u64::from(self.config.reconnect_delay_secs));

        self.task = Some(tokio::spawn(client::run(
            event_loop, client, dispatcher, delay,
        )));
        Ok(())
    }

    fn controller(&self) -> Result<Self::Controller, BridgeError> {
        let client = self.client.clone().ok_or(MqttError::NotConnected)?;
        Ok(Zigbee2MqttController::new(
            CommandTranslator::new(self.namespace()),
            MqttBus::new(client),
        ))
    }

    async fn teardown(&mut self) -> Result<(), BridgeError> {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        if let Some(client) = self.client.take() {
            // the loop is gone, so nothing drains the request; ignore a full queue
            if let Err(err) = client.try_disconnect() {
                tracing::debug!(error = %err, "disconnect not sent");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zigbridge_domain::id::DeviceType;

    #[test]
    fn should_name_device_after_external_id() {
        let device =
            zigbee2mqtt_device(&DeviceId::new("garden-plug", DeviceType::Zigbee2Mqtt)).unwrap();
        assert_eq!(device.display_name, "garden-plug");
        assert_eq!(device.properties().count(), 0);
    }

    #[test]
    fn should_return_zigbee2mqtt_as_name() {
        let integration = Zigbee2MqttIntegration::new(MqttConfig::default());
        assert_eq!(integration.name(), "zigbee2mqtt");
    }

    #[test]
    fn should_refuse_controller_before_setup() {
        let integration = Zigbee2MqttIntegration::new(MqttConfig::default());
        assert!(matches!(
            integration.controller(),
            Err(BridgeError::Integration(_))
        ));
    }

    #[tokio::test]
    async fn should_hand_out_controller_after_setup() {
        let mut integration = Zigbee2MqttIntegration::new(MqttConfig::default());
        integration.setup().await.unwrap();
        assert!(integration.controller().is_ok());
        integration.teardown().await.unwrap();
    }
}
