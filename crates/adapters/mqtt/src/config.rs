//! MQTT integration configuration.

use serde::Deserialize;

/// Configuration for the zigbee2mqtt integration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MqttConfig {
    /// MQTT broker hostname or IP address.
    pub broker_host: String,
    /// MQTT broker port.
    pub broker_port: u16,
    /// MQTT client identifier.
    pub client_id: String,
    /// Namespace zigbee2mqtt publishes under (its own `base_topic`).
    pub base_topic: String,
    /// Keep-alive interval in seconds.
    pub keep_alive_secs: u16,
    /// Pause after a connection error before polling again, in seconds.
    pub reconnect_delay_secs: u16,
    /// Capacity of the client's outgoing request queue.
    pub request_capacity: usize,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            broker_host: "localhost".to_string(),
            broker_port: 1883,
            client_id: "zigbridge".to_string(),
            base_topic: "zigbee2mqtt".to_string(),
            keep_alive_secs: 30,
            reconnect_delay_secs: 5,
            request_capacity: 64,
            username: None,
            password: None,
        }
    }
}
