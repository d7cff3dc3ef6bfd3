//! rumqttc client wiring: options, publishing, and the receive loop.

use std::future::Future;
use std::time::Duration;

use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS};
use zigbridge_app::ports::IntegrationContext;

use crate::command::{BusClient, OutboundMessage};
use crate::config::MqttConfig;
use crate::dispatcher::Dispatcher;
use crate::error::MqttError;

/// Build a client and its event loop from configuration.
#[must_use]
pub fn connect(config: &MqttConfig) -> (AsyncClient, EventLoop) {
    let mut options = MqttOptions::new(&config.client_id, &config.broker_host, config.broker_port);
    options.set_keep_alive(Duration::from_secs(u64::from(config.keep_alive_secs)));
    if let (Some(username), Some(password)) = (&config.username, &config.password) {
        options.set_credentials(username, password);
    }
    AsyncClient::new(options, config.request_capacity)
}

/// [`BusClient`] publishing through a rumqttc [`AsyncClient`].
#[derive(Clone)]
pub struct MqttBus {
    client: AsyncClient,
}

impl MqttBus {
    #[must_use]
    pub fn new(client: AsyncClient) -> Self {
        Self { client }
    }
}

impl BusClient for MqttBus {
    fn publish(
        &self,
        message: OutboundMessage,
    ) -> impl Future<Output = Result<(), MqttError>> + Send {
        let client = self.client.clone();
        async move {
            client
                .publish(message.topic, QoS::AtMostOnce, false, message.body.into_bytes())
                .await
                .map_err(MqttError::Client)
        }
    }
}

/// Poll `event_loop` forever, routing every publish through `dispatcher`.
///
/// The namespace is (re)subscribed on each connection acknowledgement.
/// Routing failures are logged and never stop the loop; connection errors
/// are followed by `reconnect_delay` before polling again.
pub async fn run<C: IntegrationContext>(
    mut event_loop: EventLoop,
    client: AsyncClient,
    dispatcher: Dispatcher<C>,
    reconnect_delay: Duration,
) {
    let topic_root = dispatcher.topic_root();
    loop {
        match event_loop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(_))) => {
                tracing::info!(topic = %topic_root, "connected, subscribing");
                if let Err(err) = client.try_subscribe(topic_root.as_str(), QoS::AtMostOnce) {
                    tracing::error!(error = %err, "unable to subscribe");
                }
            }
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                let payload = Some(publish.payload.as_ref());
                if let Err(err) = dispatcher.route(&publish.topic, payload).await {
                    tracing::warn!(
                        topic = %publish.topic,
                        error = %err,
                        cause = ?std::error::Error::source(&err),
                        "unable to route message"
                    );
                }
            }
            Ok(_) => {}
            Err(err) => {
                tracing::error!(error = %err, "connection error");
                tokio::time::sleep(reconnect_delay).await;
            }
        }
    }
}
