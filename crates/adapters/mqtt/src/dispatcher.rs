//! Dispatcher: topic parsing, device lookup/creation, hand-off to the router.

use zigbridge_app::ports::IntegrationContext;
use zigbridge_domain::id::{DeviceId, DeviceType};

use crate::error::MqttError;
use crate::router;
use crate::topic::{Namespace, TopicKind};

/// Entry point for every message delivered under the namespace.
#[derive(Debug, Clone)]
pub struct Dispatcher<C> {
    namespace: Namespace,
    ctx: C,
}

impl<C: IntegrationContext> Dispatcher<C> {
    pub fn new(namespace: Namespace, ctx: C) -> Self {
        Self { namespace, ctx }
    }

    /// Subscription filter covering every device of the namespace.
    #[must_use]
    pub fn topic_root(&self) -> String {
        self.namespace.topic_root()
    }

    /// Handle one inbound message.
    ///
    /// Unroutable topics, bridge topics, command sub-topics and empty
    /// payloads are dropped without touching any device. Otherwise the
    /// device is ensured first, so a device is created even when its payload
    /// turns out to be malformed.
    ///
    /// # Errors
    ///
    /// Returns the device lookup failure or the router's failure for this
    /// message. Callers log and move on.
    pub async fn route(&self, topic: &str, payload: Option<&[u8]>) -> Result<(), MqttError> {
        let external_id = match self.namespace.classify(topic) {
            TopicKind::DeviceState(external_id) => external_id,
            kind => {
                tracing::debug!(topic, ?kind, "ignoring topic");
                return Ok(());
            }
        };
        let Some(payload) = payload.filter(|payload| !payload.is_empty()) else {
            tracing::debug!(topic, "ignoring empty payload");
            return Ok(());
        };

        let device_id = DeviceId::new(external_id, DeviceType::Zigbee2Mqtt);
        self.ctx.ensure_device(device_id.clone()).await?;
        router::route(&self.ctx, &device_id, payload).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use zigbridge_domain::alarm::AlarmState;
    use zigbridge_domain::device::Device;
    use zigbridge_domain::error::BridgeError;
    use zigbridge_domain::id::DevicePropertyId;
    use zigbridge_domain::property::{DeviceProperty, Observation, PropertyKey, PropertyValue};

    #[derive(Default)]
    struct Seen {
        ensured: Vec<DeviceId>,
        recorded: Vec<(DeviceId, PropertyValue)>,
    }

    #[derive(Clone, Default)]
    struct FakeContext {
        seen: Arc<Mutex<Seen>>,
    }

    impl FakeContext {
        fn ensured(&self) -> Vec<DeviceId> {
            self.seen.lock().unwrap().ensured.clone()
        }

        fn recorded(&self) -> Vec<(DeviceId, PropertyValue)> {
            self.seen.lock().unwrap().recorded.clone()
        }

        fn recorded_keys(&self) -> Vec<PropertyKey> {
            self.recorded().iter().map(|(_, value)| value.key()).collect()
        }
    }

    impl IntegrationContext for FakeContext {
        async fn ensure_device(&self, id: DeviceId) -> Result<Device, BridgeError> {
            self.seen.lock().unwrap().ensured.push(id.clone());
            Device::builder().id(id).build()
        }

        async fn record(
            &self,
            device_id: DeviceId,
            observation: Observation,
        ) -> Result<DeviceProperty, BridgeError> {
            self.seen
                .lock()
                .unwrap()
                .recorded
                .push((device_id.clone(), observation.value));
            let id = DevicePropertyId::new(device_id, observation.value.key());
            Ok(DeviceProperty::materialize(id, observation))
        }
    }

    fn dispatcher() -> (Dispatcher<FakeContext>, FakeContext) {
        let ctx = FakeContext::default();
        (Dispatcher::new(Namespace::default(), ctx.clone()), ctx)
    }

    fn device(external_id: &str) -> DeviceId {
        DeviceId::new(external_id, DeviceType::Zigbee2Mqtt)
    }

    #[test]
    fn should_subscribe_to_whole_namespace() {
        let (dispatcher, _) = dispatcher();
        assert_eq!(dispatcher.topic_root(), "zigbee2mqtt/#");
    }

    #[tokio::test]
    async fn should_record_sensor_fields_of_state_report() {
        let (dispatcher, ctx) = dispatcher();

        dispatcher
            .route(
                "zigbee2mqtt/livingroom-sensor",
                Some(br#"{"battery":87,"temperature":21.5,"humidity":40}"#),
            )
            .await
            .unwrap();

        assert_eq!(ctx.ensured(), vec![device("livingroom-sensor")]);
        assert_eq!(
            ctx.recorded(),
            vec![
                (device("livingroom-sensor"), PropertyValue::BatteryLevel(87)),
                (device("livingroom-sensor"), PropertyValue::Temperature(21.5)),
                (device("livingroom-sensor"), PropertyValue::Humidity(40.0)),
            ]
        );
    }

    #[tokio::test]
    async fn should_ignore_bridge_topics() {
        let (dispatcher, ctx) = dispatcher();

        dispatcher
            .route("zigbee2mqtt/bridge/state", Some(br#"{"state":"online"}"#))
            .await
            .unwrap();

        assert!(ctx.ensured().is_empty());
        assert!(ctx.recorded().is_empty());
    }

    #[tokio::test]
    async fn should_ignore_topics_without_device_segment() {
        let (dispatcher, ctx) = dispatcher();

        for topic in ["zigbee2mqtt", "zigbee2mqtt/"] {
            dispatcher
                .route(topic, Some(br#"{"battery":1}"#))
                .await
                .unwrap();
        }

        assert!(ctx.ensured().is_empty());
    }

    #[tokio::test]
    async fn should_not_read_own_commands_back_as_state() {
        let (dispatcher, ctx) = dispatcher();

        dispatcher
            .route("zigbee2mqtt/lamp/set", Some(br#"{"state":"ON"}"#))
            .await
            .unwrap();

        assert!(ctx.ensured().is_empty());
    }

    #[tokio::test]
    async fn should_ignore_absent_or_empty_payload() {
        let (dispatcher, ctx) = dispatcher();

        dispatcher.route("zigbee2mqtt/lamp", None).await.unwrap();
        dispatcher.route("zigbee2mqtt/lamp", Some(b"")).await.unwrap();

        assert!(ctx.ensured().is_empty());
    }

    #[tokio::test]
    async fn should_create_device_before_rejecting_malformed_payload() {
        let (dispatcher, ctx) = dispatcher();

        let result = dispatcher.route("zigbee2mqtt/lamp", Some(b"{not json")).await;

        assert!(matches!(result, Err(MqttError::PayloadParse(_))));
        assert_eq!(ctx.ensured(), vec![device("lamp")]);
        assert!(ctx.recorded().is_empty());
    }

    #[tokio::test]
    async fn should_record_alarm_state() {
        let (dispatcher, ctx) = dispatcher();

        dispatcher
            .route("zigbee2mqtt/frontdoor", Some(br#"{"siren_state":"fire"}"#))
            .await
            .unwrap();

        assert_eq!(
            ctx.recorded(),
            vec![(device("frontdoor"), PropertyValue::Alarm(AlarmState::Fire))]
        );
    }

    #[tokio::test]
    async fn should_reject_unknown_alarm_token_without_alarm_property() {
        let (dispatcher, ctx) = dispatcher();

        let result = dispatcher
            .route("zigbee2mqtt/frontdoor", Some(br#"{"siren_state":"unknown"}"#))
            .await;

        assert!(matches!(result, Err(MqttError::UnsupportedAlarmToken(_))));
        assert!(ctx.recorded().is_empty());
    }

    #[tokio::test]
    async fn should_keep_fields_applied_before_bad_alarm_token() {
        let (dispatcher, ctx) = dispatcher();

        let result = dispatcher
            .route(
                "zigbee2mqtt/frontdoor",
                Some(br#"{"sirenState":"wail","smoke":true,"battery":12}"#),
            )
            .await;

        assert!(result.is_err());
        assert_eq!(
            ctx.recorded_keys(),
            vec![PropertyKey::Battery, PropertyKey::Smoke]
        );
    }

    #[tokio::test]
    async fn should_read_co2_once() {
        let (dispatcher, ctx) = dispatcher();

        dispatcher
            .route("zigbee2mqtt/office", Some(br#"{"co2":820}"#))
            .await
            .unwrap();

        assert_eq!(
            ctx.recorded(),
            vec![(device("office"), PropertyValue::Co2(820))]
        );
    }
}
