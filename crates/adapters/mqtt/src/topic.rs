//! zigbee2mqtt topic layout: `<namespace>/<device>[/<sub-topic>]`.

/// Sub-topics a device never reports state on.
const NON_STATE_SUBTOPICS: [&str; 3] = ["set", "get", "availability"];

/// Reserved second segment used by the bridge for its own status.
const BRIDGE_SEGMENT: &str = "bridge";

/// How an inbound topic is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicKind<'a> {
    /// State report of the device with this external id.
    DeviceState(&'a str),
    /// `<namespace>/bridge/...`, the bridge's own traffic.
    Bridge,
    /// A command or availability sub-topic of a device.
    NonState,
    /// Fewer than two segments or an empty device segment.
    Unroutable,
}

/// The namespace zigbee2mqtt publishes under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace(String);

impl Namespace {
    pub fn new(base_topic: impl Into<String>) -> Self {
        Self(base_topic.into())
    }

    /// Wildcard filter covering everything under the namespace.
    #[must_use]
    pub fn topic_root(&self) -> String {
        format!("{}/#", self.0)
    }

    /// Topic commands for `external_id` are published to.
    #[must_use]
    pub fn command_topic(&self, external_id: &str) -> String {
        format!("{}/{external_id}/set", self.0)
    }

    /// Classify an inbound topic.
    ///
    /// The first segment is not compared to the namespace: the subscription
    /// filter already scopes delivery.
    #[must_use]
    pub fn classify<'a>(&self, topic: &'a str) -> TopicKind<'a> {
        let mut segments = topic.split('/');
        let _namespace = segments.next();
        let Some(device) = segments.next().filter(|segment| !segment.is_empty()) else {
            return TopicKind::Unroutable;
        };
        if device == BRIDGE_SEGMENT {
            return TopicKind::Bridge;
        }
        match segments.next() {
            Some(sub) if NON_STATE_SUBTOPICS.contains(&sub) => TopicKind::NonState,
            _ => TopicKind::DeviceState(device),
        }
    }
}

impl Default for Namespace {
    fn default() -> Self {
        Self::new("zigbee2mqtt")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_build_subscription_filter() {
        assert_eq!(Namespace::default().topic_root(), "zigbee2mqtt/#");
        assert_eq!(Namespace::new("z2m").topic_root(), "z2m/#");
    }

    #[test]
    fn should_build_command_topic() {
        assert_eq!(
            Namespace::default().command_topic("frontdoor"),
            "zigbee2mqtt/frontdoor/set"
        );
    }

    #[test]
    fn should_take_device_from_second_segment() {
        let ns = Namespace::default();
        assert_eq!(
            ns.classify("zigbee2mqtt/livingroom-sensor"),
            TopicKind::DeviceState("livingroom-sensor")
        );
        assert_eq!(
            ns.classify("zigbee2mqtt/livingroom-sensor/extra"),
            TopicKind::DeviceState("livingroom-sensor")
        );
    }

    #[test]
    fn should_reject_topics_without_device_segment() {
        let ns = Namespace::default();
        assert_eq!(ns.classify("zigbee2mqtt"), TopicKind::Unroutable);
        assert_eq!(ns.classify("zigbee2mqtt/"), TopicKind::Unroutable);
        assert_eq!(ns.classify(""), TopicKind::Unroutable);
    }

    #[test]
    fn should_flag_bridge_topics() {
        let ns = Namespace::default();
        assert_eq!(ns.classify("zigbee2mqtt/bridge/state"), TopicKind::Bridge);
        assert_eq!(ns.classify("zigbee2mqtt/bridge"), TopicKind::Bridge);
    }

    #[test]
    fn should_flag_command_and_availability_subtopics() {
        let ns = Namespace::default();
        assert_eq!(ns.classify("zigbee2mqtt/lamp/set"), TopicKind::NonState);
        assert_eq!(ns.classify("zigbee2mqtt/lamp/get"), TopicKind::NonState);
        assert_eq!(
            ns.classify("zigbee2mqtt/lamp/availability"),
            TopicKind::NonState
        );
    }
}
