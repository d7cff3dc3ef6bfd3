//! Event — an immutable record of something that happened.
//!
//! Events are produced when a device is first seen and whenever a property
//! value is observed. Every observation produces an event, even when the
//! value did not change.

use serde::{Deserialize, Serialize};

use crate::device::{Device, PropertyChange};
use crate::id::{DeviceId, DevicePropertyId, EventId};
use crate::property::PropertyValue;
use crate::time::{Timestamp, now};

/// A domain event published on the event bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub timestamp: Timestamp,
    #[serde(flatten)]
    pub payload: EventPayload,
}

/// What happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventPayload {
    /// A previously unseen device was created.
    DeviceCreated {
        device_id: DeviceId,
        display_name: String,
    },
    /// A property value was observed.
    PropertyValueChanged {
        property_id: DevicePropertyId,
        label: String,
        value: PropertyValue,
        previous: Option<PropertyValue>,
        /// Whether this observation materialized the property.
        created: bool,
    },
}

impl Event {
    #[must_use]
    pub fn new(payload: EventPayload, timestamp: Timestamp) -> Self {
        Self {
            id: EventId::new(),
            timestamp,
            payload,
        }
    }

    /// Event announcing a newly created device.
    #[must_use]
    pub fn device_created(device: &Device) -> Self {
        Self::new(
            EventPayload::DeviceCreated {
                device_id: device.id.clone(),
                display_name: device.display_name.clone(),
            },
            now(),
        )
    }

    /// Event announcing an observed property value, stamped with the
    /// observation time.
    #[must_use]
    pub fn property_value_changed(change: &PropertyChange) -> Self {
        let property = &change.property;
        Self::new(
            EventPayload::PropertyValueChanged {
                property_id: property.id.clone(),
                label: property.label.clone(),
                value: property.value.value,
                previous: change.previous.map(|obs| obs.value),
                created: change.created(),
            },
            property.value.observed_at,
        )
    }
}
