//! Device — a thing on the bus that exposes zero or more properties.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, ValidationError};
use crate::id::{DeviceId, DevicePropertyId};
use crate::property::{DeviceProperty, Observation, PropertyKey};
use crate::time::{Timestamp, now};

/// A device known to the platform.
///
/// Properties are kept ordered by [`PropertyKey`] so listings are stable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    pub display_name: String,
    pub created_at: Timestamp,
    properties: BTreeMap<PropertyKey, DeviceProperty>,
}

/// Outcome of recording an observation on a device.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyChange {
    /// The property after the update.
    pub property: DeviceProperty,
    /// The observation that was replaced, `None` when the property was just
    /// materialized.
    pub previous: Option<Observation>,
}

impl PropertyChange {
    /// Whether this change materialized the property.
    #[must_use]
    pub fn created(&self) -> bool {
        self.previous.is_none()
    }
}

impl Device {
    /// Create a builder for constructing a [`Device`].
    #[must_use]
    pub fn builder() -> DeviceBuilder {
        DeviceBuilder::default()
    }

    /// Properties observed so far, in reporting order.
    pub fn properties(&self) -> impl Iterator<Item = &DeviceProperty> {
        self.properties.values()
    }

    /// Look up a property by key.
    #[must_use]
    pub fn property(&self, key: PropertyKey) -> Option<&DeviceProperty> {
        self.properties.get(&key)
    }

    /// Materialize the property for `observation` if absent, then push the
    /// observation through it.
    pub fn record(&mut self, observation: Observation) -> PropertyChange {
        let key = observation.value.key();
        match self.properties.get_mut(&key) {
            Some(property) => {
                let previous = property.update(observation);
                PropertyChange {
                    property: property.clone(),
                    previous: Some(previous),
                }
            }
            None => {
                let id = DevicePropertyId::new(self.id.clone(), key);
                let property = DeviceProperty::materialize(id, observation);
                self.properties.insert(key, property.clone());
                PropertyChange {
                    property,
                    previous: None,
                }
            }
        }
    }
}

/// Step-by-step builder for [`Device`].
#[derive(Debug, Default)]
pub struct DeviceBuilder {
    id: Option<DeviceId>,
    display_name: Option<String>,
    created_at: Option<Timestamp>,
    properties: Vec<DeviceProperty>,
}

impl DeviceBuilder {
    #[must_use]
    pub fn id(mut self, id: DeviceId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    #[must_use]
    pub fn created_at(mut self, created_at: Timestamp) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Attach an already materialized property (e.g. loaded from storage).
    #[must_use]
    pub fn property(mut self, property: DeviceProperty) -> Self {
        self.properties.push(property);
        self
    }

    /// Consume the builder, validate, and return a [`Device`].
    ///
    /// The display name defaults to the external id.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Validation`] if the id is missing or empty.
    pub fn build(self) -> Result<Device, BridgeError> {
        let id = self.id.ok_or(ValidationError::EmptyDeviceId)?;
        id.validate()?;

        let properties = self
            .properties
            .into_iter()
            .map(|property| (property.id.key, property))
            .collect();

        Ok(Device {
            display_name: self
                .display_name
                .unwrap_or_else(|| id.external_id.clone()),
            created_at: self.created_at.unwrap_or_else(now),
            id,
            properties,
        })
    }
}
