//! Device factory — explicit registry of device constructors per type.

use std::collections::HashMap;

use zigbridge_domain::device::Device;
use zigbridge_domain::error::{BridgeError, ValidationError};
use zigbridge_domain::id::{DeviceId, DeviceType};

/// Builds a fresh, property-less device for a bus identity.
pub type DeviceConstructor = fn(&DeviceId) -> Result<Device, BridgeError>;

/// Maps each [`DeviceType`] to the constructor integrations rely on.
///
/// Built once at startup by the composition root and injected into
/// `DeviceService`.
#[derive(Debug, Default, Clone)]
pub struct DeviceFactory {
    constructors: HashMap<DeviceType, DeviceConstructor>,
}

impl DeviceFactory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the constructor for `device_type`.
    #[must_use]
    pub fn register(mut self, device_type: DeviceType, constructor: DeviceConstructor) -> Self {
        self.constructors.insert(device_type, constructor);
        self
    }

    /// Build a new device for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnsupportedDeviceType`] when no constructor
    /// is registered for the id's type, or whatever the constructor fails with.
    pub fn create(&self, id: &DeviceId) -> Result<Device, BridgeError> {
        let constructor = self
            .constructors
            .get(&id.device_type)
            .ok_or(ValidationError::UnsupportedDeviceType(id.device_type))?;
        constructor(id)
    }
}
