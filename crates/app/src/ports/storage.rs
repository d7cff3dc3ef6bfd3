//! Storage port — repository traits for persistence.

use std::future::Future;

use zigbridge_domain::device::Device;
use zigbridge_domain::error::BridgeError;
use zigbridge_domain::id::DeviceId;
use zigbridge_domain::property::DeviceProperty;

/// Repository for persisting and querying [`Device`]s and their properties.
///
/// Devices are never deleted through this port.
pub trait DeviceRepository {
    /// Find a device (with all of its properties) by its bus identity.
    fn find_by_device_id(
        &self,
        id: &DeviceId,
    ) -> impl Future<Output = Result<Option<Device>, BridgeError>> + Send;

    /// Create or replace a device together with its properties.
    fn save(&self, device: Device) -> impl Future<Output = Result<Device, BridgeError>> + Send;

    /// Create or replace a single property of an already saved device.
    fn save_property(
        &self,
        property: DeviceProperty,
    ) -> impl Future<Output = Result<DeviceProperty, BridgeError>> + Send;

    /// Get all devices.
    fn get_all(&self) -> impl Future<Output = Result<Vec<Device>, BridgeError>> + Send;
}

impl<T: DeviceRepository + Send + Sync> DeviceRepository for std::sync::Arc<T> {
    fn find_by_device_id(
        &self,
        id: &DeviceId,
    ) -> impl Future<Output = Result<Option<Device>, BridgeError>> + Send {
        (**self).find_by_device_id(id)
    }

    fn save(&self, device: Device) -> impl Future<Output = Result<Device, BridgeError>> + Send {
        (**self).save(device)
    }

    fn save_property(
        &self,
        property: DeviceProperty,
    ) -> impl Future<Output = Result<DeviceProperty, BridgeError>> + Send {
        (**self).save_property(property)
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Device>, BridgeError>> + Send {
        (**self).get_all()
    }
}
