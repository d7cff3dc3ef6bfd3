//! Concrete [`IntegrationContext`] backed by application services.

use std::sync::Arc;

use zigbridge_domain::device::Device;
use zigbridge_domain::error::BridgeError;
use zigbridge_domain::id::DeviceId;
use zigbridge_domain::property::{DeviceProperty, Observation};

use crate::ports::{DeviceRepository, EventPublisher, IntegrationContext};
use crate::services::device_service::DeviceService;

/// [`IntegrationContext`] implementation that delegates to `DeviceService`.
///
/// Wraps an `Arc`-ed service so it is cheaply cloneable and `Send + Sync`.
/// The generic parameters are confined to this struct; integrations see
/// only the [`IntegrationContext`] trait.
pub struct ServiceContext<DR, EP> {
    device_service: Arc<DeviceService<DR, EP>>,
}

impl<DR, EP> ServiceContext<DR, EP> {
    /// Create a new context backed by the given device service.
    pub fn new(device_service: Arc<DeviceService<DR, EP>>) -> Self {
        Self { device_service }
    }
}

impl<DR, EP> Clone for ServiceContext<DR, EP> {
    fn clone(&self) -> Self {
        Self {
            device_service: Arc::clone(&self.device_service),
        }
    }
}

impl<DR, EP> IntegrationContext for ServiceContext<DR, EP>
where
    DR: DeviceRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    async fn ensure_device(&self, id: DeviceId) -> Result<Device, BridgeError> {
        self.device_service.ensure_device(id).await
    }

    async fn record(
        &self,
        device_id: DeviceId,
        observation: Observation,
    ) -> Result<DeviceProperty, BridgeError> {
        self.device_service.record(&device_id, observation).await
    }
}
