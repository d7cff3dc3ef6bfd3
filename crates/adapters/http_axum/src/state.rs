//! Shared application state for axum handlers.

use std::sync::Arc;

use zigbridge_app::event_bus::InProcessEventBus;
use zigbridge_app::ports::{DeviceRepository, EventPublisher, PropertyController};
use zigbridge_app::services::device_service::DeviceService;

/// Application state shared across all axum handlers.
///
/// Generic over the device repository, event publisher and property
/// controller to avoid dynamic dispatch. `Clone` is implemented manually so
/// the underlying types themselves do not need to be `Clone`. Only the
/// `Arc` wrappers are cloned.
pub struct AppState<DR, EP, PC> {
    /// Live device registry.
    pub device_service: Arc<DeviceService<DR, EP>>,
    /// Sends relay/alarm commands to the bus.
    pub controller: Arc<PC>,
    /// Event bus feeding the SSE stream.
    pub event_bus: Arc<InProcessEventBus>,
}

impl<DR, EP, PC> Clone for AppState<DR, EP, PC> {
    fn clone(&self) -> Self {
        Self {
            device_service: Arc::clone(&self.device_service),
            controller: Arc::clone(&self.controller),
            event_bus: Arc::clone(&self.event_bus),
        }
    }
}

impl<DR, EP, PC> AppState<DR, EP, PC>
where
    DR: DeviceRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
    PC: PropertyController + Send + Sync + 'static,
{
    /// Create a new application state from pre-wrapped `Arc`s.
    ///
    /// The device service is shared with the integration's background task,
    /// hence the `Arc`.
    pub fn new(
        device_service: Arc<DeviceService<DR, EP>>,
        controller: Arc<PC>,
        event_bus: Arc<InProcessEventBus>,
    ) -> Self {
        Self {
            device_service,
            controller,
            event_bus,
        }
    }
}
