//! In-memory ports and a fixture wiring them into a router.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::response::Response;

use zigbridge_app::event_bus::InProcessEventBus;
use zigbridge_app::ports::{DeviceRepository, PropertyController};
use zigbridge_app::services::device_factory::DeviceFactory;
use zigbridge_app::services::device_service::DeviceService;
use zigbridge_domain::command::PropertyCommand;
use zigbridge_domain::device::Device;
use zigbridge_domain::error::BridgeError;
use zigbridge_domain::id::{DeviceId, DeviceType};
use zigbridge_domain::property::{DeviceProperty, Observation, PropertyValue};

use crate::state::AppState;

#[derive(Default)]
pub struct InMemoryDeviceRepo {
    store: Mutex<HashMap<DeviceId, Device>>,
}

impl DeviceRepository for InMemoryDeviceRepo {
    async fn find_by_device_id(&self, id: &DeviceId) -> Result<Option<Device>, BridgeError> {
        Ok(self.store.lock().unwrap().get(id).cloned())
    }

    async fn save(&self, device: Device) -> Result<Device, BridgeError> {
        self.store
            .lock()
            .unwrap()
            .insert(device.id.clone(), device.clone());
        Ok(device)
    }

    async fn save_property(&self, property: DeviceProperty) -> Result<DeviceProperty, BridgeError> {
        let mut store = self.store.lock().unwrap();
        if let Some(device) = store.get_mut(&property.id.device_id) {
            device.record(property.value);
        }
        Ok(property)
    }

    async fn get_all(&self) -> Result<Vec<Device>, BridgeError> {
        Ok(self.store.lock().unwrap().values().cloned().collect())
    }
}

#[derive(Default)]
pub struct RecordingController {
    sent: Mutex<Vec<PropertyCommand>>,
}

impl PropertyController for RecordingController {
    async fn execute(
        &self,
        _device_id: &DeviceId,
        command: PropertyCommand,
    ) -> Result<(), BridgeError> {
        self.sent.lock().unwrap().push(command);
        Ok(())
    }
}

fn plain(id: &DeviceId) -> Result<Device, BridgeError> {
    Device::builder().id(id.clone()).build()
}

pub struct TestApp {
    pub state: AppState<InMemoryDeviceRepo, Arc<InProcessEventBus>, RecordingController>,
    pub event_bus: Arc<InProcessEventBus>,
}

impl TestApp {
    pub fn new() -> Self {
        let event_bus = Arc::new(InProcessEventBus::new(16));
        let factory = DeviceFactory::new().register(DeviceType::Zigbee2Mqtt, plain);
        let service = DeviceService::new(
            InMemoryDeviceRepo::default(),
            Arc::clone(&event_bus),
            factory,
        );
        let state = AppState::new(
            Arc::new(service),
            Arc::new(RecordingController::default()),
            Arc::clone(&event_bus),
        );
        Self { state, event_bus }
    }

    pub fn router(&self) -> Router {
        crate::router::build(self.state.clone())
    }

    /// Ensure `external_id` exists and record `value` on it.
    pub async fn observe(&self, external_id: &str, value: PropertyValue) {
        let id = DeviceId::new(external_id, DeviceType::Zigbee2Mqtt);
        let service = &self.state.device_service;
        service.ensure_device(id.clone()).await.unwrap();
        service.record(&id, Observation::now(value)).await.unwrap();
    }

    pub fn sent(&self) -> Vec<PropertyCommand> {
        self.state.controller.sent.lock().unwrap().clone()
    }
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

