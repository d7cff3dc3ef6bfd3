//! Device service — the live device registry and property dispatch.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Mutex, MutexGuard, PoisonError};

use zigbridge_domain::device::Device;
use zigbridge_domain::error::{BridgeError, NotFoundError};
use zigbridge_domain::event::Event;
use zigbridge_domain::id::DeviceId;
use zigbridge_domain::property::{DeviceProperty, Observation};

use crate::ports::{DeviceRepository, EventPublisher};
use crate::services::device_factory::DeviceFactory;

/// Application service owning every device seen on the bus.
///
/// Devices are cached in a mutex-guarded registry. The guard is never held
/// across an await point: mutations happen under the lock, persistence and
/// event publication happen after it is released.
pub struct DeviceService<R, P> {
    repo: R,
    publisher: P,
    factory: DeviceFactory,
    live: Mutex<HashMap<DeviceId, Device>>,
}

impl<R, P> DeviceService<R, P> {
    /// Create a new service backed by the given repository and publisher.
    pub fn new(repo: R, publisher: P, factory: DeviceFactory) -> Self {
        Self {
            repo,
            publisher,
            factory,
            live: Mutex::new(HashMap::new()),
        }
    }

    fn registry(&self) -> MutexGuard<'_, HashMap<DeviceId, Device>> {
        self.live.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn cached(&self, id: &DeviceId) -> Option<Device> {
        self.registry().get(id).cloned()
    }
}

impl<R: DeviceRepository, P: EventPublisher> DeviceService<R, P> {
    /// Return the device for `id`, creating it on first sight.
    ///
    /// Lookup goes through the live registry, then the repository, then the
    /// [`DeviceFactory`]. When several callers race on an unseen id, only the
    /// one whose insert lands first saves the device and publishes
    /// `DeviceCreated`; the others get the winner's device.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Validation`] for an empty id or an unsupported
    /// device type, or a storage error from the repository.
    #[tracing::instrument(skip(self, id), fields(device_id = %id))]
    pub async fn ensure_device(&self, id: DeviceId) -> Result<Device, BridgeError> {
        id.validate()?;
        if let Some(device) = self.cached(&id) {
            return Ok(device);
        }

        let (candidate, fresh) = match self.repo.find_by_device_id(&id).await? {
            Some(stored) => (stored, false),
            None => (self.factory.create(&id)?, true),
        };

        let (device, inserted) = match self.registry().entry(id.clone()) {
            Entry::Occupied(entry) => (entry.get().clone(), false),
            Entry::Vacant(entry) => (entry.insert(candidate).clone(), true),
        };

        if inserted && fresh {
            let device = match self.repo.save(device).await {
                Ok(device) => device,
                Err(err) => {
                    // next sighting retries the creation
                    self.registry().remove(&id);
                    return Err(err);
                }
            };
            tracing::info!(display_name = %device.display_name, "device created");
            self.publisher
                .publish(Event::device_created(&device))
                .await?;
            return Ok(device);
        }
        Ok(device)
    }

    /// Push `observation` into the matching property of a known device.
    ///
    /// The property is materialized on first observation. Every call
    /// publishes one `PropertyValueChanged`, even when the value is unchanged.
    /// The live device only changes once the property has been persisted.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::NotFound`] if the device was never ensured, or
    /// a storage error from the repository.
    #[tracing::instrument(
        skip(self, device_id, observation),
        fields(device_id = %device_id, key = %observation.value.key())
    )]
    pub async fn record(
        &self,
        device_id: &DeviceId,
        observation: Observation,
    ) -> Result<DeviceProperty, BridgeError> {
        let not_found = || NotFoundError {
            entity: "Device",
            id: device_id.to_string(),
        };

        let mut draft = self.cached(device_id).ok_or_else(not_found)?;
        let property = self
            .repo
            .save_property(draft.record(observation).property)
            .await?;

        let change = self
            .registry()
            .get_mut(device_id)
            .map(|device| device.record(observation))
            .ok_or_else(not_found)?;
        tracing::debug!(created = change.created(), "property value observed");
        self.publisher
            .publish(Event::property_value_changed(&change))
            .await?;
        Ok(property)
    }

    /// Look up a device by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::NotFound`] when no device with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn get_device(&self, id: &DeviceId) -> Result<Device, BridgeError> {
        if let Some(device) = self.cached(id) {
            return Ok(device);
        }
        self.repo.find_by_device_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Device",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// List all devices.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_devices(&self) -> Result<Vec<Device>, BridgeError> {
        self.repo.get_all().await
    }
}
