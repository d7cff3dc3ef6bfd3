//! Integration port — lifecycle and context for device integrations.
//!
//! An integration bridges an external protocol (zigbee2mqtt, …) into the
//! zigbridge model. It discovers devices lazily from inbound traffic and
//! exposes a [`PropertyController`] for the outbound direction.

use std::future::Future;

use zigbridge_domain::device::Device;
use zigbridge_domain::error::BridgeError;
use zigbridge_domain::id::DeviceId;
use zigbridge_domain::property::{DeviceProperty, Observation};

use crate::ports::PropertyController;

/// Context provided to integrations for reporting what they observe.
///
/// This is a **port**: adapters call it when traffic arrives. The binary
/// crate provides a concrete implementation backed by `DeviceService`.
pub trait IntegrationContext: Send + Sync {
    /// Return the device for `id`, creating and announcing it on first sight.
    fn ensure_device(
        &self,
        id: DeviceId,
    ) -> impl Future<Output = Result<Device, BridgeError>> + Send;

    /// Materialize the property if needed and push `observation` through it.
    ///
    /// The observation's value decides which property of the device is
    /// updated.
    fn record(
        &self,
        device_id: DeviceId,
        observation: Observation,
    ) -> impl Future<Output = Result<DeviceProperty, BridgeError>> + Send;
}

/// A pluggable device integration.
///
/// The binary crate calls the lifecycle methods in order:
///
/// 1. [`setup`](Self::setup) — build clients, validate configuration
/// 2. [`start_background`](Self::start_background) — spawn the receive loop
/// 3. (the server runs, sending commands via [`controller`](Self::controller))
/// 4. [`teardown`](Self::teardown) — clean up resources
pub trait Integration {
    /// Controller handed out for the outbound direction.
    type Controller: PropertyController + Send + Sync + 'static;

    /// Unique name identifying this integration (e.g. `"zigbee2mqtt"`).
    fn name(&self) -> &'static str;

    /// Fast, non-blocking initialisation.
    fn setup(&mut self) -> impl Future<Output = Result<(), BridgeError>> + Send;

    /// Start the long-running receive loop.
    ///
    /// Spawns internal tasks that report observations via `ctx` and returns
    /// immediately.
    fn start_background(
        &mut self,
        ctx: impl IntegrationContext + Clone + 'static,
    ) -> impl Future<Output = Result<(), BridgeError>> + Send;

    /// Controller for commands targeting devices owned by this integration.
    ///
    /// # Errors
    ///
    /// Fails when called before [`setup`](Self::setup).
    fn controller(&self) -> Result<Self::Controller, BridgeError>;

    /// Called on graceful shutdown. Clean up any background tasks or connections.
    fn teardown(&mut self) -> impl Future<Output = Result<(), BridgeError>> + Send;
}
