//! Property control port — the outbound direction towards devices.

use std::future::Future;

use zigbridge_domain::command::PropertyCommand;
use zigbridge_domain::error::BridgeError;
use zigbridge_domain::id::DeviceId;

/// Sends commands to controllable device properties.
///
/// Delivery is fire-and-forget: implementations hand the command to their
/// transport and return without waiting for the device to acknowledge it.
pub trait PropertyController {
    /// Translate `command` for `device_id` and hand it to the transport.
    fn execute(
        &self,
        device_id: &DeviceId,
        command: PropertyCommand,
    ) -> impl Future<Output = Result<(), BridgeError>> + Send;
}

impl<T: PropertyController + Send + Sync> PropertyController for std::sync::Arc<T> {
    fn execute(
        &self,
        device_id: &DeviceId,
        command: PropertyCommand,
    ) -> impl Future<Output = Result<(), BridgeError>> + Send {
        (**self).execute(device_id, command)
    }
}
