//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod commands;
#[allow(clippy::missing_errors_doc)]
pub mod devices;
pub mod sse;

use std::str::FromStr;

use axum::Router;
use axum::routing::{get, put};

use zigbridge_app::ports::{DeviceRepository, EventPublisher, PropertyController};
use zigbridge_domain::error::BridgeError;
use zigbridge_domain::id::{DeviceId, DeviceType};

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<DR, EP, PC>() -> Router<AppState<DR, EP, PC>>
where
    DR: DeviceRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
    PC: PropertyController + Send + Sync + 'static,
{
    Router::new()
        // Devices
        .route("/devices", get(devices::list::<DR, EP, PC>))
        .route(
            "/devices/{device_type}/{external_id}",
            get(devices::get::<DR, EP, PC>),
        )
        // Commands
        .route(
            "/devices/{device_type}/{external_id}/relay",
            put(commands::relay::<DR, EP, PC>),
        )
        .route(
            "/devices/{device_type}/{external_id}/alarm",
            put(commands::alarm::<DR, EP, PC>),
        )
        // Events
        .route("/events/stream", get(sse::stream::<DR, EP, PC>))
}

/// Build a [`DeviceId`] from the `{device_type}/{external_id}` path segments.
fn device_id((device_type, external_id): (String, String)) -> Result<DeviceId, BridgeError> {
    let id = DeviceId::new(external_id, DeviceType::from_str(&device_type)?);
    id.validate()?;
    Ok(id)
}
