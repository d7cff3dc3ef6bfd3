//! Command handlers for controllable properties.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use zigbridge_app::ports::{DeviceRepository, EventPublisher, PropertyController};
use zigbridge_domain::alarm::AlarmState;
use zigbridge_domain::command::PropertyCommand;
use zigbridge_domain::error::{BridgeError, NotFoundError};
use zigbridge_domain::id::{DeviceId, DevicePropertyId};

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for switching a relay.
#[derive(Deserialize)]
pub struct RelayRequest {
    pub on: bool,
}

/// Request body for driving a siren.
#[derive(Deserialize)]
pub struct AlarmRequest {
    pub state: AlarmState,
}

/// Possible responses from the command endpoints.
pub enum CommandResponse {
    /// The command was handed to the bus; no acknowledgement is awaited.
    Accepted,
}

impl IntoResponse for CommandResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Accepted => StatusCode::ACCEPTED.into_response(),
        }
    }
}

/// `PUT /api/devices/{device_type}/{external_id}/relay`
pub async fn relay<DR, EP, PC>(
    State(state): State<AppState<DR, EP, PC>>,
    Path(path): Path<(String, String)>,
    Json(body): Json<RelayRequest>,
) -> Result<CommandResponse, ApiError>
where
    DR: DeviceRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
    PC: PropertyController + Send + Sync + 'static,
{
    let id = super::device_id(path)?;
    send(&state, id, PropertyCommand::Relay { on: body.on }).await?;
    Ok(CommandResponse::Accepted)
}

/// `PUT /api/devices/{device_type}/{external_id}/alarm`
pub async fn alarm<DR, EP, PC>(
    State(state): State<AppState<DR, EP, PC>>,
    Path(path): Path<(String, String)>,
    Json(body): Json<AlarmRequest>,
) -> Result<CommandResponse, ApiError>
where
    DR: DeviceRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
    PC: PropertyController + Send + Sync + 'static,
{
    let id = super::device_id(path)?;
    send(&state, id, PropertyCommand::Alarm { state: body.state }).await?;
    Ok(CommandResponse::Accepted)
}

/// Forward `command` once the targeted property has been observed.
async fn send<DR, EP, PC>(
    state: &AppState<DR, EP, PC>,
    id: DeviceId,
    command: PropertyCommand,
) -> Result<(), BridgeError>
where
    DR: DeviceRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
    PC: PropertyController + Send + Sync + 'static,
{
    let device = state.device_service.get_device(&id).await?;
    if device.property(command.key()).is_none() {
        return Err(NotFoundError {
            entity: "Property",
            id: DevicePropertyId::new(id, command.key()).to_string(),
        }
        .into());
    }
    state.controller.execute(&device.id, command).await
}
