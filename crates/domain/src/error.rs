//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`BridgeError`]
//! when crossing a port boundary.

use crate::id::DeviceType;

/// Top-level error returned by ports and application services.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// A domain invariant was violated.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// A referenced record does not exist.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// The persistence layer failed.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A device integration (bus client, payload decoding, …) failed.
    #[error("integration error")]
    Integration(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Domain invariant violations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A device id was built from an empty string.
    #[error("device id must not be empty")]
    EmptyDeviceId,

    /// No constructor is registered for the requested device type.
    #[error("no device constructor registered for type {0}")]
    UnsupportedDeviceType(DeviceType),

    /// A device type tag could not be parsed.
    #[error("unknown device type {0:?}")]
    UnknownDeviceType(String),

    /// A property key could not be parsed.
    #[error("unknown property key {0:?}")]
    UnknownPropertyKey(String),

    /// An alarm state name could not be parsed.
    #[error("unknown alarm state {0:?}")]
    UnknownAlarmState(String),
}

/// A lookup by id found nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    /// Kind of record that was looked up (e.g. `"Device"`).
    pub entity: &'static str,
    /// Display form of the id that was looked up.
    pub id: String,
}
