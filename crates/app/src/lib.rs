//! # zigbridge-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `DeviceRepository` — lookup and persistence of devices and properties
//!   - `EventPublisher` — publish domain events
//!   - `PropertyController` — send commands to controllable properties
//! - Define the **integration** boundary (`Integration`, `IntegrationContext`)
//! - Provide the **device service**: live device registry, lazy property
//!   materialization, and event emission
//! - Provide **in-process infrastructure** (event bus) that doesn't need IO
//!
//! ## Dependency rule
//! Depends on `zigbridge-domain` only (plus `tokio::sync` for channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod event_bus;
pub mod ports;
pub mod services;
