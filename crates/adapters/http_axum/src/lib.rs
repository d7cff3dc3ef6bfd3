//! # zigbridge-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a small **JSON API** over the live device registry
//!   (`/api/devices`, `/api/devices/{type}/{id}`)
//! - Accept **commands** for controllable properties
//!   (`PUT …/relay`, `PUT …/alarm`) and hand them to the integration's
//!   `PropertyController`
//! - Stream domain events as **Server-Sent Events** (`/api/events/stream`)
//!
//! ## Dependency rule
//! Depends on `zigbridge-app` (for port traits and services) and
//! `zigbridge-domain` (for domain types used in request/response mapping).
//! Never leaks axum types into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;

#[cfg(test)]
mod test_support;
