//! # zigbridge-domain
//!
//! Pure domain model for the zigbridge protocol adapter.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Devices** (things addressed on the bus) and their lazily
//!   materialized **Properties** (battery, relay, alarm, …)
//! - Define the typed **PropertyValue** union and **AlarmState**
//! - Define **Events** (device creation, property value observations)
//! - Define **Commands** the platform can send to controllable properties
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! Bus-specific wire formats belong to the integration adapters.

pub mod error;
pub mod id;
pub mod time;

pub mod alarm;
pub mod command;
pub mod device;
pub mod event;
pub mod property;
