//! # zigbridged — zigbridge daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (`zigbridge.toml` plus env vars)
//! - Initialize logging
//! - Initialize the `SQLite` connection pool and run migrations
//! - Construct the device service, injecting repository and event bus
//! - Start the zigbee2mqtt integration against the device service
//! - Build the axum router and serve
//! - Handle graceful shutdown (Ctrl-C), then tear the integration down
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use zigbridge_adapter_http_axum::state::AppState;
use zigbridge_adapter_mqtt::{zigbee2mqtt_device, Zigbee2MqttIntegration};
use zigbridge_adapter_storage_sqlite_sqlx::{Config as StorageConfig, SqliteDeviceRepository};
use zigbridge_app::event_bus::InProcessEventBus;
use zigbridge_app::ports::Integration;
use zigbridge_app::services::device_factory::DeviceFactory;
use zigbridge_app::services::device_service::DeviceService;
use zigbridge_app::services::integration_context::ServiceContext;
use zigbridge_domain::id::DeviceType;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .init();

    // Database
    let db = StorageConfig {
        database_url: config.database_url().to_string(),
    }
    .build()
    .await?;
    let device_repo = SqliteDeviceRepository::new(db.pool().clone());

    // Event bus
    let event_bus = Arc::new(InProcessEventBus::new(256));

    // Services
    let factory = DeviceFactory::new().register(DeviceType::Zigbee2Mqtt, zigbee2mqtt_device);
    let device_service = Arc::new(DeviceService::new(
        device_repo,
        Arc::clone(&event_bus),
        factory,
    ));

    // Integration
    let mut integration = Zigbee2MqttIntegration::new(config.mqtt.clone());
    integration.setup().await?;
    let controller = Arc::new(integration.controller()?);
    integration
        .start_background(ServiceContext::new(Arc::clone(&device_service)))
        .await?;
    tracing::info!(integration = integration.name(), "integration started");

    // HTTP
    let state = AppState::new(device_service, controller, event_bus);
    let app = zigbridge_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "zigbridged listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    integration.teardown().await?;
    db.close().await;
    tracing::info!("zigbridged stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutdown requested"),
        Err(err) => {
            tracing::error!(error = %err, "unable to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
