use dotenvy::dotenv;
use fleet_portal::api::FleetApi;
use fleet_portal::config::get_configuration;
use fleet_portal::startup::build_router;
use fleet_portal::AppState;
use portal_core::observability::{init_metrics, init_tracing};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let configuration = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    let telemetry = &configuration.telemetry;
    init_tracing(
        &telemetry.service_name,
        &telemetry.log_level,
        telemetry.otlp_endpoint.as_deref(),
    );
    init_metrics();

    let api = FleetApi::new(&configuration.fleet_api).map_err(|e| {
        tracing::error!("Failed to build fleet API client: {}", e);
        anyhow::anyhow!("Fleet API client error: {}", e)
    })?;
    info!(base_url = api.base_url(), "Fleet API client ready");

    let app = build_router(AppState::new(Arc::new(api)), &configuration.session);

    let address = format!(
        "{}:{}",
        configuration.server.host, configuration.server.port
    );
    let listener = tokio::net::TcpListener::bind(&address).await.map_err(|e| {
        tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
        anyhow::anyhow!("Failed to bind to address {}: {}", address, e)
    })?;

    info!("Starting fleet-portal on {}", address);
    axum::serve(listener, app).await.map_err(|e| {
        tracing::error!("Server error: {}", e);
        anyhow::anyhow!("Server error: {}", e)
    })?;

    Ok(())
}
