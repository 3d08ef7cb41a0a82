// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use axum::{
    routing::{get, post},
    Router,
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;

use crate::application::geometry_service::GeometryService;
use crate::application::monitoring_source::MonitoringSource;
use crate::application::query_service::QueryService;
use crate::infrastructure::config::{load_service_config, MonitoringSettings};
use crate::infrastructure::file_source::FileMonitoringSource;
use crate::infrastructure::geojson_source::GeoJsonFileSource;
use crate::infrastructure::http_source::HttpMonitoringSource;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    get_reading, get_reading_for_date, get_station, get_station_for_date, health_check,
    latest_reading, latest_reading_for_date, list_all, list_all_for_date, reload, river_geometry,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = load_service_config()?;

    // Build the river geometry. A geometry file without the configured
    // river aborts startup here; the service never runs with no river.
    let geometry_source = Arc::new(GeoJsonFileSource::new(
        &config.river.geometry_path,
        config.river.name_property.clone(),
    ));
    let geometry_service =
        GeometryService::load(geometry_source, config.river.name.clone()).await?;

    // Build the monitoring index from the configured source
    let monitoring_source: Arc<dyn MonitoringSource> = match &config.monitoring {
        MonitoringSettings::File { path } => Arc::new(FileMonitoringSource::new(path)),
        MonitoringSettings::Http { url } => Arc::new(HttpMonitoringSource::new(url.clone())),
    };
    let query_service = QueryService::load(monitoring_source).await?;

    // Create application state
    let state = Arc::new(AppState {
        query_service,
        geometry_service,
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/api/map", get(river_geometry))
        .route("/api/monitoring", get(list_all))
        .route("/api/monitoring/date/:date", get(list_all_for_date))
        .route("/api/monitoring/:id", get(get_station))
        .route("/api/monitoring/:id/date/:date", get(get_station_for_date))
        .route("/api/monitoring/:id/latest", get(latest_reading))
        .route(
            "/api/monitoring/:id/latest/date/:date",
            get(latest_reading_for_date),
        )
        .route("/api/monitoring/:id/at/:time", get(get_reading))
        .route(
            "/api/monitoring/:id/at/:time/date/:date",
            get(get_reading_for_date),
        )
        .route("/admin/reload", post(reload))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config.server.bind.parse()?;
    println!("Starting river-telemetry service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
