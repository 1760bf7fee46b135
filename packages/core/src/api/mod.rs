//! Console HTTP API
//!
//! axum routes exposing the coordinator operations to the console UI. Every
//! response uses the [`OperationResponse`] envelope; the UI owns toasts and
//! navigation.
//!
//! No authentication is done here; the console is deployed behind the
//! site's admin gateway.

use crate::services::CityCoordinator;
use axum::{routing::get, Json, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;

mod catalogue_endpoints;
mod city_endpoints;
mod country_endpoints;
mod response;

pub use response::{ApiError, ApiResult, ErrorBody, OperationResponse};

/// Application state shared across all endpoints
#[derive(Clone)]
pub struct AppState {
    pub coordinator: CityCoordinator,
}

impl AppState {
    pub fn new(coordinator: CityCoordinator) -> Self {
        Self { coordinator }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
}

async fn health_check() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Create the application router with all endpoint modules
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .merge(city_endpoints::routes(state.clone()))
        .merge(country_endpoints::routes(state.clone()))
        .merge(catalogue_endpoints::routes(state))
        .layer(TraceLayer::new_for_http())
}

/// Bind `127.0.0.1:{port}` and serve until the process exits
pub async fn start_server(state: AppState, port: u16) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr = format!("127.0.0.1:{}", port);
    tracing::info!("Console API listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
