//! HTTP API for the worker.
//!
//! ## Endpoints
//!
//! - `POST /` - Run the guard for one event ([`PluginInputs`])
//! - `GET /manifest.json` - Plugin manifest
//! - `GET /health` - Liveness check

use crate::config::NodeConfig;
use crate::error::NodeError;
use crate::plugin::{run_plugin, Outcome, PluginInputs};
use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;

/// Plugin manifest served at `/manifest.json`.
pub const MANIFEST: &str = include_str!("../manifest.json");

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Base URL of the GitHub REST API.
    pub github_api_url: Arc<str>,
    /// Timeout for repository service requests.
    pub request_timeout: Duration,
}

impl AppState {
    /// Build state from node configuration.
    pub fn from_config(config: &NodeConfig) -> Self {
        Self {
            github_api_url: Arc::from(config.github_api_url.as_str()),
            request_timeout: config.request_timeout(),
        }
    }
}

/// Creates the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", post(handle_event))
        .route("/manifest.json", get(manifest))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn manifest() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/json")], MANIFEST)
}

/// Runs the guard for one event and reports what happened.
async fn handle_event(
    State(state): State<AppState>,
    Json(inputs): Json<PluginInputs>,
) -> Result<Json<Outcome>, NodeError> {
    let outcome = run_plugin(inputs, &state.github_api_url, state.request_timeout).await?;
    Ok(Json(outcome))
}
