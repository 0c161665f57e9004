//! Error types for the node.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use confguard_github::GitHubError;
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

/// Errors that can occur while loading configuration or dispatching events.
#[derive(Debug, Error)]
pub enum NodeError {
    /// Configuration sources could not be read.
    #[error("configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    /// Configuration values failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ValidationErrors),

    /// Plugin settings are missing or invalid.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// The event payload does not have the expected shape.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// The repository service client could not be built.
    #[error("github client error: {0}")]
    GitHub(#[from] GitHubError),
}

impl IntoResponse for NodeError {
    fn into_response(self) -> Response {
        let status = match &self {
            NodeError::InvalidSettings(_) | NodeError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            NodeError::Config(_) | NodeError::InvalidConfig(_) | NodeError::GitHub(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}
