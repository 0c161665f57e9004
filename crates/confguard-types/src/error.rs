//! Error types for the types crate.

use thiserror::Error;
use validator::ValidationErrors;

/// Errors that can occur while reading shared types.
#[derive(Debug, Error)]
pub enum TypesError {
    /// Settings failed validation.
    #[error("invalid settings: {0}")]
    InvalidSettings(#[from] ValidationErrors),
}

/// Result type for operations in this crate.
pub type Result<T> = std::result::Result<T, TypesError>;
