//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for ShiftGuard
#[derive(Error, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum ShiftGuardError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Every conflict-detection strategy failed. Distinct from a
    /// `TIME_CONFLICT` violation: without busy data the reschedule cannot be
    /// approved or rejected.
    #[error("Conflict check unavailable: {0}")]
    ConflictCheckUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for ShiftGuard operations
pub type Result<T> = std::result::Result<T, ShiftGuardError>;
