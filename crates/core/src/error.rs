//! Error types for the Drumbeat domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum.

use std::path::PathBuf;
use thiserror::Error;

/// The top-level error type for all Drumbeat operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Messaging client errors ---
    #[error("Client error: {0}")]
    Client(#[from] ClientError),

    // --- Message catalog errors ---
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Failures from the messaging platform. All of these are recovered at the
/// token boundary by the scheduler; none of them stop the cycle.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by platform, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed response: {0}")]
    InvalidResponse(String),
}

/// Failures loading the message catalog. Always fatal at startup.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read message file at {path}: {reason}")]
    Io { path: PathBuf, reason: String },

    #[error("Message catalog is empty — every line was blank or missing")]
    Empty,
}
