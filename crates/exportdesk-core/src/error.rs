//! Error types for exportdesk-core

use thiserror::Error;

/// Result type alias using exportdesk-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by core operations.
///
/// Every component propagates these to its caller; nothing is retried or
/// recovered silently. `Validation` never reaches the network.
#[derive(Error, Debug)]
pub enum Error {
    /// Locally detectable bad input, raised before any request is sent
    #[error("{0}")]
    Validation(String),

    /// Invalid-credential (401) response
    #[error("{0}")]
    Auth(String),

    /// Non-2xx response carrying a server-supplied message, surfaced verbatim
    #[error("{0}")]
    ServerMessage(String),

    /// Transport failure or non-2xx response without a structured message
    #[error("Request failed: {0}")]
    Network(String),

    /// Another mutation for the same resource kind is still in flight
    #[error("Another operation is already in progress")]
    Busy,

    /// Session persistence (secure storage) error
    #[error("Secure storage error: {0}")]
    Storage(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        Self::Network(error.to_string())
    }
}
