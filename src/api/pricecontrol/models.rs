use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Device switch direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchAction {
    On,
    Off,
}

impl SwitchAction {
    /// Path segment of the switch endpoint
    pub fn path(self) -> &'static str {
        match self {
            SwitchAction::On => "switchon",
            SwitchAction::Off => "switchoff",
        }
    }
}

impl std::fmt::Display for SwitchAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SwitchAction::On => write!(f, "on"),
            SwitchAction::Off => write!(f, "off"),
        }
    }
}

/// Response body of `/switchon/{name}` and `/switchoff/{name}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwitchResponse {
    pub status: String,
}

/// Comprehensive error type for backend requests
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// 403 Forbidden (web UI switching disabled on the backend)
    #[error("Forbidden: {0}")]
    Forbidden(String),
    /// 404 Not Found
    #[error("Not Found: {0}")]
    NotFound(String),
    /// 5xx Server Error
    #[error("Server Error ({0}): {1}")]
    ServerError(u16, String),
    /// Other HTTP errors
    #[error("HTTP Error ({0}): {1}")]
    HttpError(u16, String),
    /// Network/request error
    #[error("Request Error: {0}")]
    RequestError(String),
    /// Request did not finish in time
    #[error("Timed out after {0} ms")]
    Timeout(u64),
    /// Deserialization error
    #[error("Deserialization Error: {0}")]
    DeserializationError(String),
    /// Base URL or path could not be turned into a request URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}
