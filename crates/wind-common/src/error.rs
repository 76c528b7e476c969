//! Error types for the wind power prediction client.

use thiserror::Error;

/// Message shown when neither the transport nor the server supplied a usable one.
pub const FALLBACK_ERROR_MESSAGE: &str = "Failed to get prediction. Please try again.";

/// Result type alias using WindError.
pub type WindResult<T> = Result<T, WindError>;

/// Primary error type for prediction operations.
#[derive(Debug, Error)]
pub enum WindError {
    // === Request Errors ===
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Server returned HTTP {status}{}", detail_suffix(.message))]
    Server { status: u16, message: Option<String> },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    // === Input Errors ===
    #[error("Invalid value for '{field}': {message}")]
    InvalidField { field: String, message: String },

    // === Setup Errors ===
    #[error("Configuration error: {0}")]
    Config(String),
}

fn detail_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {}", m))
        .unwrap_or_default()
}

impl WindError {
    /// The single user-facing string for this error.
    ///
    /// Of the request failures, only a server-supplied `error` text is surfaced
    /// verbatim; the rest collapse to [`FALLBACK_ERROR_MESSAGE`]. Local errors
    /// carry their own message.
    pub fn user_message(&self) -> String {
        match self {
            WindError::Server {
                message: Some(message),
                ..
            } => message.clone(),
            WindError::InvalidField { message, .. } => message.clone(),
            WindError::Config(message) => message.clone(),
            _ => FALLBACK_ERROR_MESSAGE.to_string(),
        }
    }

    /// HTTP status carried by the error, if the server answered at all.
    pub fn http_status_code(&self) -> Option<u16> {
        match self {
            WindError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the failure happened on the way to or back from the endpoint.
    pub fn is_request_failure(&self) -> bool {
        matches!(
            self,
            WindError::Transport(_) | WindError::Server { .. } | WindError::MalformedResponse(_)
        )
    }
}

impl From<std::io::Error> for WindError {
    fn from(err: std::io::Error) -> Self {
        WindError::Config(err.to_string())
    }
}

impl From<serde_yaml::Error> for WindError {
    fn from(err: serde_yaml::Error) -> Self {
        WindError::Config(format!("YAML error: {}", err))
    }
}
