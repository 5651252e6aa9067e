//! Error types for request validation and the scheduling service

use thiserror::Error;

/// Problems that block a schedule request before it is sent
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("No employees found. Import a CSV or add employees manually.")]
    NoEmployees,

    #[error("{count} employee(s) missing Civil ID: {}", names.join(", "))]
    MissingCivilIds { count: usize, names: Vec<String> },

    #[error("Invalid {field}: {message}")]
    InvalidRule { field: &'static str, message: String },
}

impl ValidationError {
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidRule {
            field,
            message: message.into(),
        }
    }
}

/// Failures talking to the scheduling service
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Missing API base URL. Set api_base in the config file or SCHEDULE_API_BASE.")]
    MissingApiBase,

    #[error("You must login again.")]
    MissingToken,

    #[error("A schedule request is already in progress")]
    RequestPending,

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success status; `message` is what the server said, verbatim
    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("Unexpected response from server: {0}")]
    Decode(String),
}
