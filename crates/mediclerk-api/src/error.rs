use std::collections::BTreeMap;

use thiserror::Error;

/// Field key → validation message.
pub type FieldErrors = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("not authenticated or session expired")]
    Unauthorized,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("invalid response body: {0}")]
    Decode(String),

    #[error("HTTP client setup failed: {0}")]
    Config(String),
}

impl ApiError {
    /// Message suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Unauthorized => "Unauthorized access. Please login again.".to_string(),
            ApiError::NotFound(_) => "Record not found.".to_string(),
            ApiError::Server { message, .. } if !message.is_empty() => message.clone(),
            ApiError::Server { .. } => "Server error occurred".to_string(),
            ApiError::Network(_) => "Network error - please check your connection".to_string(),
            ApiError::Decode(_) => "Invalid response from server".to_string(),
            ApiError::Config(_) => "Failed to reach the clerking service".to_string(),
        }
    }

    /// Worth offering the user a retry with the same form state.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::Server { .. } | ApiError::Network(_))
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{} field(s) need attention", .0.len())]
    Invalid(FieldErrors),

    #[error("login failed: {0}")]
    LoginFailed(String),

    #[error(transparent)]
    Api(#[from] ApiError),
}
