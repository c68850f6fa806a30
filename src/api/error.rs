//! Error type for remote API calls.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Shown to the user when the server did not say what went wrong.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

/// Result type for remote API calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors that can occur while talking to the remote API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connection, timeout, TLS).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("remote api returned {status}")]
    Remote {
        status: u16,
        /// Message from the server's error body, if it sent one.
        message: Option<String>,
    },

    /// The requested resource does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// The response body did not have the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),

    /// The configured base URL cannot be used to build request URLs.
    #[error("invalid api url: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Text to show the user: the server's own message when present,
    /// otherwise [`GENERIC_ERROR_MESSAGE`].
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Remote {
                message: Some(message),
                ..
            } => message.clone(),
            ApiError::NotFound(what) => format!("{} not found", what),
            _ => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }
}

/// Error body returned by the remote API. `message` is either a string or,
/// for field validation failures, a list of strings.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    message: Option<Value>,
}

impl ErrorBody {
    pub(crate) fn into_message(self) -> Option<String> {
        match self.message? {
            Value::String(text) if !text.trim().is_empty() => Some(text),
            Value::Array(items) => {
                let parts: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
                (!parts.is_empty()).then(|| parts.join(", "))
            }
            _ => None,
        }
    }
}

/// Extracts the server's message from a raw error body, if any.
pub(crate) fn message_from_body(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(ErrorBody::into_message)
}
