//! Error taxonomy for the navigator
//!
//! Every failure is scoped to a single navigation action; nothing here is
//! fatal to the process.

use thiserror::Error;

/// Classification of a Content API failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Host unreachable, timed out, connection dropped
    Connection,
    /// Anything else: bad status, malformed payload
    Other,
}

/// Content API failure. Never retried by the engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl ApiError {
    pub fn connection(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Connection,
            message: message.into(),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Other,
            message: message.into(),
        }
    }

    pub fn is_connection(&self) -> bool {
        self.kind == ApiErrorKind::Connection
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            ApiError::connection(err.to_string())
        } else {
            ApiError::other(err.to_string())
        }
    }
}

/// Navigation error
#[derive(Error, Debug)]
pub enum NavError {
    #[error("Invalid category: {0}")]
    InvalidCategory(String),

    #[error("Missing parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Unsupported record kind: {0}")]
    UnsupportedKind(String),

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Search history unavailable: {0}")]
    History(String),
}

/// Result alias for navigator operations
pub type Result<T, E = NavError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display_is_message() {
        let err = ApiError::other("HTTP 500");
        assert_eq!(err.to_string(), "HTTP 500");
        assert!(!err.is_connection());
    }

    #[test]
    fn test_nav_error_wraps_api_error() {
        let err: NavError = ApiError::connection("refused").into();
        assert!(matches!(err, NavError::Api(ref e) if e.is_connection()));
        assert_eq!(err.to_string(), "refused");
    }
}
