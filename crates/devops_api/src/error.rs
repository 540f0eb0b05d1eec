//! Error model used by DevOps API client operations.

use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DevOpsError>;

/// Represents the failure modes of a DevOps API call: non-success HTTP statuses with the raw body, rejected credentials, timeouts, network issues, payload decoding problems, invalid client configuration and other unexpected errors.
#[derive(Debug, Error)]
pub enum DevOpsError {
    #[error("http {status}: {message}")]
    Http { status: StatusCode, message: String },
    #[error("authentication error: {0}")]
    Authentication(String),
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("unexpected error: {0}")]
    Other(String),
}

impl DevOpsError {
    /// Constructs an HTTP error variant from a status and raw response body.
    pub fn http(status: StatusCode, message: impl Into<String>) -> Self {
        DevOpsError::Http {
            status,
            message: message.into(),
        }
    }

    /// Returns the HTTP status carried by the error, when the server answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            DevOpsError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for DevOpsError {
    /// Converts reqwest errors into semantic DevOpsError variants.
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DevOpsError::Timeout(err.to_string())
        } else if err.is_status() {
            let status = err.status().unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            DevOpsError::Http {
                status,
                message: err.to_string(),
            }
        } else if err.is_connect() {
            DevOpsError::Network(err.to_string())
        } else if err.is_decode() {
            DevOpsError::Serialization(err.to_string())
        } else {
            DevOpsError::Other(err.to_string())
        }
    }
}

impl From<serde_json::Error> for DevOpsError {
    /// Converts serde_json decode/encode failures into serialization errors.
    fn from(err: serde_json::Error) -> Self {
        DevOpsError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::DevOpsError;
    use reqwest::StatusCode;

    #[test]
    fn status_is_exposed_only_for_http_errors() {
        let http = DevOpsError::http(StatusCode::NOT_FOUND, "missing");
        assert_eq!(http.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(http.to_string(), "http 404 Not Found: missing");

        let other = DevOpsError::Network("refused".to_string());
        assert!(other.status().is_none());
    }

    #[test]
    fn json_errors_become_serialization_errors() {
        let err = serde_json::from_str::<u32>("nope").unwrap_err();
        let converted = DevOpsError::from(err);
        assert!(matches!(converted, DevOpsError::Serialization(_)));
    }
}
