use reqwest::StatusCode;
use thiserror::Error;

use health_tracker_domain::PaginationError;

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Error type for REST client operations
#[derive(Error, Debug)]
pub enum ClientError {
    /// Network or protocol failure reported by the HTTP client
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-2xx status
    #[error("Server returned {status}{}", describe_error_key(.error_key))]
    Status {
        status: StatusCode,
        /// Error key from the backend's `X-<app>-error` header, if any
        error_key: Option<String>,
        /// Raw response body
        body: String,
    },

    /// Response body could not be decoded into the expected type
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Request URL could not be built
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Pagination headers were malformed
    #[error("Pagination error: {0}")]
    Pagination(#[from] PaginationError),

    /// Client configuration was invalid
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// HTTP status of the failed response, if the server answered
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Http(e) => e.status(),
            _ => None,
        }
    }

    /// Whether the server reported that the entity does not exist
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }
}

fn describe_error_key(error_key: &Option<String>) -> String {
    error_key.as_ref().map(|k| format!(" ({})", k)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = ClientError::Status {
            status: StatusCode::BAD_REQUEST,
            error_key: Some("error.idexists".to_string()),
            body: String::new(),
        };
        assert_eq!(err.to_string(), "Server returned 400 Bad Request (error.idexists)");
        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
        assert!(!err.is_not_found());

        let err = ClientError::Status {
            status: StatusCode::NOT_FOUND,
            error_key: None,
            body: String::new(),
        };
        assert_eq!(err.to_string(), "Server returned 404 Not Found");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_config_error_has_no_status() {
        let err = ClientError::Config("bad timeout".to_string());
        assert_eq!(err.status(), None);
    }
}
