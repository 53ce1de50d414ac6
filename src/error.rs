//! Error types for the Das Budget API client.
//!
//! Every public operation fails with one of three kinds of [`Error`]:
//! the identity backend rejected the refresh secret, the caller passed a
//! malformed argument, or a resource request failed. The underlying
//! [`TransportError`] is always kept as the error's `source()`.

use serde_json::Value;
use thiserror::Error;

/// A specialized `Result` type for Das Budget operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for all Das Budget API operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Exchanging the refresh secret for an access token failed.
    ///
    /// Fatal to the operation that triggered the refresh. The client never
    /// retries it on its own.
    #[error("Authentication failed: {0}")]
    Authentication(#[source] TransportError),

    /// An argument was rejected before any request was sent.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A resource request failed in transport or returned a non-2xx status.
    #[error("Fetch failed: {0}")]
    Fetch(#[source] TransportError),

    /// The client could not be configured.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Low-level failure of a single HTTP exchange.
#[derive(Error, Debug)]
pub enum TransportError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// A header value could not be encoded
    #[error("Invalid header value for {0}")]
    InvalidHeader(String),

    /// The server answered 2xx with a body that makes no sense
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The server answered with a non-success status
    #[error("API error: status={status}, message={message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Human-readable error message
        message: String,
        /// Raw response body for debugging
        body: Value,
    },
}

impl Error {
    /// Returns `true` if this is an authentication-related error.
    pub fn is_auth_error(&self) -> bool {
        match self {
            Error::Authentication(_) => true,
            Error::Fetch(err) => matches!(err.status(), Some(401) | Some(403)),
            _ => false,
        }
    }

    /// Returns `true` if this error is potentially transient and the
    /// operation could be retried by the caller.
    ///
    /// # Example
    ///
    /// ```
    /// use dasbudget_rs::Error;
    ///
    /// fn handle_error(err: Error) {
    ///     if err.is_retryable() {
    ///         println!("Retrying operation...");
    ///     }
    /// }
    /// ```
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Authentication(err) | Error::Fetch(err) => err.is_retryable(),
            _ => false,
        }
    }

    /// Returns `true` if this error indicates a client-side issue
    /// (invalid input, bad request, etc.).
    pub fn is_client_error(&self) -> bool {
        match self {
            Error::InvalidArgument(_) | Error::Config(_) => true,
            Error::Authentication(err) | Error::Fetch(err) => {
                matches!(err.status(), Some(status) if (400..500).contains(&status))
            }
        }
    }

    /// Returns `true` if this error indicates a server-side issue.
    pub fn is_server_error(&self) -> bool {
        match self {
            Error::Authentication(err) | Error::Fetch(err) => {
                matches!(err.status(), Some(status) if status >= 500)
            }
            _ => false,
        }
    }

    /// HTTP status of the failed exchange, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Authentication(err) | Error::Fetch(err) => err.status(),
            _ => None,
        }
    }
}

impl TransportError {
    /// HTTP status code carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Api { status, .. } => Some(*status),
            TransportError::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` for timeouts, connection failures, throttling and 5xx.
    pub fn is_retryable(&self) -> bool {
        match self {
            TransportError::Http(err) => err.is_timeout() || err.is_connect(),
            TransportError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Create an API error from a non-success response body.
    ///
    /// The identity backend nests its message under `error.message`, the
    /// resource API uses a top-level `error` or `message` string.
    pub(crate) fn from_api_response(status: u16, body: Value) -> Self {
        let message = body
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
            .or_else(|| body.get("error").and_then(|e| e.as_str()))
            .or_else(|| body.get("message").and_then(|m| m.as_str()))
            .unwrap_or("Unknown API error")
            .to_string();

        TransportError::Api {
            status,
            message,
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_from_api_response_nested_message() {
        let body = serde_json::json!({
            "error": {
                "code": 400,
                "message": "INVALID_REFRESH_TOKEN"
            }
        });

        match TransportError::from_api_response(400, body) {
            TransportError::Api {
                status, message, ..
            } => {
                assert_eq!(status, 400);
                assert_eq!(message, "INVALID_REFRESH_TOKEN");
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn test_from_api_response_flat_message() {
        let body = serde_json::json!({ "error": "bucket not found" });
        let err = TransportError::from_api_response(404, body);
        assert!(err.to_string().contains("bucket not found"));

        let err = TransportError::from_api_response(500, Value::Null);
        assert!(err.to_string().contains("Unknown API error"));
    }

    #[test]
    fn test_error_classification() {
        let auth = Error::Authentication(TransportError::from_api_response(
            400,
            Value::Null,
        ));
        assert!(auth.is_auth_error());
        assert!(auth.is_client_error());
        assert!(!auth.is_retryable());

        let unauthorized = Error::Fetch(TransportError::from_api_response(401, Value::Null));
        assert!(unauthorized.is_auth_error());

        let server = Error::Fetch(TransportError::from_api_response(503, Value::Null));
        assert!(server.is_server_error());
        assert!(server.is_retryable());
        assert_eq!(server.status(), Some(503));

        let invalid = Error::InvalidArgument("since must be finite".into());
        assert!(invalid.is_client_error());
        assert!(!invalid.is_retryable());
        assert_eq!(invalid.status(), None);
    }

    #[test]
    fn test_source_is_preserved() {
        let err = Error::Fetch(TransportError::from_api_response(502, Value::Null));
        let source = err.source().expect("fetch errors carry their cause");
        assert!(source.to_string().contains("status=502"));
    }
}
