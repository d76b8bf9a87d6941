//! Error types for weir.

use derive_more::{Display, Error, From};

/// Main error type for weir operations.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// Domain error: the service signalled a logical failure despite a
    /// successful transport-level exchange (embedded non-200 status,
    /// bad-request classification).
    #[display("API error: {message}")]
    #[from(skip)]
    Api {
        /// Human-readable, caller-facing message.
        message: String,
    },

    /// Transport-level HTTP failure (non-2xx status code).
    ///
    /// Carries the decoded response body so error handlers can inspect it.
    #[display("HTTP error {status}: {message}")]
    #[from(skip)]
    Status {
        /// HTTP status code.
        status: u16,
        /// Error message.
        message: String,
        /// Decoded JSON body, if the response carried one.
        #[error(not(source))]
        body: Option<serde_json::Value>,
    },

    /// Network/connection errors.
    #[display("connection error: {_0}")]
    #[from(skip)]
    Connection(#[error(not(source))] String),

    /// TLS/SSL errors.
    #[display("TLS error: {_0}")]
    #[from(skip)]
    Tls(#[error(not(source))] String),

    /// Request timeout.
    #[display("request timeout")]
    #[from(skip)]
    Timeout,

    /// Invalid request configuration.
    #[display("invalid request: {_0}")]
    #[from(skip)]
    InvalidRequest(#[error(not(source))] String),

    /// JSON serialization error.
    #[display("JSON serialization error: {_0}")]
    #[from]
    JsonSerialization(serde_json::Error),

    /// JSON deserialization error with path context.
    #[display("JSON deserialization error at '{path}': {message}")]
    #[from(skip)]
    JsonDeserialization {
        /// JSON path to the error (e.g., "user.address.city").
        path: String,
        /// Error message.
        message: String,
    },

    /// URL parsing error.
    #[display("invalid URL: {_0}")]
    #[from]
    InvalidUrl(url::ParseError),
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a domain error with the given message.
    #[must_use]
    pub fn api(message: impl Into<String>) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a transport-level HTTP error from status code and message.
    #[must_use]
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
            body: None,
        }
    }

    /// Create a transport-level HTTP error with a decoded body.
    #[must_use]
    pub fn status_with_body(
        status: u16,
        message: impl Into<String>,
        body: serde_json::Value,
    ) -> Self {
        Self::Status {
            status,
            message: message.into(),
            body: Some(body),
        }
    }

    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a TLS error.
    #[must_use]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls(message.into())
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create a JSON deserialization error with path context.
    #[must_use]
    pub fn json_deserialization(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::JsonDeserialization {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Returns the HTTP status code if this is a transport-level HTTP error.
    #[must_use]
    pub const fn http_status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the decoded response body if this is an HTTP error carrying one.
    #[must_use]
    pub const fn http_body(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Status { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    /// Returns `true` if this is a domain error.
    #[must_use]
    pub const fn is_api(&self) -> bool {
        matches!(self, Self::Api { .. })
    }

    /// Returns `true` if this is a timeout error.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Returns `true` if this is a client error (4xx).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.http_status().is_some_and(|s| (400..500).contains(&s))
    }

    /// Returns `true` if this is a server error (5xx).
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.http_status().is_some_and(|s| (500..600).contains(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = Error::api("token expired");
        assert_eq!(err.to_string(), "API error: token expired");

        let err = Error::status(404, "Not Found");
        assert_eq!(err.to_string(), "HTTP error 404: Not Found");

        let err = Error::Timeout;
        assert_eq!(err.to_string(), "request timeout");

        let err = Error::connection("failed to connect");
        assert_eq!(err.to_string(), "connection error: failed to connect");
    }

    #[test]
    fn error_http_status() {
        let err = Error::status(404, "Not Found");
        assert_eq!(err.http_status(), Some(404));
        assert!(err.is_client_error());
        assert!(!err.is_server_error());

        let err = Error::status(503, "Service Unavailable");
        assert!(err.is_server_error());

        assert_eq!(Error::Timeout.http_status(), None);
        assert_eq!(Error::api("nope").http_status(), None);
    }

    #[test]
    fn error_http_body() {
        let body = serde_json::json!({"Message": "Invalid"});
        let err = Error::status_with_body(400, "Bad Request", body.clone());
        assert_eq!(err.http_body(), Some(&body));

        assert!(Error::status(400, "Bad Request").http_body().is_none());
        assert!(Error::Timeout.http_body().is_none());
    }

    #[test]
    fn error_is_api() {
        assert!(Error::api("oops").is_api());
        assert!(!Error::status(400, "Bad Request").is_api());
    }
}
