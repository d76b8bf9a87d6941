//! HTTP response handling.
//!
//! A [`Response`] carries the status, headers, decoded [`Payload`], and a
//! back-reference to the request that produced it. It is created by the
//! transport, passed once through the response chain, then handed to the
//! caller.

use std::collections::HashMap;

use crate::content::ContentKind;
use crate::{Payload, Request, Result};

/// HTTP response with status, headers, payload, and originating request.
#[derive(Debug, Clone)]
pub struct Response {
    status: u16,
    headers: HashMap<String, String>,
    body: Payload,
    request: Request,
}

impl Response {
    /// Creates a new response.
    #[must_use]
    pub fn new(
        status: u16,
        headers: HashMap<String, String>,
        body: Payload,
        request: Request,
    ) -> Self {
        Self {
            status,
            headers,
            body,
            request,
        }
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Response headers.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Single header value by name (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Classify the response's `Content-Type` header.
    ///
    /// Responses without the header are opaque.
    #[must_use]
    pub fn content_kind(&self) -> ContentKind {
        self.header("Content-Type")
            .map_or(ContentKind::Opaque, ContentKind::from_header)
    }

    /// Response payload.
    #[must_use]
    pub const fn body(&self) -> &Payload {
        &self.body
    }

    /// The request that produced this response.
    #[must_use]
    pub const fn request(&self) -> &Request {
        &self.request
    }

    /// Status is 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Status is 4xx.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.status >= 400 && self.status < 500
    }

    /// Status is 5xx.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.status >= 500 && self.status < 600
    }

    /// Transform the payload with a function, keeping everything else.
    #[must_use]
    pub fn map_body<F>(self, f: F) -> Self
    where
        F: FnOnce(Payload) -> Payload,
    {
        Self {
            status: self.status,
            headers: self.headers,
            body: f(self.body),
            request: self.request,
        }
    }

    /// Consume into the payload.
    #[must_use]
    pub fn into_body(self) -> Payload {
        self.body
    }

    /// Deserialize the payload into `T`.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is not JSON-shaped or does not match
    /// `T`.
    pub fn json<T: serde::de::DeserializeOwned>(self) -> Result<T> {
        match self.body {
            Payload::Json(value) => serde_json::from_value(value).map_err(Into::into),
            Payload::Raw(bytes) => crate::from_json(&bytes),
            Payload::Form(_) => Err(crate::Error::invalid_request(
                "multipart payload cannot be deserialized as JSON",
            )),
        }
    }
}
