//! HTTP request building.
//!
//! Use [`Request::builder`] to construct requests with headers, query
//! parameters, and a [`Payload`] body.
//!
//! # Example
//!
//! ```
//! # fn main() -> weir_core::Result<()> {
//! use weir_core::{Method, Request};
//!
//! let request = Request::builder(Method::Post, "https://api.example.com/users".parse()?)
//!     .header("Accept", "application/json")
//!     .json(&serde_json::json!({"Name": "Ada"}))?
//!     .build();
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;

use bytes::Bytes;

use crate::multipart::Form;
use crate::{Method, Payload};

/// An HTTP request with method, URL, headers, and optional payload.
///
/// Requests are owned exclusively by the chain while it runs: a middleware
/// either forwards the descriptor it received or rebuilds one from
/// [`Request::into_parts`].
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    url: url::Url,
    headers: HashMap<String, String>,
    body: Option<Payload>,
}

impl Request {
    /// Creates a new [`RequestBuilder`].
    #[must_use]
    pub fn builder(method: Method, url: url::Url) -> RequestBuilder {
        RequestBuilder::new(method, url)
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Request URL.
    #[must_use]
    pub fn url(&self) -> &url::Url {
        &self.url
    }

    /// Request headers.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Mutable access to headers.
    #[must_use]
    pub fn headers_mut(&mut self) -> &mut HashMap<String, String> {
        &mut self.headers
    }

    /// Single header value by name (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Request payload.
    #[must_use]
    pub const fn body(&self) -> Option<&Payload> {
        self.body.as_ref()
    }

    /// Replace the payload, keeping everything else.
    #[must_use]
    pub fn with_body(mut self, body: Option<Payload>) -> Self {
        self.body = body;
        self
    }

    /// Consume into (method, url, headers, body).
    #[must_use]
    pub fn into_parts(self) -> (Method, url::Url, HashMap<String, String>, Option<Payload>) {
        (self.method, self.url, self.headers, self.body)
    }

    /// Rebuild from parts produced by [`Request::into_parts`].
    #[must_use]
    pub const fn from_parts(
        method: Method,
        url: url::Url,
        headers: HashMap<String, String>,
        body: Option<Payload>,
    ) -> Self {
        Self {
            method,
            url,
            headers,
            body,
        }
    }
}

/// Builder for constructing [`Request`] instances.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    method: Method,
    url: url::Url,
    headers: HashMap<String, String>,
    body: Option<Payload>,
}

impl RequestBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new(method: Method, url: url::Url) -> Self {
        Self {
            method,
            url,
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Sets a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Appends a query parameter to the URL.
    #[must_use]
    pub fn query(mut self, name: &str, value: &str) -> Self {
        self.url.query_pairs_mut().append_pair(name, value);
        self
    }

    /// Sets a structured JSON payload.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn json<T: serde::Serialize>(mut self, value: &T) -> crate::Result<Self> {
        let value = serde_json::to_value(value)?;
        self.body = Some(Payload::Json(value));
        Ok(self)
    }

    /// Sets a multipart form payload.
    #[must_use]
    pub fn form(mut self, form: Form) -> Self {
        self.body = Some(Payload::Form(form));
        self
    }

    /// Sets a raw bytes payload.
    #[must_use]
    pub fn raw(mut self, bytes: impl Into<Bytes>) -> Self {
        self.body = Some(Payload::Raw(bytes.into()));
        self
    }

    /// Sets the payload directly.
    #[must_use]
    pub fn body(mut self, body: Payload) -> Self {
        self.body = Some(body);
        self
    }

    /// Builds the [`Request`].
    #[must_use]
    pub fn build(self) -> Request {
        Request {
            method: self.method,
            url: self.url,
            headers: self.headers,
            body: self.body,
        }
    }
}
