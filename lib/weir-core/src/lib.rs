//! Core types for the weir HTTP interception pipeline.
//!
//! This crate provides the foundational types used by weir:
//! - [`Method`] - HTTP method enum
//! - [`Request`] and [`RequestBuilder`] - HTTP request types
//! - [`Response`] - HTTP response type
//! - [`Payload`] - request/response body variant (JSON, multipart, raw)
//! - [`Error`] and [`Result`] - Error handling
//! - [`ContentKind`] - closed content-type classification
//! - [`keys`] - recursive key transform/remove primitives
//! - [`HttpClient`] - transport trait the pipeline delegates to

mod client;
pub mod content;
mod error;
pub mod keys;
mod method;
mod multipart;
mod payload;
pub mod prelude;
mod request;
mod response;

pub use client::HttpClient;
pub use content::{
    APPLICATION_JSON, APPLICATION_JSON_UTF8, ContentKind, DEFAULT_ERROR_MESSAGE,
    INTERNAL_FIELD_PREFIX, MULTIPART_FORM_DATA, STATUS_BAD_REQUEST, STATUS_UNAUTHORIZED,
};
pub use error::{Error, Result};
pub use keys::{lower_first, remove_keys, transform_keys, upper_first};
pub use method::Method;
pub use multipart::{Form, Part};
pub use payload::{Payload, from_json, to_json};
pub use request::{Request, RequestBuilder};
pub use response::Response;

// Re-export http crate types for status codes and headers
pub use http::{StatusCode, header};
