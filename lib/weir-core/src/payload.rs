//! Request/response payload variants and JSON helpers.

use bytes::Bytes;
use serde_json::Value;

use crate::content::APPLICATION_JSON;
use crate::multipart::Form;
use crate::Result;

/// A request or response body.
///
/// The pipeline middlewares only ever rewrite the [`Payload::Json`] variant;
/// multipart forms and raw bytes are passed through unchanged by
/// construction (see [`Payload::map_json`]).
#[derive(Debug, Clone)]
pub enum Payload {
    /// Structured JSON data.
    Json(Value),
    /// Multipart form data (file uploads, binary forms).
    Form(Form),
    /// Opaque bytes.
    Raw(Bytes),
}

impl Payload {
    /// Structured JSON data, if this is the JSON variant.
    #[must_use]
    pub const fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    /// Returns `true` if this is a multipart form.
    #[must_use]
    pub const fn is_form(&self) -> bool {
        matches!(self, Self::Form(_))
    }

    /// Returns `true` if this is raw bytes.
    #[must_use]
    pub const fn is_raw(&self) -> bool {
        matches!(self, Self::Raw(_))
    }

    /// Apply `f` to the JSON variant, passing the other variants through
    /// unchanged.
    #[must_use]
    pub fn map_json<F>(self, f: F) -> Self
    where
        F: FnOnce(Value) -> Value,
    {
        match self {
            Self::Json(value) => Self::Json(f(value)),
            other => other,
        }
    }

    /// Encode into wire form: an optional `Content-Type` value and the body
    /// bytes.
    ///
    /// Raw payloads carry no content type of their own; the caller's header
    /// (if any) stands.
    pub fn encode(self) -> Result<(Option<String>, Bytes)> {
        match self {
            Self::Json(value) => {
                let bytes = serde_json::to_vec(&value).map(Bytes::from)?;
                Ok((Some(APPLICATION_JSON.to_string()), bytes))
            }
            Self::Form(form) => {
                let (content_type, bytes) = form.into_body();
                Ok((Some(content_type), bytes))
            }
            Self::Raw(bytes) => Ok((None, bytes)),
        }
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<Form> for Payload {
    fn from(form: Form) -> Self {
        Self::Form(form)
    }
}

impl From<Bytes> for Payload {
    fn from(bytes: Bytes) -> Self {
        Self::Raw(bytes)
    }
}

/// Deserialize JSON bytes to a value with path-aware error messages.
///
/// Uses `serde_path_to_error` so failures name the exact field that did not
/// deserialize (e.g., "user.address.city").
///
/// # Errors
///
/// Returns an error if JSON deserialization fails.
pub fn from_json<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        crate::Error::json_deserialization(e.path().to_string(), e.inner().to_string())
    })
}

/// Serialize a value to JSON bytes.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn to_json<T: serde::Serialize>(value: &T) -> Result<Bytes> {
    serde_json::to_vec(value)
        .map(Bytes::from)
        .map_err(Into::into)
}
