//! Content-type classification and pipeline constants.

/// Plain JSON content type.
pub const APPLICATION_JSON: &str = "application/json";

/// JSON content type with an explicit UTF-8 charset qualifier.
pub const APPLICATION_JSON_UTF8: &str = "application/json;charset=UTF-8";

/// Prefix of the multipart form-data content type.
pub const MULTIPART_FORM_DATA: &str = "multipart/form-data";

/// Message used when a failing response carries no message of its own.
pub const DEFAULT_ERROR_MESSAGE: &str = "unknown error";

/// Status code classified as a bad request by the error classifier.
pub const STATUS_BAD_REQUEST: u16 = 400;

/// Status code classified as unauthorized by the error classifier.
pub const STATUS_UNAUTHORIZED: u16 = 401;

/// Reserved prefix marking request payload fields as internal-only.
pub const INTERNAL_FIELD_PREFIX: &str = "__";

/// Recognized content-type classes.
///
/// A closed enumeration: everything that is not one of the two exact JSON
/// strings is treated as opaque and passed through the pipeline untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    /// JSON, with or without the UTF-8 charset qualifier.
    Json,
    /// Anything else, including JSON with other charsets.
    Opaque,
}

impl ContentKind {
    /// Classify a raw `Content-Type` header value.
    ///
    /// Exact string match only: [`APPLICATION_JSON`] and
    /// [`APPLICATION_JSON_UTF8`] map to [`ContentKind::Json`], everything
    /// else to [`ContentKind::Opaque`].
    #[must_use]
    pub fn from_header(raw: &str) -> Self {
        match raw {
            APPLICATION_JSON | APPLICATION_JSON_UTF8 => Self::Json,
            _ => Self::Opaque,
        }
    }

    /// Returns `true` for the JSON class.
    #[must_use]
    pub const fn is_json(&self) -> bool {
        matches!(self, Self::Json)
    }
}
