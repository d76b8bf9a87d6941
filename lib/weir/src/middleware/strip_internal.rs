//! Internal-field stripping middleware.
//!
//! Removes payload fields marked with the reserved internal prefix before a
//! request leaves the process.

use std::sync::Arc;

use weir_core::{INTERNAL_FIELD_PREFIX, Request, remove_keys};

use super::{Handler, Middleware};

/// Request middleware that drops internal-only payload fields.
///
/// Applies only to payload-writing verbs (PUT, POST, DELETE) with a JSON
/// payload; multipart and raw bodies pass through unchanged, as do all
/// other verbs.
#[derive(Debug, Clone)]
pub struct StripInternalFields {
    prefix: String,
}

impl StripInternalFields {
    /// Create a middleware stripping the default `__` prefix.
    #[must_use]
    pub fn new() -> Self {
        Self {
            prefix: INTERNAL_FIELD_PREFIX.to_string(),
        }
    }

    /// Create a middleware stripping a custom prefix.
    #[must_use]
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for StripInternalFields {
    fn default() -> Self {
        Self::new()
    }
}

impl Middleware<Request> for StripInternalFields {
    fn wrap(&self, next: Handler<Request>) -> Handler<Request> {
        let prefix = self.prefix.clone();
        Arc::new(move |request: Request| {
            let next = Arc::clone(&next);
            let prefix = prefix.clone();
            Box::pin(async move {
                let request = if request.method().is_payload_write() {
                    let (method, url, headers, body) = request.into_parts();
                    let body = body.map(|payload| {
                        payload.map_json(|value| {
                            remove_keys(value, &|key: &str| key.starts_with(&prefix))
                        })
                    });
                    Request::from_parts(method, url, headers, body)
                } else {
                    request
                };
                next(request).await
            })
        })
    }
}
