//! Payload key-casing conversion middlewares.
//!
//! Outbound payloads are rewritten to the initial-uppercase convention and
//! inbound payloads back to initial-lowercase, so callers work with one
//! naming convention while the wire carries the other.

use std::sync::Arc;

use weir_core::{Request, Response, lower_first, transform_keys, upper_first};

use super::{Handler, Middleware};

/// Request middleware converting payload keys to the outbound convention
/// (initial-uppercase).
///
/// Same gating as field stripping: payload-writing verbs only, and only for
/// JSON payloads; multipart and raw bodies pass through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutboundCasing;

impl OutboundCasing {
    /// Create the middleware.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Middleware<Request> for OutboundCasing {
    fn wrap(&self, next: Handler<Request>) -> Handler<Request> {
        Arc::new(move |request: Request| {
            let next = Arc::clone(&next);
            Box::pin(async move {
                let request = if request.method().is_payload_write() {
                    let (method, url, headers, body) = request.into_parts();
                    let body = body
                        .map(|payload| payload.map_json(|value| transform_keys(value, &upper_first)));
                    Request::from_parts(method, url, headers, body)
                } else {
                    request
                };
                next(request).await
            })
        })
    }
}

/// Response middleware converting payload keys to the inbound convention
/// (initial-lowercase).
///
/// Applies only when the response content type is recognized as JSON;
/// anything else passes through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct InboundCasing;

impl InboundCasing {
    /// Create the middleware.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Middleware<Response> for InboundCasing {
    fn wrap(&self, next: Handler<Response>) -> Handler<Response> {
        Arc::new(move |response: Response| {
            let next = Arc::clone(&next);
            Box::pin(async move {
                let response = if response.content_kind().is_json() {
                    response.map_body(|payload| {
                        payload.map_json(|value| transform_keys(value, &lower_first))
                    })
                } else {
                    response
                };
                next(response).await
            })
        })
    }
}
