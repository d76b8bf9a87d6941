//! The interception-aware HTTP client.
//!
//! [`Client`] owns a transport, two interceptor tables (one per direction)
//! and a set of default headers. Executing a request applies the default
//! headers, folds the outcome through the request interceptors, performs the
//! exchange, and folds the outcome through the response interceptors. An
//! error raised anywhere on the request side flows into the response-side
//! error handlers, so a single registration can observe every failure mode.

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::{Instrument, Level, debug, info, span, warn};
use weir_core::{DEFAULT_ERROR_MESSAGE, Error, HttpClient, Request, Response, Result};

use crate::config::ClientConfig;
use crate::interceptor::Interceptors;
use crate::transport::HyperTransport;

/// HTTP client with request and response interception.
pub struct Client<T = HyperTransport> {
    transport: T,
    request_interceptors: Interceptors<Request>,
    response_interceptors: Interceptors<Response>,
    default_headers: Mutex<HashMap<String, String>>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("request_interceptors", &self.request_interceptors.len())
            .field("response_interceptors", &self.response_interceptors.len())
            .finish_non_exhaustive()
    }
}

impl Client<HyperTransport> {
    /// Create a client backed by the hyper transport with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    /// Create a client backed by the hyper transport with the given settings.
    #[must_use]
    pub fn with_config(config: ClientConfig) -> Self {
        Self::with_transport(HyperTransport::new(config))
    }
}

impl Default for Client<HyperTransport> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: HttpClient> Client<T> {
    /// Create a client over an arbitrary transport.
    ///
    /// Mainly useful for tests and for wrapping one client in another.
    #[must_use]
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            request_interceptors: Interceptors::new(),
            response_interceptors: Interceptors::new(),
            default_headers: Mutex::new(HashMap::new()),
        }
    }

    /// Request-side interceptor table.
    #[must_use]
    pub fn request_interceptors(&self) -> &Interceptors<Request> {
        &self.request_interceptors
    }

    /// Response-side interceptor table.
    #[must_use]
    pub fn response_interceptors(&self) -> &Interceptors<Response> {
        &self.response_interceptors
    }

    /// Set a default header applied to every request that does not already
    /// carry the header itself.
    pub fn set_default_header(&self, name: impl Into<String>, value: impl Into<String>) {
        let mut headers = self
            .default_headers
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        headers.insert(name.into(), value.into());
    }

    /// Remove a default header. A no-op when the header is not set.
    pub fn remove_default_header(&self, name: &str) {
        let mut headers = self
            .default_headers
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        headers.retain(|key, _| !key.eq_ignore_ascii_case(name));
    }

    /// Current value of a default header, if set.
    #[must_use]
    pub fn default_header(&self, name: &str) -> Option<String> {
        let headers = self
            .default_headers
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.clone())
    }

    /// Execute a request through the full interception pipeline.
    pub async fn execute(&self, request: Request) -> Result<Response> {
        let span = span!(
            Level::INFO,
            "http_request",
            method = %request.method(),
            url = %request.url(),
        );

        async move {
            let request = self.apply_default_headers(request);

            let mut requested: Result<Request> = Ok(request);
            for interceptor in self.request_interceptors.snapshot() {
                requested = match requested {
                    Ok(request) => (interceptor.on_fulfilled)(request).await,
                    Err(error) => (interceptor.on_error)(error).await,
                };
            }

            // A rejection on the request side skips the exchange and flows
            // straight into the response-side error handlers.
            let mut outcome: Result<Response> = match requested {
                Ok(request) => {
                    debug!("sending request");
                    self.send(request).await
                }
                Err(error) => Err(error),
            };

            for interceptor in self.response_interceptors.snapshot() {
                outcome = match outcome {
                    Ok(response) => (interceptor.on_fulfilled)(response).await,
                    Err(error) => (interceptor.on_error)(error).await,
                };
            }

            match &outcome {
                Ok(response) => info!(status = response.status(), "request completed"),
                Err(error) => warn!(%error, "request failed"),
            }

            outcome
        }
        .instrument(span)
        .await
    }

    /// Perform the exchange, raising a status error for non-2xx responses.
    async fn send(&self, request: Request) -> Result<Response> {
        let response = self.transport.execute(request).await?;

        if response.is_success() {
            return Ok(response);
        }

        let status = response.status();
        let message = http::StatusCode::from_u16(status)
            .ok()
            .and_then(|code| code.canonical_reason())
            .unwrap_or(DEFAULT_ERROR_MESSAGE)
            .to_string();

        Err(match response.body().as_json().cloned() {
            Some(body) => Error::status_with_body(status, message, body),
            None => Error::status(status, message),
        })
    }

    /// Merge default headers into the request; request headers win.
    fn apply_default_headers(&self, request: Request) -> Request {
        let defaults = self
            .default_headers
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        if defaults.is_empty() {
            return request;
        }

        let (method, url, mut headers, body) = request.into_parts();
        for (name, value) in defaults.iter() {
            let present = headers.keys().any(|key| key.eq_ignore_ascii_case(name));
            if !present {
                headers.insert(name.clone(), value.clone());
            }
        }

        Request::from_parts(method, url, headers, body)
    }
}

impl<T: HttpClient> HttpClient for Client<T> {
    async fn execute(&self, request: Request) -> Result<Response> {
        Client::execute(self, request).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use weir_core::{Method, Payload};

    use super::*;
    use crate::middleware::handler_fn;

    /// Transport returning a canned status and JSON body, recording every
    /// request it sees.
    #[derive(Clone)]
    struct MockTransport {
        status: u16,
        body: serde_json::Value,
        seen: Arc<Mutex<Vec<Request>>>,
    }

    impl MockTransport {
        fn new(status: u16, body: serde_json::Value) -> Self {
            Self {
                status,
                body,
                seen: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn last_request(&self) -> Request {
            self.seen
                .lock()
                .expect("lock")
                .last()
                .cloned()
                .expect("at least one request")
        }
    }

    impl HttpClient for MockTransport {
        async fn execute(&self, request: Request) -> Result<Response> {
            self.seen.lock().expect("lock").push(request.clone());
            let mut headers = HashMap::new();
            headers.insert("Content-Type".to_string(), "application/json".to_string());
            Ok(Response::new(
                self.status,
                headers,
                Payload::Json(self.body.clone()),
                request,
            ))
        }
    }

    fn get(url: &str) -> Request {
        Request::builder(Method::Get, url::Url::parse(url).expect("url")).build()
    }

    #[tokio::test]
    async fn success_passes_through() {
        let client = Client::with_transport(MockTransport::new(200, json!({"ok": true})));
        let response = client.execute(get("https://api.example.com/x")).await.expect("ok");
        assert_eq!(response.status(), 200);
        assert_eq!(response.body().as_json(), Some(&json!({"ok": true})));
    }

    #[tokio::test]
    async fn non_success_becomes_status_error() {
        let client = Client::with_transport(MockTransport::new(404, json!({"Message": "gone"})));
        let err = client
            .execute(get("https://api.example.com/x"))
            .await
            .expect_err("status error");
        assert_eq!(err.http_status(), Some(404));
        assert_eq!(err.http_body(), Some(&json!({"Message": "gone"})));
    }

    #[tokio::test]
    async fn default_headers_apply_unless_overridden() {
        let transport = MockTransport::new(200, json!({}));
        let client = Client::with_transport(transport.clone());
        client.set_default_header("X-Tenant", "alpha");
        client.set_default_header("Accept", "application/json");

        let request = Request::builder(
            Method::Get,
            url::Url::parse("https://api.example.com/x").expect("url"),
        )
        .header("accept", "text/csv")
        .build();
        client.execute(request).await.expect("ok");

        let seen = transport.last_request();
        assert_eq!(seen.header("X-Tenant"), Some("alpha"));
        assert_eq!(seen.header("Accept"), Some("text/csv"));
    }

    #[tokio::test]
    async fn remove_default_header_is_case_insensitive() {
        let client = Client::with_transport(MockTransport::new(200, json!({})));
        client.set_default_header("Authorization", "Bearer t");
        client.remove_default_header("authorization");
        assert_eq!(client.default_header("Authorization"), None);
    }

    #[tokio::test]
    async fn request_interceptors_run_in_registration_order() {
        let transport = MockTransport::new(200, json!({}));
        let client = Client::with_transport(transport.clone());

        client.request_interceptors().register(
            handler_fn(|request: Request| async move {
                let (method, url, mut headers, body) = request.into_parts();
                headers.insert("X-Trace".to_string(), "first".to_string());
                Ok(Request::from_parts(method, url, headers, body))
            }),
            None,
        );
        client.request_interceptors().register(
            handler_fn(|request: Request| async move {
                let (method, url, mut headers, body) = request.into_parts();
                let trace = format!("{},second", request_trace(&headers));
                headers.insert("X-Trace".to_string(), trace);
                Ok(Request::from_parts(method, url, headers, body))
            }),
            None,
        );

        client.execute(get("https://api.example.com/x")).await.expect("ok");
        assert_eq!(
            transport.last_request().header("X-Trace"),
            Some("first,second")
        );
    }

    fn request_trace(headers: &HashMap<String, String>) -> String {
        headers.get("X-Trace").cloned().unwrap_or_default()
    }

    #[tokio::test]
    async fn request_error_reaches_response_error_handler() {
        let client = Client::with_transport(MockTransport::new(200, json!({})));

        client.request_interceptors().register(
            handler_fn(|_request: Request| async move {
                Err(Error::invalid_request("rejected before send"))
            }),
            None,
        );

        let recovered = Arc::new(Mutex::new(false));
        let flag = Arc::clone(&recovered);
        client.response_interceptors().register(
            handler_fn(|response: Response| async move { Ok(response) }),
            Some(Arc::new(move |error| {
                let flag = Arc::clone(&flag);
                Box::pin(async move {
                    *flag.lock().expect("lock") = true;
                    Err(error)
                })
            })),
        );

        let err = client
            .execute(get("https://api.example.com/x"))
            .await
            .expect_err("rejected");
        assert!(err.to_string().contains("rejected before send"));
        assert!(*recovered.lock().expect("lock"));
    }

    #[tokio::test]
    async fn response_error_handler_can_recover() {
        let client = Client::with_transport(MockTransport::new(500, json!({"Message": "boom"})));

        client.response_interceptors().register(
            handler_fn(|response: Response| async move { Ok(response) }),
            Some(Arc::new(|_error| {
                Box::pin(async move {
                    let request = Request::builder(
                        Method::Get,
                        url::Url::parse("https://api.example.com/x").expect("url"),
                    )
                    .build();
                    Ok(Response::new(
                        200,
                        HashMap::new(),
                        Payload::Json(json!({"recovered": true})),
                        request,
                    ))
                })
            })),
        );

        let response = client
            .execute(get("https://api.example.com/x"))
            .await
            .expect("recovered");
        assert_eq!(response.body().as_json(), Some(&json!({"recovered": true})));
    }

    #[tokio::test]
    async fn ejected_interceptor_no_longer_runs() {
        let transport = MockTransport::new(200, json!({}));
        let client = Client::with_transport(transport.clone());

        let handle = client.request_interceptors().register(
            handler_fn(|request: Request| async move {
                let (method, url, mut headers, body) = request.into_parts();
                headers.insert("X-Gone".to_string(), "yes".to_string());
                Ok(Request::from_parts(method, url, headers, body))
            }),
            None,
        );
        client.request_interceptors().eject(handle);

        client.execute(get("https://api.example.com/x")).await.expect("ok");
        assert_eq!(transport.last_request().header("X-Gone"), None);
    }
}
