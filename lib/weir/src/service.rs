//! High-level API service over an intercepting client.
//!
//! [`ApiService`] wires a configured pair of interceptor chains into a
//! [`Client`] at construction and keeps the registration handles so the
//! chains can be torn down later. It also owns bearer-token management via
//! the client's default headers.

use std::sync::{Arc, Mutex};

use weir_core::{HttpClient, Request, Response, Result};

use crate::client::Client;
use crate::config::ClientConfig;
use crate::interceptor::InterceptorHandle;
use crate::middleware::{
    ErrorHandler, Handler, Middleware, build_chain, classify_response_handler, identity_handler,
};
use crate::transport::HyperTransport;

/// Configuration for one interception direction.
///
/// Holds the ordered middleware list, an optional terminal handler replacing
/// the direction's default, and an optional error handler. Constructed with
/// builder-style methods; an empty value still registers a chain (the
/// direction's default terminal alone).
pub struct InterceptorOptions<T> {
    middlewares: Vec<Arc<dyn Middleware<T>>>,
    terminal: Option<Handler<T>>,
    on_error: Option<ErrorHandler<T>>,
}

impl<T> Default for InterceptorOptions<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for InterceptorOptions<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterceptorOptions")
            .field("middlewares", &self.middlewares.len())
            .field("has_terminal", &self.terminal.is_some())
            .field("has_on_error", &self.on_error.is_some())
            .finish()
    }
}

impl<T> InterceptorOptions<T> {
    /// Empty options: default terminal, default error handling, no
    /// middlewares.
    #[must_use]
    pub fn new() -> Self {
        Self {
            middlewares: Vec::new(),
            terminal: None,
            on_error: None,
        }
    }

    /// Append a middleware; earlier additions run outermost.
    #[must_use]
    pub fn middleware(mut self, middleware: Arc<dyn Middleware<T>>) -> Self {
        self.middlewares.push(middleware);
        self
    }

    /// Replace the direction's default terminal handler.
    #[must_use]
    pub fn terminal(mut self, terminal: Handler<T>) -> Self {
        self.terminal = Some(terminal);
        self
    }

    /// Set the error handler for this direction.
    #[must_use]
    pub fn on_error(mut self, on_error: ErrorHandler<T>) -> Self {
        self.on_error = Some(on_error);
        self
    }

    fn into_registration(self, default_terminal: Handler<T>) -> (Handler<T>, Option<ErrorHandler<T>>) {
        let terminal = self.terminal.unwrap_or(default_terminal);
        let chain = build_chain(terminal, &self.middlewares);
        (chain, self.on_error)
    }
}

/// Service construction settings: transport configuration plus per-direction
/// interception.
///
/// A direction left as `None` registers nothing at all on that side of the
/// client, which is distinct from `Some(InterceptorOptions::new())` (an
/// interceptor running the direction's default terminal).
#[derive(Debug, Default)]
pub struct ServiceConfig {
    client: ClientConfig,
    request: Option<InterceptorOptions<Request>>,
    response: Option<InterceptorOptions<Response>>,
}

impl ServiceConfig {
    /// Settings with defaults everywhere and no interception.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the transport configuration.
    #[must_use]
    pub fn client(mut self, client: ClientConfig) -> Self {
        self.client = client;
        self
    }

    /// Enable request-side interception with the given options.
    #[must_use]
    pub fn request(mut self, options: InterceptorOptions<Request>) -> Self {
        self.request = Some(options);
        self
    }

    /// Enable response-side interception with the given options.
    #[must_use]
    pub fn response(mut self, options: InterceptorOptions<Response>) -> Self {
        self.response = Some(options);
        self
    }
}

/// An API service: a client with pre-registered interception chains and
/// bearer-token management.
pub struct ApiService<T = HyperTransport> {
    client: Arc<Client<T>>,
    request_handle: Mutex<Option<InterceptorHandle>>,
    response_handle: Mutex<Option<InterceptorHandle>>,
}

impl std::fmt::Debug for ApiService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiService").finish_non_exhaustive()
    }
}

impl ApiService<HyperTransport> {
    /// Build a service with its own hyper-backed client.
    #[must_use]
    pub fn new(config: ServiceConfig) -> Self {
        let client = Arc::new(Client::with_config(config.client.clone()));
        Self::register(client, config.request, config.response)
    }
}

impl<T: HttpClient> ApiService<T> {
    /// Build a service over an existing client, registering the given
    /// interception options on it.
    #[must_use]
    pub fn with_client(
        client: Arc<Client<T>>,
        request: Option<InterceptorOptions<Request>>,
        response: Option<InterceptorOptions<Response>>,
    ) -> Self {
        Self::register(client, request, response)
    }

    fn register(
        client: Arc<Client<T>>,
        request: Option<InterceptorOptions<Request>>,
        response: Option<InterceptorOptions<Response>>,
    ) -> Self {
        let request_handle = request.map(|options| {
            let (chain, on_error) = options.into_registration(identity_handler());
            client.request_interceptors().register(chain, on_error)
        });
        let response_handle = response.map(|options| {
            let (chain, on_error) = options.into_registration(classify_response_handler());
            client.response_interceptors().register(chain, on_error)
        });

        Self {
            client,
            request_handle: Mutex::new(request_handle),
            response_handle: Mutex::new(response_handle),
        }
    }

    /// The underlying client.
    #[must_use]
    pub fn client(&self) -> &Arc<Client<T>> {
        &self.client
    }

    /// Execute a request through the client's full pipeline.
    pub async fn execute(&self, request: Request) -> Result<Response> {
        self.client.execute(request).await
    }

    /// Set or clear the bearer token sent with every request.
    ///
    /// `Some(token)` installs an `Authorization: Bearer <token>` default
    /// header; `None` removes it.
    pub fn set_access_token(&self, token: Option<&str>) {
        match token {
            Some(token) => self
                .client
                .set_default_header("Authorization", format!("Bearer {token}")),
            None => self.client.remove_default_header("Authorization"),
        }
    }

    /// Tear down the request-side registration.
    ///
    /// A direct method rather than a returned ejector closure: the service
    /// keeps the handle itself, so there is nothing for the caller to hold
    /// onto. A no-op when no request interception was configured or it was
    /// already ejected.
    pub fn eject_request_interceptor(&self) {
        let handle = self
            .request_handle
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            self.client.request_interceptors().eject(handle);
        }
    }

    /// Tear down the response-side registration.
    ///
    /// Same contract as [`ApiService::eject_request_interceptor`]: direct
    /// method, idempotent, no-op when no response interception was
    /// configured.
    pub fn eject_response_interceptor(&self) {
        let handle = self
            .response_handle
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            self.client.response_interceptors().eject(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde_json::json;
    use weir_core::{Method, Payload};

    use super::*;
    use crate::middleware::{MiddlewareExt, OutboundCasing, StripInternalFields};

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

    fn service_over(
        transport: MockTransport,
        request: Option<InterceptorOptions<Request>>,
        response: Option<InterceptorOptions<Response>>,
    ) -> ApiService<MockTransport> {
        ApiService::with_client(Arc::new(Client::with_transport(transport)), request, response)
    }

    fn post_json(body: serde_json::Value) -> Request {
        Request::builder(
            Method::Post,
            url::Url::parse("https://api.example.com/items").expect("url"),
        )
        .json(&body)
        .expect("serializable payload")
        .build()
    }

    #[tokio::test]
    async fn request_middlewares_run_in_order() {
        let transport = MockTransport::new(200, json!({}));
        let options = InterceptorOptions::new()
            .middleware(StripInternalFields::new().boxed())
            .middleware(OutboundCasing::new().boxed());
        let service = service_over(transport.clone(), Some(options), None);

        service
            .execute(post_json(json!({"__draft": true, "name": "x"})))
            .await
            .expect("ok");

        assert_eq!(
            transport.last_request().body().and_then(Payload::as_json),
            Some(&json!({"Name": "x"}))
        );
    }

    #[tokio::test]
    async fn default_response_terminal_classifies_embedded_failures() {
        let transport = MockTransport::new(200, json!({"statusCode": 500, "message": "Oops"}));
        let service = service_over(transport, None, Some(InterceptorOptions::new()));

        let err = service
            .execute(post_json(json!({})))
            .await
            .expect_err("classified");
        assert_eq!(err.to_string(), "API error: Oops");
    }

    #[tokio::test]
    async fn no_response_options_means_no_classification() {
        let transport = MockTransport::new(200, json!({"statusCode": 500, "message": "Oops"}));
        let service = service_over(transport, None, None);

        let response = service.execute(post_json(json!({}))).await.expect("raw");
        assert_eq!(response.status(), 200);
    }

    #[tokio::test]
    async fn set_access_token_installs_bearer_header() {
        let transport = MockTransport::new(200, json!({}));
        let service = service_over(transport.clone(), None, None);

        service.set_access_token(Some("s3cr3t"));
        service.execute(post_json(json!({}))).await.expect("ok");
        assert_eq!(
            transport.last_request().header("Authorization"),
            Some("Bearer s3cr3t")
        );

        service.set_access_token(None);
        service.execute(post_json(json!({}))).await.expect("ok");
        assert_eq!(transport.last_request().header("Authorization"), None);
    }

    #[tokio::test]
    async fn eject_removes_registration_and_is_idempotent() {
        let transport = MockTransport::new(200, json!({}));
        let options = InterceptorOptions::new().middleware(OutboundCasing::new().boxed());
        let service = service_over(transport.clone(), Some(options), None);

        assert_eq!(service.client().request_interceptors().len(), 1);
        service.eject_request_interceptor();
        assert!(service.client().request_interceptors().is_empty());
        service.eject_request_interceptor();

        service
            .execute(post_json(json!({"name": "x"})))
            .await
            .expect("ok");
        assert_eq!(
            transport.last_request().body().and_then(Payload::as_json),
            Some(&json!({"name": "x"}))
        );
    }

    #[tokio::test]
    async fn eject_without_configuration_is_a_noop() {
        let transport = MockTransport::new(200, json!({}));
        let service = service_over(transport, None, None);
        service.eject_request_interceptor();
        service.eject_response_interceptor();
    }

    #[tokio::test]
    async fn custom_terminal_replaces_default() {
        let transport = MockTransport::new(200, json!({"statusCode": 500}));
        let options = InterceptorOptions::new()
            .terminal(crate::middleware::handler_fn(|response: Response| async move {
                Ok(response)
            }));
        let service = service_over(transport, None, Some(options));

        // The replacement terminal skips embedded-status classification.
        let response = service.execute(post_json(json!({}))).await.expect("ok");
        assert_eq!(response.status(), 200);
    }
}
