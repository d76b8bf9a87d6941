//! HTTP transport implementation using hyper-util.

use std::collections::HashMap;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::{
    client::legacy::{Client, connect::HttpConnector},
    rt::TokioExecutor,
};
use weir_core::{ContentKind, Error, HttpClient, Payload, Request, Response, Result};

use crate::config::ClientConfig;

/// HTTP/1.1 and HTTP/2 over rustls, trusting the Mozilla root set.
fn https_connector() -> HttpsConnector<HttpConnector> {
    let root_store: rustls::RootCertStore =
        webpki_roots::TLS_SERVER_ROOTS.iter().cloned().collect();

    let tls_config = rustls::ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();

    HttpsConnectorBuilder::new()
        .with_tls_config(tls_config)
        .https_or_http()
        .enable_http1()
        .enable_http2()
        .build()
}

/// HTTP transport using hyper-util with connection pooling and TLS.
///
/// This is the terminal collaborator of the pipeline: it performs the actual
/// network exchange and decodes the raw response into a [`Response`] with a
/// [`Payload`] body (JSON responses are parsed eagerly so the response chain
/// can inspect them).
#[derive(Clone)]
pub struct HyperTransport {
    inner: Client<HttpsConnector<HttpConnector>, Full<Bytes>>,
    config: ClientConfig,
}

impl std::fmt::Debug for HyperTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperTransport")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl HyperTransport {
    /// Create a transport with the given configuration.
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        let connector = https_connector();

        let inner = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_idle_per_host)
            .build(connector);

        Self { inner, config }
    }

    /// Transport configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build a hyper request from a weir request, encoding the payload.
    fn build_hyper_request(request: Request) -> Result<http::Request<Full<Bytes>>> {
        let (method, url, headers, body) = request.into_parts();

        let has_content_type = headers
            .keys()
            .any(|name| name.eq_ignore_ascii_case("Content-Type"));

        let (payload_content_type, bytes) = match body {
            Some(payload) => payload.encode()?,
            None => (None, Bytes::new()),
        };

        let mut builder = http::Request::builder()
            .method(http::Method::from(method))
            .uri(url.as_str());

        for (name, value) in &headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        // The payload's own content type only applies when the caller did
        // not set one explicitly.
        if !has_content_type {
            if let Some(content_type) = payload_content_type {
                builder = builder.header("Content-Type", content_type);
            }
        }

        builder
            .body(Full::new(bytes))
            .map_err(|e| Error::invalid_request(e.to_string()))
    }

    /// Extract response headers as a `HashMap`.
    fn extract_headers(headers: &http::HeaderMap) -> HashMap<String, String> {
        headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.to_string(), v.to_string()))
            })
            .collect()
    }

    /// Decode the response body: JSON content types are parsed into a
    /// structured payload, everything else stays raw. A JSON body that fails
    /// to parse also stays raw (pass-through rather than failure).
    fn decode_payload(headers: &HashMap<String, String>, bytes: Bytes) -> Payload {
        let kind = headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case("Content-Type"))
            .map_or(ContentKind::Opaque, |(_, value)| {
                ContentKind::from_header(value)
            });

        if kind.is_json() {
            match serde_json::from_slice(&bytes) {
                Ok(value) => Payload::Json(value),
                Err(_) => Payload::Raw(bytes),
            }
        } else {
            Payload::Raw(bytes)
        }
    }

    #[allow(clippy::needless_pass_by_value)]
    fn map_hyper_error(err: hyper_util::client::legacy::Error) -> Error {
        let msg = err.to_string();

        if err.is_connect() {
            return Error::connection(msg);
        }

        if msg.contains("ssl") || msg.contains("tls") || msg.contains("certificate") {
            return Error::tls(msg);
        }

        Error::connection(msg)
    }
}

impl HttpClient for HyperTransport {
    async fn execute(&self, request: Request) -> Result<Response> {
        // Responses carry a back-reference to the request that produced them.
        let origin = request.clone();
        let hyper_request = Self::build_hyper_request(request)?;

        let response = tokio::time::timeout(self.config.timeout, self.inner.request(hyper_request))
            .await
            .map_err(|_| Error::Timeout)?
            .map_err(Self::map_hyper_error)?;

        let status = response.status().as_u16();
        let headers = Self::extract_headers(response.headers());

        let bytes = response
            .into_body()
            .collect()
            .await
            .map_err(|e| Error::connection(e.to_string()))?
            .to_bytes();

        let payload = Self::decode_payload(&headers, bytes);

        Ok(Response::new(status, headers, payload, origin))
    }
}
