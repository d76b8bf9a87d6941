//! Config-driven HTTP request/response interception.
//!
//! Build an [`ApiService`] from a [`ServiceConfig`]: each direction gets an
//! ordered middleware chain folded around a terminal handler and registered
//! as an interceptor on the underlying [`Client`]. Registration returns a
//! handle kept by the service, so the whole chain can be ejected later.
//!
//! # Example
//!
//! ```ignore
//! use weir::prelude::*;
//!
//! let service = ApiService::new(
//!     ServiceConfig::new()
//!         .request(
//!             InterceptorOptions::new()
//!                 .middleware(StripInternalFields::new().boxed())
//!                 .middleware(OutboundCasing::new().boxed()),
//!         )
//!         .response(InterceptorOptions::new().middleware(InboundCasing::new().boxed())),
//! );
//!
//! service.set_access_token(Some("token"));
//! let url = url::Url::parse("https://api.example.com/users/42")?;
//! let response = service.execute(Request::builder(Method::Get, url).build()).await?;
//! ```

mod client;
mod config;
mod interceptor;
pub mod middleware;
pub mod prelude;
mod service;
mod transport;

// Re-export client types
pub use client::Client;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use interceptor::{InterceptorHandle, Interceptors};
pub use service::{ApiService, InterceptorOptions, ServiceConfig};
pub use transport::HyperTransport;

// Re-export core types
pub use weir_core::{
    ContentKind, Error, Form, HttpClient, Method, Part, Payload, Request, RequestBuilder,
    Response, Result, from_json, lower_first, remove_keys, to_json, transform_keys, upper_first,
};

// Re-export the named pipeline constants
pub use weir_core::{
    APPLICATION_JSON, APPLICATION_JSON_UTF8, DEFAULT_ERROR_MESSAGE, INTERNAL_FIELD_PREFIX,
    MULTIPART_FORM_DATA, STATUS_BAD_REQUEST, STATUS_UNAUTHORIZED,
};

// Re-export http types for status codes and headers
pub use weir_core::{StatusCode, header};

// Re-export url for request building
pub use url;
