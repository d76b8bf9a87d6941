//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types, functions, and
//! middlewares for easy glob importing:
//!
//! ```ignore
//! use weir::prelude::*;
//! ```

pub use crate::middleware::{
    AuthErrorClassifier, InboundCasing, Middleware, MiddlewareExt, OutboundCasing,
    StripInternalFields, classify_response_handler, handler_fn, identity_handler,
};
pub use crate::{
    ApiService, Client, ClientConfig, ContentKind, Error, Form, HttpClient, InterceptorHandle,
    InterceptorOptions, Method, Part, Payload, Request, RequestBuilder, Response, Result,
    ServiceConfig, StatusCode, from_json, header, to_json,
};
pub use serde::{Deserialize, Serialize};
