//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and functions
//! for easy glob importing:
//!
//! ```ignore
//! use weir_core::prelude::*;
//! ```

pub use crate::{
    ContentKind, Error, Form, HttpClient, Method, Part, Payload, Request, RequestBuilder,
    Response, Result, from_json, to_json,
};
