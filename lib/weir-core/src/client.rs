//! HTTP transport trait.
//!
//! [`HttpClient`] is the seam between the interception pipeline and the
//! transport layer: the pipeline never performs network I/O itself, it only
//! transforms the values flowing into and out of an implementation of this
//! trait.

use std::future::Future;

use crate::{Request, Response, Result};

/// Core HTTP transport trait.
///
/// Implementations should be async-first and support connection pooling.
pub trait HttpClient: Send + Sync {
    /// Execute an HTTP request and return the response.
    ///
    /// # Errors
    ///
    /// Returns an error if the exchange fails for any reason:
    /// - Network errors
    /// - TLS errors
    /// - Timeouts
    /// - Invalid response
    fn execute(&self, request: Request) -> impl Future<Output = Result<Response>> + Send;
}
