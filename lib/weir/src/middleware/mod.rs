//! Composable middlewares over request and response handlers.
//!
//! A [`Handler<T>`] is an async, fallible `T -> T` transformation; the
//! request chain is a `Handler<Request>` and the response chain a
//! `Handler<Response>`. A [`Middleware`] wraps "the rest of the chain" into
//! a new handler, and [`build_chain`] folds an ordered list of middlewares
//! around a terminal handler so that the first middleware in the list runs
//! outermost.
//!
//! A middleware must either invoke the handler it received exactly once
//! (with a possibly transformed input), short-circuit by returning a value,
//! or return an error. Receiving `next` by value is what enforces the
//! at-most-once contract by construction.
//!
//! # Example
//!
//! ```ignore
//! use weir::middleware::{build_chain, identity_handler, OutboundCasing, StripInternalFields};
//!
//! // Stripping runs before case conversion; order is caller-controlled.
//! let chain = build_chain(
//!     identity_handler(),
//!     &[
//!         StripInternalFields::new().boxed(),
//!         OutboundCasing::new().boxed(),
//!     ],
//! );
//! ```

mod casing;
mod classify;
mod strip_internal;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

pub use casing::{InboundCasing, OutboundCasing};
pub use classify::{AuthErrorClassifier, RecoveryFn, classify_response, classify_response_handler};
pub use strip_internal::StripInternalFields;

use weir_core::{Error, Result};

/// Boxed future used by handler signatures.
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

/// An async, fallible transformation from `T` to `T`.
///
/// The composed chain has this same signature, so it is a drop-in
/// replacement for a single handler.
pub type Handler<T> = Arc<dyn Fn(T) -> BoxFuture<Result<T>> + Send + Sync>;

/// An error handler for one side of the pipeline: it may recover by
/// returning `Ok`, or re-raise.
pub type ErrorHandler<T> = Arc<dyn Fn(Error) -> BoxFuture<Result<T>> + Send + Sync>;

/// A composable wrapper around a handler.
///
/// Implementors take "the rest of the chain" and return a new handler; this
/// single method is the unit of composition.
pub trait Middleware<T>: Send + Sync {
    /// Wrap the inner handler into a new one.
    fn wrap(&self, next: Handler<T>) -> Handler<T>;
}

impl<T, F> Middleware<T> for F
where
    F: Fn(Handler<T>) -> Handler<T> + Send + Sync,
{
    fn wrap(&self, next: Handler<T>) -> Handler<T> {
        self(next)
    }
}

/// Extension for turning a concrete middleware into a trait object.
pub trait MiddlewareExt<T>: Middleware<T> + Sized + 'static {
    /// Box this middleware for use in a chain list.
    fn boxed(self) -> Arc<dyn Middleware<T>> {
        Arc::new(self)
    }
}

impl<T, M> MiddlewareExt<T> for M where M: Middleware<T> + Sized + 'static {}

/// Fold an ordered list of middlewares around `terminal`.
///
/// The first middleware in the list becomes the outermost wrapper: a chain
/// built from `[A, B]` behaves as `A(B(terminal))`, so A's pre-logic runs
/// first and its post-logic last. Order is caller-controlled and
/// semantically significant.
///
/// The composed handler is immutable once built; changing middlewares means
/// ejecting the old registration and registering a new chain.
#[must_use]
pub fn build_chain<T>(terminal: Handler<T>, middlewares: &[Arc<dyn Middleware<T>>]) -> Handler<T> {
    middlewares
        .iter()
        .rev()
        .fold(terminal, |next, middleware| middleware.wrap(next))
}

/// Build a handler from an async closure.
pub fn handler_fn<T, F, Fut>(f: F) -> Handler<T>
where
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T>> + Send + 'static,
{
    Arc::new(move |value| Box::pin(f(value)))
}

/// The identity handler: resolves its input unchanged.
///
/// Default terminal for the request chain.
#[must_use]
pub fn identity_handler<T: Send + 'static>() -> Handler<T> {
    Arc::new(|value| Box::pin(async move { Ok(value) }))
}

/// The re-raise error handler: propagates the error unchanged.
///
/// Default error handler for both directions.
#[must_use]
pub fn reraise_handler<T: Send + 'static>() -> ErrorHandler<T> {
    Arc::new(|error| Box::pin(async move { Err(error) }))
}
