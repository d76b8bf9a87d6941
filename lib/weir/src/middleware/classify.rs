//! Response and error classification.
//!
//! [`classify_response`] is the default terminal handler of the response
//! chain: it turns an embedded non-200 status in an otherwise successful
//! JSON exchange into a domain error. [`AuthErrorClassifier`] is an error
//! handler (invoked directly on the rejection path, never chain-composed)
//! that centralizes unauthorized and bad-request handling.

use std::sync::Arc;

use serde_json::Value;
use tracing::warn;
use weir_core::{
    DEFAULT_ERROR_MESSAGE, Error, Response, Result, STATUS_BAD_REQUEST, STATUS_UNAUTHORIZED,
};

use super::{BoxFuture, ErrorHandler, Handler};

/// Classify a completed response, raising a domain error when the payload
/// embeds a failing status.
///
/// For JSON responses (plain or UTF-8 charset), reads the payload's
/// `statusCode` field: present and not 200 means failure, and the payload's
/// `message` field (or a fixed default) becomes the error message. A missing
/// field, a 200 value, or any non-JSON content type passes the response
/// through unchanged.
pub async fn classify_response(response: Response) -> Result<Response> {
    if !response.content_kind().is_json() {
        return Ok(response);
    }

    let embedded = response
        .body()
        .as_json()
        .and_then(|value| value.get("statusCode"))
        .and_then(Value::as_i64);

    match embedded {
        Some(code) if code != 200 => {
            let message = response
                .body()
                .as_json()
                .and_then(|value| value.get("message"))
                .and_then(Value::as_str)
                .unwrap_or(DEFAULT_ERROR_MESSAGE)
                .to_string();
            warn!(code, %message, "response payload signals failure");
            Err(Error::api(message))
        }
        _ => Ok(response),
    }
}

/// The response classifier as a chain terminal handler.
///
/// Used as the default terminal of the response chain unless the caller
/// supplies a replacement.
#[must_use]
pub fn classify_response_handler() -> Handler<Response> {
    Arc::new(|response| Box::pin(classify_response(response)))
}

/// Recovery callback invoked for unauthorized responses.
///
/// Its outcome (success or rejection) becomes the chain's outcome; typical
/// implementations refresh credentials and retry, or redirect to login.
pub type RecoveryFn = Arc<dyn Fn(Error) -> BoxFuture<Result<Response>> + Send + Sync>;

/// Error handler classifying unauthorized and bad-request failures.
///
/// - 401 with a recovery callback: the callback's outcome is returned.
/// - 401 without a callback: the original error is propagated unchanged
///   (with a warning). Swallowing it would mask authentication failures as
///   empty successes.
/// - 400: raised as a domain error using the response body's `Message`
///   field, defaulting to a fixed message.
/// - Anything else: propagated unchanged.
#[derive(Clone, Default)]
pub struct AuthErrorClassifier {
    on_unauthorized: Option<RecoveryFn>,
}

impl std::fmt::Debug for AuthErrorClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthErrorClassifier")
            .field("has_recovery", &self.on_unauthorized.is_some())
            .finish()
    }
}

impl AuthErrorClassifier {
    /// Create a classifier without a recovery callback.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a classifier with an unauthorized-recovery callback.
    pub fn with_recovery<F, Fut>(recover: F) -> Self
    where
        F: Fn(Error) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response>> + Send + 'static,
    {
        Self {
            on_unauthorized: Some(Arc::new(move |error| Box::pin(recover(error)))),
        }
    }

    /// Classify a single error.
    pub async fn classify(&self, error: Error) -> Result<Response> {
        match error.http_status() {
            Some(STATUS_UNAUTHORIZED) => match &self.on_unauthorized {
                Some(recover) => {
                    warn!("unauthorized response, invoking recovery callback");
                    recover(error).await
                }
                None => {
                    warn!("unauthorized response with no recovery callback configured");
                    Err(error)
                }
            },
            Some(STATUS_BAD_REQUEST) => {
                let message = error
                    .http_body()
                    .and_then(|body| body.get("Message"))
                    .and_then(Value::as_str)
                    .unwrap_or(DEFAULT_ERROR_MESSAGE)
                    .to_string();
                Err(Error::api(message))
            }
            _ => Err(error),
        }
    }

    /// Convert into an [`ErrorHandler`] for interceptor registration.
    #[must_use]
    pub fn into_handler(self) -> ErrorHandler<Response> {
        Arc::new(move |error| {
            let classifier = self.clone();
            Box::pin(async move { classifier.classify(error).await })
        })
    }
}
