//! Interceptor slot tables.
//!
//! A [`Interceptors<T>`] table holds the handlers registered with one
//! interception point (outbound requests or inbound responses). Registration
//! returns an opaque [`InterceptorHandle`] used exactly once to eject the
//! registration; ejection tombstones the slot so other handles stay valid.

use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::middleware::{ErrorHandler, Handler, reraise_handler};

/// Opaque token identifying a registration, used once to eject it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterceptorHandle(usize);

/// One registered interceptor: a fulfilled handler and an error handler.
pub(crate) struct Interceptor<T> {
    pub(crate) on_fulfilled: Handler<T>,
    pub(crate) on_error: ErrorHandler<T>,
}

impl<T> Clone for Interceptor<T> {
    fn clone(&self) -> Self {
        Self {
            on_fulfilled: Arc::clone(&self.on_fulfilled),
            on_error: Arc::clone(&self.on_error),
        }
    }
}

/// Slot table for one interception direction.
pub struct Interceptors<T> {
    slots: Mutex<Vec<Option<Interceptor<T>>>>,
}

impl<T: Send + 'static> Default for Interceptors<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + 'static> Interceptors<T> {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(Vec::new()),
        }
    }

    /// Register a fulfilled handler and an optional error handler
    /// (default: re-raise unchanged). Returns the ejection handle.
    pub fn register(
        &self,
        on_fulfilled: Handler<T>,
        on_error: Option<ErrorHandler<T>>,
    ) -> InterceptorHandle {
        let interceptor = Interceptor {
            on_fulfilled,
            on_error: on_error.unwrap_or_else(reraise_handler),
        };

        let mut slots = self
            .slots
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        slots.push(Some(interceptor));
        let handle = InterceptorHandle(slots.len() - 1);
        debug!(slot = handle.0, "interceptor registered");
        handle
    }

    /// Unregister the interceptor behind `handle`.
    ///
    /// A no-op if the slot was already ejected.
    pub fn eject(&self, handle: InterceptorHandle) {
        let mut slots = self
            .slots
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(slot) = slots.get_mut(handle.0) {
            if slot.take().is_some() {
                debug!(slot = handle.0, "interceptor ejected");
            }
        }
    }

    /// Number of live registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .iter()
            .filter(|slot| slot.is_some())
            .count()
    }

    /// Returns `true` if no interceptor is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clone out the live interceptors in registration order.
    ///
    /// Traversal works on a snapshot so a chain invocation is unaffected by
    /// concurrent registration changes.
    pub(crate) fn snapshot(&self) -> Vec<Interceptor<T>> {
        self.slots
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .iter()
            .flatten()
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::identity_handler;

    #[test]
    fn register_and_eject() {
        let table: Interceptors<u32> = Interceptors::new();
        assert!(table.is_empty());

        let handle = table.register(identity_handler(), None);
        assert_eq!(table.len(), 1);

        table.eject(handle);
        assert!(table.is_empty());
    }

    #[test]
    fn eject_twice_is_a_noop() {
        let table: Interceptors<u32> = Interceptors::new();
        let handle = table.register(identity_handler(), None);
        table.eject(handle);
        table.eject(handle);
        assert!(table.is_empty());
    }

    #[test]
    fn ejecting_one_slot_keeps_others_valid() {
        let table: Interceptors<u32> = Interceptors::new();
        let first = table.register(identity_handler(), None);
        let _second = table.register(identity_handler(), None);

        table.eject(first);
        assert_eq!(table.len(), 1);
        assert_eq!(table.snapshot().len(), 1);
    }

    #[tokio::test]
    async fn default_error_handler_reraises() {
        let table: Interceptors<u32> = Interceptors::new();
        table.register(identity_handler(), None);

        let interceptor = table.snapshot().remove(0);
        let err = (interceptor.on_error)(weir_core::Error::Timeout)
            .await
            .expect_err("re-raise");
        assert!(err.is_timeout());
    }
}
