// ABOUTME: Single-shot completion handler for callback-style operations
// ABOUTME: Consuming `complete` makes double delivery impossible to express

use std::fmt;

/// A callback that runs at most once.
///
/// `complete` takes `self`, so a handler cannot be fired twice. Dropping a
/// handler that was never fired is logged. If a fallback value was given,
/// the handler receives it on drop, so it still runs exactly once.
pub struct Completion<T> {
    handler: Option<Box<dyn FnOnce(T) + Send + 'static>>,
    fallback: Option<T>,
    label: &'static str,
}

impl<T> Completion<T> {
    pub fn new<F>(handler: F) -> Self
    where
        F: FnOnce(T) + Send + 'static,
    {
        Self::labeled("completion", handler)
    }

    /// Like `new`, with a name used when the handler is dropped unfired.
    pub fn labeled<F>(label: &'static str, handler: F) -> Self
    where
        F: FnOnce(T) + Send + 'static,
    {
        Self {
            handler: Some(Box::new(handler)),
            fallback: None,
            label,
        }
    }

    /// Like `labeled`, but a drop without `complete` delivers `fallback`.
    pub fn with_fallback<F>(label: &'static str, fallback: T, handler: F) -> Self
    where
        F: FnOnce(T) + Send + 'static,
    {
        let mut completion = Self::labeled(label, handler);
        completion.fallback = Some(fallback);
        completion
    }

    /// Replace the value delivered on drop.
    pub fn set_fallback(&mut self, fallback: T) {
        self.fallback = Some(fallback);
    }

    pub fn complete(mut self, value: T) {
        self.fallback = None;
        if let Some(handler) = self.handler.take() {
            handler(value);
        }
    }
}

impl<T> Drop for Completion<T> {
    fn drop(&mut self) {
        let Some(handler) = self.handler.take() else {
            return;
        };
        tracing::warn!(
            label = self.label,
            fallback = self.fallback.is_some(),
            "completion dropped without being invoked"
        );
        if let Some(value) = self.fallback.take() {
            handler(value);
        }
    }
}

impl<T> fmt::Debug for Completion<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion")
            .field("label", &self.label)
            .field("pending", &self.handler.is_some())
            .finish()
    }
}
