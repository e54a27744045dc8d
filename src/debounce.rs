//! Cancellable deferred invocation on a caller-supplied millisecond clock.
//!
//! Each `trigger` replaces the pending value and pushes the deadline out;
//! `poll` hands the value back only once the input has been quiet for the
//! whole window. The browser binding drives this from a `setTimeout` handle,
//! tests and the CLI drive it with explicit timestamps.

/// Default quiescence window for search input.
pub const DEFAULT_DEBOUNCE_MS: f64 = 300.0;

#[derive(Debug, Clone)]
pub struct Debounce<T> {
    wait_ms: f64,
    pending: Option<(T, f64)>,
}

impl<T> Debounce<T> {
    pub fn new(wait_ms: f64) -> Self {
        Self {
            wait_ms: wait_ms.max(0.0),
            pending: None,
        }
    }

    pub fn wait_ms(&self) -> f64 {
        self.wait_ms
    }

    /// Schedule `value`, cancelling whatever was pending.
    pub fn trigger(&mut self, value: T, now_ms: f64) {
        self.pending = Some((value, now_ms + self.wait_ms));
    }

    /// Take the pending value if its deadline has passed.
    pub fn poll(&mut self, now_ms: f64) -> Option<T> {
        match self.pending.take() {
            Some((value, deadline)) if now_ms >= deadline => Some(value),
            other => {
                self.pending = other;
                None
            }
        }
    }

    /// Milliseconds until the pending value fires, if one is pending.
    pub fn remaining_ms(&self, now_ms: f64) -> Option<f64> {
        self.pending
            .as_ref()
            .map(|(_, deadline)| (deadline - now_ms).max(0.0))
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }
}

impl<T> Default for Debounce<T> {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_MS)
    }
}
