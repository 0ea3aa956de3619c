//! Progress reporting and cooperative cancellation
//!
//! Level 4 - Utilities

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Failure reported by a progress sink
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("progress sink failed: {0}")]
pub struct ProgressError(pub String);

/// Receives percentage updates in `0..=100`
///
/// Only ever called from the thread running the search loop, never
/// concurrently. Closures `FnMut(u8)` are sinks that cannot fail.
pub trait ProgressSink {
    fn update(&mut self, percent: u8) -> Result<(), ProgressError>;
}

impl<F: FnMut(u8)> ProgressSink for F {
    fn update(&mut self, percent: u8) -> Result<(), ProgressError> {
        self(percent);
        Ok(())
    }
}

/// Sink that ignores every update
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn update(&mut self, _percent: u8) -> Result<(), ProgressError> {
        Ok(())
    }
}

/// Shared flag a host sets to stop a running search
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Forwards updates to a sink until it fails once, then keeps the error
pub(crate) struct ProgressReporter<'a, P: ProgressSink + ?Sized> {
    sink: &'a mut P,
    error: Option<ProgressError>,
}

impl<'a, P: ProgressSink + ?Sized> ProgressReporter<'a, P> {
    pub(crate) fn new(sink: &'a mut P) -> Self {
        Self { sink, error: None }
    }

    pub(crate) fn report(&mut self, percent: u8) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.sink.update(percent.min(100)) {
            tracing::warn!("Progress sink failed, further updates skipped: {}", e);
            self.error = Some(e);
        }
    }

    pub(crate) fn into_error(self) -> Option<ProgressError> {
        self.error
    }
}
