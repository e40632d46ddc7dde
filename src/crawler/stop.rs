//! Cooperative stop signal for a running crawl

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cloneable handle that asks a crawl to stop
///
/// The crawl loop checks the flag between iterations, so the page being
/// processed when a stop is requested still completes.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    requested: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests the crawl to stop after the current iteration
    pub fn request_stop(&self) {
        self.requested.store(true, Ordering::Release);
    }

    /// Returns true once a stop has been requested
    pub fn is_stop_requested(&self) -> bool {
        self.requested.load(Ordering::Acquire)
    }
}
