//! "Ignore late response" discipline for consumers that can go away.
//!
//! A view creates a [`ViewScope`] when it mounts and calls
//! [`ViewScope::unmount`] when it is torn down. Results awaited through
//! [`ViewScope::guard`] are handed back only while the scope is mounted;
//! no request is aborted, the late value is simply dropped.

#[cfg(test)]
#[path = "scope_test.rs"]
mod scope_test;

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Clone, Debug)]
pub struct ViewScope {
    mounted: Arc<AtomicBool>,
}

impl ViewScope {
    #[must_use]
    pub fn new() -> Self {
        Self { mounted: Arc::new(AtomicBool::new(true)) }
    }

    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::Release);
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::Acquire)
    }

    /// Await `future`; return its output only if the scope is still mounted.
    pub async fn guard<F: Future>(&self, future: F) -> Option<F::Output> {
        let output = future.await;
        if self.is_mounted() {
            Some(output)
        } else {
            tracing::debug!("scope unmounted; discarding late response");
            None
        }
    }
}

impl Default for ViewScope {
    fn default() -> Self {
        Self::new()
    }
}
