//! Structured observability hook for the sync subsystem.
//!
//! The hook is invoked at the points where the sync core does visible
//! work: a facade request served, a poll tick started, the cached query
//! refreshed, a message dispatched. Implementations decide what to do
//! with the signal; the core never renders anything itself.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counter callbacks invoked by the sync core. All methods default to
/// no-ops so implementations only override what they care about.
pub trait SyncObserver: Send + Sync {
    /// A facade request (query or mutation) was served.
    fn request_served(&self) {}

    /// A background poll tick started.
    fn tick_started(&self) {}

    /// The active query's cached messages were refreshed.
    fn cache_refreshed(&self) {}

    /// A message was dispatched through the store.
    fn message_sent(&self) {}
}

/// Observer that ignores every signal.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SyncObserver for NoopObserver {}

/// Observer that keeps running counters and emits trace events.
#[derive(Debug, Default)]
pub struct TracingObserver {
    requests: AtomicU64,
    ticks: AtomicU64,
    refreshes: AtomicU64,
    sends: AtomicU64,
}

impl TracingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of (requests, ticks, refreshes, sends) served so far.
    pub fn counters(&self) -> (u64, u64, u64, u64) {
        (
            self.requests.load(Ordering::Relaxed),
            self.ticks.load(Ordering::Relaxed),
            self.refreshes.load(Ordering::Relaxed),
            self.sends.load(Ordering::Relaxed),
        )
    }
}

impl SyncObserver for TracingObserver {
    fn request_served(&self) {
        let n = self.requests.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::trace!(requests = n, "request served");
    }

    fn tick_started(&self) {
        let n = self.ticks.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::trace!(ticks = n, "poll tick started");
    }

    fn cache_refreshed(&self) {
        let n = self.refreshes.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::trace!(refreshes = n, "cache refreshed");
    }

    fn message_sent(&self) {
        let n = self.sends.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::trace!(sends = n, "message sent");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracing_observer_counts() {
        let observer = TracingObserver::new();
        observer.request_served();
        observer.request_served();
        observer.tick_started();
        observer.message_sent();
        assert_eq!(observer.counters(), (2, 1, 0, 1));
    }

    #[test]
    fn test_noop_observer_is_object_free() {
        // All defaults; just exercise the calls.
        let observer = NoopObserver;
        observer.request_served();
        observer.tick_started();
        observer.cache_refreshed();
        observer.message_sent();
    }
}
