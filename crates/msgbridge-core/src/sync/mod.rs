//! The cache synchronization subsystem: activity counts, the single-slot
//! active-query cache, and the background poll loop that keeps both warm.

pub mod cache;
pub mod counts;
pub mod poller;

pub use cache::ActiveQueryCache;
pub use counts::{ChatCountTracker, ObserveReport};
pub use poller::spawn_poll_loop;
