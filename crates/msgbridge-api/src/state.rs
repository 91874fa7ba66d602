//! Application state wiring the sync service to its concrete store.
//!
//! The core is generic over `MessageStore` and `SyncObserver`; AppState
//! pins them to the infra implementations and owns the poll loop's
//! lifecycle alongside.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use msgbridge_core::observe::TracingObserver;
use msgbridge_core::service::ChatSyncService;
use msgbridge_infra::http_store::HttpMessageStore;
use msgbridge_types::config::BridgeConfig;

/// The service generics pinned to the infra implementations.
pub type ConcreteSyncService = ChatSyncService<HttpMessageStore, TracingObserver>;

/// Shared application state for the REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ConcreteSyncService>,
    /// Cancels the background poll loop on shutdown.
    pub cancel: CancellationToken,
}

impl AppState {
    /// Wire the store and sync service from configuration.
    pub fn init(config: &BridgeConfig) -> Self {
        let store = HttpMessageStore::new(config);
        let service = ChatSyncService::with_observer(store, TracingObserver::new());

        Self {
            service: Arc::new(service),
            cancel: CancellationToken::new(),
        }
    }
}
