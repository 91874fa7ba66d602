//! Facade service tying the sync subsystem together.
//!
//! `ChatSyncService` is the explicitly constructed state object behind the
//! request layer: it owns the store handle, the count tracker, and the
//! active-query cache, and is shared (via `Arc`) with the background poll
//! loop. Generic over [`MessageStore`] and [`SyncObserver`]; the api crate
//! pins the concrete types.

use msgbridge_types::chat::{Chat, ChatCount, ChatMessage};
use msgbridge_types::error::StoreError;
use msgbridge_types::query::QueryArgs;

use crate::observe::{NoopObserver, SyncObserver};
use crate::store::MessageStore;
use crate::sync::cache::ActiveQueryCache;
use crate::sync::counts::ChatCountTracker;

pub struct ChatSyncService<S, O = NoopObserver> {
    store: S,
    counts: ChatCountTracker,
    cache: ActiveQueryCache,
    observer: O,
}

impl<S: MessageStore> ChatSyncService<S> {
    pub fn new(store: S) -> Self {
        Self::with_observer(store, NoopObserver)
    }
}

impl<S: MessageStore, O: SyncObserver> ChatSyncService<S, O> {
    pub fn with_observer(store: S, observer: O) -> Self {
        Self {
            store,
            counts: ChatCountTracker::new(),
            cache: ActiveQueryCache::new(),
            observer,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn counts(&self) -> &ChatCountTracker {
        &self.counts
    }

    pub fn cache(&self) -> &ActiveQueryCache {
        &self.cache
    }

    /// List chats and fold them into the count tracker.
    ///
    /// Count failures for individual chats are logged, not propagated:
    /// the chat list itself is still good.
    pub async fn get_chats(&self) -> Result<Vec<Chat>, StoreError> {
        self.observer.request_served();
        let chats = self.store.list_chats().await?;

        let report = self.counts.observe(&self.store, &chats).await;
        for (chat, err) in &report.failures {
            tracing::warn!(chat = %chat, error = %err, "count observe failed during get_chats");
        }

        tracing::debug!(chats = chats.len(), "get_chats");
        Ok(chats)
    }

    /// Latest completed per-chat counts. Empty until something is observed.
    pub fn get_chat_counts(&self) -> Vec<ChatCount> {
        self.observer.request_served();
        let counts = self.counts.snapshot();
        tracing::debug!(entries = counts.len(), "get_chat_counts");
        counts
    }

    /// Messages for the given query, served from the single-slot cache
    /// when the fingerprint matches.
    pub async fn get_messages(&self, args: &QueryArgs) -> Result<Vec<ChatMessage>, StoreError> {
        self.observer.request_served();
        self.cache.query(&self.store, &self.counts, args).await
    }

    /// Resolve the target, dispatch the message, and return the chat's
    /// fresh message list.
    ///
    /// Send never goes through the cache: it does not require a prior
    /// cache hit and does not populate the slot.
    pub async fn send_message(
        &self,
        args: &QueryArgs,
        text: &str,
    ) -> Result<Vec<ChatMessage>, StoreError> {
        self.observer.request_served();

        let chat = self.store.resolve_query(args).await?;
        tracing::debug!(
            chat_id = %chat.chat_id,
            friendly = %chat.friendly_name,
            bytes = text.len(),
            "dispatching send"
        );
        self.store.send_message(&chat.target, text).await?;
        self.observer.message_sent();

        // A compose-to-participants send may land before the store lists
        // the new thread under this id. The send itself went through, so
        // an unknown chat here is an empty list, not a failure.
        let messages = match self.store.list_messages_since(&chat.chat_id, None).await {
            Ok(messages) => messages,
            Err(StoreError::ChatNotFound(_)) => {
                tracing::debug!(chat_id = %chat.chat_id, "sent thread not listed yet");
                Vec::new()
            }
            Err(err) => return Err(err),
        };
        self.store.normalize_senders(messages).await
    }

    /// One background tick: refresh the active query (if any), then fold
    /// the chat list into the count tracker.
    ///
    /// Errors returned here are contained by the poll loop; observe
    /// failures for individual chats are logged and tolerated.
    pub async fn poll_tick(&self, seq: u64) -> Result<(), StoreError> {
        self.observer.tick_started();

        if self.cache.is_empty().await {
            let chats = self.store.list_chats().await?;
            let report = self.counts.observe(&self.store, &chats).await;
            tracing::debug!(
                tick = seq,
                chats = chats.len(),
                failures = report.failures.len(),
                "no active query yet, counts only"
            );
            return Ok(());
        }

        if self.cache.refresh(&self.store).await? {
            self.observer.cache_refreshed();
        }

        let chats = self.store.list_chats().await?;
        let report = self.counts.observe(&self.store, &chats).await;
        for (chat, err) in &report.failures {
            tracing::warn!(tick = seq, chat = %chat, error = %err, "count observe failed");
        }
        tracing::debug!(tick = seq, chats = chats.len(), "caches updated");
        Ok(())
    }
}
