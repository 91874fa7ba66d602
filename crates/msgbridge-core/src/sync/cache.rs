//! Single-slot cache for the active query.
//!
//! The cache remembers the last query's argument fingerprint and its
//! resolved message list, serving repeats without contacting the store.
//! There is at most one live entry: switching the query arguments
//! replaces the whole entry atomically, so a reader never sees messages
//! from one fingerprint paired with another.

use tokio::sync::RwLock;

use msgbridge_types::chat::ChatMessage;
use msgbridge_types::error::StoreError;
use msgbridge_types::query::{QueryArgs, QueryFingerprint, ResolvedChat};

use crate::store::MessageStore;
use crate::sync::counts::ChatCountTracker;

/// The cached result of the active query.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub fingerprint: QueryFingerprint,
    /// Resolved chat identity; lets the poll loop refresh without
    /// re-resolving the arguments every tick.
    pub chat: ResolvedChat,
    pub messages: Vec<ChatMessage>,
}

/// Single-slot cache keyed by query fingerprint.
///
/// Fetches happen outside the lock; the slot is only held long enough to
/// read or swap the entry, so a cache hit never blocks on store IO.
#[derive(Debug, Default)]
pub struct ActiveQueryCache {
    slot: RwLock<Option<CacheEntry>>,
}

impl ActiveQueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any query has ever been cached.
    pub async fn is_empty(&self) -> bool {
        self.slot.read().await.is_none()
    }

    /// The fingerprint of the active query, if any.
    pub async fn active_fingerprint(&self) -> Option<QueryFingerprint> {
        self.slot.read().await.as_ref().map(|e| e.fingerprint.clone())
    }

    /// Serve a query, from the slot on a fingerprint match, from the
    /// store otherwise.
    ///
    /// On a miss this resolves the arguments, fetches and normalizes the
    /// chat's messages, restarts the chat's count window (the viewer has
    /// now seen everything up to the switch), and swaps in the new entry.
    pub async fn query<S: MessageStore>(
        &self,
        store: &S,
        counts: &ChatCountTracker,
        args: &QueryArgs,
    ) -> Result<Vec<ChatMessage>, StoreError> {
        let fingerprint = args.fingerprint();

        {
            let slot = self.slot.read().await;
            if let Some(entry) = slot.as_ref() {
                if entry.fingerprint == fingerprint {
                    tracing::debug!(query = %fingerprint, "cache hit");
                    return Ok(entry.messages.clone());
                }
            }
        }

        tracing::debug!(query = %fingerprint, "cache miss, fetching from store");
        let chat = store.resolve_query(args).await?;
        let messages = store.list_messages_since(&chat.chat_id, None).await?;
        let messages = store.normalize_senders(messages).await?;

        counts.reset(&chat.friendly_name);

        let mut slot = self.slot.write().await;
        *slot = Some(CacheEntry {
            fingerprint,
            chat,
            messages: messages.clone(),
        });
        Ok(messages)
    }

    /// Re-fetch the active query's messages and overwrite them in place.
    ///
    /// No-op when the slot is empty. Does not touch the fingerprint and
    /// does not restart any count window. If the active query changed
    /// while the fetch was in flight, the fetched messages are dropped:
    /// the newer entry wins, entries are never mixed. Returns whether the
    /// slot was updated.
    pub async fn refresh<S: MessageStore>(&self, store: &S) -> Result<bool, StoreError> {
        let (fingerprint, chat) = {
            let slot = self.slot.read().await;
            match slot.as_ref() {
                Some(entry) => (entry.fingerprint.clone(), entry.chat.clone()),
                None => return Ok(false),
            }
        };

        let messages = store.list_messages_since(&chat.chat_id, None).await?;
        let messages = store.normalize_senders(messages).await?;

        let mut slot = self.slot.write().await;
        match slot.as_mut() {
            Some(entry) if entry.fingerprint == fingerprint => {
                entry.messages = messages;
                Ok(true)
            }
            _ => {
                tracing::debug!(
                    query = %fingerprint,
                    "active query changed during refresh, dropping fetched messages"
                );
                Ok(false)
            }
        }
    }
}
