//! Per-chat activity counts since a resettable checkpoint.
//!
//! Each chat gets a [`CountEntry`] keyed by its friendly name: the number
//! of messages seen at or after the checkpoint timestamp, as of the most
//! recent successful observe pass. The checkpoint moves only on an
//! explicit reset (the chat became the active query), so within a window
//! the count is monotonically non-decreasing.

use dashmap::DashMap;

use msgbridge_types::chat::{Chat, ChatCount, CountEntry};
use msgbridge_types::error::StoreError;

use crate::store::MessageStore;

/// A tracked entry plus the generation of its observation window.
///
/// The generation is bumped on every reset, so an observe pass that read
/// the old window's checkpoint cannot overwrite the count after a reset
/// landed mid-flight.
#[derive(Debug, Clone, Copy)]
struct TrackedEntry {
    entry: CountEntry,
    generation: u64,
}

/// Outcome of one observe pass.
///
/// An observe pass is partial-failure tolerant: a store error for one chat
/// leaves that chat's entry stale and is recorded here, while the rest of
/// the batch is still processed.
#[derive(Debug, Default)]
pub struct ObserveReport {
    /// Chats whose entries were freshly written this pass.
    pub updated: usize,
    /// Chats whose fetch failed; their entries were left unchanged.
    pub failures: Vec<(String, StoreError)>,
}

impl ObserveReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Tracks message counts per conversation since a caller-defined checkpoint.
///
/// Entries are created lazily on first observation and never deleted
/// within a session. The map is a `DashMap` so each entry is replaced
/// atomically without holding a global lock across the IO-bound fetch
/// loop; concurrent readers always see either the previous or the new
/// value of an entry, never a torn one.
#[derive(Debug, Default)]
pub struct ChatCountTracker {
    entries: DashMap<String, TrackedEntry>,
}

impl ChatCountTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the counts for the given chats.
    ///
    /// For each chat this ensures an entry exists (count 0, window starting
    /// now on first sight), fetches messages newer than the entry's
    /// checkpoint, and overwrites the count with the fetched length. The
    /// checkpoint itself is never advanced here.
    pub async fn observe<S: MessageStore>(&self, store: &S, chats: &[Chat]) -> ObserveReport {
        let mut report = ObserveReport::default();

        for chat in chats {
            let (since_ms, generation) = {
                let tracked = self
                    .entries
                    .entry(chat.friendly_name.clone())
                    .or_insert_with(|| TrackedEntry {
                        entry: CountEntry::starting_now(),
                        generation: 0,
                    });
                (tracked.entry.since_ms, tracked.generation)
            };

            // Entry guard dropped above: the fetch must not hold any lock.
            match store.list_messages_since(&chat.name, Some(since_ms)).await {
                Ok(messages) => {
                    let count = messages.len() as u64;
                    if let Some(mut tracked) = self.entries.get_mut(&chat.friendly_name) {
                        if tracked.generation != generation {
                            tracing::debug!(
                                chat = %chat.friendly_name,
                                "window reset while observing, keeping fresh window"
                            );
                            continue;
                        }
                        if tracked.entry.count != count {
                            tracing::debug!(
                                chat = %chat.friendly_name,
                                from = tracked.entry.count,
                                to = count,
                                "updated chat count"
                            );
                        }
                        tracked.entry.count = count;
                        report.updated += 1;
                    }
                }
                Err(err) => {
                    tracing::warn!(
                        chat = %chat.friendly_name,
                        error = %err,
                        "count fetch failed, entry left unchanged"
                    );
                    report.failures.push((chat.friendly_name.clone(), err));
                }
            }
        }

        report
    }

    /// Restart a chat's observation window: count 0, checkpoint now.
    ///
    /// Called exactly when the chat becomes the new active query target;
    /// messages before the switch count as already seen by the viewer.
    pub fn reset(&self, friendly_name: &str) {
        let mut tracked = self
            .entries
            .entry(friendly_name.to_string())
            .or_insert_with(|| TrackedEntry {
                entry: CountEntry::starting_now(),
                generation: 0,
            });
        tracked.generation += 1;
        tracked.entry = CountEntry::starting_now();
        tracing::debug!(chat = %friendly_name, "count window reset");
    }

    /// Read-only view of the latest completed counts, sorted by name.
    ///
    /// A tracker that never observed anything yields an empty list.
    pub fn snapshot(&self) -> Vec<ChatCount> {
        let mut counts: Vec<ChatCount> = self
            .entries
            .iter()
            .map(|item| ChatCount {
                friendly_name: item.key().clone(),
                count: item.value().entry.count,
            })
            .collect();
        counts.sort_by(|a, b| a.friendly_name.cmp(&b.friendly_name));
        counts
    }

    /// The current entry for a chat, if it has ever been observed.
    pub fn get(&self, friendly_name: &str) -> Option<CountEntry> {
        self.entries.get(friendly_name).map(|t| t.entry)
    }
}
