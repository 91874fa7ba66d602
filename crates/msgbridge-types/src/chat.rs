//! Chat, message, and activity-count types for msgbridge.
//!
//! These model the conversation surface of the upstream message store:
//! chats, the messages inside them, and the "new activity since a
//! checkpoint" counts the sync subsystem maintains.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// A conversation as reported by the upstream store.
///
/// `name` is the store's opaque identifier; `friendly_name` is the
/// human-readable label used to key activity counts. Immutable once
/// fetched within a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub name: String,
    pub friendly_name: String,
}

/// A single message within a chat. Value type, no identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Sender label. Raw store handle until normalized, display name after.
    pub chatter: String,
    pub text: String,
}

/// A per-chat activity count reported to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatCount {
    pub friendly_name: String,
    pub count: u64,
}

/// The running count of messages observed in a chat since a checkpoint.
///
/// The observation window is bounded below by `since_ms` and only grows:
/// `count` is overwritten on each observe pass but `since_ms` moves only
/// when the entry is explicitly reset (the chat became the active query).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountEntry {
    pub count: u64,
    /// Checkpoint timestamp, epoch milliseconds.
    pub since_ms: i64,
}

impl CountEntry {
    /// A fresh entry: zero messages seen, window starting now.
    pub fn starting_now() -> Self {
        Self {
            count: 0,
            since_ms: now_ms(),
        }
    }
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_serde_roundtrip() {
        let chat = Chat {
            name: "chat100001".to_string(),
            friendly_name: "Alice".to_string(),
        };
        let json = serde_json::to_string(&chat).unwrap();
        let parsed: Chat = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, chat);
    }

    #[test]
    fn test_count_entry_starting_now() {
        let before = now_ms();
        let entry = CountEntry::starting_now();
        let after = now_ms();
        assert_eq!(entry.count, 0);
        assert!(entry.since_ms >= before && entry.since_ms <= after);
    }

    #[test]
    fn test_chat_count_serialize_shape() {
        let count = ChatCount {
            friendly_name: "Alice".to_string(),
            count: 3,
        };
        let json = serde_json::to_string(&count).unwrap();
        assert!(json.contains("\"friendly_name\":\"Alice\""));
        assert!(json.contains("\"count\":3"));
    }
}
