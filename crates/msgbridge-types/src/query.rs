//! Query arguments, fingerprints, and send-target selection.

use serde::{Deserialize, Serialize};

use std::fmt;

/// Arguments of a message query: which chat, which page.
///
/// The `page` argument is carried through to the store but the sync core
/// does not paginate on its own.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryArgs {
    pub chat_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
}

impl QueryArgs {
    pub fn new(chat_id: impl Into<String>) -> Self {
        Self {
            chat_id: chat_id.into(),
            page: None,
        }
    }

    pub fn with_page(mut self, page: impl Into<String>) -> Self {
        self.page = Some(page.into());
        self
    }

    /// Canonical fingerprint of these arguments.
    pub fn fingerprint(&self) -> QueryFingerprint {
        QueryFingerprint {
            chat_id: self.chat_id.trim().to_string(),
            page: self.page.as_deref().map(|p| p.trim().to_string()),
        }
    }
}

/// Canonical encoding of query arguments, used for cache-hit comparison.
///
/// Equality is structural: two requests naming the same chat id and page
/// compare equal regardless of how they were serialized on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryFingerprint {
    chat_id: String,
    page: Option<String>,
}

impl QueryFingerprint {
    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }

    pub fn page(&self) -> Option<&str> {
        self.page.as_deref()
    }
}

impl fmt::Display for QueryFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.page {
            Some(page) => write!(f, "{}#{}", self.chat_id, page),
            None => write!(f, "{}", self.chat_id),
        }
    }
}

/// How a send should be dispatched through the store.
///
/// Produced by chat resolution so the send path never has to guess what
/// an identifier means from its shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum SendTarget {
    /// An existing thread handle -- message goes to the thread directly.
    Thread(String),
    /// A participant specification -- the store composes a new thread.
    Participants(String),
}

/// The result of resolving query arguments against the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedChat {
    /// The store's chat identifier.
    pub chat_id: String,
    /// Human-readable label, keys the activity count map.
    pub friendly_name: String,
    /// How sends to this chat should be dispatched.
    pub target: SendTarget,
}
