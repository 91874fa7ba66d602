//! In-memory [`MessageStore`] used by the core's tests.
//!
//! Keeps messages with their sent-at timestamps so the "since" filter
//! behaves like the real store, counts calls per capability so tests can
//! assert on fetch behavior, and can be told to fail per chat or wholesale.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::Semaphore;

use msgbridge_types::chat::{Chat, ChatMessage};
use msgbridge_types::error::StoreError;
use msgbridge_types::query::{QueryArgs, ResolvedChat, SendTarget};

use crate::store::MessageStore;

#[derive(Default)]
struct MockInner {
    chats: Vec<Chat>,
    /// chat name -> (sent_at_ms, message)
    messages: HashMap<String, Vec<(i64, ChatMessage)>>,
    /// Chats whose message fetch fails.
    failing: HashSet<String>,
    /// Every call fails.
    fail_all: bool,
    /// handle -> display name, applied by normalize_senders.
    contacts: HashMap<String, String>,
    /// Chats whose message fetch blocks on a semaphore permit.
    gates: HashMap<String, Arc<Semaphore>>,
    /// Log of dispatched sends.
    sent: Vec<(SendTarget, String)>,
}

pub(crate) struct MockStore {
    inner: Mutex<MockInner>,
    pub list_calls: AtomicUsize,
    pub fetch_calls: AtomicUsize,
    pub resolve_calls: AtomicUsize,
    pub send_calls: AtomicUsize,
}

impl MockStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MockInner::default()),
            list_calls: AtomicUsize::new(0),
            fetch_calls: AtomicUsize::new(0),
            resolve_calls: AtomicUsize::new(0),
            send_calls: AtomicUsize::new(0),
        }
    }

    pub fn add_chat(&self, name: &str, friendly_name: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.chats.push(Chat {
            name: name.to_string(),
            friendly_name: friendly_name.to_string(),
        });
        inner.messages.entry(name.to_string()).or_default();
    }

    pub fn push_message(&self, chat_name: &str, chatter: &str, text: &str, sent_at_ms: i64) {
        let mut inner = self.inner.lock().unwrap();
        inner.messages.entry(chat_name.to_string()).or_default().push((
            sent_at_ms,
            ChatMessage {
                chatter: chatter.to_string(),
                text: text.to_string(),
            },
        ));
    }

    pub fn add_contact(&self, handle: &str, display_name: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner
            .contacts
            .insert(handle.to_string(), display_name.to_string());
    }

    pub fn fail_chat(&self, chat_name: &str) {
        self.inner
            .lock()
            .unwrap()
            .failing
            .insert(chat_name.to_string());
    }

    pub fn set_fail_all(&self, fail: bool) {
        self.inner.lock().unwrap().fail_all = fail;
    }

    /// Make message fetches for `chat_name` block until a permit arrives.
    pub fn gate_chat(&self, chat_name: &str) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        self.inner
            .lock()
            .unwrap()
            .gates
            .insert(chat_name.to_string(), Arc::clone(&gate));
        gate
    }

    pub fn chats(&self) -> Vec<Chat> {
        self.inner.lock().unwrap().chats.clone()
    }

    pub fn sent(&self) -> Vec<(SendTarget, String)> {
        self.inner.lock().unwrap().sent.clone()
    }
}

impl MessageStore for MockStore {
    async fn list_chats(&self) -> Result<Vec<Chat>, StoreError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let inner = self.inner.lock().unwrap();
        if inner.fail_all {
            return Err(StoreError::Unavailable("mock offline".to_string()));
        }
        Ok(inner.chats.clone())
    }

    async fn list_messages_since(
        &self,
        chat_id: &str,
        since_ms: Option<i64>,
    ) -> Result<Vec<ChatMessage>, StoreError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);

        let gate = self.inner.lock().unwrap().gates.get(chat_id).cloned();
        if let Some(gate) = gate {
            gate.acquire().await.expect("gate closed").forget();
        }

        let inner = self.inner.lock().unwrap();
        if inner.fail_all || inner.failing.contains(chat_id) {
            return Err(StoreError::Unavailable("mock offline".to_string()));
        }
        let since = since_ms.unwrap_or(0);
        // Unknown chat ids are a not-found, like the real store's 404.
        let msgs = inner
            .messages
            .get(chat_id)
            .ok_or_else(|| StoreError::ChatNotFound(chat_id.to_string()))?;
        Ok(msgs
            .iter()
            .filter(|(at, _)| *at >= since)
            .map(|(_, m)| m.clone())
            .collect())
    }

    async fn resolve_query(&self, args: &QueryArgs) -> Result<ResolvedChat, StoreError> {
        self.resolve_calls.fetch_add(1, Ordering::SeqCst);
        let inner = self.inner.lock().unwrap();
        if inner.fail_all {
            return Err(StoreError::Unavailable("mock offline".to_string()));
        }
        let wanted = args.chat_id.trim();
        match inner.chats.iter().find(|c| c.name == wanted) {
            Some(chat) => Ok(ResolvedChat {
                chat_id: chat.name.clone(),
                friendly_name: chat.friendly_name.clone(),
                target: SendTarget::Thread(chat.name.clone()),
            }),
            // Unrecognized ids are participant specifications.
            None => Ok(ResolvedChat {
                chat_id: wanted.to_string(),
                friendly_name: wanted.to_string(),
                target: SendTarget::Participants(wanted.to_string()),
            }),
        }
    }

    async fn send_message(&self, target: &SendTarget, text: &str) -> Result<(), StoreError> {
        self.send_calls.fetch_add(1, Ordering::SeqCst);
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_all {
            return Err(StoreError::Unavailable("mock offline".to_string()));
        }
        inner.sent.push((target.clone(), text.to_string()));
        if let SendTarget::Thread(chat_id) = target {
            let at = msgbridge_types::chat::now_ms();
            inner.messages.entry(chat_id.clone()).or_default().push((
                at,
                ChatMessage {
                    chatter: "me".to_string(),
                    text: text.to_string(),
                },
            ));
        }
        Ok(())
    }

    async fn normalize_senders(
        &self,
        messages: Vec<ChatMessage>,
    ) -> Result<Vec<ChatMessage>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(messages
            .into_iter()
            .map(|mut m| {
                if let Some(name) = inner.contacts.get(&m.chatter) {
                    m.chatter = name.clone();
                }
                m
            })
            .collect())
    }

    async fn current_user_identity(&self) -> Result<String, StoreError> {
        let inner = self.inner.lock().unwrap();
        if inner.fail_all {
            return Err(StoreError::Unavailable("mock offline".to_string()));
        }
        Ok("me@bridge.local".to_string())
    }
}
