//! HttpMessageStore -- concrete [`MessageStore`] implementation.
//!
//! Talks JSON over HTTP to the conversation-bridge service that fronts
//! the actual messaging account. Transport failures map to
//! [`StoreError::Unavailable`], unknown chats to
//! [`StoreError::ChatNotFound`], and undecodable bodies to
//! [`StoreError::InvalidResponse`].

use std::collections::HashMap;
use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use msgbridge_core::store::MessageStore;
use msgbridge_types::chat::{Chat, ChatMessage};
use msgbridge_types::config::BridgeConfig;
use msgbridge_types::error::StoreError;
use msgbridge_types::query::{QueryArgs, ResolvedChat, SendTarget};

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct WireChat {
    id: String,
    friendly_name: String,
}

impl From<WireChat> for Chat {
    fn from(w: WireChat) -> Self {
        Chat {
            name: w.id,
            friendly_name: w.friendly_name,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireMessage {
    sender: String,
    text: String,
}

impl From<WireMessage> for ChatMessage {
    fn from(w: WireMessage) -> Self {
        ChatMessage {
            chatter: w.sender,
            text: w.text,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireContact {
    handle: String,
    display_name: String,
}

#[derive(Debug, Deserialize)]
struct WireIdentity {
    handle: String,
}

#[derive(Debug, Serialize)]
struct WireSend<'a> {
    target: &'a SendTarget,
    text: &'a str,
}

// ---------------------------------------------------------------------------
// HttpMessageStore
// ---------------------------------------------------------------------------

/// HTTP JSON client for the conversation-bridge service.
pub struct HttpMessageStore {
    client: reqwest::Client,
    base_url: String,
    /// handle -> display name, fetched lazily on first normalization.
    contacts: RwLock<Option<HashMap<String, String>>>,
}

impl HttpMessageStore {
    pub fn new(config: &BridgeConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            base_url: config.store_base_url.trim_end_matches('/').to_string(),
            contacts: RwLock::new(None),
        }
    }

    /// Build the full API URL for a given path.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str) -> Result<reqwest::Response, StoreError> {
        self.client
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(format!("GET {path} failed: {e}")))
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
        what: &str,
    ) -> Result<T, StoreError> {
        response
            .json::<T>()
            .await
            .map_err(|e| StoreError::InvalidResponse(format!("failed to parse {what}: {e}")))
    }

    /// Cached contact map, fetched from the store on first use.
    ///
    /// A failed fetch is tolerated: normalization then passes raw handles
    /// through unchanged and the next call retries.
    async fn contact_map(&self) -> Option<HashMap<String, String>> {
        {
            let cached = self.contacts.read().await;
            if let Some(map) = cached.as_ref() {
                return Some(map.clone());
            }
        }

        let response = match self.get("/v1/contacts").await {
            Ok(r) => r,
            Err(err) => {
                tracing::warn!(error = %err, "contact fetch failed, senders left raw");
                return None;
            }
        };
        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "contact fetch rejected, senders left raw");
            return None;
        }
        let contacts: Vec<WireContact> = match Self::decode(response, "contacts").await {
            Ok(c) => c,
            Err(err) => {
                tracing::warn!(error = %err, "contact decode failed, senders left raw");
                return None;
            }
        };

        let map: HashMap<String, String> = contacts
            .into_iter()
            .map(|c| (c.handle, c.display_name))
            .collect();
        let mut cached = self.contacts.write().await;
        *cached = Some(map.clone());
        Some(map)
    }
}

/// Replace raw sender handles with display names where the map knows them.
fn apply_contacts(messages: Vec<ChatMessage>, map: &HashMap<String, String>) -> Vec<ChatMessage> {
    messages
        .into_iter()
        .map(|mut m| {
            if let Some(name) = map.get(&m.chatter) {
                m.chatter = name.clone();
            }
            m
        })
        .collect()
}

impl MessageStore for HttpMessageStore {
    async fn list_chats(&self) -> Result<Vec<Chat>, StoreError> {
        let response = self.get("/v1/chats").await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Unavailable(format!(
                "chat listing failed: HTTP {status}"
            )));
        }
        let chats: Vec<WireChat> = Self::decode(response, "chat list").await?;
        Ok(chats.into_iter().map(Chat::from).collect())
    }

    async fn list_messages_since(
        &self,
        chat_id: &str,
        since_ms: Option<i64>,
    ) -> Result<Vec<ChatMessage>, StoreError> {
        let path = match since_ms {
            Some(since) if since > 0 => {
                format!("/v1/chats/{chat_id}/messages?since_ms={since}")
            }
            _ => format!("/v1/chats/{chat_id}/messages"),
        };
        let response = self.get(&path).await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(StoreError::ChatNotFound(chat_id.to_string()));
        }
        if !status.is_success() {
            return Err(StoreError::Unavailable(format!(
                "message listing failed: HTTP {status}"
            )));
        }
        let messages: Vec<WireMessage> = Self::decode(response, "message list").await?;
        Ok(messages.into_iter().map(ChatMessage::from).collect())
    }

    async fn resolve_query(&self, args: &QueryArgs) -> Result<ResolvedChat, StoreError> {
        let chat_id = args.chat_id.trim();
        let response = self.get(&format!("/v1/chats/{chat_id}")).await?;
        let status = response.status();

        // An id the store does not recognize as an existing thread is a
        // participant specification: sends compose a new thread.
        if status == StatusCode::NOT_FOUND {
            return Ok(ResolvedChat {
                chat_id: chat_id.to_string(),
                friendly_name: chat_id.to_string(),
                target: SendTarget::Participants(chat_id.to_string()),
            });
        }
        if !status.is_success() {
            return Err(StoreError::Unavailable(format!(
                "chat resolution failed: HTTP {status}"
            )));
        }

        let chat: WireChat = Self::decode(response, "chat").await?;
        Ok(ResolvedChat {
            chat_id: chat.id.clone(),
            friendly_name: chat.friendly_name,
            target: SendTarget::Thread(chat.id),
        })
    }

    async fn send_message(&self, target: &SendTarget, text: &str) -> Result<(), StoreError> {
        let body = WireSend { target, text };
        let response = self
            .client
            .post(self.url("/v1/messages"))
            .json(&body)
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(format!("send failed: {e}")))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            let id = match target {
                SendTarget::Thread(id) | SendTarget::Participants(id) => id.clone(),
            };
            return Err(StoreError::ChatNotFound(id));
        }
        if !status.is_success() {
            return Err(StoreError::Unavailable(format!("send failed: HTTP {status}")));
        }
        Ok(())
    }

    async fn normalize_senders(
        &self,
        messages: Vec<ChatMessage>,
    ) -> Result<Vec<ChatMessage>, StoreError> {
        match self.contact_map().await {
            Some(map) => Ok(apply_contacts(messages, &map)),
            None => Ok(messages),
        }
    }

    async fn current_user_identity(&self) -> Result<String, StoreError> {
        let response = self.get("/v1/me").await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Unavailable(format!(
                "identity lookup failed: HTTP {status}"
            )));
        }
        let identity: WireIdentity = Self::decode(response, "identity").await?;
        Ok(identity.handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(chatter: &str, text: &str) -> ChatMessage {
        ChatMessage {
            chatter: chatter.to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let config = BridgeConfig {
            store_base_url: "http://bridge.local:9000/".to_string(),
            ..BridgeConfig::default()
        };
        let store = HttpMessageStore::new(&config);
        assert_eq!(
            store.url("/v1/chats"),
            "http://bridge.local:9000/v1/chats"
        );
    }

    #[test]
    fn test_apply_contacts_replaces_known_handles() {
        let mut map = HashMap::new();
        map.insert("+15555550123".to_string(), "Alice".to_string());

        let normalized = apply_contacts(
            vec![
                message("+15555550123", "hi"),
                message("unknown@store", "yo"),
            ],
            &map,
        );
        assert_eq!(normalized[0].chatter, "Alice");
        assert_eq!(normalized[1].chatter, "unknown@store");
    }

    #[test]
    fn test_wire_send_body_shape() {
        let target = SendTarget::Participants("+15555550123".to_string());
        let body = WireSend {
            target: &target,
            text: "hello",
        };
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(
            json,
            r#"{"target":{"kind":"participants","value":"+15555550123"},"text":"hello"}"#
        );
    }

    #[test]
    fn test_wire_chat_maps_to_domain() {
        let wire: WireChat =
            serde_json::from_str(r#"{"id":"chat100001","friendly_name":"Alice"}"#).unwrap();
        let chat = Chat::from(wire);
        assert_eq!(chat.name, "chat100001");
        assert_eq!(chat.friendly_name, "Alice");
    }
}
