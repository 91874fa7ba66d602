//! MessageStore trait definition.
//!
//! This is the capability surface the sync core consumes: chat listing,
//! message listing with a "since" filter, argument-to-chat resolution,
//! message sending, and sender normalization.
//!
//! Uses native async fn in traits (RPITIT, Rust 2024 edition).
//! Implementations live in msgbridge-infra (e.g., `HttpMessageStore`).

use msgbridge_types::chat::{Chat, ChatMessage};
use msgbridge_types::error::StoreError;
use msgbridge_types::query::{QueryArgs, ResolvedChat, SendTarget};

/// Capability surface of the upstream conversation service.
pub trait MessageStore: Send + Sync {
    /// List all chats visible to the logged-in identity.
    fn list_chats(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Chat>, StoreError>> + Send;

    /// List messages in a chat, newest included, filtered to those sent at
    /// or after `since_ms`. `None` means "all messages".
    fn list_messages_since(
        &self,
        chat_id: &str,
        since_ms: Option<i64>,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, StoreError>> + Send;

    /// Resolve query arguments to a chat identity and send target.
    ///
    /// An identifier the store recognizes as an existing thread resolves to
    /// [`SendTarget::Thread`]; anything else is treated as a participant
    /// specification ([`SendTarget::Participants`]).
    fn resolve_query(
        &self,
        args: &QueryArgs,
    ) -> impl std::future::Future<Output = Result<ResolvedChat, StoreError>> + Send;

    /// Dispatch a message to the given target.
    fn send_message(
        &self,
        target: &SendTarget,
        text: &str,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Replace store-specific sender identifiers with display labels.
    fn normalize_senders(
        &self,
        messages: Vec<ChatMessage>,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, StoreError>> + Send;

    /// The handle of the logged-in identity.
    fn current_user_identity(
        &self,
    ) -> impl std::future::Future<Output = Result<String, StoreError>> + Send;
}
