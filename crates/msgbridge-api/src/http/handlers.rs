//! Request handlers for the query/mutation surface.
//!
//! Thin wrappers over `ChatSyncService`: deserialize arguments, call the
//! facade, serialize the result. All state and timing concerns live in
//! the core.

use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;

use msgbridge_types::chat::{Chat, ChatCount, ChatMessage};
use msgbridge_types::query::QueryArgs;

use crate::http::error::AppError;
use crate::state::AppState;

/// Query-string arguments for GET /messages.
#[derive(Debug, Deserialize)]
pub struct MessagesParams {
    pub chat_id: String,
    pub page: Option<String>,
}

impl From<MessagesParams> for QueryArgs {
    fn from(p: MessagesParams) -> Self {
        QueryArgs {
            chat_id: p.chat_id,
            page: p.page,
        }
    }
}

/// Body of POST /messages.
#[derive(Debug, Deserialize)]
pub struct SendBody {
    pub chat_id: String,
    pub message: String,
}

/// GET /api/v1/chats - list chats, folding them into the count tracker.
pub async fn get_chats(State(state): State<AppState>) -> Result<Json<Vec<Chat>>, AppError> {
    let chats = state.service.get_chats().await?;
    Ok(Json(chats))
}

/// GET /api/v1/counts - per-chat activity counts since their checkpoints.
pub async fn get_chat_counts(State(state): State<AppState>) -> Json<Vec<ChatCount>> {
    Json(state.service.get_chat_counts())
}

/// GET /api/v1/messages?chat_id=..&page=.. - messages for the query,
/// served from the active-query cache when the fingerprint matches.
pub async fn get_messages(
    State(state): State<AppState>,
    Query(params): Query<MessagesParams>,
) -> Result<Json<Vec<ChatMessage>>, AppError> {
    if params.chat_id.trim().is_empty() {
        return Err(AppError::Validation("chat_id must not be empty".to_string()));
    }
    let args = QueryArgs::from(params);
    let messages = state.service.get_messages(&args).await?;
    Ok(Json(messages))
}

/// POST /api/v1/messages - send a message, returning the chat's fresh
/// message list.
pub async fn send_message(
    State(state): State<AppState>,
    Json(body): Json<SendBody>,
) -> Result<Json<Vec<ChatMessage>>, AppError> {
    if body.chat_id.trim().is_empty() {
        return Err(AppError::Validation("chat_id must not be empty".to_string()));
    }
    if body.message.is_empty() {
        return Err(AppError::Validation("message must not be empty".to_string()));
    }
    let args = QueryArgs::new(body.chat_id);
    let messages = state.service.send_message(&args, &body.message).await?;
    Ok(Json(messages))
}
