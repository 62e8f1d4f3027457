//! Chat ingress handlers
//!
//! Implements:
//! - POST /v1/chats/{chat_id}/messages - Feed a text message to the bot
//! - POST /v1/chats/{chat_id}/callbacks - Feed a button press to the bot
//!
//! Both answer with the replies the chat platform should deliver, in order.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;
use walletbot_common::{ChatId, Reply};

use crate::extractors::ValidatedJson;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct MessageRequest {
    /// Message text (1-4096 chars, the chat platform's message limit)
    #[validate(length(min = 1, max = 4096))]
    pub text: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CallbackRequest {
    /// Button payload (1-64 chars, the chat platform's callback limit)
    #[validate(length(min = 1, max = 64))]
    pub data: String,
}

#[derive(Debug, Serialize)]
pub struct RepliesResponse {
    pub replies: Vec<Reply>,
}

/// POST /v1/chats/{chat_id}/messages
pub async fn post_message(
    State(state): State<AppState>,
    Path(chat_id): Path<i64>,
    ValidatedJson(request): ValidatedJson<MessageRequest>,
) -> Json<RepliesResponse> {
    let replies = state
        .dispatcher
        .handle_message(ChatId(chat_id), &request.text)
        .await;
    Json(RepliesResponse { replies })
}

/// POST /v1/chats/{chat_id}/callbacks
pub async fn post_callback(
    State(state): State<AppState>,
    Path(chat_id): Path<i64>,
    ValidatedJson(request): ValidatedJson<CallbackRequest>,
) -> Json<RepliesResponse> {
    let replies = state
        .dispatcher
        .handle_callback(ChatId(chat_id), &request.data)
        .await;
    Json(RepliesResponse { replies })
}
