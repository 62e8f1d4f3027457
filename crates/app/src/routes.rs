//! Route definitions for the Walletbot API

use axum::{routing::post, Router};

use crate::handlers::chats;
use crate::state::AppState;

/// Create chat ingress routes
fn chat_routes() -> Router<AppState> {
    Router::new()
        .route("/v1/chats/{chat_id}/messages", post(chats::post_message))
        .route("/v1/chats/{chat_id}/callbacks", post(chats::post_callback))
}

/// Create all API routes
pub fn routes() -> Router<AppState> {
    Router::new().merge(chat_routes())
}
