//! Shared fixtures: a dispatcher over in-memory stores with a seeded
//! identity provider

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use serde_json::Value;
use walletbot_app::{AppState, Dispatcher};
use walletbot_auth::{AuthBackend, MockIdentityProvider, SessionStore};
use walletbot_charts::{QuickChart, DEFAULT_QUICKCHART_URL};
use walletbot_common::{ChatId, Reply};
use walletbot_conversations::{ConversationStore, ConversationState, InMemoryConversationStore};
use walletbot_finance::{Card, FinanceRepository, InMemoryFinanceRepository};

pub const CHAT: ChatId = ChatId(1001);
pub const OTHER_CHAT: ChatId = ChatId(2002);

pub const EMAIL: &str = "ali@example.com";
pub const PASSWORD: &str = "secret1";
pub const OTHER_EMAIL: &str = "leyla@example.com";

pub struct TestBot {
    pub dispatcher: Dispatcher,
    pub identity: Arc<MockIdentityProvider>,
    pub finance: Arc<InMemoryFinanceRepository>,
    pub conversations: Arc<InMemoryConversationStore>,
    pub auth: AuthBackend,
}

impl TestBot {
    pub fn new() -> Self {
        let identity = Arc::new(
            MockIdentityProvider::new()
                .with_account(EMAIL, PASSWORD, "Ali", "Aliyev")
                .with_account(OTHER_EMAIL, PASSWORD, "Leyla", "Mammadova"),
        );
        let finance = Arc::new(InMemoryFinanceRepository::new());
        let conversations = Arc::new(InMemoryConversationStore::new());

        let auth = AuthBackend::new(
            identity.clone(),
            SessionStore::in_memory(conversations.clone()),
        );
        let charts = QuickChart::new(DEFAULT_QUICKCHART_URL).unwrap();
        let dispatcher = Dispatcher::new(
            auth.clone(),
            finance.clone(),
            conversations.clone(),
            charts,
        );

        Self {
            dispatcher,
            identity,
            finance,
            conversations,
            auth,
        }
    }

    /// Bot with `chat` already logged in as the default account
    pub async fn logged_in() -> Self {
        let bot = Self::new();
        bot.login(CHAT, EMAIL).await;
        bot
    }

    pub async fn send(&self, chat: ChatId, text: &str) -> Vec<Reply> {
        self.dispatcher.handle_message(chat, text).await
    }

    pub async fn press(&self, chat: ChatId, data: &str) -> Vec<Reply> {
        self.dispatcher.handle_callback(chat, data).await
    }

    /// Send every message in turn, returning the replies to the last one
    pub async fn send_all(&self, chat: ChatId, messages: &[&str]) -> Vec<Reply> {
        let mut last = Vec::new();
        for message in messages {
            last = self.send(chat, message).await;
        }
        last
    }

    /// Log `chat` in through the /login flow
    pub async fn login(&self, chat: ChatId, email: &str) {
        let replies = self.send_all(chat, &["/login", email, PASSWORD]).await;
        assert!(
            last_text(&replies).starts_with("✅ Welcome"),
            "login failed: {:?}",
            replies
        );
    }

    /// Add a card through the /addcard flow
    pub async fn add_card(&self, chat: ChatId, number: &str, amount: &str) -> Card {
        let replies = self.send_all(chat, &["/addcard", number, amount]).await;
        assert!(
            last_text(&replies).starts_with("✅ Card"),
            "add card failed: {:?}",
            replies
        );
        let cards = self.cards(chat).await;
        cards
            .into_iter()
            .find(|card| card.card_number == number.replace(' ', ""))
            .unwrap()
    }

    pub async fn cards(&self, chat: ChatId) -> Vec<Card> {
        let session = self.auth.sessions().get(chat).await.unwrap();
        self.finance.user_cards(&session.subject_id).await.unwrap()
    }

    pub async fn card(&self, id: uuid::Uuid) -> Card {
        self.finance.card_by_id(id).await.unwrap().unwrap()
    }

    pub async fn pending(&self, chat: ChatId) -> Option<ConversationState> {
        self.conversations.get(chat).await
    }

    pub fn router(&self) -> Router {
        walletbot_app::router(AppState::new(self.dispatcher.clone()))
    }
}

pub fn last_text(replies: &[Reply]) -> &str {
    replies.last().map(|r| r.text.as_str()).unwrap_or_default()
}

pub fn json_request(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

pub async fn parse_body(response: Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
