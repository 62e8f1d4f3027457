//! Chat command layer
//!
//! `Dispatcher` is the single entry point for inbound chat traffic. Slash
//! commands are routed here; any other text is offered to the conversation
//! engine. Button presses arrive as callbacks.

pub mod stats;
pub mod views;

use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;
use walletbot_auth::{AuthBackend, AuthError};
use walletbot_charts::{ChartKind, QuickChart};
use walletbot_common::{ChatId, Reply};
use walletbot_conversations::domain::prompts::COMMAND_MENU;
use walletbot_conversations::{
    ConversationEngine, ConversationStore, Flow, FLOW_CALLBACK_PREFIX, REQUIRE_AUTH,
};
use walletbot_finance::reports::{self, StatsPeriod};
use walletbot_finance::{today, Card, CommitError, FinanceRepository};

/// Slash commands understood by the bot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Login,
    Signup,
    Logout,
    Cancel,
    Cards,
    AddCard,
    Balance,
    Transactions,
    AddTransaction,
    Scheduled,
    Current,
    Limits,
    AddLimit,
    LimitStatus,
    Plans,
    AddPlan,
    Wishes,
    AddWish,
    WishStatus,
    Stats,
}

impl Command {
    pub const ALL: [Command; 22] = [
        Command::Start,
        Command::Help,
        Command::Login,
        Command::Signup,
        Command::Logout,
        Command::Cancel,
        Command::Cards,
        Command::AddCard,
        Command::Balance,
        Command::Transactions,
        Command::AddTransaction,
        Command::Scheduled,
        Command::Current,
        Command::Limits,
        Command::AddLimit,
        Command::LimitStatus,
        Command::Plans,
        Command::AddPlan,
        Command::Wishes,
        Command::AddWish,
        Command::WishStatus,
        Command::Stats,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Help => "help",
            Command::Login => "login",
            Command::Signup => "signup",
            Command::Logout => "logout",
            Command::Cancel => "cancel",
            Command::Cards => "cards",
            Command::AddCard => "addcard",
            Command::Balance => "balance",
            Command::Transactions => "transactions",
            Command::AddTransaction => "addtransaction",
            Command::Scheduled => "scheduled",
            Command::Current => "current",
            Command::Limits => "limits",
            Command::AddLimit => "addlimit",
            Command::LimitStatus => "limitstatus",
            Command::Plans => "plans",
            Command::AddPlan => "addplan",
            Command::Wishes => "wishes",
            Command::AddWish => "addwish",
            Command::WishStatus => "wishstatus",
            Command::Stats => "stats",
        }
    }

    /// Name of the slash command in `text`, without the leading `/`, any
    /// `@botname` suffix or arguments. None when `text` is not a command.
    pub fn name_of(text: &str) -> Option<&str> {
        let word = text.trim_start().strip_prefix('/')?.split_whitespace().next()?;
        Some(word.split('@').next().unwrap_or(word))
    }
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.to_ascii_lowercase();
        Command::ALL
            .into_iter()
            .find(|command| command.as_str() == name)
            .ok_or_else(|| format!("Unknown command: /{}", s))
    }
}

/// Per-card views reachable through a card picker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardView {
    Transactions,
    Scheduled,
    Current,
}

impl CardView {
    fn prefix(&self) -> &'static str {
        match self {
            CardView::Transactions => "tx",
            CardView::Scheduled => "scheduled",
            CardView::Current => "current",
        }
    }

    pub fn picker_heading(&self) -> &'static str {
        match self {
            CardView::Transactions => "📋 Select a card to view transactions:",
            CardView::Scheduled => "📋 Select a card to view scheduled transactions:",
            CardView::Current => "📋 Select a card to view current transactions:",
        }
    }

    /// Callback payload opening this view for `card_id`
    pub fn callback(&self, card_id: Uuid) -> String {
        format!("{}:{}", self.prefix(), card_id)
    }
}

/// Decoded button payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Callback {
    /// Input for the pending flow
    Flow(String),
    Card(CardView, Uuid),
    StatsPeriod(StatsPeriod),
    Chart(StatsPeriod, ChartKind),
}

impl Callback {
    /// None for payloads this bot never issues
    pub fn parse(data: &str) -> Option<Callback> {
        if let Some(value) = data.strip_prefix(FLOW_CALLBACK_PREFIX) {
            return Some(Callback::Flow(value.to_string()));
        }

        let (prefix, rest) = data.split_once(':')?;
        match prefix {
            "tx" => Some(Callback::Card(CardView::Transactions, rest.parse().ok()?)),
            "scheduled" => Some(Callback::Card(CardView::Scheduled, rest.parse().ok()?)),
            "current" => Some(Callback::Card(CardView::Current, rest.parse().ok()?)),
            "stats" => Some(Callback::StatsPeriod(rest.parse().ok()?)),
            "chart" => {
                let (period, kind) = rest.split_once(':')?;
                Some(Callback::Chart(period.parse().ok()?, kind.parse().ok()?))
            }
            _ => None,
        }
    }
}

/// A command could not be served; rendered as a single reply
#[derive(Error, Debug)]
pub enum CommandError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Store(#[from] CommitError),

    #[error("Card not found")]
    CardNotFound,
}

impl CommandError {
    fn into_reply(self, chat: ChatId) -> Reply {
        match self {
            CommandError::Auth(AuthError::NotAuthenticated) => Reply::text(REQUIRE_AUTH),
            CommandError::Auth(e) => Reply::text(format!("❌ {}", e)),
            CommandError::CardNotFound => Reply::text(views::CARD_NOT_FOUND),
            CommandError::Store(e) => {
                tracing::error!(error = %e, chat_id = %chat, "Command failed");
                Reply::text(views::SOMETHING_WENT_WRONG)
            }
        }
    }
}

type CommandResult = Result<Vec<Reply>, CommandError>;

#[derive(Clone)]
pub struct Dispatcher {
    engine: ConversationEngine,
    auth: AuthBackend,
    finance: Arc<dyn FinanceRepository>,
    charts: QuickChart,
}

impl Dispatcher {
    pub fn new(
        auth: AuthBackend,
        finance: Arc<dyn FinanceRepository>,
        conversations: Arc<dyn ConversationStore>,
        charts: QuickChart,
    ) -> Self {
        let engine = ConversationEngine::new(conversations, finance.clone(), auth.clone());
        Self {
            engine,
            auth,
            finance,
            charts,
        }
    }

    pub fn engine(&self) -> &ConversationEngine {
        &self.engine
    }

    /// Handle one text message. Returns no replies when the text is neither
    /// a command nor input for a pending flow.
    pub async fn handle_message(&self, chat: ChatId, text: &str) -> Vec<Reply> {
        let Some(name) = Command::name_of(text) else {
            return self.engine.handle_input(chat, text).await.into_replies();
        };

        match name.parse::<Command>() {
            Ok(command) => {
                tracing::info!(chat_id = %chat, command = command.as_str(), "Command received");
                self.run(chat, command)
                    .await
                    .unwrap_or_else(|e| vec![e.into_reply(chat)])
            }
            Err(e) => {
                tracing::debug!(chat_id = %chat, error = %e, "Unknown command");
                vec![Reply::text(views::UNKNOWN_COMMAND)]
            }
        }
    }

    /// Handle one button press
    pub async fn handle_callback(&self, chat: ChatId, data: &str) -> Vec<Reply> {
        let Some(callback) = Callback::parse(data) else {
            tracing::debug!(chat_id = %chat, data = %data, "Ignoring unknown callback");
            return Vec::new();
        };

        let result: CommandResult = match callback {
            Callback::Flow(value) => {
                Ok(self.engine.handle_input(chat, &value).await.into_replies())
            }
            Callback::Card(view, card_id) => self.show_card(chat, view, card_id).await,
            Callback::StatsPeriod(period) => self
                .auth
                .require_session(chat)
                .await
                .map(|_| vec![stats::chart_menu(period)])
                .map_err(CommandError::from),
            Callback::Chart(period, kind) => self.render_chart(chat, period, kind).await,
        };
        result.unwrap_or_else(|e| vec![e.into_reply(chat)])
    }

    async fn run(&self, chat: ChatId, command: Command) -> CommandResult {
        match command {
            Command::Login => Ok(self.engine.start_flow(chat, Flow::Login).await),
            Command::Signup => Ok(self.engine.start_flow(chat, Flow::Signup).await),
            Command::AddCard => Ok(self.engine.start_flow(chat, Flow::AddCard).await),
            Command::AddTransaction => {
                Ok(self.engine.start_flow(chat, Flow::AddTransaction).await)
            }
            Command::AddLimit => Ok(self.engine.start_flow(chat, Flow::AddLimit).await),
            Command::AddPlan => Ok(self.engine.start_flow(chat, Flow::AddPlan).await),
            Command::AddWish => Ok(self.engine.start_flow(chat, Flow::AddWish).await),
            Command::Start => Ok(vec![self.welcome(chat).await]),
            Command::Help => Ok(vec![Reply::text(views::HELP)]),
            Command::Logout => Ok(vec![self.logout(chat).await]),
            Command::Cancel => Ok(self.engine.cancel(chat).await),
            Command::Cards => self.with_cards(chat, views::card_list).await,
            Command::Balance => self.with_cards(chat, views::balances).await,
            Command::Limits => self.with_cards(chat, views::limits).await,
            Command::Plans => self.with_cards(chat, views::plans).await,
            Command::Wishes => self.with_cards(chat, views::wishes).await,
            Command::WishStatus => self.with_cards(chat, views::wish_status).await,
            Command::LimitStatus => self.limit_status(chat).await,
            Command::Transactions => self.pick_card(chat, CardView::Transactions).await,
            Command::Scheduled => self.pick_card(chat, CardView::Scheduled).await,
            Command::Current => self.pick_card(chat, CardView::Current).await,
            Command::Stats => {
                self.auth.require_session(chat).await?;
                Ok(vec![stats::period_menu()])
            }
        }
    }

    async fn welcome(&self, chat: ChatId) -> Reply {
        match self.auth.sessions().get(chat).await {
            Some(session) => Reply::text(format!(
                "Welcome back, {}! 👋\n\n{}",
                session.greeting_name(),
                COMMAND_MENU
            )),
            None => Reply::text(views::WELCOME),
        }
    }

    async fn logout(&self, chat: ChatId) -> Reply {
        if !self.auth.sessions().is_authenticated(chat).await {
            return Reply::text(views::NOT_LOGGED_IN);
        }
        self.auth.sessions().clear(chat).await;
        tracing::info!(chat_id = %chat, "Logged out");
        Reply::text(views::LOGGED_OUT)
    }

    async fn user_cards(&self, chat: ChatId) -> Result<Vec<Card>, CommandError> {
        let session = self.auth.require_session(chat).await?;
        Ok(self.finance.user_cards(&session.subject_id).await?)
    }

    /// Render `view` over the user's cards, or the no-cards notice
    async fn with_cards(
        &self,
        chat: ChatId,
        view: impl FnOnce(&[Card]) -> Reply,
    ) -> CommandResult {
        let cards = self.user_cards(chat).await?;
        if cards.is_empty() {
            return Ok(vec![Reply::text(views::NO_CARDS)]);
        }
        Ok(vec![view(&cards)])
    }

    async fn limit_status(&self, chat: ChatId) -> CommandResult {
        let cards = self.user_cards(chat).await?;
        if cards.is_empty() {
            return Ok(vec![Reply::text(views::NO_CARDS)]);
        }

        let month = reports::month_key(today());
        let mut statuses = Vec::with_capacity(cards.len());
        for card in cards {
            let status = match card.limit_for(&month) {
                Some(_) => {
                    let transactions = self.finance.card_transactions(card.id).await?;
                    reports::limit_status(&card, &transactions, &month)
                }
                None => None,
            };
            statuses.push((card, status));
        }
        Ok(vec![views::limit_status(&statuses, &month)])
    }

    /// Show `view` directly for a single card, otherwise offer a picker
    async fn pick_card(&self, chat: ChatId, view: CardView) -> CommandResult {
        let cards = self.user_cards(chat).await?;
        match cards.as_slice() {
            [] => Ok(vec![Reply::text(views::NO_CARDS)]),
            [only] => Ok(vec![self.card_view(view, only).await?]),
            many => Ok(vec![views::card_picker(view, many)]),
        }
    }

    async fn show_card(&self, chat: ChatId, view: CardView, card_id: Uuid) -> CommandResult {
        let session = self.auth.require_session(chat).await?;
        let card = self
            .finance
            .card_by_id(card_id)
            .await?
            .filter(|card| card.user_id == session.subject_id)
            .ok_or(CommandError::CardNotFound)?;
        Ok(vec![self.card_view(view, &card).await?])
    }

    async fn card_view(&self, view: CardView, card: &Card) -> Result<Reply, CommandError> {
        let reply = match view {
            CardView::Transactions => {
                let transactions = self.finance.card_transactions(card.id).await?;
                views::card_transactions(card, &transactions)
            }
            CardView::Scheduled => {
                let scheduled = self.finance.scheduled_transactions(card.id).await?;
                views::scheduled_transactions(card, &scheduled)
            }
            CardView::Current => {
                let current = self.finance.current_transactions(card.id).await?;
                views::current_transactions(card, &current)
            }
        };
        Ok(reply)
    }

    async fn render_chart(
        &self,
        chat: ChatId,
        period: StatsPeriod,
        kind: ChartKind,
    ) -> CommandResult {
        let session = self.auth.require_session(chat).await?;
        let progress = Reply::text(stats::GENERATING);

        let fetched = async {
            let transactions = self.finance.user_transactions(&session.subject_id).await?;
            let balance = match kind {
                ChartKind::Scheduled => {
                    reports::total_balance(&self.finance.user_cards(&session.subject_id).await?)
                }
                _ => Decimal::ZERO,
            };
            Ok::<_, CommitError>((transactions, balance))
        }
        .await;

        let reply = match fetched {
            Ok((transactions, balance)) => {
                let url = stats::chart(&self.charts, kind, period, today(), &transactions, balance);
                tracing::debug!(
                    chat_id = %chat,
                    chart = kind.as_str(),
                    period = period.as_str(),
                    rendered = url.is_some(),
                    "Chart requested"
                );
                stats::chart_reply(kind, url)
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    chat_id = %chat,
                    chart = kind.as_str(),
                    "Chart data unavailable"
                );
                Reply::text(stats::CHART_FAILED)
            }
        };
        Ok(vec![progress, reply])
    }
}
