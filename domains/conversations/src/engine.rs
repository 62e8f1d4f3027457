//! Conversation engine
//!
//! Drives pending flows one message at a time: validate the input against
//! the current step, then either re-prompt, advance, or commit. A terminal
//! step clears the chat's state whatever the commit's outcome.

use std::str::FromStr;
use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;
use walletbot_auth::{AuthBackend, AuthError};
use walletbot_common::{ChatId, Reply};
use walletbot_finance::{
    format_amount, format_money, today, Card, FinanceRepository,
    NewTransaction, TransactionKind,
};

use crate::domain::prompts::{self, COMMAND_MENU};
use crate::domain::state::{CardChoice, ConversationState, Field, Flow};
use crate::domain::validation::{ValidationError, DATE_FORMAT};
use crate::error::{EntryError, FlowCommitError};
use crate::repository::ConversationStore;

/// Result of offering a message to the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputOutcome {
    /// No flow was pending; the caller decides what the text means
    NotHandled,
    Handled(Vec<Reply>),
}

impl InputOutcome {
    pub fn handled(&self) -> bool {
        matches!(self, InputOutcome::Handled(_))
    }

    pub fn replies(&self) -> &[Reply] {
        match self {
            InputOutcome::NotHandled => &[],
            InputOutcome::Handled(replies) => replies,
        }
    }

    pub fn into_replies(self) -> Vec<Reply> {
        match self {
            InputOutcome::NotHandled => Vec::new(),
            InputOutcome::Handled(replies) => replies,
        }
    }
}

#[derive(Clone)]
pub struct ConversationEngine {
    store: Arc<dyn ConversationStore>,
    finance: Arc<dyn FinanceRepository>,
    auth: AuthBackend,
}

impl ConversationEngine {
    pub fn new(
        store: Arc<dyn ConversationStore>,
        finance: Arc<dyn FinanceRepository>,
        auth: AuthBackend,
    ) -> Self {
        Self {
            store,
            finance,
            auth,
        }
    }

    /// Entry state of `flow` for a user owning `cards`.
    ///
    /// Card flows skip selection when there is exactly one card and refuse
    /// to start with none. Other flows ignore `cards`.
    pub fn enter_flow(cards: &[Card], flow: Flow) -> Result<ConversationState, EntryError> {
        let Some(card_step) = flow.card_step() else {
            return Ok(ConversationState::new(flow.first_step()));
        };

        match cards {
            [] => Err(EntryError::NoCards),
            [only] => Ok(ConversationState::new(flow.first_step())
                .with_value(Field::CardId, only.id.to_string())),
            many => Ok(ConversationState::new(card_step).with_choices(
                many.iter()
                    .map(|card| CardChoice {
                        card_id: card.id,
                        label: card.masked_number(),
                    })
                    .collect(),
            )),
        }
    }

    /// Start `flow` for `chat`, replacing any pending flow.
    ///
    /// Login and signup need an anonymous chat, every other flow a session.
    /// When the flow cannot start no state is written.
    pub async fn start_flow(&self, chat: ChatId, flow: Flow) -> Vec<Reply> {
        match self.entry_state(chat, flow).await {
            Ok(state) => {
                tracing::info!(chat_id = %chat, flow = %flow, step = %state.step, "Flow started");
                let reply = prompts::prompt(&state);
                self.store.set(chat, state).await;
                vec![reply]
            }
            Err(EntryError::NoCards) => vec![Reply::text(prompts::NO_CARDS_FOR_FLOW)],
            Err(EntryError::Auth(AuthError::NotAuthenticated)) => {
                vec![Reply::text(prompts::REQUIRE_AUTH)]
            }
            Err(EntryError::Auth(AuthError::AlreadyAuthenticated)) => {
                vec![Reply::text(prompts::ALREADY_LOGGED_IN)]
            }
            Err(e) => {
                tracing::error!(error = %e, chat_id = %chat, flow = %flow, "Failed to start flow");
                vec![Reply::text(format!("❌ Something went wrong: {}", e))]
            }
        }
    }

    async fn entry_state(&self, chat: ChatId, flow: Flow) -> Result<ConversationState, EntryError> {
        if !flow.requires_session() {
            self.auth.require_anonymous(chat).await?;
            return Self::enter_flow(&[], flow);
        }

        let session = self.auth.require_session(chat).await?;
        if flow.card_step().is_none() {
            return Self::enter_flow(&[], flow);
        }

        let cards = self.finance.user_cards(&session.subject_id).await?;
        Self::enter_flow(&cards, flow)
    }

    /// Drop the pending flow of `chat`, if any
    pub async fn cancel(&self, chat: ChatId) -> Vec<Reply> {
        self.store.clear(chat).await;
        vec![Reply::text(prompts::OPERATION_CANCELLED)]
    }

    /// Pending flow of `chat`, if any
    pub async fn pending(&self, chat: ChatId) -> Option<ConversationState> {
        self.store.get(chat).await
    }

    /// Feed one message to the pending flow of `chat`
    pub async fn handle_input(&self, chat: ChatId, text: &str) -> InputOutcome {
        let Some(state) = self.store.get(chat).await else {
            return InputOutcome::NotHandled;
        };

        let spec = state.step.spec();
        let value = match spec.rule.apply(text, &state, today()) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!(
                    chat_id = %chat, step = %state.step, error = %e, "Input rejected"
                );
                let message = match e {
                    ValidationError::CardNotFound => prompts::CARD_NOT_FOUND,
                    ValidationError::TooLarge | ValidationError::TooPrecise => {
                        prompts::AMOUNT_OUT_OF_RANGE
                    }
                    _ => spec.retry,
                };
                return InputOutcome::Handled(vec![prompts::retry(&state, message)]);
            }
        };

        if spec.field == Field::CardId {
            if let Some(reply) = self.check_card_exists(&state, &value).await {
                return InputOutcome::Handled(vec![reply]);
            }
        }

        let flow = state.flow();
        let state = state.with_value(spec.field, value);

        match spec.next {
            Some(next) => {
                let state = state.advance(next);
                let reply = prompts::prompt(&state);
                self.store.set(chat, state).await;
                InputOutcome::Handled(vec![reply])
            }
            None => {
                let mut replies = vec![prompts::progress(flow)];
                let outcome = self.commit(chat, flow, &state).await;
                self.store.clear(chat).await;

                match outcome {
                    Ok(mut success) => {
                        tracing::info!(chat_id = %chat, flow = %flow, "Flow completed");
                        replies.append(&mut success);
                    }
                    Err(e) => {
                        tracing::warn!(
                            chat_id = %chat, flow = %flow, error = %e, "Flow commit failed"
                        );
                        replies.push(prompts::failure(flow, &e));
                    }
                }
                InputOutcome::Handled(replies)
            }
        }
    }

    /// Notice for a selected card that no longer exists; state stays put
    async fn check_card_exists(&self, state: &ConversationState, value: &str) -> Option<Reply> {
        let card_id = Uuid::parse_str(value).ok()?;
        match self.finance.card_by_id(card_id).await {
            Ok(Some(_)) => None,
            Ok(None) => {
                tracing::warn!(card_id = %card_id, "Selected card no longer exists");
                Some(prompts::retry(state, prompts::CARD_NOT_FOUND))
            }
            Err(e) => {
                tracing::error!(error = %e, card_id = %card_id, "Failed to load selected card");
                Some(Reply::text(format!("❌ Failed to load card: {}", e)))
            }
        }
    }

    async fn commit(
        &self,
        chat: ChatId,
        flow: Flow,
        state: &ConversationState,
    ) -> Result<Vec<Reply>, FlowCommitError> {
        let data = Collected(state);
        match flow {
            Flow::Login => {
                let identity = self
                    .auth
                    .sign_in(data.text(Field::Email)?, data.text(Field::Password)?)
                    .await?;
                let session = self.auth.sessions().set(chat, identity).await;
                Ok(vec![Reply::text(format!(
                    "✅ Welcome, *{}*! You are now logged in.\n\n{}",
                    session.greeting_name(),
                    COMMAND_MENU
                ))])
            }
            Flow::Signup => {
                let identity = self
                    .auth
                    .sign_up(
                        data.text(Field::Email)?,
                        data.text(Field::Password)?,
                        data.text(Field::Name)?,
                        data.text(Field::Surname)?,
                    )
                    .await?;
                let session = self.auth.sessions().set(chat, identity).await;
                Ok(vec![Reply::text(format!(
                    "✅ Account created successfully!\n\n\
                     Welcome, *{}*! You are now logged in.\n\n{}",
                    session.greeting_name(),
                    COMMAND_MENU
                ))])
            }
            Flow::AddCard => {
                let session = self.auth.require_session(chat).await?;
                let card = self
                    .finance
                    .add_card(
                        &session.subject_id,
                        data.text(Field::CardNumber)?,
                        data.amount(Field::Amount)?,
                    )
                    .await?;
                Ok(vec![Reply::text(format!(
                    "✅ Card {} added successfully with balance {}!",
                    card.masked_number(),
                    format_money(card.current_amount)
                ))])
            }
            Flow::AddTransaction => {
                let kind = data.parsed::<TransactionKind>(Field::Kind)?;
                let stored = self
                    .finance
                    .add_transaction(NewTransaction {
                        card_id: data.card_id()?,
                        title: data.text(Field::Title)?.to_string(),
                        kind,
                        category: data.text(Field::Category)?.to_string(),
                        amount: data.amount(Field::Amount)?,
                        date: data.date(Field::Date)?,
                    })
                    .await?;

                let mut text = format!(
                    "✅ Transaction added!\n\n{} {}\n{}{} ₼ • {} • {}",
                    stored.kind.icon(),
                    stored.title,
                    stored.kind.sign(),
                    format_amount(stored.amount),
                    stored.category,
                    stored.date.format(DATE_FORMAT)
                );
                if stored.scheduled {
                    text.push_str("\n\n⏰ Scheduled: the card balance is not affected yet.");
                }
                Ok(vec![Reply::text(text)])
            }
            Flow::AddLimit => {
                let month = data.text(Field::Month)?;
                let amount = data.amount(Field::Amount)?;
                self.finance
                    .add_card_limit(data.card_id()?, month, amount)
                    .await?;
                Ok(vec![Reply::text(format!(
                    "✅ Limit added!\n\n📅 Month: {}\n💰 Limit: {}",
                    month,
                    format_money(amount)
                ))])
            }
            Flow::AddPlan => {
                let month = data.text(Field::Month)?;
                let amount = data.amount(Field::Amount)?;
                self.finance
                    .add_card_plan(data.card_id()?, month, amount)
                    .await?;
                Ok(vec![Reply::text(format!(
                    "✅ Plan added!\n\n📅 Month: {}\n💰 Minimum Balance: {}",
                    month,
                    format_money(amount)
                ))])
            }
            Flow::AddWish => {
                let name = data.text(Field::Name)?;
                let amount = data.amount(Field::Amount)?;
                self.finance
                    .add_card_wish(data.card_id()?, name, amount)
                    .await?;
                Ok(vec![Reply::text(format!(
                    "✅ Wish added!\n\n🌟 *{}*\n🎯 Target: {}\n\nStart saving to achieve your goal!",
                    name,
                    format_money(amount)
                ))])
            }
        }
    }
}

/// Typed access to a finished flow's accumulated values
struct Collected<'a>(&'a ConversationState);

impl<'a> Collected<'a> {
    fn text(&self, field: Field) -> Result<&'a str, FlowCommitError> {
        self.0
            .value(field)
            .ok_or(FlowCommitError::MissingField(field))
    }

    fn parsed<T: FromStr>(&self, field: Field) -> Result<T, FlowCommitError> {
        let value = self.text(field)?;
        value.parse().map_err(|_| FlowCommitError::Malformed {
            field,
            value: value.to_string(),
        })
    }

    fn amount(&self, field: Field) -> Result<Decimal, FlowCommitError> {
        self.parsed(field)
    }

    fn card_id(&self) -> Result<Uuid, FlowCommitError> {
        self.parsed(Field::CardId)
    }

    fn date(&self, field: Field) -> Result<NaiveDate, FlowCommitError> {
        let value = self.text(field)?;
        NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| FlowCommitError::Malformed {
            field,
            value: value.to_string(),
        })
    }
}
