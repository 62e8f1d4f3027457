//! Flow identity and per-chat conversation state
//!
//! Every step of every flow is one variant of `FlowStep`; the serialized
//! names (`awaiting_card_number`, ...) are what a shared backend would store.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Multi-step interaction a chat can be in the middle of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Flow {
    Login,
    Signup,
    AddCard,
    AddTransaction,
    AddLimit,
    AddPlan,
    AddWish,
}

impl Flow {
    pub const ALL: [Flow; 7] = [
        Flow::Login,
        Flow::Signup,
        Flow::AddCard,
        Flow::AddTransaction,
        Flow::AddLimit,
        Flow::AddPlan,
        Flow::AddWish,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Flow::Login => "login",
            Flow::Signup => "signup",
            Flow::AddCard => "add_card",
            Flow::AddTransaction => "add_transaction",
            Flow::AddLimit => "add_limit",
            Flow::AddPlan => "add_plan",
            Flow::AddWish => "add_wish",
        }
    }

    /// Login and signup run for anonymous chats, everything else needs a session
    pub fn requires_session(&self) -> bool {
        !matches!(self, Flow::Login | Flow::Signup)
    }
}

impl std::fmt::Display for Flow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowStep {
    AwaitingLoginEmail,
    AwaitingLoginPassword,

    AwaitingSignupName,
    AwaitingSignupSurname,
    AwaitingSignupEmail,
    AwaitingSignupPassword,

    AwaitingCardNumber,
    AwaitingCardAmount,

    AwaitingTxCard,
    AwaitingTxTitle,
    AwaitingTxType,
    AwaitingTxCategory,
    AwaitingTxAmount,
    AwaitingTxDate,

    AwaitingLimitCard,
    AwaitingLimitMonth,
    AwaitingLimitAmount,

    AwaitingPlanCard,
    AwaitingPlanMonth,
    AwaitingPlanAmount,

    AwaitingWishCard,
    AwaitingWishName,
    AwaitingWishAmount,
}

impl FlowStep {
    pub fn flow(&self) -> Flow {
        use FlowStep::*;
        match self {
            AwaitingLoginEmail | AwaitingLoginPassword => Flow::Login,
            AwaitingSignupName
            | AwaitingSignupSurname
            | AwaitingSignupEmail
            | AwaitingSignupPassword => Flow::Signup,
            AwaitingCardNumber | AwaitingCardAmount => Flow::AddCard,
            AwaitingTxCard | AwaitingTxTitle | AwaitingTxType | AwaitingTxCategory
            | AwaitingTxAmount | AwaitingTxDate => Flow::AddTransaction,
            AwaitingLimitCard | AwaitingLimitMonth | AwaitingLimitAmount => Flow::AddLimit,
            AwaitingPlanCard | AwaitingPlanMonth | AwaitingPlanAmount => Flow::AddPlan,
            AwaitingWishCard | AwaitingWishName | AwaitingWishAmount => Flow::AddWish,
        }
    }

    pub fn as_str(&self) -> &'static str {
        use FlowStep::*;
        match self {
            AwaitingLoginEmail => "awaiting_login_email",
            AwaitingLoginPassword => "awaiting_login_password",
            AwaitingSignupName => "awaiting_signup_name",
            AwaitingSignupSurname => "awaiting_signup_surname",
            AwaitingSignupEmail => "awaiting_signup_email",
            AwaitingSignupPassword => "awaiting_signup_password",
            AwaitingCardNumber => "awaiting_card_number",
            AwaitingCardAmount => "awaiting_card_amount",
            AwaitingTxCard => "awaiting_tx_card",
            AwaitingTxTitle => "awaiting_tx_title",
            AwaitingTxType => "awaiting_tx_type",
            AwaitingTxCategory => "awaiting_tx_category",
            AwaitingTxAmount => "awaiting_tx_amount",
            AwaitingTxDate => "awaiting_tx_date",
            AwaitingLimitCard => "awaiting_limit_card",
            AwaitingLimitMonth => "awaiting_limit_month",
            AwaitingLimitAmount => "awaiting_limit_amount",
            AwaitingPlanCard => "awaiting_plan_card",
            AwaitingPlanMonth => "awaiting_plan_month",
            AwaitingPlanAmount => "awaiting_plan_amount",
            AwaitingWishCard => "awaiting_wish_card",
            AwaitingWishName => "awaiting_wish_name",
            AwaitingWishAmount => "awaiting_wish_amount",
        }
    }
}

impl std::fmt::Display for FlowStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key of a value collected by a flow step
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Email,
    Password,
    Name,
    Surname,
    CardId,
    CardNumber,
    Amount,
    Title,
    Kind,
    Category,
    Date,
    Month,
}

/// A card offered by a card-selection step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardChoice {
    pub card_id: Uuid,
    /// Masked number, e.g. `**** 1234`
    pub label: String,
}

/// The one pending flow of a chat
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationState {
    pub step: FlowStep,
    pub accumulated: BTreeMap<Field, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub card_choices: Vec<CardChoice>,
}

impl ConversationState {
    pub fn new(step: FlowStep) -> Self {
        Self {
            step,
            accumulated: BTreeMap::new(),
            card_choices: Vec::new(),
        }
    }

    pub fn flow(&self) -> Flow {
        self.step.flow()
    }

    pub fn value(&self, field: Field) -> Option<&str> {
        self.accumulated.get(&field).map(String::as_str)
    }

    pub fn with_value(mut self, field: Field, value: impl Into<String>) -> Self {
        self.accumulated.insert(field, value.into());
        self
    }

    pub fn with_choices(mut self, choices: Vec<CardChoice>) -> Self {
        self.card_choices = choices;
        self
    }

    /// Move to `step`, keeping the accumulated values. Card choices only
    /// live for the selection step.
    pub fn advance(mut self, step: FlowStep) -> Self {
        self.step = step;
        self.card_choices.clear();
        self
    }
}

impl std::fmt::Debug for ConversationState {
    #[mutants::skip] // Debug formatting only
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let accumulated: BTreeMap<&Field, &str> = self
            .accumulated
            .iter()
            .map(|(field, value)| match field {
                Field::Password => (field, "[REDACTED]"),
                _ => (field, value.as_str()),
            })
            .collect();

        f.debug_struct("ConversationState")
            .field("step", &self.step)
            .field("accumulated", &accumulated)
            .field("card_choices", &self.card_choices)
            .finish()
    }
}
