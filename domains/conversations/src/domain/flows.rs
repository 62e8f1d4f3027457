//! Declarative flow definitions
//!
//! Each step names the field it fills, the rule its input must pass, and the
//! step that follows. A step without a successor is terminal: once its input
//! is accepted the flow commits.

use super::state::{Field, Flow, FlowStep};
use super::validation::{Rule, MIN_PASSWORD_LENGTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepSpec {
    pub step: FlowStep,
    pub field: Field,
    pub rule: Rule,
    pub next: Option<FlowStep>,
    /// Re-prompt sent when the input fails `rule`
    pub retry: &'static str,
}

const RETRY_EMAIL: &str = "❌ Please enter your email address:";
const RETRY_PASSWORD: &str = "❌ Please enter your password:";
const RETRY_AMOUNT_NON_NEGATIVE: &str = "❌ Invalid amount. Please enter a valid number:";
const RETRY_AMOUNT_POSITIVE: &str = "❌ Invalid amount. Please enter a positive number:";
const RETRY_MONTH: &str = "❌ Invalid format. Please use YYYY-MM (e.g., 2026-01):";
const RETRY_CARD: &str = "❌ Please select one of the listed cards:";

const fn spec(
    step: FlowStep,
    field: Field,
    rule: Rule,
    next: Option<FlowStep>,
    retry: &'static str,
) -> StepSpec {
    StepSpec {
        step,
        field,
        rule,
        next,
        retry,
    }
}

impl FlowStep {
    /// The step table
    pub fn spec(self) -> StepSpec {
        use FlowStep::*;
        match self {
            AwaitingLoginEmail => spec(
                self,
                Field::Email,
                Rule::NonEmpty,
                Some(AwaitingLoginPassword),
                RETRY_EMAIL,
            ),
            AwaitingLoginPassword => spec(
                self,
                Field::Password,
                Rule::MinLength(1),
                None,
                RETRY_PASSWORD,
            ),

            AwaitingSignupName => spec(
                self,
                Field::Name,
                Rule::NonEmpty,
                Some(AwaitingSignupSurname),
                "❌ Please enter your first name:",
            ),
            AwaitingSignupSurname => spec(
                self,
                Field::Surname,
                Rule::NonEmpty,
                Some(AwaitingSignupEmail),
                "❌ Please enter your surname:",
            ),
            AwaitingSignupEmail => spec(
                self,
                Field::Email,
                Rule::NonEmpty,
                Some(AwaitingSignupPassword),
                RETRY_EMAIL,
            ),
            AwaitingSignupPassword => spec(
                self,
                Field::Password,
                Rule::MinLength(MIN_PASSWORD_LENGTH),
                None,
                "❌ Password must be at least 6 characters. Please try again:",
            ),

            AwaitingCardNumber => spec(
                self,
                Field::CardNumber,
                Rule::CardNumber,
                Some(AwaitingCardAmount),
                "❌ Invalid card number. Please enter exactly 16 digits:",
            ),
            AwaitingCardAmount => spec(
                self,
                Field::Amount,
                Rule::Amount { allow_zero: true },
                None,
                RETRY_AMOUNT_NON_NEGATIVE,
            ),

            AwaitingTxCard => spec(
                self,
                Field::CardId,
                Rule::CardChoice,
                Some(AwaitingTxTitle),
                RETRY_CARD,
            ),
            AwaitingTxTitle => spec(
                self,
                Field::Title,
                Rule::NonEmpty,
                Some(AwaitingTxType),
                "❌ Please enter a title for the transaction:",
            ),
            AwaitingTxType => spec(
                self,
                Field::Kind,
                Rule::TransactionKind,
                Some(AwaitingTxCategory),
                "❌ Please select *Cost* or *Income*:",
            ),
            AwaitingTxCategory => spec(
                self,
                Field::Category,
                Rule::Category,
                Some(AwaitingTxAmount),
                "❌ Please select one of the listed categories:",
            ),
            AwaitingTxAmount => spec(
                self,
                Field::Amount,
                Rule::Amount { allow_zero: false },
                Some(AwaitingTxDate),
                RETRY_AMOUNT_POSITIVE,
            ),
            AwaitingTxDate => spec(
                self,
                Field::Date,
                Rule::Date,
                None,
                "❌ Invalid date format. Please use YYYY-MM-DD or type \"today\":",
            ),

            AwaitingLimitCard => spec(
                self,
                Field::CardId,
                Rule::CardChoice,
                Some(AwaitingLimitMonth),
                RETRY_CARD,
            ),
            AwaitingLimitMonth => spec(
                self,
                Field::Month,
                Rule::Month,
                Some(AwaitingLimitAmount),
                RETRY_MONTH,
            ),
            AwaitingLimitAmount => spec(
                self,
                Field::Amount,
                Rule::Amount { allow_zero: false },
                None,
                RETRY_AMOUNT_POSITIVE,
            ),

            AwaitingPlanCard => spec(
                self,
                Field::CardId,
                Rule::CardChoice,
                Some(AwaitingPlanMonth),
                RETRY_CARD,
            ),
            AwaitingPlanMonth => spec(
                self,
                Field::Month,
                Rule::Month,
                Some(AwaitingPlanAmount),
                RETRY_MONTH,
            ),
            AwaitingPlanAmount => spec(
                self,
                Field::Amount,
                Rule::Amount { allow_zero: true },
                None,
                RETRY_AMOUNT_NON_NEGATIVE,
            ),

            AwaitingWishCard => spec(
                self,
                Field::CardId,
                Rule::CardChoice,
                Some(AwaitingWishName),
                RETRY_CARD,
            ),
            AwaitingWishName => spec(
                self,
                Field::Name,
                Rule::NonEmpty,
                Some(AwaitingWishAmount),
                "❌ Please enter a name for your wish:",
            ),
            AwaitingWishAmount => spec(
                self,
                Field::Amount,
                Rule::Amount { allow_zero: false },
                None,
                RETRY_AMOUNT_POSITIVE,
            ),
        }
    }

    pub fn is_card_selection(self) -> bool {
        self.spec().rule == Rule::CardChoice
    }
}

impl Flow {
    /// Card-selection step, for flows that act on one of the user's cards
    pub fn card_step(&self) -> Option<FlowStep> {
        match self {
            Flow::AddTransaction => Some(FlowStep::AwaitingTxCard),
            Flow::AddLimit => Some(FlowStep::AwaitingLimitCard),
            Flow::AddPlan => Some(FlowStep::AwaitingPlanCard),
            Flow::AddWish => Some(FlowStep::AwaitingWishCard),
            Flow::Login | Flow::Signup | Flow::AddCard => None,
        }
    }

    /// First step that collects data, i.e. after any card selection
    pub fn first_step(&self) -> FlowStep {
        match self {
            Flow::Login => FlowStep::AwaitingLoginEmail,
            Flow::Signup => FlowStep::AwaitingSignupName,
            Flow::AddCard => FlowStep::AwaitingCardNumber,
            Flow::AddTransaction => FlowStep::AwaitingTxTitle,
            Flow::AddLimit => FlowStep::AwaitingLimitMonth,
            Flow::AddPlan => FlowStep::AwaitingPlanMonth,
            Flow::AddWish => FlowStep::AwaitingWishName,
        }
    }

    /// Steps in order, starting at the card selection when there is one
    pub fn steps(&self) -> Vec<FlowStep> {
        let mut steps = Vec::new();
        let mut current = Some(self.card_step().unwrap_or_else(|| self.first_step()));
        while let Some(step) = current {
            steps.push(step);
            current = step.spec().next;
        }
        steps
    }
}
