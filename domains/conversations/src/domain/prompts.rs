//! User-facing texts of the conversation flows

use walletbot_common::{Button, Reply};
use walletbot_finance::TransactionKind;

use super::state::{ConversationState, Field, Flow, FlowStep};

/// Prefix of callback payloads that feed the pending flow
pub const FLOW_CALLBACK_PREFIX: &str = "flow:";

pub const REQUIRE_AUTH: &str = "❌ Please /login or /signup first to use this feature.";
pub const ALREADY_LOGGED_IN: &str =
    "✅ You are already logged in! Use /logout to sign out first.";
pub const NO_CARDS_FOR_FLOW: &str =
    "📭 You have no cards yet.\n\nUse /addcard first to add a card!";
pub const CARD_NOT_FOUND: &str = "❌ Card not found. Please select one of your cards:";
pub const OPERATION_CANCELLED: &str =
    "❌ Operation cancelled.\n\nUse /help to see available commands.";
pub const AMOUNT_OUT_OF_RANGE: &str = "❌ Amount must be below 1,000,000,000,000,000 \
     with at most 2 decimal places. Please try again:";

/// Command overview shown after logging in
pub const COMMAND_MENU: &str = "Here are the available commands:

💳 *Cards & Balance*
/cards - View your cards
/addcard - Add a new card
/balance - Check balances

📋 *Transactions*
/transactions - All transactions
/scheduled - Future transactions
/current - Applied transactions
/addtransaction - Add transaction

💰 *Limits & Goals*
/limitstatus - Spending vs limits
/wishstatus - Progress to wishes
/plans - View balance goals

📊 *Statistics*
/stats - Charts and graphs

🚪 /logout - Sign out
❓ /help - All commands";

fn flow_button(label: impl Into<String>, value: &str) -> Button {
    Button::new(label, format!("{}{}", FLOW_CALLBACK_PREFIX, value))
}

/// Prompt asking for the input of `state.step`
pub fn prompt(state: &ConversationState) -> Reply {
    use FlowStep::*;
    match state.step {
        AwaitingLoginEmail | AwaitingSignupEmail => {
            Reply::text("📧 Please enter your *email address*:")
        }
        AwaitingLoginPassword => Reply::text("🔑 Please enter your *password*:"),
        AwaitingSignupName => Reply::text("👤 Please enter your *first name*:"),
        AwaitingSignupSurname => Reply::text("👤 Please enter your *surname*:"),
        AwaitingSignupPassword => {
            Reply::text("🔑 Please create a *password* (at least 6 characters):")
        }

        AwaitingCardNumber => Reply::text("💳 Please enter the *card number* (16 digits):"),
        AwaitingCardAmount => Reply::text("💰 Enter the *initial balance* (in ₼):"),

        AwaitingTxCard | AwaitingLimitCard | AwaitingPlanCard | AwaitingWishCard => {
            card_selection(state)
        }

        AwaitingTxTitle => Reply::text("📝 Enter transaction *title*:"),
        AwaitingTxType => Reply::text("📊 Select transaction *type*:").with_buttons([
            flow_button("🔴 Cost (Expense)", TransactionKind::Cost.as_str()),
            flow_button("🟢 Income", TransactionKind::Income.as_str()),
        ]),
        AwaitingTxCategory => {
            let categories = state
                .value(Field::Kind)
                .and_then(|k| k.parse::<TransactionKind>().ok())
                .map(|kind| kind.categories())
                .unwrap_or_default();
            Reply::text("📂 Select a *category*:")
                .with_buttons(categories.iter().map(|c| flow_button(*c, c)))
        }
        AwaitingTxAmount => Reply::text("💵 Enter the *amount* (in ₼):"),
        AwaitingTxDate => Reply::text("📅 Enter the *date* (YYYY-MM-DD) or type \"today\":"),

        AwaitingLimitMonth => {
            Reply::text("📅 Enter the month for the limit (YYYY-MM, e.g., 2026-01):")
        }
        AwaitingLimitAmount => Reply::text("💰 Enter the spending limit amount (in ₼):"),
        AwaitingPlanMonth => {
            Reply::text("📅 Enter the month for the plan (YYYY-MM, e.g., 2026-01):")
        }
        AwaitingPlanAmount => Reply::text("💰 Enter the minimum balance goal (in ₼):"),
        AwaitingWishName => Reply::text(
            "🌟 Enter a name for your wish (e.g., \"New Phone\", \"Vacation\"):",
        ),
        AwaitingWishAmount => Reply::text("💰 Enter the target amount for your wish (in ₼):"),
    }
}

fn card_selection(state: &ConversationState) -> Reply {
    let heading = match state.flow() {
        Flow::AddTransaction => "💳 Select a card for this transaction:",
        Flow::AddLimit => "💳 Select a card to add a limit:",
        Flow::AddPlan => "💳 Select a card to add a plan:",
        _ => "💳 Select a card to add a wish:",
    };

    let mut text = format!("{}\n", heading);
    for (index, choice) in state.card_choices.iter().enumerate() {
        text.push_str(&format!("\n{}. Card {}", index + 1, choice.label));
    }

    Reply::text(text).with_buttons(state.card_choices.iter().map(|choice| {
        flow_button(format!("Card {}", choice.label), &choice.card_id.to_string())
    }))
}

/// Re-prompt after rejected input; keeps the step's buttons
pub fn retry(state: &ConversationState, message: &str) -> Reply {
    let mut reply = prompt(state);
    reply.text = message.to_string();
    reply
}

/// Sent just before the flow's commit runs
pub fn progress(flow: Flow) -> Reply {
    Reply::text(match flow {
        Flow::Login => "⏳ Signing in...",
        Flow::Signup => "⏳ Creating your account...",
        Flow::AddCard => "⏳ Adding card...",
        Flow::AddTransaction => "⏳ Adding transaction...",
        Flow::AddLimit => "⏳ Adding limit...",
        Flow::AddPlan => "⏳ Adding plan...",
        Flow::AddWish => "⏳ Adding wish...",
    })
}

/// Sent when the flow's commit fails
pub fn failure(flow: Flow, error: &dyn std::fmt::Display) -> Reply {
    Reply::text(match flow {
        Flow::Login => format!("❌ Login failed: {}\n\nUse /login to try again.", error),
        Flow::Signup => format!("❌ Signup failed: {}\n\nUse /signup to try again.", error),
        Flow::AddCard => format!("❌ Failed to add card: {}", error),
        Flow::AddTransaction => format!("❌ Failed to add transaction: {}", error),
        Flow::AddLimit => format!("❌ Failed to add limit: {}", error),
        Flow::AddPlan => format!("❌ Failed to add plan: {}", error),
        Flow::AddWish => format!("❌ Failed to add wish: {}", error),
    })
}
