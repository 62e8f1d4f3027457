//! Read-only command views
//!
//! Each function renders already-fetched data into a single reply.

use rust_decimal::{Decimal, RoundingStrategy};
use walletbot_common::{Button, Reply};
use walletbot_finance::reports::{self, LimitStatus};
use walletbot_finance::{format_money, Card, Transaction};

use super::CardView;

pub const NO_CARDS: &str = "📭 You have no cards yet.\n\nUse /addcard to add your first card!";
pub const CARD_NOT_FOUND: &str = "❌ Card not found.";
pub const NOT_LOGGED_IN: &str = "❌ You are not logged in.";
pub const LOGGED_OUT: &str = "👋 You have been logged out successfully.\n\n\
     Use /login to sign in again or /signup to create a new account.";
pub const UNKNOWN_COMMAND: &str = "❓ Unknown command.\n\nUse /help to see available commands.";
pub const SOMETHING_WENT_WRONG: &str = "❌ Something went wrong. Please try again.";

const RECENT_TRANSACTIONS: usize = 10;
const RECENT_CURRENT: usize = 15;
const RULE: &str = "━━━━━━━━━━━━━━━";

pub const WELCOME: &str = "Hi! 👋 Welcome to *Walletbot*.

This bot helps you manage your cards and transactions.

🔐 *Getting Started:*
• If you have an account, use /login
• If you're new here, use /signup";

pub const HELP: &str = "📚 *Walletbot Help*

*Authentication:*
/start - Start the bot
/login - Sign in to your account
/signup - Create a new account
/logout - Sign out

*Card Management:*
/cards - View all your cards
/addcard - Add a new card
/balance - Check card balances

*Transactions:*
/transactions - View all transactions
/addtransaction - Add a new transaction
/scheduled - View scheduled (future) transactions
/current - View current (applied) transactions

*Limits (Monthly Spending):*
/limits - View all limits
/addlimit - Add a spending limit
/limitstatus - See spending vs limits

*Plans (Balance Goals):*
/plans - View all plans
/addplan - Add a balance goal

*Wishes (Savings Goals):*
/wishes - View all wishes
/addwish - Add a savings goal
/wishstatus - See progress to wishes

*Statistics:*
/stats - View charts and graphs

*Other:*
/help - Show this help message
/cancel - Cancel current operation";

/// Percentage rounded half away from zero to `places` decimals
fn percent(value: Decimal, places: u32) -> String {
    let rounded = value.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}%", places as usize, rounded)
}

fn transaction_entry(tx: &Transaction, mark_scheduled: bool) -> String {
    let scheduled = if mark_scheduled && tx.scheduled {
        " ⏰"
    } else {
        ""
    };
    format!(
        "{} {}{}\n   {}{} • {} • {}\n\n",
        tx.kind.icon(),
        tx.title,
        scheduled,
        tx.kind.sign(),
        format_money(tx.amount),
        tx.category,
        tx.date.format("%Y-%m-%d"),
    )
}

fn more_transactions(total: usize, shown: usize) -> String {
    if total > shown {
        format!("_...and {} more transactions_", total - shown)
    } else {
        String::new()
    }
}

pub fn card_list(cards: &[Card]) -> Reply {
    let mut text = String::from("💳 *Your Cards:*\n\n");
    for (index, card) in cards.iter().enumerate() {
        text.push_str(&format!(
            "{}. Card {}\n   💰 Balance: {}\n\n",
            index + 1,
            card.masked_number(),
            format_money(card.current_amount),
        ));
    }
    text.push_str("_Use /balance to see detailed balance info_");
    Reply::text(text)
}

pub fn balances(cards: &[Card]) -> Reply {
    let mut text = String::from("💰 *Card Balances:*\n\n");
    for (index, card) in cards.iter().enumerate() {
        text.push_str(&format!(
            "{}. Card {}\n   Balance: *{}*\n\n",
            index + 1,
            card.masked_number(),
            format_money(card.current_amount),
        ));
    }
    text.push_str(&format!(
        "{}\n📊 *Total Balance: {}*",
        RULE,
        format_money(reports::total_balance(cards)),
    ));
    Reply::text(text)
}

/// Card buttons leading to `view` of the chosen card
pub fn card_picker(view: CardView, cards: &[Card]) -> Reply {
    Reply::text(view.picker_heading()).with_buttons(cards.iter().map(|card| {
        Button::new(
            format!("Card {}", card.masked_number()),
            view.callback(card.id),
        )
    }))
}

/// Newest transactions of a card; scheduled ones are marked
pub fn card_transactions(card: &Card, transactions: &[Transaction]) -> Reply {
    let masked = card.masked_number();
    if transactions.is_empty() {
        return Reply::text(format!(
            "📭 No transactions found for card {}.\n\nUse /addtransaction to add one!",
            masked
        ));
    }

    let mut text = format!("📋 *Transactions for Card {}:*\n\n", masked);
    for tx in transactions.iter().take(RECENT_TRANSACTIONS) {
        text.push_str(&transaction_entry(tx, true));
    }
    text.push_str(&more_transactions(transactions.len(), RECENT_TRANSACTIONS));
    Reply::text(text.trim_end().to_string())
}

pub fn scheduled_transactions(card: &Card, scheduled: &[Transaction]) -> Reply {
    let masked = card.masked_number();
    if scheduled.is_empty() {
        return Reply::text(format!(
            "⏰ No scheduled transactions for card {}.\n\n\
             Scheduled transactions are future-dated transactions that haven't been applied yet.",
            masked
        ));
    }

    let mut text = format!("⏰ *Scheduled Transactions for {}:*\n\n", masked);
    for tx in scheduled {
        text.push_str(&transaction_entry(tx, false));
    }

    let summary = reports::scheduled_summary(scheduled);
    text.push_str(&format!(
        "{}\n📊 *Summary:*\nScheduled Income: +{}\nScheduled Expense: -{}\nNet Impact: {}",
        RULE,
        format_money(summary.income),
        format_money(summary.expense),
        format_money(summary.net),
    ));
    Reply::text(text)
}

pub fn current_transactions(card: &Card, current: &[Transaction]) -> Reply {
    let masked = card.masked_number();
    if current.is_empty() {
        return Reply::text(format!("📋 No current transactions for card {}.", masked));
    }

    let mut text = format!("📋 *Current Transactions for {}:*\n\n", masked);
    for tx in current.iter().take(RECENT_CURRENT) {
        text.push_str(&transaction_entry(tx, false));
    }
    text.push_str(&more_transactions(current.len(), RECENT_CURRENT));
    Reply::text(text.trim_end().to_string())
}

pub fn limits(cards: &[Card]) -> Reply {
    let mut text = String::from("⚙️ *Card Limits:*\n\n");
    for (index, card) in cards.iter().enumerate() {
        text.push_str(&format!("{}. Card {}\n", index + 1, card.masked_number()));
        if card.limits.is_empty() {
            text.push_str("   _No limits set_\n");
        }
        for limit in &card.limits {
            text.push_str(&format!(
                "   📅 {}: {}\n",
                limit.month,
                format_money(limit.amount)
            ));
        }
        text.push('\n');
    }
    text.push_str("_Use /addlimit to add a new limit_\n");
    text.push_str("_Use /limitstatus to see spending vs limits_");
    Reply::text(text)
}

/// Spending against this month's limit, one section per card
pub fn limit_status(cards: &[(Card, Option<LimitStatus>)], month: &str) -> Reply {
    let mut text = String::from("📊 *Spending vs Limits (Current Month):*\n\n");
    for (card, status) in cards {
        text.push_str(&format!("💳 Card {}\n", card.masked_number()));
        let Some(status) = status else {
            text.push_str(&format!("   _No limit set for {}_\n\n", month));
            continue;
        };

        text.push_str(&format!(
            "   Limit: {}\n   Spent: {}\n   {} {}\n   Remaining: {}\n",
            format_money(status.limit),
            format_money(status.spent),
            status.bar,
            percent(status.percentage, 0),
            format_money(status.remaining),
        ));
        if let Some(over_by) = status.over_by {
            text.push_str(&format!("   ⚠️ *OVER LIMIT by {}*\n", format_money(over_by)));
        }
        text.push('\n');
    }
    Reply::text(text.trim_end().to_string())
}

pub fn plans(cards: &[Card]) -> Reply {
    let mut text = String::from("📋 *Card Plans (Minimum Balance Goals):*\n\n");
    for (index, card) in cards.iter().enumerate() {
        text.push_str(&format!(
            "{}. Card {}\n   Current Balance: *{}*\n",
            index + 1,
            card.masked_number(),
            format_money(card.current_amount),
        ));
        let statuses = reports::plan_statuses(card);
        if statuses.is_empty() {
            text.push_str("   _No plans set_\n");
        }
        for status in statuses {
            text.push_str(&format!(
                "   {} {}: min {}\n",
                if status.met { "✅" } else { "⚠️" },
                status.plan.month,
                format_money(status.plan.amount),
            ));
        }
        text.push('\n');
    }
    text.push_str("_Use /addplan to add a new plan_");
    Reply::text(text)
}

pub fn wishes(cards: &[Card]) -> Reply {
    let mut text = String::from("🌟 *Card Wishes (Savings Goals):*\n\n");
    for (index, card) in cards.iter().enumerate() {
        text.push_str(&format!(
            "{}. Card {}\n   Balance: *{}*\n",
            index + 1,
            card.masked_number(),
            format_money(card.current_amount),
        ));
        if card.wishes.is_empty() {
            text.push_str("   _No wishes set_\n");
        }
        for wish in &card.wishes {
            let progress = reports::wish_progress(card.current_amount, wish);
            text.push_str(&format!(
                "   {} {}: {}\n      Progress: {} ({} remaining)\n",
                if progress.achieved { "✅" } else { "🎯" },
                wish.name,
                format_money(wish.target_amount),
                percent(progress.percentage, 0),
                format_money(progress.remaining),
            ));
        }
        text.push('\n');
    }
    text.push_str("_Use /addwish to add a new wish_\n");
    text.push_str("_Use /wishstatus for detailed progress_");
    Reply::text(text)
}

/// Progress bars for every wish; cards without wishes are skipped
pub fn wish_status(cards: &[Card]) -> Reply {
    let mut text = String::from("🎯 *Wish Progress Status:*\n\n");
    let with_wishes: Vec<&Card> = cards.iter().filter(|c| !c.wishes.is_empty()).collect();
    if with_wishes.is_empty() {
        text.push_str("_No wishes set for any card._\n\nUse /addwish to create a savings goal!");
        return Reply::text(text);
    }

    for card in with_wishes {
        text.push_str(&format!(
            "💳 Card {}\nBalance: *{}*\n\n",
            card.masked_number(),
            format_money(card.current_amount),
        ));
        for (index, wish) in card.wishes.iter().enumerate() {
            let progress = reports::wish_progress(card.current_amount, wish);
            text.push_str(&format!(
                "{}. *{}*\n   Target: {}\n   {} {}\n",
                index + 1,
                wish.name,
                format_money(wish.target_amount),
                progress.bar,
                percent(progress.percentage, 1),
            ));
            if progress.achieved {
                text.push_str("   ✅ ACHIEVED!\n\n");
            } else {
                text.push_str(&format!(
                    "   💰 {} more needed\n\n",
                    format_money(progress.remaining)
                ));
            }
        }
    }
    Reply::text(text.trim_end().to_string())
}
