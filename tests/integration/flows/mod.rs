//! Multi-step flows driven through the dispatcher

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use walletbot_conversations::{Field, FlowStep};
use walletbot_finance::FinanceRepository;

use crate::common::{last_text, TestBot, CHAT, EMAIL, OTHER_CHAT, PASSWORD};

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

mod test_auth_flows {
    use super::*;

    #[tokio::test]
    async fn test_login_flow_sets_session_and_clears_state() {
        let bot = TestBot::new();

        let replies = bot.send(CHAT, "/login").await;
        assert_eq!(last_text(&replies), "📧 Please enter your *email address*:");
        assert_eq!(
            bot.pending(CHAT).await.unwrap().step,
            FlowStep::AwaitingLoginEmail
        );

        bot.send(CHAT, EMAIL).await;
        let replies = bot.send(CHAT, PASSWORD).await;

        assert_eq!(replies[0].text, "⏳ Signing in...");
        assert!(replies[1].text.starts_with("✅ Welcome, *Ali*! You are now logged in."));
        assert!(bot.pending(CHAT).await.is_none());
        assert!(bot.auth.sessions().is_authenticated(CHAT).await);
    }

    #[tokio::test]
    async fn test_login_with_wrong_password_discards_flow() {
        let bot = TestBot::new();

        let replies = bot.send_all(CHAT, &["/login", EMAIL, "wrong-password"]).await;

        assert!(last_text(&replies).starts_with("❌ Login failed:"));
        assert!(last_text(&replies).ends_with("Use /login to try again."));
        assert!(bot.pending(CHAT).await.is_none());
        assert!(!bot.auth.sessions().is_authenticated(CHAT).await);
    }

    #[tokio::test]
    async fn test_login_while_logged_in_is_refused() {
        let bot = TestBot::logged_in().await;

        let replies = bot.send(CHAT, "/login").await;

        assert!(last_text(&replies).starts_with("✅ You are already logged in!"));
        assert!(bot.pending(CHAT).await.is_none());
    }

    #[tokio::test]
    async fn test_signup_flow_creates_account_and_logs_in() {
        let bot = TestBot::new();

        let replies = bot
            .send_all(
                CHAT,
                &["/signup", "Nigar", "Huseynova", "nigar@example.com", "hunter22"],
            )
            .await;

        assert_eq!(replies[0].text, "⏳ Creating your account...");
        assert!(replies[1].text.starts_with("✅ Account created successfully!"));
        assert!(replies[1].text.contains("Welcome, *Nigar*!"));

        let session = bot.auth.sessions().get(CHAT).await.unwrap();
        assert_eq!(session.email, "nigar@example.com");
        assert!(bot.pending(CHAT).await.is_none());
    }

    #[tokio::test]
    async fn test_signup_short_password_reprompts() {
        let bot = TestBot::new();

        let replies = bot
            .send_all(CHAT, &["/signup", "Nigar", "Huseynova", "nigar@example.com", "12345"])
            .await;

        assert_eq!(
            last_text(&replies),
            "❌ Password must be at least 6 characters. Please try again:"
        );
        let state = bot.pending(CHAT).await.unwrap();
        assert_eq!(state.step, FlowStep::AwaitingSignupPassword);
        assert_eq!(state.value(Field::Email), Some("nigar@example.com"));
    }

    #[tokio::test]
    async fn test_signup_with_existing_email_fails() {
        let bot = TestBot::new();

        let replies = bot
            .send_all(CHAT, &["/signup", "Ali", "Aliyev", EMAIL, "another1"])
            .await;

        assert!(last_text(&replies).starts_with("❌ Signup failed:"));
        assert!(bot.pending(CHAT).await.is_none());
        assert!(!bot.auth.sessions().is_authenticated(CHAT).await);
    }

    #[tokio::test]
    async fn test_identity_provider_outage_fails_login() {
        let bot = TestBot::new();
        bot.identity.set_unavailable(true);

        let replies = bot.send_all(CHAT, &["/login", EMAIL, PASSWORD]).await;

        assert!(last_text(&replies).starts_with("❌ Login failed:"));
        assert!(bot.pending(CHAT).await.is_none());
    }
}

mod test_flow_state {
    use super::*;

    #[tokio::test]
    async fn test_new_flow_replaces_pending_flow() {
        let bot = TestBot::logged_in().await;

        bot.send(CHAT, "/addcard").await;
        bot.send(CHAT, "4111111111111111").await;
        assert_eq!(
            bot.pending(CHAT).await.unwrap().step,
            FlowStep::AwaitingCardAmount
        );

        bot.send(CHAT, "/addcard").await;
        let state = bot.pending(CHAT).await.unwrap();
        assert_eq!(state.step, FlowStep::AwaitingCardNumber);
        assert!(state.accumulated.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_input_leaves_state_unchanged() {
        let bot = TestBot::logged_in().await;
        bot.send_all(CHAT, &["/addcard", "4111 1111 1111 1111"]).await;
        let before = bot.pending(CHAT).await.unwrap();

        let replies = bot.send(CHAT, "lots").await;

        assert_eq!(
            last_text(&replies),
            "❌ Invalid amount. Please enter a valid number:"
        );
        assert_eq!(bot.pending(CHAT).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_fifteen_digit_card_number_is_rejected() {
        let bot = TestBot::logged_in().await;

        let replies = bot.send_all(CHAT, &["/addcard", "411111111111111"]).await;

        assert_eq!(
            last_text(&replies),
            "❌ Invalid card number. Please enter exactly 16 digits:"
        );
        assert_eq!(
            bot.pending(CHAT).await.unwrap().step,
            FlowStep::AwaitingCardNumber
        );
    }

    #[tokio::test]
    async fn test_cancel_drops_pending_flow() {
        let bot = TestBot::logged_in().await;
        bot.send(CHAT, "/addcard").await;

        let replies = bot.send(CHAT, "/cancel").await;

        assert!(last_text(&replies).starts_with("❌ Operation cancelled."));
        assert!(bot.pending(CHAT).await.is_none());
    }

    #[tokio::test]
    async fn test_logout_clears_session_and_pending_flow() {
        let bot = TestBot::logged_in().await;
        bot.send(CHAT, "/addcard").await;
        assert!(bot.pending(CHAT).await.is_some());

        let replies = bot.send(CHAT, "/logout").await;

        assert!(last_text(&replies).starts_with("👋 You have been logged out"));
        assert!(!bot.auth.sessions().is_authenticated(CHAT).await);
        assert!(bot.pending(CHAT).await.is_none());
    }

    #[tokio::test]
    async fn test_chats_keep_separate_flows() {
        let bot = TestBot::logged_in().await;
        bot.send(CHAT, "/addcard").await;

        bot.send(OTHER_CHAT, "/login").await;

        assert_eq!(
            bot.pending(CHAT).await.unwrap().step,
            FlowStep::AwaitingCardNumber
        );
        assert_eq!(
            bot.pending(OTHER_CHAT).await.unwrap().step,
            FlowStep::AwaitingLoginEmail
        );
    }

    #[tokio::test]
    async fn test_plain_text_without_flow_gets_no_reply() {
        let bot = TestBot::logged_in().await;
        assert!(bot.send(CHAT, "hello there").await.is_empty());
    }

    #[tokio::test]
    async fn test_flows_requiring_login_are_refused() {
        let bot = TestBot::new();

        for command in ["/addcard", "/addtransaction", "/addlimit", "/addplan", "/addwish"] {
            let replies = bot.send(CHAT, command).await;
            assert_eq!(
                last_text(&replies),
                "❌ Please /login or /signup first to use this feature."
            );
        }
        assert!(bot.pending(CHAT).await.is_none());
    }
}

mod test_card_flows {
    use super::*;

    #[tokio::test]
    async fn test_add_card_end_to_end() {
        let bot = TestBot::logged_in().await;

        let replies = bot
            .send_all(CHAT, &["/addcard", "4111 1111 1111 1111", "100"])
            .await;

        assert_eq!(replies[0].text, "⏳ Adding card...");
        assert_eq!(
            replies[1].text,
            "✅ Card **** 1111 added successfully with balance 100.00 ₼!"
        );
        assert!(bot.pending(CHAT).await.is_none());

        let cards = bot.cards(CHAT).await;
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].card_number, "4111111111111111");
        assert_eq!(cards[0].current_amount, dec("100"));
        assert!(cards[0].limits.is_empty());
        assert!(cards[0].wishes.is_empty());
    }

    #[tokio::test]
    async fn test_failed_commit_clears_state() {
        let bot = TestBot::logged_in().await;
        bot.finance.set_fail_writes(true);

        let replies = bot
            .send_all(CHAT, &["/addcard", "4111111111111111", "50"])
            .await;

        assert!(last_text(&replies).starts_with("❌ Failed to add card:"));
        assert!(bot.pending(CHAT).await.is_none());

        bot.finance.set_fail_writes(false);
        assert!(bot.cards(CHAT).await.is_empty());
    }

    #[tokio::test]
    async fn test_card_flow_without_cards_is_refused() {
        let bot = TestBot::logged_in().await;

        let replies = bot.send(CHAT, "/addtransaction").await;

        assert!(last_text(&replies).starts_with("📭 You have no cards yet."));
        assert!(bot.pending(CHAT).await.is_none());
    }

    #[tokio::test]
    async fn test_single_card_skips_selection() {
        let bot = TestBot::logged_in().await;
        let card = bot.add_card(CHAT, "4111111111111111", "100").await;

        let replies = bot.send(CHAT, "/addwish").await;

        assert!(last_text(&replies).starts_with("🌟 Enter a name for your wish"));
        let state = bot.pending(CHAT).await.unwrap();
        assert_eq!(state.step, FlowStep::AwaitingWishName);
        assert_eq!(state.value(Field::CardId), Some(card.id.to_string().as_str()));
    }

    #[tokio::test]
    async fn test_several_cards_offer_selection() {
        let bot = TestBot::logged_in().await;
        let first = bot.add_card(CHAT, "4111111111111111", "100").await;
        let second = bot.add_card(CHAT, "5500000000000004", "20").await;

        let replies = bot.send(CHAT, "/addlimit").await;
        let prompt = replies.last().unwrap();
        assert!(prompt.text.contains("1. Card **** 1111"));
        assert!(prompt.text.contains("2. Card **** 0004"));
        assert_eq!(prompt.buttons[1][0].data, format!("flow:{}", second.id));

        bot.press(CHAT, &format!("flow:{}", first.id)).await;
        let state = bot.pending(CHAT).await.unwrap();
        assert_eq!(state.step, FlowStep::AwaitingLimitMonth);
        assert_eq!(state.value(Field::CardId), Some(first.id.to_string().as_str()));
    }

    #[tokio::test]
    async fn test_selection_by_index() {
        let bot = TestBot::logged_in().await;
        bot.add_card(CHAT, "4111111111111111", "100").await;
        let second = bot.add_card(CHAT, "5500000000000004", "20").await;

        bot.send_all(CHAT, &["/addplan", "2"]).await;

        let state = bot.pending(CHAT).await.unwrap();
        assert_eq!(state.step, FlowStep::AwaitingPlanMonth);
        assert_eq!(state.value(Field::CardId), Some(second.id.to_string().as_str()));
    }

    #[tokio::test]
    async fn test_foreign_card_choice_is_rejected() {
        let bot = TestBot::logged_in().await;
        bot.add_card(CHAT, "4111111111111111", "100").await;
        bot.add_card(CHAT, "5500000000000004", "20").await;
        bot.send(CHAT, "/addwish").await;

        let replies = bot
            .press(CHAT, &format!("flow:{}", uuid::Uuid::new_v4()))
            .await;

        assert_eq!(
            last_text(&replies),
            "❌ Card not found. Please select one of your cards:"
        );
        assert_eq!(
            bot.pending(CHAT).await.unwrap().step,
            FlowStep::AwaitingWishCard
        );
    }
}

mod test_transaction_flow {
    use super::*;

    #[tokio::test]
    async fn test_transaction_dated_today_moves_balance() {
        let bot = TestBot::logged_in().await;
        let card = bot.add_card(CHAT, "4111111111111111", "100").await;

        bot.send_all(CHAT, &["/addtransaction", "Lunch"]).await;
        let replies = bot.press(CHAT, "flow:cost").await;
        assert!(replies[0].buttons.iter().any(|row| row[0].data == "flow:Food"));

        bot.press(CHAT, "flow:Food").await;
        let replies = bot.send_all(CHAT, &["12.50", "today"]).await;

        assert_eq!(replies[0].text, "⏳ Adding transaction...");
        assert!(replies[1].text.starts_with("✅ Transaction added!"));
        assert!(replies[1].text.contains("-12.50 ₼ • Food"));
        assert!(!replies[1].text.contains("Scheduled"));
        assert!(bot.pending(CHAT).await.is_none());

        assert_eq!(bot.card(card.id).await.current_amount, dec("87.50"));
    }

    #[tokio::test]
    async fn test_future_transaction_is_scheduled() {
        let bot = TestBot::logged_in().await;
        let card = bot.add_card(CHAT, "4111111111111111", "100").await;
        let next_month = (Utc::now().date_naive() + Duration::days(30))
            .format("%Y-%m-%d")
            .to_string();

        let replies = bot
            .send_all(
                CHAT,
                &["/addtransaction", "Salary", "income", "salary", "1000", &next_month],
            )
            .await;

        assert!(last_text(&replies).contains("⏰ Scheduled"));
        assert_eq!(bot.card(card.id).await.current_amount, dec("100"));

        let scheduled = bot.send(CHAT, "/scheduled").await;
        assert!(last_text(&scheduled).contains("Salary"));
    }

    #[tokio::test]
    async fn test_category_must_match_kind() {
        let bot = TestBot::logged_in().await;
        bot.add_card(CHAT, "4111111111111111", "100").await;

        let replies = bot
            .send_all(CHAT, &["/addtransaction", "Lunch", "cost", "Salary"])
            .await;

        assert_eq!(
            last_text(&replies),
            "❌ Please select one of the listed categories:"
        );
        assert_eq!(
            bot.pending(CHAT).await.unwrap().step,
            FlowStep::AwaitingTxCategory
        );
    }

    #[tokio::test]
    async fn test_zero_amount_is_rejected() {
        let bot = TestBot::logged_in().await;
        bot.add_card(CHAT, "4111111111111111", "100").await;

        let replies = bot
            .send_all(CHAT, &["/addtransaction", "Lunch", "cost", "Food", "0"])
            .await;

        assert_eq!(
            last_text(&replies),
            "❌ Invalid amount. Please enter a positive number:"
        );
        assert_eq!(
            bot.pending(CHAT).await.unwrap().step,
            FlowStep::AwaitingTxAmount
        );
    }

    #[tokio::test]
    async fn test_malformed_date_is_rejected() {
        let bot = TestBot::logged_in().await;
        bot.add_card(CHAT, "4111111111111111", "100").await;

        let replies = bot
            .send_all(
                CHAT,
                &["/addtransaction", "Lunch", "cost", "Food", "5", "2026-02-30"],
            )
            .await;

        assert!(last_text(&replies).starts_with("❌ Invalid date format."));
        assert_eq!(
            bot.pending(CHAT).await.unwrap().step,
            FlowStep::AwaitingTxDate
        );
    }

    #[tokio::test]
    async fn test_huge_amount_is_asked_again() {
        let bot = TestBot::logged_in().await;
        let card = bot.add_card(CHAT, "4111111111111111", "100").await;

        let replies = bot
            .send_all(
                CHAT,
                &["/addtransaction", "Bonus", "income", "Gift", "1000000000000000"],
            )
            .await;

        assert!(last_text(&replies).starts_with("❌ Amount must be below"));
        assert_eq!(
            bot.pending(CHAT).await.unwrap().step,
            FlowStep::AwaitingTxAmount
        );
        assert_eq!(bot.card(card.id).await.current_amount, dec("100"));
    }

    #[tokio::test]
    async fn test_income_overflowing_balance_fails() {
        let bot = TestBot::logged_in().await;
        let session = bot.auth.sessions().get(CHAT).await.unwrap();
        let card = bot
            .finance
            .add_card(&session.subject_id, "4111111111111111", Decimal::MAX)
            .await
            .unwrap();

        let replies = bot
            .send_all(CHAT, &["/addtransaction", "Bonus", "income", "Gift", "1", "today"])
            .await;

        assert!(last_text(&replies).starts_with("❌ Failed to add transaction:"));
        assert!(bot.pending(CHAT).await.is_none());
        assert_eq!(bot.card(card.id).await.current_amount, Decimal::MAX);

        let replies = bot.send(CHAT, "/balance").await;
        assert!(last_text(&replies).contains("Total Balance"));
    }
}

mod test_goal_flows {
    use super::*;

    #[tokio::test]
    async fn test_limit_for_same_month_is_replaced() {
        let bot = TestBot::logged_in().await;
        let card = bot.add_card(CHAT, "4111111111111111", "100").await;

        let replies = bot.send_all(CHAT, &["/addlimit", "2026-05", "300"]).await;
        assert!(last_text(&replies).starts_with("✅ Limit added!"));
        bot.send_all(CHAT, &["/addlimit", "2026-05", "450"]).await;
        bot.send_all(CHAT, &["/addlimit", "2026-06", "200"]).await;

        let card = bot.card(card.id).await;
        assert_eq!(card.limits.len(), 2);
        assert_eq!(card.limit_for("2026-05").unwrap().amount, dec("450"));
    }

    #[tokio::test]
    async fn test_plan_for_same_month_is_replaced() {
        let bot = TestBot::logged_in().await;
        let card = bot.add_card(CHAT, "4111111111111111", "100").await;

        let replies = bot.send_all(CHAT, &["/addplan", "2026-05", "0"]).await;
        assert!(last_text(&replies).starts_with("✅ Plan added!"));
        bot.send_all(CHAT, &["/addplan", "2026-05", "80"]).await;

        let card = bot.card(card.id).await;
        assert_eq!(card.plans.len(), 1);
        assert_eq!(card.plans[0].amount, dec("80"));
    }

    #[tokio::test]
    async fn test_invalid_month_is_rejected() {
        let bot = TestBot::logged_in().await;
        bot.add_card(CHAT, "4111111111111111", "100").await;

        let replies = bot.send_all(CHAT, &["/addlimit", "2026-13"]).await;

        assert_eq!(
            last_text(&replies),
            "❌ Invalid format. Please use YYYY-MM (e.g., 2026-01):"
        );
        assert_eq!(
            bot.pending(CHAT).await.unwrap().step,
            FlowStep::AwaitingLimitMonth
        );
    }

    #[tokio::test]
    async fn test_wishes_are_appended() {
        let bot = TestBot::logged_in().await;
        let card = bot.add_card(CHAT, "4111111111111111", "100").await;

        let replies = bot.send_all(CHAT, &["/addwish", "New Phone", "1200"]).await;
        assert!(last_text(&replies).contains("🌟 *New Phone*"));
        bot.send_all(CHAT, &["/addwish", "New Phone", "900"]).await;

        let card = bot.card(card.id).await;
        assert_eq!(card.wishes.len(), 2);
        assert_eq!(card.wishes[1].target_amount, dec("900"));
    }
}
