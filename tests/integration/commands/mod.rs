//! Read-only commands, card pickers and statistics callbacks

use crate::common::{last_text, TestBot, CHAT, OTHER_CHAT, OTHER_EMAIL};

mod test_general_commands {
    use super::*;

    #[tokio::test]
    async fn test_start_greets_anonymous_and_known_users() {
        let bot = TestBot::new();
        let replies = bot.send(CHAT, "/start").await;
        assert!(last_text(&replies).starts_with("Hi! 👋 Welcome to *Walletbot*"));

        bot.login(CHAT, crate::common::EMAIL).await;
        let replies = bot.send(CHAT, "/start").await;
        assert!(last_text(&replies).starts_with("Welcome back, Ali! 👋"));
    }

    #[tokio::test]
    async fn test_help_and_unknown_command() {
        let bot = TestBot::new();

        let replies = bot.send(CHAT, "/help").await;
        assert!(last_text(&replies).starts_with("📚 *Walletbot Help*"));

        let replies = bot.send(CHAT, "/debug").await;
        assert_eq!(
            last_text(&replies),
            "❓ Unknown command.\n\nUse /help to see available commands."
        );
    }

    #[tokio::test]
    async fn test_command_interrupts_pending_flow_input() {
        let bot = TestBot::logged_in().await;
        bot.send(CHAT, "/addcard").await;

        let replies = bot.send(CHAT, "/help").await;

        assert!(last_text(&replies).starts_with("📚 *Walletbot Help*"));
        assert!(bot.pending(CHAT).await.is_some());
    }

    #[tokio::test]
    async fn test_logout_without_session() {
        let bot = TestBot::new();
        let replies = bot.send(CHAT, "/logout").await;
        assert_eq!(last_text(&replies), "❌ You are not logged in.");
    }

    #[tokio::test]
    async fn test_views_require_login() {
        let bot = TestBot::new();
        for command in ["/cards", "/balance", "/transactions", "/limitstatus", "/stats"] {
            let replies = bot.send(CHAT, command).await;
            assert_eq!(
                last_text(&replies),
                "❌ Please /login or /signup first to use this feature."
            );
        }
    }
}

mod test_card_views {
    use super::*;

    #[tokio::test]
    async fn test_views_without_cards() {
        let bot = TestBot::logged_in().await;
        for command in ["/cards", "/balance", "/transactions", "/wishes"] {
            let replies = bot.send(CHAT, command).await;
            assert!(last_text(&replies).starts_with("📭 You have no cards yet."));
        }
    }

    #[tokio::test]
    async fn test_balance_totals_all_cards() {
        let bot = TestBot::logged_in().await;
        bot.add_card(CHAT, "4111111111111111", "100").await;
        bot.add_card(CHAT, "5500000000000004", "25.5").await;

        let replies = bot.send(CHAT, "/balance").await;

        assert!(last_text(&replies).contains("📊 *Total Balance: 125.50 ₼*"));
    }

    #[tokio::test]
    async fn test_cards_are_private_to_their_owner() {
        let bot = TestBot::logged_in().await;
        bot.add_card(CHAT, "4111111111111111", "100").await;
        bot.login(OTHER_CHAT, OTHER_EMAIL).await;

        let replies = bot.send(OTHER_CHAT, "/cards").await;

        assert!(last_text(&replies).starts_with("📭 You have no cards yet."));
    }

    #[tokio::test]
    async fn test_single_card_view_is_shown_directly() {
        let bot = TestBot::logged_in().await;
        bot.add_card(CHAT, "4111111111111111", "100").await;

        let replies = bot.send(CHAT, "/transactions").await;

        assert!(last_text(&replies).starts_with("📭 No transactions found for card **** 1111."));
    }

    #[tokio::test]
    async fn test_picker_callback_shows_card() {
        let bot = TestBot::logged_in().await;
        let card = bot.add_card(CHAT, "4111111111111111", "100").await;
        bot.add_card(CHAT, "5500000000000004", "20").await;
        bot.send_all(CHAT, &["/addtransaction", "1", "Taxi", "cost", "Transport", "7", "today"])
            .await;

        let replies = bot.send(CHAT, "/current").await;
        let picker = replies.last().unwrap();
        assert_eq!(picker.buttons.len(), 2);
        assert_eq!(picker.buttons[0][0].data, format!("current:{}", card.id));

        let replies = bot.press(CHAT, &picker.buttons[0][0].data).await;
        assert!(last_text(&replies).starts_with("📋 *Current Transactions for **** 1111:*"));
        assert!(last_text(&replies).contains("Taxi"));
    }

    #[tokio::test]
    async fn test_card_callback_for_foreign_card() {
        let bot = TestBot::logged_in().await;
        let card = bot.add_card(CHAT, "4111111111111111", "100").await;
        bot.login(OTHER_CHAT, OTHER_EMAIL).await;

        let replies = bot.press(OTHER_CHAT, &format!("tx:{}", card.id)).await;

        assert_eq!(last_text(&replies), "❌ Card not found.");
    }

    #[tokio::test]
    async fn test_unknown_callback_is_ignored() {
        let bot = TestBot::logged_in().await;
        assert!(bot.press(CHAT, "view_tx_123").await.is_empty());
    }

    #[tokio::test]
    async fn test_limit_status_reports_spending() {
        let bot = TestBot::logged_in().await;
        bot.add_card(CHAT, "4111111111111111", "500").await;
        let month = chrono::Utc::now().date_naive().format("%Y-%m").to_string();
        bot.send_all(CHAT, &["/addlimit", &month, "100"]).await;
        bot.send_all(CHAT, &["/addtransaction", "Dinner", "cost", "Food", "120", "today"])
            .await;

        let replies = bot.send(CHAT, "/limitstatus").await;
        let text = last_text(&replies);

        assert!(text.contains("Limit: 100.00 ₼"));
        assert!(text.contains("Spent: 120.00 ₼"));
        assert!(text.contains("⚠️ *OVER LIMIT by 20.00 ₼*"));
    }

    #[tokio::test]
    async fn test_wish_status_lists_wishes() {
        let bot = TestBot::logged_in().await;
        bot.add_card(CHAT, "4111111111111111", "300").await;
        bot.send_all(CHAT, &["/addwish", "Bicycle", "600"]).await;

        let replies = bot.send(CHAT, "/wishes").await;

        assert!(last_text(&replies).contains("Bicycle"));
        assert!(last_text(&replies).contains("50%"));
    }
}

mod test_stats {
    use super::*;

    #[tokio::test]
    async fn test_stats_menus_carry_period() {
        let bot = TestBot::logged_in().await;

        let replies = bot.send(CHAT, "/stats").await;
        assert_eq!(replies[0].buttons[1][0].data, "stats:month");

        let replies = bot.press(CHAT, "stats:month").await;
        assert_eq!(replies[0].buttons[0][0].data, "chart:month:category");
    }

    #[tokio::test]
    async fn test_chart_without_transactions() {
        let bot = TestBot::logged_in().await;
        bot.add_card(CHAT, "4111111111111111", "100").await;

        let replies = bot.press(CHAT, "chart:month:category").await;

        assert_eq!(replies[0].text, "⏳ Generating chart...");
        assert!(replies[1].text.starts_with("📭 Not enough data"));
        assert!(replies[1].photo_url.is_none());
    }

    #[tokio::test]
    async fn test_chart_renders_photo() {
        let bot = TestBot::logged_in().await;
        bot.add_card(CHAT, "4111111111111111", "100").await;
        bot.send_all(CHAT, &["/addtransaction", "Lunch", "cost", "Food", "9", "today"])
            .await;

        let replies = bot.press(CHAT, "chart:week:category").await;

        let photo = replies[1].photo_url.as_deref().unwrap();
        assert!(photo.starts_with("https://quickchart.io/chart?"));
        assert!(replies[1].text.starts_with("📊 "));
    }

    #[tokio::test]
    async fn test_chart_requires_login() {
        let bot = TestBot::new();
        let replies = bot.press(CHAT, "chart:week:net").await;
        assert_eq!(
            last_text(&replies),
            "❌ Please /login or /signup first to use this feature."
        );
    }
}
