//! Shared identifiers, configuration, and error handling for Walletbot
//!
//! This crate provides common functionality used across the Walletbot workspace:
//! - Configuration management following 12-factor principles
//! - Error types and handling
//! - The chat identifier and the per-chat flow slot seam
//! - Platform-neutral reply types

pub mod chat;
pub mod config;
pub mod error;
pub mod reply;

pub use chat::{ChatId, FlowSlot};
pub use config::{Config, StoreProvider};
pub use error::Error;
pub use reply::{Button, Reply};

/// Currency sign used in every user-facing amount
pub const CURRENCY_SIGN: &str = "₼";
