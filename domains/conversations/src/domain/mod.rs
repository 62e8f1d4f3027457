//! Domain layer for Conversations

pub mod flows;
pub mod prompts;
pub mod state;
pub mod validation;
