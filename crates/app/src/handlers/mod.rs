//! HTTP handlers

pub mod chats;
