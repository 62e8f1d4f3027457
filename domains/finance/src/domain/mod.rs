//! Domain layer for Finance domain

pub mod entities;
pub mod money;
