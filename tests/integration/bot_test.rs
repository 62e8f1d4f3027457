//! End-to-end bot tests
//!
//! Drive the dispatcher the way a chat adapter would: text messages and
//! button presses in, replies out. Stores are in memory; the `postgres`
//! module runs the finance repository against a live database when one is
//! configured.

#![allow(dead_code)]

mod commands;
mod common;
mod flows;
mod http;
mod postgres;
