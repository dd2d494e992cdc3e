//! file-squire: a Telegram bot that hands allow-listed users the files they
//! ask for.
//!
//! Updates arrive by long polling or webhook, are handled one at a time by
//! [`handler::Dispatcher`], and every privileged command goes through
//! [`access::AccessGuard`] before any path is resolved.

pub mod access;
pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod paths;
pub mod server;
pub mod telegram;
