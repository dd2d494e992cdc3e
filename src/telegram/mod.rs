//! Telegram Bot API transport
//!
//! Provides:
//! - Wire types for the updates the bot consumes
//! - An HTTP/1.1 client for the handful of methods the bot calls
//! - A multipart encoder for document uploads

mod client;
mod error;
pub mod multipart;
mod types;

pub use client::BotClient;
pub use error::TransportError;
pub use types::{ApiResponse, Chat, Message, Update, User};
