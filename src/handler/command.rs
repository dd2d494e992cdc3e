//! Command parsing
//!
//! Turns an inbound Telegram update into a [`Request`]. Only `/start`,
//! `/help` and `/fetch` are recognised; everything else is ignored.

use crate::error::FetchError;
use crate::telegram::Update;

/// A recognised bot command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    /// Alias or path tokens, in the order typed
    Fetch(Vec<String>),
}

impl Command {
    /// Parse a message text into a command
    ///
    /// Accepts an optional `@botname` suffix on the command word. Commands
    /// addressed to another bot return `None`.
    pub fn parse(text: &str, bot_username: Option<&str>) -> Option<Self> {
        let mut words = text.split_whitespace();
        let head = words.next()?.strip_prefix('/')?;

        let (name, target) = match head.split_once('@') {
            Some((name, target)) => (name, Some(target)),
            None => (head, None),
        };
        if let (Some(target), Some(me)) = (target, bot_username) {
            if !target.eq_ignore_ascii_case(me) {
                return None;
            }
        }

        match name.to_ascii_lowercase().as_str() {
            "start" => Some(Self::Start),
            "help" => Some(Self::Help),
            "fetch" => Some(Self::Fetch(words.map(ToString::to_string).collect())),
            _ => None,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Start => "/start",
            Self::Help => "/help",
            Self::Fetch(_) => "/fetch",
        }
    }
}

/// The user issuing a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requester {
    pub id: i64,
    pub username: Option<String>,
}

impl Requester {
    /// Name used in log lines; falls back to the numeric id
    pub fn display_name(&self) -> String {
        self.username
            .clone()
            .unwrap_or_else(|| self.id.to_string())
    }
}

/// One inbound command, ready for the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub requester: Requester,
    pub chat_id: i64,
    pub command: Command,
}

impl Request {
    /// Extract a request from an update
    ///
    /// Updates without a message or a sender (edited messages, channel posts)
    /// are malformed. Messages that are not a known command yield `Ok(None)`.
    pub fn from_update(
        update: &Update,
        bot_username: Option<&str>,
    ) -> Result<Option<Self>, FetchError> {
        let message = update.message.as_ref().ok_or(FetchError::MalformedUpdate)?;
        let from = message.from.as_ref().ok_or(FetchError::MalformedUpdate)?;

        let Some(text) = message.text.as_deref() else {
            return Ok(None);
        };

        Ok(Command::parse(text, bot_username).map(|command| Self {
            requester: Requester {
                id: from.id,
                username: from.username.clone(),
            },
            chat_id: message.chat.id,
            command,
        }))
    }
}
