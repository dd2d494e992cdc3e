//! Outbound reply types and the delivery seam

use hyper::body::Bytes;
use serde::Serialize;
use std::fmt::Display;
use std::path::PathBuf;

/// Telegram text formatting mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParseMode {
    /// Legacy Markdown (`*bold*`, `_italic_`, `` `code` ``)
    Markdown,
}

/// File attachment ready to upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Resolved path the bytes were read from
    pub path: PathBuf,
    /// File name presented to the requester
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Bytes,
    pub caption: String,
}

/// One outbound message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text {
        text: String,
        parse_mode: Option<ParseMode>,
    },
    Document(Document),
}

impl Reply {
    pub fn plain(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            parse_mode: None,
        }
    }

    pub fn markdown(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            parse_mode: Some(ParseMode::Markdown),
        }
    }

    /// Message text, if this is a text reply
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text { text, .. } => Some(text),
            Self::Document(_) => None,
        }
    }

    pub const fn document(&self) -> Option<&Document> {
        match self {
            Self::Document(doc) => Some(doc),
            Self::Text { .. } => None,
        }
    }
}

/// Destination for replies produced while handling a request
///
/// The dispatcher hands each reply over as soon as it exists, so a file's
/// bytes are released before the next token is read.
#[allow(async_fn_in_trait)]
pub trait ReplySink {
    type Error: Display;

    async fn send(&mut self, chat_id: i64, reply: Reply) -> Result<(), Self::Error>;
}
