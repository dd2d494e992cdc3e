//! Command handler module
//!
//! Parses inbound commands and runs them through the access guard, the path
//! resolver and the file responder.

pub mod command;
pub mod dispatcher;
pub mod files;
pub mod replies;
mod reply;

// Re-export main entry point
pub use command::{Command, Request, Requester};
pub use dispatcher::Dispatcher;
pub use reply::{Document, ParseMode, Reply, ReplySink};
