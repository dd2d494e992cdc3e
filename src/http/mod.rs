//! HTTP protocol layer module
//!
//! Content-type detection for uploads and canned responses for the webhook
//! listener, decoupled from the bot logic.

pub mod mime;
pub mod response;

// Re-export commonly used types
pub use response::{
    build_401_response, build_404_response, build_405_response, build_413_response,
    build_ok_response,
};
