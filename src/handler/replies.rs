//! Canned reply texts
//!
//! All Markdown here is Telegram's legacy flavour. User-supplied values are
//! only ever placed inside code spans, where `_` and `*` are literal.

use std::path::Path;

use super::Reply;

pub fn start() -> Reply {
    Reply::plain(
        "Hi! I can /fetch you some files if you are whitelisted\n\
         /help to learn more",
    )
}

pub fn help() -> Reply {
    Reply::markdown(
        "▪️Install the bot on your remote machine\n\
         \n\
         ▪️Open `squire.toml`, set `token` under `[bot]` and your user ID in `allow_list` under `[access]`\n\
         \n\
         ▪️Add aliases and paths under `[paths.aliases]`:\n\
         \n\
         `[paths.aliases]\n\
         me = \"squire.log\"\n\
         flask = \"myflaskapp/logs/errors.log\"`\n\
         \n\
         ▪️Start the bot. Fetch files using your aliases\n\
         \t`/fetch me` to get _squire.log_",
    )
}

pub fn access_denied() -> Reply {
    Reply::markdown("🚫 *ACCESS DENIED*\nSorry, you are *not authorized* to use this command")
}

pub fn usage() -> Reply {
    Reply::markdown(
        "⚠️\nPlease provide a configured path:\n\
         `/fetch log_alias`\n\
         You can add them to `[paths.aliases]` in `squire.toml`",
    )
}

pub fn alias_not_found(alias: &str) -> Reply {
    Reply::markdown(format!(
        "❌\nCouldn't find alias {}.\nMake sure you've added it to `[paths.aliases]`",
        code_span(alias)
    ))
}

pub fn file_not_found(path: &Path, token: &str) -> Reply {
    Reply::markdown(format!(
        "❌\n{} does not exist.\nMake sure {} is pointing to an existing file",
        code_span(&path.display().to_string()),
        code_span(token)
    ))
}

pub fn file_too_large(path: &Path, size: u64, limit: u64) -> Reply {
    Reply::markdown(format!(
        "❌\n{} is too large to send ({size} bytes, limit is {limit} bytes)",
        code_span(&path.display().to_string())
    ))
}

pub fn document_caption(path: &Path) -> String {
    format!("Your {}, sir!", code_span(&path.display().to_string()))
}

/// Wrap a value in a legacy Markdown code span
///
/// Backticks cannot be escaped inside a span, so they are swapped for quotes.
pub fn code_span(value: &str) -> String {
    format!("`{}`", value.replace('`', "'"))
}
