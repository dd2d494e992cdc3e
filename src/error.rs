//! Request error taxonomy
//!
//! Every failure a single `/fetch` token can hit. Errors never leave the
//! request that produced them: each one either maps to a text reply or is
//! dropped after logging.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::handler::replies;
use crate::handler::Reply;

#[derive(Debug, Error)]
pub enum FetchError {
    /// Requester is not on the allow list
    #[error("requester {0} is not on the allow list")]
    Unauthorized(i64),

    /// Token is not a configured alias
    #[error("alias '{0}' is not configured")]
    AliasNotFound(String),

    /// Resolved path does not exist
    #[error("{} does not exist (requested as '{token}')", path.display())]
    FileNotFound { path: PathBuf, token: String },

    /// File exceeds the upload limit
    #[error("{} is {size} bytes, over the {limit} byte limit", path.display())]
    FileTooLarge { path: PathBuf, size: u64, limit: u64 },

    /// Update has no message, sender or text to act on
    #[error("update carries no usable message")]
    MalformedUpdate,

    /// Any other I/O failure while opening or reading the file
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FetchError {
    /// Text reply shown to the requester, or `None` when the failure is
    /// dropped without telling the user
    pub fn user_reply(&self) -> Option<Reply> {
        match self {
            Self::Unauthorized(_) => Some(replies::access_denied()),
            Self::AliasNotFound(alias) => Some(replies::alias_not_found(alias)),
            Self::FileNotFound { path, token } => Some(replies::file_not_found(path, token)),
            Self::FileTooLarge { path, size, limit } => {
                Some(replies::file_too_large(path, *size, *limit))
            }
            Self::MalformedUpdate | Self::Io { .. } => None,
        }
    }

    /// Short outcome label used in access log entries
    pub const fn outcome(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "denied",
            Self::AliasNotFound(_) => "alias_not_found",
            Self::FileNotFound { .. } => "file_not_found",
            Self::FileTooLarge { .. } => "too_large",
            Self::MalformedUpdate => "malformed",
            Self::Io { .. } => "io_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silent_errors_have_no_reply() {
        assert!(FetchError::MalformedUpdate.user_reply().is_none());
        let io_err = FetchError::Io {
            path: PathBuf::from("/root/secret"),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        assert!(io_err.user_reply().is_none());
    }

    #[test]
    fn test_user_facing_errors_reply_with_text() {
        let reply = FetchError::AliasNotFound("nginx".to_string())
            .user_reply()
            .expect("alias miss should reply");
        assert!(reply.text().is_some_and(|t| t.contains("nginx")));

        let reply = FetchError::FileNotFound {
            path: PathBuf::from("logs/app.log"),
            token: "app".to_string(),
        }
        .user_reply()
        .expect("missing file should reply");
        assert!(reply.text().is_some_and(|t| t.contains("logs/app.log")));
    }

    #[test]
    fn test_outcome_labels() {
        assert_eq!(FetchError::Unauthorized(7).outcome(), "denied");
        assert_eq!(
            FetchError::AliasNotFound(String::new()).outcome(),
            "alias_not_found"
        );
    }
}
