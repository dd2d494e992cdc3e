//! Token to path resolution
//!
//! Two variants:
//! - `Alias`: tokens are looked up in the configured alias table
//! - `Literal`: tokens are used as paths directly, with no containment

mod alias;

pub use alias::AliasTable;

use std::path::PathBuf;

use crate::config::PathMode;
use crate::error::FetchError;

/// Maps a user-supplied token to a filesystem path
#[derive(Debug, Clone)]
pub enum Resolver {
    Alias(AliasTable),
    Literal,
}

impl Resolver {
    pub fn new(mode: PathMode, aliases: AliasTable) -> Self {
        match mode {
            PathMode::Alias => Self::Alias(aliases),
            PathMode::Literal => Self::Literal,
        }
    }

    /// Resolve one token; failures are per token
    pub fn resolve(&self, token: &str) -> Result<PathBuf, FetchError> {
        match self {
            Self::Alias(table) => table
                .get(token)
                .map(PathBuf::from)
                .ok_or_else(|| FetchError::AliasNotFound(token.to_string())),
            Self::Literal => Ok(PathBuf::from(token)),
        }
    }
}
