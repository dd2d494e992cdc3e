// Alias table
// Built once from [paths.aliases]; read-only afterwards

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Alias to filesystem path mapping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    entries: HashMap<String, PathBuf>,
}

impl AliasTable {
    /// Build from the configured map
    ///
    /// Keys are stored lowercased. Lookups compare the token exactly as typed,
    /// so only lowercase tokens can match.
    pub fn from_config(map: &HashMap<String, String>) -> Self {
        Self {
            entries: map
                .iter()
                .map(|(alias, path)| (alias.to_lowercase(), PathBuf::from(path)))
                .collect(),
        }
    }

    pub fn get(&self, alias: &str) -> Option<&Path> {
        self.entries.get(alias).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Aliases in sorted order
    pub fn aliases(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
