// Application state module
// Everything a request needs, built once at startup and never mutated

use super::types::Config;
use crate::access::{AccessGuard, AllowList};
use crate::paths::{AliasTable, Resolver};

/// Application state
pub struct AppState {
    pub config: Config,
    pub guard: AccessGuard,
    pub resolver: Resolver,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let allow_list: AllowList = config.access.allow_list.iter().copied().collect();
        let aliases = AliasTable::from_config(&config.paths.aliases);
        let resolver = Resolver::new(config.paths.mode, aliases);

        Self {
            guard: AccessGuard::new(allow_list),
            resolver,
            config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PathMode;
    use std::path::Path;

    #[test]
    fn test_state_from_config() {
        let mut config = Config::for_tests();
        config.access.allow_list = vec![42, 42, 7];
        config
            .paths
            .aliases
            .insert("ME".to_string(), "squire.log".to_string());

        let state = AppState::new(config);
        assert_eq!(state.guard.allow_list().len(), 2);
        assert_eq!(state.resolver.resolve("me").unwrap(), Path::new("squire.log"));
    }

    #[test]
    fn test_literal_mode() {
        let mut config = Config::for_tests();
        config.paths.mode = PathMode::Literal;
        assert!(matches!(AppState::new(config).resolver, Resolver::Literal));
    }
}
