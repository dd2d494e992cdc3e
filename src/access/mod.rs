//! Access control
//!
//! The allow list is fixed at startup. Privileged commands go through
//! [`AccessGuard::privileged`], which logs every attempt and only runs the
//! wrapped handler for listed requesters.

mod guard;

pub use guard::AccessGuard;

use std::collections::HashSet;

/// Requester ids permitted to run privileged commands
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowList {
    ids: HashSet<i64>,
}

impl AllowList {
    pub fn contains(&self, id: i64) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl FromIterator<i64> for AllowList {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains() {
        let list: AllowList = [42, 1001].into_iter().collect();
        assert!(list.contains(42));
        assert!(!list.contains(7));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_duplicates_collapse() {
        let list: AllowList = [42, 42].into_iter().collect();
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_empty_denies_everyone() {
        let list = AllowList::default();
        assert!(list.is_empty());
        assert!(!list.contains(0));
    }
}
