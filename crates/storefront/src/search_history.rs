//! Recent searches kept in the `recentSearches` slot.

use std::sync::Arc;

use crate::cart::storage::{StorageArea, StorageError};

/// Storage key of the recent-search list.
pub const RECENT_SEARCHES_SLOT: &str = "recentSearches";

/// How many searches are remembered.
pub const MAX_RECENT_SEARCHES: usize = 5;

/// Most-recent-first list of queries a shopper picked a suggestion for.
pub struct RecentSearches {
    storage: Arc<dyn StorageArea>,
}

impl RecentSearches {
    #[must_use]
    pub fn new(storage: Arc<dyn StorageArea>) -> Self {
        Self { storage }
    }

    /// The saved list; absent or unreadable means none.
    #[must_use]
    pub fn list(&self) -> Vec<String> {
        let Some(raw) = self.storage.get_item(RECENT_SEARCHES_SLOT) else {
            return Vec::new();
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Discarding unreadable recent searches");
            Vec::new()
        })
    }

    /// Move `query` to the front, dropping the oldest past the limit.
    ///
    /// Blank queries are not recorded. Returns the updated list.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the list cannot be saved.
    pub fn record(&self, query: &str) -> Result<Vec<String>, StorageError> {
        let query = query.trim();
        let mut recent = self.list();
        if query.is_empty() {
            return Ok(recent);
        }

        recent.retain(|existing| existing != query);
        recent.insert(0, query.to_string());
        recent.truncate(MAX_RECENT_SEARCHES);

        self.storage
            .set_item(RECENT_SEARCHES_SLOT, &serde_json::to_string(&recent)?)?;
        Ok(recent)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cart::storage::MemoryStorage;

    fn recent() -> RecentSearches {
        RecentSearches::new(Arc::new(MemoryStorage::new()))
    }

    #[test]
    fn test_newest_first_without_duplicates() {
        let recent = recent();
        recent.record("bob").unwrap();
        recent.record("body wave").unwrap();
        let list = recent.record(" bob ").unwrap();

        assert_eq!(list, vec!["bob", "body wave"]);
        assert_eq!(recent.list(), list);
    }

    #[test]
    fn test_keeps_five() {
        let recent = recent();
        for query in ["a", "b", "c", "d", "e", "f"] {
            recent.record(query).unwrap();
        }
        assert_eq!(recent.list(), vec!["f", "e", "d", "c", "b"]);
    }

    #[test]
    fn test_blank_query_is_ignored() {
        let recent = recent();
        recent.record("curly").unwrap();
        assert_eq!(recent.record("   ").unwrap(), vec!["curly"]);
    }

    #[test]
    fn test_unreadable_slot_starts_over() {
        let storage: Arc<dyn StorageArea> = Arc::new(MemoryStorage::new());
        storage.set_item(RECENT_SEARCHES_SLOT, "{oops").unwrap();
        let recent = RecentSearches::new(Arc::clone(&storage));

        assert!(recent.list().is_empty());
        recent.record("kinky").unwrap();
        assert_eq!(
            storage.get_item(RECENT_SEARCHES_SLOT).as_deref(),
            Some(r#"["kinky"]"#)
        );
    }
}
