//! Expand/collapse memory for the inline tree
//!
//! The set of expanded node ids is persisted as a JSON array under a fixed key in the
//! durable UI-state store. Anything unreadable (missing key, store failure, corrupt
//! JSON) degrades to "all collapsed"; write failures are logged and dropped.

use std::collections::BTreeSet;
use tracing::{debug, warn};

use crate::db::UiStateStore;

/// Default storage key for the inline tree's expanded ids
pub const EXPANDED_STATE_KEY: &str = "treeExpandedState";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandedState {
    ids: BTreeSet<String>,
}

impl ExpandedState {
    pub fn is_expanded(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Flip one id; returns whether it is now expanded
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Load the persisted state, or an empty state if it cannot be read
    pub async fn load(store: &dyn UiStateStore, key: &str) -> Self {
        let raw = match store.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Self::default(),
            Err(e) => {
                warn!("Failed to read expanded tree state: {}", e);
                return Self::default();
            }
        };

        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(ids) => Self {
                ids: ids.into_iter().collect(),
            },
            Err(e) => {
                warn!("Ignoring corrupt expanded tree state: {}", e);
                Self::default()
            }
        }
    }

    /// Persist the state; failures are logged and otherwise ignored
    pub async fn save(&self, store: &dyn UiStateStore, key: &str) {
        let ids: Vec<&str> = self.ids().collect();
        let raw = match serde_json::to_string(&ids) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Failed to serialize expanded tree state: {}", e);
                return;
            }
        };

        match store.set(key, raw).await {
            Ok(()) => debug!("Saved {} expanded tree nodes", ids.len()),
            Err(e) => warn!("Failed to save expanded tree state: {}", e),
        }
    }
}

impl FromIterator<String> for ExpandedState {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{JsonFileUiStateStore, MemoryUiStateStore, UiStateError};
    use async_trait::async_trait;
    use tempfile::TempDir;

    struct BrokenStore;

    #[async_trait]
    impl UiStateStore for BrokenStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, UiStateError> {
            Err(UiStateError::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk gone")))
        }

        async fn set(&self, _key: &str, _value: String) -> Result<(), UiStateError> {
            Err(UiStateError::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk gone")))
        }
    }

    #[test]
    fn test_toggle_adds_and_removes_only_that_id() {
        let mut state: ExpandedState = vec!["a".to_string(), "b".to_string()].into_iter().collect();

        assert!(!state.toggle("a"));
        assert!(state.toggle("c"));

        assert_eq!(state.ids().collect::<Vec<_>>(), vec!["b", "c"]);
    }

    #[tokio::test]
    async fn test_round_trip_through_store() {
        let store = MemoryUiStateStore::new();
        let mut state = ExpandedState::default();
        state.toggle("x");
        state.toggle("y");

        state.save(&store, EXPANDED_STATE_KEY).await;
        let loaded = ExpandedState::load(&store, EXPANDED_STATE_KEY).await;

        assert_eq!(loaded, state);
    }

    #[tokio::test]
    async fn test_missing_state_is_all_collapsed() {
        let store = MemoryUiStateStore::new();

        let loaded = ExpandedState::load(&store, EXPANDED_STATE_KEY).await;

        assert!(loaded.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_state_is_all_collapsed() {
        let store = MemoryUiStateStore::new();
        store
            .set(EXPANDED_STATE_KEY, "{not json".to_string())
            .await
            .unwrap();

        let loaded = ExpandedState::load(&store, EXPANDED_STATE_KEY).await;

        assert!(loaded.is_empty());
    }

    #[tokio::test]
    async fn test_store_failures_degrade_silently() {
        let mut state = ExpandedState::default();
        state.toggle("a");

        state.save(&BrokenStore, EXPANDED_STATE_KEY).await;
        let loaded = ExpandedState::load(&BrokenStore, EXPANDED_STATE_KEY).await;

        assert!(loaded.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_all_collapsed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ui-state.json");
        tokio::fs::write(&path, "garbage").await.unwrap();
        let store = JsonFileUiStateStore::new(&path);

        let loaded = ExpandedState::load(&store, EXPANDED_STATE_KEY).await;

        assert!(loaded.is_empty());
    }
}
