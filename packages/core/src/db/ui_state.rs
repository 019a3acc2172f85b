//! Durable UI-state store
//!
//! A small key-value store for presentation state that must survive restarts (the
//! set of expanded tree nodes). Values are JSON strings. Failures never propagate to
//! the user: readers treat them as "absent".

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tokio::fs;

use super::UiStateError;

#[async_trait]
pub trait UiStateStore: Send + Sync {
    /// Read the raw value stored under `key`
    async fn get(&self, key: &str) -> Result<Option<String>, UiStateError>;

    /// Store `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: String) -> Result<(), UiStateError>;
}

/// Process-local UI-state store
#[derive(Default)]
pub struct MemoryUiStateStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryUiStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UiStateStore for MemoryUiStateStore {
    async fn get(&self, key: &str) -> Result<Option<String>, UiStateError> {
        let values = self.values.lock().map_err(|_| UiStateError::LockPoisoned)?;
        Ok(values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), UiStateError> {
        let mut values = self.values.lock().map_err(|_| UiStateError::LockPoisoned)?;
        values.insert(key.to_string(), value);
        Ok(())
    }
}

/// UI-state store persisted as one JSON object in a file
///
/// Writes go to a temp file that is then renamed over the target, so a crash never
/// leaves a half-written file behind.
pub struct JsonFileUiStateStore {
    path: PathBuf,
}

impl JsonFileUiStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<HashMap<String, String>, UiStateError> {
        if !fs::try_exists(&self.path).await? {
            return Ok(HashMap::new());
        }
        let contents = fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&contents)?)
    }
}

#[async_trait]
impl UiStateStore for JsonFileUiStateStore {
    async fn get(&self, key: &str) -> Result<Option<String>, UiStateError> {
        Ok(self.read_all().await?.remove(key))
    }

    async fn set(&self, key: &str, value: String) -> Result<(), UiStateError> {
        // A corrupt file is replaced rather than blocking every future write
        let mut values = self.read_all().await.unwrap_or_default();
        values.insert(key.to_string(), value);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let serialized = serde_json::to_string_pretty(&values)?;
        let mut temp = self.path.clone().into_os_string();
        temp.push(".tmp");
        let temp = PathBuf::from(temp);

        fs::write(&temp, serialized).await?;
        fs::rename(&temp, &self.path).await?;
        Ok(())
    }
}
