//! Application preferences management
//!
//! Handles loading/saving user preferences. Preferences live in the data directory
//! as `preferences.json`; a missing file means defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::constants::{DATA_DIR_ENV, DEFAULT_DATA_DIR_NAME, PREF_FILE};
use helpdocs_core::services::{
    ADMINS_COLLECTION, AUTHORIZED_USERS_RECORD, DOCUMENTS_COLLECTION, GLOBALS_COLLECTION,
    NOTICE_RECORD,
};

/// App-wide preferences structure
/// All fields use #[serde(default)] so older preferences.json files without newer
/// fields still deserialize.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppPreferences {
    /// Directory for the UI-state file; `None` uses the platform default
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// `tracing` filter directive, e.g. `"helpdocs_core=debug,info"`
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,

    #[serde(default)]
    pub backend: BackendPreferences,
}

/// Names of the collections and records in the hosted document store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendPreferences {
    #[serde(default = "default_documents_collection")]
    pub documents_collection: String,

    #[serde(default = "default_admins_collection")]
    pub admins_collection: String,

    #[serde(default = "default_authorized_users_record")]
    pub authorized_users_record: String,

    #[serde(default = "default_globals_collection")]
    pub globals_collection: String,

    #[serde(default = "default_notice_record")]
    pub notice_record: String,
}

impl Default for BackendPreferences {
    fn default() -> Self {
        Self {
            documents_collection: default_documents_collection(),
            admins_collection: default_admins_collection(),
            authorized_users_record: default_authorized_users_record(),
            globals_collection: default_globals_collection(),
            notice_record: default_notice_record(),
        }
    }
}

fn default_documents_collection() -> String {
    DOCUMENTS_COLLECTION.to_string()
}

fn default_admins_collection() -> String {
    ADMINS_COLLECTION.to_string()
}

fn default_authorized_users_record() -> String {
    AUTHORIZED_USERS_RECORD.to_string()
}

fn default_globals_collection() -> String {
    GLOBALS_COLLECTION.to_string()
}

fn default_notice_record() -> String {
    NOTICE_RECORD.to_string()
}

/// Load preferences from `dir`
///
/// # Returns
/// * `Ok(AppPreferences)` - Loaded preferences or defaults if the file doesn't exist
/// * `Err` - The file exists but cannot be read or parsed
pub async fn load_preferences(dir: &Path) -> Result<AppPreferences> {
    let pref_file = dir.join(PREF_FILE);

    if !pref_file.exists() {
        return Ok(AppPreferences::default());
    }

    let contents = fs::read_to_string(&pref_file)
        .await
        .with_context(|| format!("Failed to read preferences from {}", pref_file.display()))?;

    serde_json::from_str(&contents).context("Failed to parse preferences")
}

/// Save preferences to `dir`
///
/// Uses atomic write pattern (write-to-temp, then rename) to prevent
/// corruption on crash or power loss.
pub async fn save_preferences(dir: &Path, prefs: &AppPreferences) -> Result<()> {
    fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create config directory {}", dir.display()))?;

    let pref_file = dir.join(PREF_FILE);
    let temp_file = dir.join(format!("{}.tmp", PREF_FILE));

    let serialized =
        serde_json::to_string_pretty(prefs).context("Failed to serialize preferences")?;

    // Atomic write: write to temp file, then rename
    fs::write(&temp_file, serialized)
        .await
        .context("Failed to write preferences")?;

    fs::rename(&temp_file, &pref_file)
        .await
        .context("Failed to save preferences")?;

    Ok(())
}

/// Get default data directory for current platform
///
/// Checks `HELPDOCS_DATA_DIR` first, then falls back to `~/.helpdocs`.
///
/// # Errors
/// Fails if the home directory cannot be determined.
pub fn default_data_dir() -> Result<PathBuf> {
    if let Ok(env_path) = std::env::var(DATA_DIR_ENV) {
        tracing::info!("Using data directory from {}: {}", DATA_DIR_ENV, env_path);
        return Ok(PathBuf::from(env_path));
    }

    let home_dir = dirs::home_dir().context("Failed to get home directory")?;
    Ok(home_dir.join(DEFAULT_DATA_DIR_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();

        let prefs = load_preferences(dir.path()).await.unwrap();

        assert_eq!(prefs, AppPreferences::default());
        assert_eq!(prefs.backend.documents_collection, "helps");
        assert_eq!(prefs.backend.notice_record, "left_margin");
    }

    #[tokio::test]
    async fn test_save_then_load_keeps_values_and_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let prefs = AppPreferences {
            log_filter: Some("debug".to_string()),
            ..Default::default()
        };

        save_preferences(dir.path(), &prefs).await.unwrap();

        assert_eq!(load_preferences(dir.path()).await.unwrap(), prefs);
        assert!(!dir.path().join("preferences.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_partial_file_fills_in_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(PREF_FILE),
            r#"{"backend": {"documents_collection": "staging_helps"}}"#,
        )
        .unwrap();

        let prefs = load_preferences(dir.path()).await.unwrap();

        assert_eq!(prefs.backend.documents_collection, "staging_helps");
        assert_eq!(prefs.backend.admins_collection, "admins");
        assert!(prefs.data_dir.is_none());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(PREF_FILE), "{not json").unwrap();

        assert!(load_preferences(dir.path()).await.is_err());
    }
}
