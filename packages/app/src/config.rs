//! Runtime application configuration
//!
//! AppConfig is the single source of truth for what the running process uses.
//! It is derived from AppPreferences at startup, enriched with resolved paths
//! and environment overrides.
//!
//! AppConfig is NOT serialized; it is rebuilt on every launch.
//! For persistent user settings, see preferences.rs.

use std::path::{Path, PathBuf};

use anyhow::Result;
use helpdocs_core::presentation::EXPANDED_STATE_KEY;

use crate::constants::{DATA_DIR_ENV, DEFAULT_LOG_FILTER, LOG_ENV, UI_STATE_FILE};
use crate::preferences::{default_data_dir, AppPreferences};

/// Runtime application configuration, immutable for the app lifetime
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Resolved data directory
    pub data_dir: PathBuf,

    /// File backing the durable UI-state store
    pub ui_state_path: PathBuf,

    /// Key the expanded-node set is stored under
    pub expanded_state_key: String,

    pub documents_collection: String,
    pub admins_collection: String,
    pub authorized_users_record: String,
    pub globals_collection: String,
    pub notice_record: String,

    /// `tracing` filter used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl AppConfig {
    /// Build runtime config from user preferences and the process environment.
    ///
    /// `HELPDOCS_DATA_DIR` and `HELPDOCS_LOG` take precedence over preferences.
    pub fn from_preferences(prefs: &AppPreferences) -> Result<Self> {
        let data_dir = match (std::env::var(DATA_DIR_ENV).ok(), &prefs.data_dir) {
            (Some(env_dir), _) => PathBuf::from(env_dir),
            (None, Some(dir)) => dir.clone(),
            (None, None) => default_data_dir()?,
        };
        let log_filter = std::env::var(LOG_ENV).ok();
        Ok(Self::resolve(prefs, &data_dir, log_filter))
    }

    /// Build config with every override given explicitly
    pub fn resolve(prefs: &AppPreferences, data_dir: &Path, log_filter: Option<String>) -> Self {
        let backend = &prefs.backend;
        Self {
            data_dir: data_dir.to_path_buf(),
            ui_state_path: data_dir.join(UI_STATE_FILE),
            expanded_state_key: EXPANDED_STATE_KEY.to_string(),
            documents_collection: backend.documents_collection.clone(),
            admins_collection: backend.admins_collection.clone(),
            authorized_users_record: backend.authorized_users_record.clone(),
            globals_collection: backend.globals_collection.clone(),
            notice_record: backend.notice_record.clone(),
            log_filter: log_filter
                .or_else(|| prefs.log_filter.clone())
                .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        }
    }

    /// Config with default collection names rooted at `data_dir`
    pub fn for_data_dir(data_dir: &Path) -> Self {
        Self::resolve(&AppPreferences::default(), data_dir, None)
    }
}
