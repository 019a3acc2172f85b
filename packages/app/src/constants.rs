//! Shared constants used across the application
//!
//! File names and environment variable names live here so configuration and
//! preferences agree on them.

/// Preferences file inside the data directory
pub const PREF_FILE: &str = "preferences.json";

/// Durable UI-state file inside the data directory (expand/collapse memory)
pub const UI_STATE_FILE: &str = "ui_state.json";

/// Overrides the data directory (useful for tests and portable installs)
pub const DATA_DIR_ENV: &str = "HELPDOCS_DATA_DIR";

/// Overrides the log filter from preferences; `RUST_LOG` still wins over both
pub const LOG_ENV: &str = "HELPDOCS_LOG";

/// Log filter used when neither the environment nor preferences set one
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Data directory name under the user's home directory
pub const DEFAULT_DATA_DIR_NAME: &str = ".helpdocs";
