//! HelpDocs application layer
//!
//! Owns everything above the core services: runtime configuration and preferences,
//! logging setup, the `Command`/`Response` vocabulary of the UI and the
//! `AppController` that holds session state and dispatches commands.
//!
//! # Startup
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use helpdocs_app::{init_tracing, AppConfig, AppController, Collaborators, Command, Response};
//! use helpdocs_app::preferences::{default_data_dir, load_preferences};
//! use helpdocs_core::db::InMemoryDocumentStore;
//! use helpdocs_core::services::StaticAuthProvider;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let prefs = load_preferences(&default_data_dir()?).await?;
//! let config = AppConfig::from_preferences(&prefs)?;
//! init_tracing(&config.log_filter);
//!
//! let collaborators = Collaborators::with_file_ui_state(
//!     Arc::new(InMemoryDocumentStore::new()),
//!     Arc::new(StaticAuthProvider::new(None)),
//!     &config,
//! );
//! let mut controller = match AppController::initialize(config, collaborators).await {
//!     Ok(controller) => controller,
//!     Err(e) => {
//!         let _fatal = Response::fatal(&e);
//!         return Ok(());
//!     }
//! };
//! let _home = controller.dispatch(Command::GoHome).await?;
//! # Ok(())
//! # }
//! ```

pub mod commands;
pub mod config;
pub mod constants;
pub mod controller;
pub mod error;
pub mod preferences;

pub use commands::{Command, ParentLabel, Response, ViewMode};
pub use config::AppConfig;
pub use controller::{AppController, Collaborators, Session};
pub use error::{AppError, CommandError};

use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` wins over `default_filter`. Calling this more than once is harmless;
/// later calls leave the first subscriber in place.
pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new(constants::DEFAULT_LOG_FILTER));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
