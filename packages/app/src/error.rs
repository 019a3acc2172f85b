//! Application error categories
//!
//! Every failure that reaches the controller boundary falls into one of three
//! buckets, each with its own presentation policy:
//!
//! - `Validation` - user-correctable; the message is shown as is and nothing changed
//! - `Backend` - a store or auth call failed; the user sees a generic message for the
//!   action, details go to the log
//! - `Initialization` - startup failed; the UI is replaced by a fatal notice

use helpdocs_core::services::DocumentServiceError;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Failed to {action}: {source}")]
    Backend {
        action: String,
        #[source]
        source: DocumentServiceError,
    },

    #[error("Initialization failed: {0}")]
    Initialization(String),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn initialization(msg: impl Into<String>) -> Self {
        Self::Initialization(msg.into())
    }

    /// Categorize a service error raised while performing `action`
    pub fn from_service(action: impl Into<String>, err: DocumentServiceError) -> Self {
        match err {
            DocumentServiceError::Validation(inner) => Self::Validation(inner.to_string()),
            DocumentServiceError::Reparent(inner) => Self::Validation(inner.to_string()),
            DocumentServiceError::PermissionDenied { .. } => Self::Validation(err.to_string()),
            DocumentServiceError::InitializationError(msg) => Self::Initialization(msg),
            source => Self::Backend {
                action: action.into(),
                source,
            },
        }
    }

    /// Message suitable for display
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::Backend { action, .. } => {
                format!("Failed to {}. Please try again.", action)
            }
            AppError::Initialization(_) => {
                "HelpDocs could not be started. Please reload the page later.".to_string()
            }
        }
    }

    /// Machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Backend { .. } => "BACKEND_ERROR",
            AppError::Initialization(_) => "INITIALIZATION_ERROR",
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, AppError::Initialization(_))
    }
}

/// Serializable error payload for the UI layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandError {
    /// User-facing error message
    pub message: String,
    /// Machine-readable error code
    pub code: String,
    /// Optional detailed error information for debugging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl From<&AppError> for CommandError {
    fn from(err: &AppError) -> Self {
        let details = match err {
            AppError::Backend { source, .. } => Some(source.to_string()),
            AppError::Initialization(msg) => Some(msg.clone()),
            AppError::Validation(_) => None,
        };
        CommandError {
            message: err.user_message(),
            code: err.code().to_string(),
            details,
        }
    }
}
