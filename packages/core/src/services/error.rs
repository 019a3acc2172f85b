//! Service Layer Error Types
//!
//! This module defines the error returned by every service operation. It wraps the
//! lower layers' errors so callers can tell user-correctable input problems from
//! collaborator failures.

use crate::db::StoreError;
use crate::models::ValidationError;
use crate::operations::ReparentError;
use thiserror::Error;

/// Service operation errors
#[derive(Error, Debug)]
pub enum DocumentServiceError {
    /// User input was rejected before reaching the store
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// A drop could not be applied
    #[error("Reparent rejected: {0}")]
    Reparent(#[from] ReparentError),

    /// Store call failed
    #[error("Store operation failed: {0}")]
    Store(#[from] StoreError),

    /// Document addressed by id does not exist
    #[error("Document not found: {id}")]
    DocumentNotFound { id: String },

    /// Caller's role does not allow the operation
    #[error("Permission denied: {action} requires the {required} role")]
    PermissionDenied {
        action: String,
        required: &'static str,
    },

    /// Identity provider rejected or cancelled the request
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// Store or auth provider failed to start
    #[error("Initialization error: {0}")]
    InitializationError(String),
}

impl DocumentServiceError {
    /// Create a document not found error
    pub fn document_not_found(id: impl Into<String>) -> Self {
        Self::DocumentNotFound { id: id.into() }
    }

    /// Create a permission denied error
    pub fn permission_denied(action: impl Into<String>, required: &'static str) -> Self {
        Self::PermissionDenied {
            action: action.into(),
            required,
        }
    }

    /// Create an auth failed error
    pub fn auth_failed(msg: impl Into<String>) -> Self {
        Self::AuthFailed(msg.into())
    }

    /// Create an initialization error
    pub fn initialization(msg: impl Into<String>) -> Self {
        Self::InitializationError(msg.into())
    }

    /// Whether the user can fix this by changing their input
    pub fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::Reparent(_) | Self::PermissionDenied { .. }
        )
    }
}
