//! Store Error Types
//!
//! This module defines error types for the collaborator stores: the hosted document
//! store and the durable UI-state store.

use thiserror::Error;

/// Document store operation errors
///
/// Every variant is a collaborator failure. Callers log it, report a generic
/// message and leave prior state untouched.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Record addressed by id does not exist (update on a missing record)
    #[error("Record not found: {collection}/{id}")]
    NotFound { collection: String, id: String },

    /// Backend rejected or could not serve the request
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Internal lock was poisoned by a panicking writer
    #[error("Store lock poisoned")]
    LockPoisoned,

    /// Backend failed to start
    #[error("Store initialization failed: {0}")]
    InitializationFailed(String),
}

impl StoreError {
    /// Create a not found error
    pub fn not_found(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            collection: collection.into(),
            id: id.into(),
        }
    }

    /// Create an unavailable error
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Create an initialization failed error
    pub fn initialization_failed(msg: impl Into<String>) -> Self {
        Self::InitializationFailed(msg.into())
    }
}

/// Durable UI-state store errors
///
/// The presentation layer treats every one of these as "absent".
#[derive(Error, Debug)]
pub enum UiStateError {
    #[error("UI state I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("UI state is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("UI state lock poisoned")]
    LockPoisoned,
}
