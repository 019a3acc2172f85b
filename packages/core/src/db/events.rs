//! Domain Events for document changes
//!
//! The document service emits an event after every successful structural write
//! (create, update, delete, reparent). The application controller subscribes and
//! responds by re-fetching every document and rebuilding the forest from scratch;
//! there is no incremental patching.
//!
//! # Event Flow
//!
//! 1. `DocumentService` completes a store write
//! 2. The event is sent on a tokio broadcast channel
//! 3. Subscribers drain the channel and rebuild

use serde::{Deserialize, Serialize};

/// Document-level change notifications
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DocumentEvent {
    /// A new document was created
    Created { id: String },

    /// A document's fields were saved from the editor
    Updated { id: String },

    /// A document was deleted
    Deleted { id: String },

    /// A document's parent set changed through drag-and-drop
    Reparented { id: String, parent_ids: Vec<String> },
}

impl DocumentEvent {
    /// Id of the document the event concerns
    pub fn document_id(&self) -> &str {
        match self {
            DocumentEvent::Created { id }
            | DocumentEvent::Updated { id }
            | DocumentEvent::Deleted { id }
            | DocumentEvent::Reparented { id, .. } => id,
        }
    }

    /// Event type name for logging
    pub fn event_type(&self) -> &'static str {
        match self {
            DocumentEvent::Created { .. } => "created",
            DocumentEvent::Updated { .. } => "updated",
            DocumentEvent::Deleted { .. } => "deleted",
            DocumentEvent::Reparented { .. } => "reparented",
        }
    }
}
