//! Error types for the reparent protocol
//!
//! These are user-correctable: the drop is rejected with a message and nothing is
//! written.

use thiserror::Error;

/// Reasons a drop cannot be applied
///
/// # Examples
///
/// ```rust
/// use helpdocs_core::operations::ReparentError;
///
/// let err = ReparentError::cycle("chapter-1", "section-1-2");
/// assert!(err.to_string().contains("descendant"));
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReparentError {
    /// The drop target is the dragged document or one of its descendants
    ///
    /// Applying it would make the document its own ancestor.
    #[error("Cannot move '{dragged_id}' under its own descendant '{new_parent_id}'")]
    Cycle {
        dragged_id: String,
        new_parent_id: String,
    },

    /// The dragged document is not in the current forest
    #[error("Document '{id}' does not exist")]
    UnknownDocument { id: String },

    /// The drop target is not in the current forest
    #[error("Target document '{id}' does not exist")]
    UnknownParent { id: String },
}

impl ReparentError {
    /// Create a Cycle error
    pub fn cycle(dragged_id: impl Into<String>, new_parent_id: impl Into<String>) -> Self {
        Self::Cycle {
            dragged_id: dragged_id.into(),
            new_parent_id: new_parent_id.into(),
        }
    }

    /// Create an UnknownDocument error
    pub fn unknown_document(id: impl Into<String>) -> Self {
        Self::UnknownDocument { id: id.into() }
    }

    /// Create an UnknownParent error
    pub fn unknown_parent(id: impl Into<String>) -> Self {
        Self::UnknownParent { id: id.into() }
    }
}
