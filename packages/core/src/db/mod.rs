//! Store Layer
//!
//! This module defines the collaborators the core talks to for persistence:
//!
//! - `DocumentStore` - the hosted document database (collections of JSON records)
//! - `UiStateStore` - durable key-value storage for presentation state
//! - `DocumentEvent` - change notifications published after structural writes
//!
//! # Architecture
//!
//! The hosted backend is an external collaborator; only its interface contract lives
//! here. `InMemoryDocumentStore` implements the contract for development and tests,
//! and `JsonFileUiStateStore` persists UI state to a local file.

mod document_store;
mod error;
pub mod events;
mod memory_store;
mod ui_state;

pub use document_store::{DocumentStore, Fields, StoreResult, StoredRecord};
pub use error::{StoreError, UiStateError};
pub use events::DocumentEvent;
pub use memory_store::InMemoryDocumentStore;
pub use ui_state::{JsonFileUiStateStore, MemoryUiStateStore, UiStateStore};
