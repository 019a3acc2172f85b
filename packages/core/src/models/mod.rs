//! Data Models
//!
//! This module contains the data structures shared by every layer:
//!
//! - `Document` / `DocumentDraft` - help documents and editor payloads
//! - `Role` / `AuthorizedUsers` - the authorization record
//! - `snippet` - HTML snippets produced by the editor dialogs

mod access;
mod document;
pub mod snippet;

pub use access::{AuthorizedUsers, Role, USERS_FIELD};
pub use document::{
    string_array, Document, DocumentDraft, ValidationError, KEYWORDS_LOWERCASE_FIELD,
    PARENT_IDS_FIELD,
};
