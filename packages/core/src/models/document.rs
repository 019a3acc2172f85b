//! Document Data Structures
//!
//! This module defines the `Document` record stored in the `helps` collection and
//! the `DocumentDraft` used by the editor when saving.
//!
//! # Architecture
//!
//! - **Flat records**: documents reference parents by id (`parentIds`); the hierarchy is
//!   never stored as nested data
//! - **Multi-parent**: a document with several parents appears under every parent branch
//! - **Derived keywords**: `keywords_lowercase` mirrors `keywords` case-folded and is
//!   recomputed on every write
//!
//! # Examples
//!
//! ```rust
//! use helpdocs_core::models::DocumentDraft;
//!
//! let draft = DocumentDraft::new("Getting started")
//!     .with_keywords(vec!["Intro".to_string(), "FAQ".to_string()])
//!     .with_parents(vec!["root-doc".to_string()]);
//!
//! let fields = draft.into_fields().unwrap();
//! assert_eq!(fields["keywords_lowercase"][0], "intro");
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::db::StoredRecord;

/// Field holding the parent id list, shared by queries and partial updates
pub const PARENT_IDS_FIELD: &str = "parentIds";

/// Field holding the case-folded keyword mirror used by keyword search
pub const KEYWORDS_LOWERCASE_FIELD: &str = "keywords_lowercase";

/// Validation errors for user-correctable input
///
/// These never reach the store layer: they are raised at the point of user action
/// and surfaced as a blocking message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Title is required")]
    EmptyTitle,

    #[error("Both link text and URL are required")]
    EmptyLink,

    #[error("A folder or file path is required")]
    EmptyPath,

    #[error("A document cannot be its own parent: {0}")]
    SelfParent(String),

    #[error("Email address is required")]
    EmptyEmail,

    #[error("User is already registered: {0}")]
    DuplicateAdmin(String),

    #[error("Unknown role: {0}")]
    InvalidRole(String),

    #[error("You cannot remove your own access")]
    SelfRemoval,

    #[error("Malformed record {id}: {reason}")]
    MalformedRecord { id: String, reason: String },
}

/// A help document as persisted by the document store.
///
/// # Fields
///
/// - `id`: opaque identifier assigned by the store on creation; taken from the record
///   key, never from the stored fields
/// - `title`: display label and sort key
/// - `contents`: HTML-bearing body, opaque to the forest engine
/// - `keywords`: search keywords in their original case
/// - `keywords_lowercase`: case-folded mirror of `keywords`
/// - `parent_ids`: zero parents marks a root; several parents make the node appear in
///   several branches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub id: String,

    pub title: String,

    #[serde(default)]
    pub contents: String,

    #[serde(default)]
    pub keywords: Vec<String>,

    #[serde(default)]
    pub keywords_lowercase: Vec<String>,

    #[serde(default, rename = "parentIds")]
    pub parent_ids: Vec<String>,
}

impl Document {
    /// Create a document with the given id, title and parents
    pub fn new(id: impl Into<String>, title: impl Into<String>, parent_ids: Vec<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            contents: String::new(),
            keywords: Vec::new(),
            keywords_lowercase: Vec::new(),
            parent_ids,
        }
    }

    /// Decode a store record into a document
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::MalformedRecord` when the fields do not describe a
    /// document (missing title, wrong field types).
    pub fn from_record(record: StoredRecord) -> Result<Self, ValidationError> {
        let StoredRecord { id, fields } = record;
        let mut document: Document = serde_json::from_value(Value::Object(fields)).map_err(|e| {
            ValidationError::MalformedRecord {
                id: id.clone(),
                reason: e.to_string(),
            }
        })?;
        document.id = id;
        Ok(document)
    }

    /// Whether this document declares no parents at all
    pub fn is_root(&self) -> bool {
        self.parent_ids.is_empty()
    }

    /// Keywords (original case) containing the already case-folded `term`
    pub fn matching_keywords(&self, term_lowercase: &str) -> Vec<String> {
        self.keywords
            .iter()
            .filter(|k| k.to_lowercase().contains(term_lowercase))
            .cloned()
            .collect()
    }
}

/// Editor payload for creating or updating a document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentDraft {
    pub title: String,

    #[serde(default)]
    pub contents: String,

    #[serde(default)]
    pub keywords: Vec<String>,

    #[serde(default)]
    pub parent_ids: Vec<String>,
}

impl DocumentDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_contents(mut self, contents: impl Into<String>) -> Self {
        self.contents = contents.into();
        self
    }

    pub fn with_keywords(mut self, keywords: Vec<String>) -> Self {
        self.keywords = keywords;
        self
    }

    pub fn with_parents(mut self, parent_ids: Vec<String>) -> Self {
        self.parent_ids = parent_ids;
        self
    }

    /// Validate the draft and turn it into the full field set written to the store.
    ///
    /// The title and each keyword are trimmed, empty keywords are dropped, and
    /// `keywords_lowercase` is derived from the cleaned keywords.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyTitle` when the trimmed title is empty.
    pub fn into_fields(self) -> Result<Map<String, Value>, ValidationError> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }

        let keywords: Vec<String> = self
            .keywords
            .iter()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();
        let keywords_lowercase: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();

        let mut fields = Map::new();
        fields.insert("title".to_string(), Value::String(title));
        fields.insert("contents".to_string(), Value::String(self.contents));
        fields.insert("keywords".to_string(), string_array(keywords));
        fields.insert(
            KEYWORDS_LOWERCASE_FIELD.to_string(),
            string_array(keywords_lowercase),
        );
        fields.insert(PARENT_IDS_FIELD.to_string(), string_array(self.parent_ids));
        Ok(fields)
    }
}

impl From<&Document> for DocumentDraft {
    fn from(document: &Document) -> Self {
        Self {
            title: document.title.clone(),
            contents: document.contents.clone(),
            keywords: document.keywords.clone(),
            parent_ids: document.parent_ids.clone(),
        }
    }
}

/// Build a JSON array of strings
pub fn string_array(values: Vec<String>) -> Value {
    Value::Array(values.into_iter().map(Value::String).collect())
}
