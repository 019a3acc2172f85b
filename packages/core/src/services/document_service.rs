//! Document Service - persistence of help documents
//!
//! All reads and writes of the `helps` collection go through this service. It
//! validates editor input before any store call, keeps `keywords_lowercase` in sync on
//! every write, applies planned reparents as a single partial update and publishes a
//! `DocumentEvent` after every successful structural write.
//!
//! # Examples
//!
//! ```rust
//! use helpdocs_core::db::InMemoryDocumentStore;
//! use helpdocs_core::models::DocumentDraft;
//! use helpdocs_core::services::DocumentService;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let service = DocumentService::new(Arc::new(InMemoryDocumentStore::new()));
//! let id = service.save(None, DocumentDraft::new("Welcome")).await?;
//! assert_eq!(service.get(&id).await?.unwrap().title, "Welcome");
//! # Ok(())
//! # }
//! ```

use serde::Serialize;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, instrument, warn};

use crate::db::{DocumentEvent, DocumentStore, StoredRecord};
use crate::forest::{natural_cmp, ForestState};
use crate::models::{
    string_array, Document, DocumentDraft, ValidationError, KEYWORDS_LOWERCASE_FIELD,
    PARENT_IDS_FIELD,
};
use crate::operations::{plan_reparent, ReparentPlan};
use crate::services::DocumentServiceError;

/// Default collection holding help documents
pub const DOCUMENTS_COLLECTION: &str = "helps";

/// Broadcast channel capacity for document events
const DOCUMENT_EVENT_CHANNEL_CAPACITY: usize = 128;

/// One keyword search result
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub document: Document,
    /// Original-case keywords that contain the search term
    pub matched_keywords: Vec<String>,
}

#[derive(Clone)]
pub struct DocumentService {
    store: Arc<dyn DocumentStore>,
    collection: String,
    event_tx: broadcast::Sender<DocumentEvent>,
}

impl DocumentService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        let (event_tx, _) = broadcast::channel(DOCUMENT_EVENT_CHANNEL_CAPACITY);
        Self {
            store,
            collection: DOCUMENTS_COLLECTION.to_string(),
            event_tx,
        }
    }

    /// Use a different collection name for documents
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Subscribe to document change events
    ///
    /// Receivers are expected to re-fetch every document and rebuild the forest.
    pub fn subscribe_to_events(&self) -> broadcast::Receiver<DocumentEvent> {
        self.event_tx.subscribe()
    }

    fn emit_event(&self, event: DocumentEvent) {
        debug!(
            "Emitting {} event for {}",
            event.event_type(),
            event.document_id()
        );
        // No subscribers is fine
        let _ = self.event_tx.send(event);
    }

    fn decode_all(records: Vec<StoredRecord>) -> Vec<Document> {
        records
            .into_iter()
            .filter_map(|record| match Document::from_record(record) {
                Ok(document) => Some(document),
                Err(e) => {
                    warn!("Skipping undecodable document: {}", e);
                    None
                }
            })
            .collect()
    }

    fn sort_by_title(documents: &mut [Document]) {
        documents.sort_by(|a, b| natural_cmp(&a.title, &b.title));
    }

    /// Fetch every document; records that fail to decode are skipped
    #[instrument(skip(self), fields(collection = %self.collection))]
    pub async fn load_all(&self) -> Result<Vec<Document>, DocumentServiceError> {
        let records = self.store.get_all(&self.collection).await?;
        let documents = Self::decode_all(records);
        debug!("Loaded {} documents", documents.len());
        Ok(documents)
    }

    /// Fetch one document; `None` if it does not exist
    pub async fn get(&self, id: &str) -> Result<Option<Document>, DocumentServiceError> {
        let Some(fields) = self.store.get_one(&self.collection, id).await? else {
            return Ok(None);
        };
        let document = Document::from_record(StoredRecord {
            id: id.to_string(),
            fields,
        })?;
        Ok(Some(document))
    }

    /// Save editor input.
    ///
    /// # Arguments
    ///
    /// * `editing_id` - Document being edited, or `None` to create a new one
    /// * `draft` - Editor fields; the title is trimmed and the keyword mirror derived
    ///
    /// # Returns
    ///
    /// The id of the saved document (the new id when creating)
    ///
    /// # Errors
    ///
    /// - `Validation` for an empty title or a document listed as its own parent;
    ///   nothing is written
    /// - `Store` if the store call fails
    #[instrument(skip(self, draft))]
    pub async fn save(
        &self,
        editing_id: Option<&str>,
        draft: DocumentDraft,
    ) -> Result<String, DocumentServiceError> {
        if let Some(id) = editing_id {
            if draft.parent_ids.iter().any(|p| p == id) {
                return Err(ValidationError::SelfParent(id.to_string()).into());
            }
        }
        let fields = draft.into_fields()?;

        match editing_id {
            Some(id) => {
                self.store.update(&self.collection, id, fields).await?;
                info!("Updated document {}", id);
                self.emit_event(DocumentEvent::Updated { id: id.to_string() });
                Ok(id.to_string())
            }
            None => {
                let id = self.store.create(&self.collection, fields).await?;
                info!("Created document {}", id);
                self.emit_event(DocumentEvent::Created { id: id.clone() });
                Ok(id)
            }
        }
    }

    /// Delete a document.
    ///
    /// Children keep their reference to the deleted id; the next build treats it as a
    /// dangling parent.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<(), DocumentServiceError> {
        self.store.delete(&self.collection, id).await?;
        info!("Deleted document {}", id);
        self.emit_event(DocumentEvent::Deleted { id: id.to_string() });
        Ok(())
    }

    /// Apply a drop of `dragged_id` onto `new_parent_id`.
    ///
    /// Writes only `parentIds`, and only when the parent set changes.
    ///
    /// # Errors
    ///
    /// - `Reparent` when the drop would create a cycle or names an unknown document
    /// - `Store` if the write fails
    #[instrument(skip(self, forest))]
    pub async fn reparent(
        &self,
        forest: &ForestState,
        dragged_id: &str,
        new_parent_id: &str,
        source_parent_id: Option<&str>,
    ) -> Result<ReparentPlan, DocumentServiceError> {
        let plan = plan_reparent(forest.map(), dragged_id, new_parent_id, source_parent_id)?;

        let parent_ids = match plan {
            ReparentPlan::Unchanged => {
                debug!("Parent set of {} unchanged; skipping write", dragged_id);
                return Ok(ReparentPlan::Unchanged);
            }
            ReparentPlan::Update(parent_ids) => parent_ids,
        };

        let mut partial = Map::new();
        partial.insert(
            PARENT_IDS_FIELD.to_string(),
            string_array(parent_ids.clone()),
        );
        self.store
            .update(&self.collection, dragged_id, partial)
            .await?;

        info!("Reparented {} to {:?}", dragged_id, parent_ids);
        self.emit_event(DocumentEvent::Reparented {
            id: dragged_id.to_string(),
            parent_ids: parent_ids.clone(),
        });
        Ok(ReparentPlan::Update(parent_ids))
    }

    /// Search documents by keyword.
    ///
    /// The term is trimmed and case-folded, then matched by exact membership in
    /// `keywords_lowercase`. A blank term returns no results.
    #[instrument(skip(self))]
    pub async fn search_keywords(&self, term: &str) -> Result<Vec<SearchHit>, DocumentServiceError> {
        let folded = term.trim().to_lowercase();
        if folded.is_empty() {
            return Ok(Vec::new());
        }

        let records = self
            .store
            .query_field_contains(&self.collection, KEYWORDS_LOWERCASE_FIELD, &Value::from(folded.as_str()))
            .await?;
        let mut documents = Self::decode_all(records);
        Self::sort_by_title(&mut documents);

        Ok(documents
            .into_iter()
            .map(|document| SearchHit {
                matched_keywords: document.matching_keywords(&folded),
                document,
            })
            .collect())
    }

    /// Documents directly under `parent_id`, or the declared roots for `None`,
    /// sorted by natural title order
    pub async fn children_of(
        &self,
        parent_id: Option<&str>,
    ) -> Result<Vec<Document>, DocumentServiceError> {
        let records = match parent_id {
            Some(id) => {
                self.store
                    .query_field_contains(&self.collection, PARENT_IDS_FIELD, &json!(id))
                    .await?
            }
            None => {
                self.store
                    .query_field_equals(&self.collection, PARENT_IDS_FIELD, &json!([]))
                    .await?
            }
        };
        let mut documents = Self::decode_all(records);
        Self::sort_by_title(&mut documents);
        Ok(documents)
    }
}
