//! Global notice shown beside every page
//!
//! Stored as the `content` field of `globals/left_margin`. Anyone may read it; only
//! owners may change it.

use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::db::DocumentStore;
use crate::models::Role;
use crate::services::DocumentServiceError;

/// Default collection holding site-wide records
pub const GLOBALS_COLLECTION: &str = "globals";

/// Default id of the notice record
pub const NOTICE_RECORD: &str = "left_margin";

const CONTENT_FIELD: &str = "content";

#[derive(Clone)]
pub struct NoticeService {
    store: Arc<dyn DocumentStore>,
    collection: String,
    record_id: String,
}

impl NoticeService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            collection: GLOBALS_COLLECTION.to_string(),
            record_id: NOTICE_RECORD.to_string(),
        }
    }

    pub fn with_record(mut self, collection: impl Into<String>, record_id: impl Into<String>) -> Self {
        self.collection = collection.into();
        self.record_id = record_id.into();
        self
    }

    /// Current notice; `None` when it was never written
    pub async fn load(&self) -> Result<Option<String>, DocumentServiceError> {
        let fields = self.store.get_one(&self.collection, &self.record_id).await?;
        Ok(fields.and_then(|fields| {
            fields
                .get(CONTENT_FIELD)
                .and_then(Value::as_str)
                .map(str::to_string)
        }))
    }

    /// Overwrite the notice (owner only)
    #[instrument(skip(self, content))]
    pub async fn save(&self, caller: Option<Role>, content: &str) -> Result<(), DocumentServiceError> {
        if !caller.is_some_and(|role| role.is_owner()) {
            return Err(DocumentServiceError::permission_denied(
                "edit the notice",
                Role::Owner.as_str(),
            ));
        }

        let mut fields = Map::new();
        fields.insert(CONTENT_FIELD.to_string(), Value::from(content));
        self.store
            .set(&self.collection, &self.record_id, fields)
            .await?;
        info!("Saved global notice ({} bytes)", content.len());
        Ok(())
    }
}
