//! DocumentStore Trait - Hosted Document Database Abstraction
//!
//! This module defines the `DocumentStore` trait that abstracts the hosted document
//! database. Business logic in the services layer only talks to this trait, so the
//! hosted backend and the in-memory store used in development and tests are
//! interchangeable.
//!
//! # Design Decisions
//!
//! 1. **Async-First**: every call is a suspension point of the event loop; nothing blocks
//! 2. **Collection addressed**: records live in named collections (`helps`, `admins`, `globals`)
//! 3. **Schemaless fields**: records are JSON objects; decoding into typed models happens
//!    in the models layer
//! 4. **No retries**: retry, backoff and timeouts belong to the backend implementation
//!
//! # Examples
//!
//! ```rust,no_run
//! use helpdocs_core::db::{DocumentStore, InMemoryDocumentStore};
//! use serde_json::{json, Map};
//!
//! # async fn example() -> Result<(), helpdocs_core::db::StoreError> {
//! let store = InMemoryDocumentStore::new();
//! let mut fields = Map::new();
//! fields.insert("title".to_string(), json!("Welcome"));
//! let id = store.create("helps", fields).await?;
//! assert!(store.get_one("helps", &id).await?.is_some());
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::StoreError;

/// Record fields as stored by the backend
pub type Fields = Map<String, Value>;

/// Result alias for store calls
pub type StoreResult<T> = Result<T, StoreError>;

/// A record together with its store-assigned id
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    pub id: String,
    pub fields: Fields,
}

/// Abstraction over the hosted document database
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so they can be shared behind an `Arc`
/// between the services and the application controller.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch every record of a collection
    async fn get_all(&self, collection: &str) -> StoreResult<Vec<StoredRecord>>;

    /// Fetch one record
    ///
    /// # Returns
    ///
    /// - `Ok(Some(fields))` if the record exists
    /// - `Ok(None)` if it doesn't (not an error)
    async fn get_one(&self, collection: &str, id: &str) -> StoreResult<Option<Fields>>;

    /// Create a record and return the id assigned by the store
    async fn create(&self, collection: &str, fields: Fields) -> StoreResult<String>;

    /// Merge `partial` into an existing record
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the record does not exist.
    async fn update(&self, collection: &str, id: &str, partial: Fields) -> StoreResult<()>;

    /// Create or fully overwrite a record with a caller-chosen id
    async fn set(&self, collection: &str, id: &str, fields: Fields) -> StoreResult<()>;

    /// Delete a record; deleting a missing record succeeds
    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()>;

    /// Records whose `field` equals `value`
    async fn query_field_equals(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> StoreResult<Vec<StoredRecord>>;

    /// Records whose array `field` contains `value` (array-membership query)
    async fn query_field_contains(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> StoreResult<Vec<StoredRecord>>;
}
