//! Access Service - role lookup and admin management
//!
//! Roles live in one authorization record (`admins/authorized_users` by default)
//! whose `users` field maps email → role. Lookups never fail: anything unreadable
//! means "no role". Management operations are owner-only and rewrite the whole
//! record.

use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::db::DocumentStore;
use crate::models::{AuthorizedUsers, Role, ValidationError, USERS_FIELD};
use crate::services::DocumentServiceError;

/// Default collection holding the authorization record
pub const ADMINS_COLLECTION: &str = "admins";

/// Default id of the authorization record
pub const AUTHORIZED_USERS_RECORD: &str = "authorized_users";

#[derive(Clone)]
pub struct AccessService {
    store: Arc<dyn DocumentStore>,
    collection: String,
    record_id: String,
}

fn require_owner(caller: Option<Role>, action: &str) -> Result<(), DocumentServiceError> {
    match caller {
        Some(role) if role.is_owner() => Ok(()),
        _ => Err(DocumentServiceError::permission_denied(
            action,
            Role::Owner.as_str(),
        )),
    }
}

fn normalize_email(email: &str) -> Result<String, ValidationError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::EmptyEmail);
    }
    Ok(email.to_string())
}

impl AccessService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            collection: ADMINS_COLLECTION.to_string(),
            record_id: AUTHORIZED_USERS_RECORD.to_string(),
        }
    }

    /// Use a different location for the authorization record
    pub fn with_record(mut self, collection: impl Into<String>, record_id: impl Into<String>) -> Self {
        self.collection = collection.into();
        self.record_id = record_id.into();
        self
    }

    /// Read the email → role map. Entries with an unknown role are skipped.
    async fn read_users(&self) -> Result<AuthorizedUsers, DocumentServiceError> {
        let Some(fields) = self.store.get_one(&self.collection, &self.record_id).await? else {
            return Ok(AuthorizedUsers::new());
        };

        let Some(Value::Object(entries)) = fields.get(USERS_FIELD) else {
            return Ok(AuthorizedUsers::new());
        };

        let mut users = AuthorizedUsers::new();
        for (email, role) in entries {
            match role.as_str().map(str::parse::<Role>) {
                Some(Ok(role)) => {
                    users.insert(email.clone(), role);
                }
                _ => warn!("Ignoring unknown role {} for {}", role, email),
            }
        }
        Ok(users)
    }

    async fn write_users(&self, users: &AuthorizedUsers) -> Result<(), DocumentServiceError> {
        let entries: Map<String, Value> = users
            .iter()
            .map(|(email, role)| (email.clone(), Value::from(role.as_str())))
            .collect();
        let mut fields = Map::new();
        fields.insert(USERS_FIELD.to_string(), Value::Object(entries));
        self.store
            .set(&self.collection, &self.record_id, fields)
            .await?;
        Ok(())
    }

    /// Role of `email`, or `None` when it has none or the lookup fails
    #[instrument(skip(self))]
    pub async fn role_for(&self, email: &str) -> Option<Role> {
        match self.read_users().await {
            Ok(users) => users.get(email).copied(),
            Err(e) => {
                warn!("Role lookup failed: {}", e);
                None
            }
        }
    }

    /// Every registered user (owner only)
    pub async fn list_users(&self, caller: Option<Role>) -> Result<AuthorizedUsers, DocumentServiceError> {
        require_owner(caller, "list administrators")?;
        self.read_users().await
    }

    /// Register a new user (owner only)
    ///
    /// # Errors
    ///
    /// - `Validation(EmptyEmail)` for a blank email
    /// - `Validation(DuplicateAdmin)` if the email is already registered
    #[instrument(skip(self))]
    pub async fn add_user(
        &self,
        caller: Option<Role>,
        email: &str,
        role: Role,
    ) -> Result<AuthorizedUsers, DocumentServiceError> {
        require_owner(caller, "add administrators")?;
        let email = normalize_email(email)?;

        let mut users = self.read_users().await?;
        if users.contains_key(&email) {
            return Err(ValidationError::DuplicateAdmin(email).into());
        }
        users.insert(email.clone(), role);
        self.write_users(&users).await?;

        info!("Registered {} as {}", email, role);
        Ok(users)
    }

    /// Change a registered user's role (owner only); unknown emails are left alone
    #[instrument(skip(self))]
    pub async fn update_role(
        &self,
        caller: Option<Role>,
        email: &str,
        role: Role,
    ) -> Result<AuthorizedUsers, DocumentServiceError> {
        require_owner(caller, "change roles")?;

        let mut users = self.read_users().await?;
        match users.get_mut(email) {
            Some(current) if *current != role => {
                *current = role;
                self.write_users(&users).await?;
                info!("Changed role of {} to {}", email, role);
            }
            Some(_) => {}
            None => warn!("Role change for unregistered user {}", email),
        }
        Ok(users)
    }

    /// Remove a registered user (owner only)
    ///
    /// # Errors
    ///
    /// `Validation(SelfRemoval)` when `email` is the caller's own address
    #[instrument(skip(self))]
    pub async fn remove_user(
        &self,
        caller: Option<Role>,
        caller_email: &str,
        email: &str,
    ) -> Result<AuthorizedUsers, DocumentServiceError> {
        require_owner(caller, "remove administrators")?;
        if caller_email == email {
            return Err(ValidationError::SelfRemoval.into());
        }

        let mut users = self.read_users().await?;
        if users.remove(email).is_some() {
            self.write_users(&users).await?;
            info!("Removed {}", email);
        }
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{InMemoryDocumentStore, StoredRecord};
    use serde_json::json;

    fn seeded(users: Value) -> (Arc<InMemoryDocumentStore>, AccessService) {
        let mut fields = Map::new();
        fields.insert(USERS_FIELD.to_string(), users);
        let store = Arc::new(InMemoryDocumentStore::with_records(
            ADMINS_COLLECTION,
            vec![StoredRecord {
                id: AUTHORIZED_USERS_RECORD.to_string(),
                fields,
            }],
        ));
        let service = AccessService::new(store.clone());
        (store, service)
    }

    #[tokio::test]
    async fn test_role_lookup() {
        let (_, service) = seeded(json!({
            "boss@example.com": "owner",
            "writer@example.com": "editor",
            "odd@example.com": "superuser"
        }));

        assert_eq!(service.role_for("boss@example.com").await, Some(Role::Owner));
        assert_eq!(service.role_for("writer@example.com").await, Some(Role::Editor));
        assert_eq!(service.role_for("odd@example.com").await, None);
        assert_eq!(service.role_for("stranger@example.com").await, None);
    }

    #[tokio::test]
    async fn test_missing_record_and_outage_mean_no_role() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let service = AccessService::new(store.clone());
        assert_eq!(service.role_for("boss@example.com").await, None);

        store.set_unavailable(true);
        assert_eq!(service.role_for("boss@example.com").await, None);
    }

    #[tokio::test]
    async fn test_add_user_rejects_duplicates_and_blank_email() {
        let (_, service) = seeded(json!({"boss@example.com": "owner"}));
        let owner = Some(Role::Owner);

        let users = service
            .add_user(owner, " new@example.com ", Role::Editor)
            .await
            .unwrap();
        assert_eq!(users.get("new@example.com"), Some(&Role::Editor));

        let duplicate = service.add_user(owner, "new@example.com", Role::Owner).await;
        assert!(matches!(
            duplicate,
            Err(DocumentServiceError::Validation(ValidationError::DuplicateAdmin(_)))
        ));

        let blank = service.add_user(owner, "  ", Role::Editor).await;
        assert!(matches!(
            blank,
            Err(DocumentServiceError::Validation(ValidationError::EmptyEmail))
        ));
    }

    #[tokio::test]
    async fn test_management_is_owner_only() {
        let (store, service) = seeded(json!({"writer@example.com": "editor"}));

        let result = service
            .add_user(Some(Role::Editor), "x@example.com", Role::Editor)
            .await;

        assert!(matches!(result, Err(DocumentServiceError::PermissionDenied { .. })));
        assert!(service.list_users(None).await.is_err());
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_update_and_remove() {
        let (store, service) = seeded(json!({
            "boss@example.com": "owner",
            "writer@example.com": "editor"
        }));
        let owner = Some(Role::Owner);

        let users = service
            .update_role(owner, "writer@example.com", Role::Owner)
            .await
            .unwrap();
        assert_eq!(users.get("writer@example.com"), Some(&Role::Owner));

        service
            .update_role(owner, "nobody@example.com", Role::Owner)
            .await
            .unwrap();
        assert_eq!(store.write_count(), 1);

        let users = service
            .remove_user(owner, "boss@example.com", "writer@example.com")
            .await
            .unwrap();
        assert!(!users.contains_key("writer@example.com"));
        assert_eq!(service.role_for("writer@example.com").await, None);
    }

    #[tokio::test]
    async fn test_cannot_remove_self() {
        let (_, service) = seeded(json!({"boss@example.com": "owner"}));

        let result = service
            .remove_user(Some(Role::Owner), "boss@example.com", "boss@example.com")
            .await;

        assert!(matches!(
            result,
            Err(DocumentServiceError::Validation(ValidationError::SelfRemoval))
        ));
    }
}
