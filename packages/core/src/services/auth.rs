//! Auth provider contract
//!
//! Sign-in itself is handled by an external identity provider. The core only needs
//! the current user and a stream of auth-state changes; roles are looked up
//! separately by `AccessService`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tokio::sync::broadcast;
use tracing::info;

use crate::services::DocumentServiceError;

const AUTH_EVENT_CHANNEL_CAPACITY: usize = 16;

/// An authenticated user as reported by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub uid: String,
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl AuthUser {
    pub fn new(uid: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            email: email.into(),
            display_name: None,
        }
    }

    /// Display name, falling back to the email address
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.email)
    }
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Start an interactive sign-in
    async fn sign_in(&self) -> Result<AuthUser, DocumentServiceError>;

    async fn sign_out(&self) -> Result<(), DocumentServiceError>;

    /// Currently signed-in user, if any
    async fn current_user(&self) -> Option<AuthUser>;

    /// Receive every auth-state change (`None` on sign-out)
    fn subscribe(&self) -> broadcast::Receiver<Option<AuthUser>>;
}

/// Provider that signs in a fixed account; for development and tests
pub struct StaticAuthProvider {
    account: Option<AuthUser>,
    current: Mutex<Option<AuthUser>>,
    events: broadcast::Sender<Option<AuthUser>>,
}

impl StaticAuthProvider {
    /// `account` is the user `sign_in` yields; `None` makes every sign-in fail
    pub fn new(account: Option<AuthUser>) -> Self {
        let (events, _) = broadcast::channel(AUTH_EVENT_CHANNEL_CAPACITY);
        Self {
            account,
            current: Mutex::new(None),
            events,
        }
    }

    /// Provider that starts already signed in as `user`
    pub fn signed_in(user: AuthUser) -> Self {
        let provider = Self::new(Some(user.clone()));
        if let Ok(mut current) = provider.current.lock() {
            *current = Some(user);
        }
        provider
    }

    fn publish(&self, user: Option<AuthUser>) -> Result<(), DocumentServiceError> {
        let mut current = self
            .current
            .lock()
            .map_err(|_| DocumentServiceError::auth_failed("auth state lock poisoned"))?;
        *current = user.clone();
        // No subscribers is fine
        let _ = self.events.send(user);
        Ok(())
    }
}

#[async_trait]
impl AuthProvider for StaticAuthProvider {
    async fn sign_in(&self) -> Result<AuthUser, DocumentServiceError> {
        let user = self
            .account
            .clone()
            .ok_or_else(|| DocumentServiceError::auth_failed("sign-in was cancelled"))?;
        self.publish(Some(user.clone()))?;
        info!("Signed in as {}", user.email);
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), DocumentServiceError> {
        self.publish(None)?;
        info!("Signed out");
        Ok(())
    }

    async fn current_user(&self) -> Option<AuthUser> {
        self.current.lock().ok().and_then(|current| current.clone())
    }

    fn subscribe(&self) -> broadcast::Receiver<Option<AuthUser>> {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sign_in_and_out_publish_state() {
        let provider = StaticAuthProvider::new(Some(AuthUser::new("u1", "kim@example.com")));
        let mut changes = provider.subscribe();

        assert!(provider.current_user().await.is_none());

        let user = provider.sign_in().await.unwrap();
        assert_eq!(changes.recv().await.unwrap(), Some(user.clone()));
        assert_eq!(provider.current_user().await, Some(user));

        provider.sign_out().await.unwrap();
        assert_eq!(changes.recv().await.unwrap(), None);
        assert!(provider.current_user().await.is_none());
    }

    #[tokio::test]
    async fn test_cancelled_sign_in() {
        let provider = StaticAuthProvider::new(None);

        assert!(provider.sign_in().await.is_err());
    }

    #[test]
    fn test_label_falls_back_to_email() {
        let mut user = AuthUser::new("u1", "lee@example.com");
        assert_eq!(user.label(), "lee@example.com");
        user.display_name = Some("Lee".into());
        assert_eq!(user.label(), "Lee");
    }
}
