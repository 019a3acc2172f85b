//! Business Services
//!
//! This module contains the async services that sit between the forest engine and
//! the collaborator stores:
//!
//! - `DocumentService` - document CRUD, reparent writes, keyword search, change events
//! - `ViewerService` - breadcrumb-driven document pages
//! - `AccessService` - role lookup and owner-only admin management
//! - `NoticeService` - the site-wide notice
//! - `AuthProvider` - identity provider contract with a static implementation
//!
//! Services own no forest state; the caller passes the current `ForestState` into
//! the operations that need it.

pub mod access;
pub mod auth;
pub mod document_service;
pub mod error;
pub mod notice;
pub mod viewer;

pub use access::{AccessService, ADMINS_COLLECTION, AUTHORIZED_USERS_RECORD};
pub use auth::{AuthProvider, AuthUser, StaticAuthProvider};
pub use document_service::{DocumentService, SearchHit, DOCUMENTS_COLLECTION};
pub use error::DocumentServiceError;
pub use notice::{NoticeService, GLOBALS_COLLECTION, NOTICE_RECORD};
pub use viewer::{PageContent, ViewerPage, ViewerService};
