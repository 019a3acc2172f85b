//! HelpDocs Core Business Logic Layer
//!
//! This crate provides the data model, collaborator contracts and forest engine for
//! the HelpDocs help-document system: flat documents with parent references rendered
//! as a navigable multi-parent tree and a breadcrumb-driven viewer.
//!
//! # Architecture
//!
//! - **Flat records, derived forest**: documents store `parentIds`; the forest is
//!   rebuilt from scratch after every structural change, never patched
//! - **Arena storage**: an id → node table with id-based child lists
//! - **Cycle-safe traversal**: every walk carries an ancestor set and an explicit
//!   stack, so malformed parent data produces warnings instead of hangs
//! - **Collaborators behind traits**: the document store, UI-state store and auth
//!   provider are async traits with in-memory implementations
//!
//! # Modules
//!
//! - [`models`] - Documents, drafts, roles and editor snippets
//! - [`db`] - Store contracts, in-memory/file implementations, change events
//! - [`forest`] - DAG builder, walker, breadcrumbs, natural ordering
//! - [`operations`] - Reparent planning with cycle prevention
//! - [`presentation`] - Tree rows, filtering, render modes, expand/collapse memory
//! - [`services`] - Document, viewer, access, notice and auth services

pub mod db;
pub mod forest;
pub mod models;
pub mod operations;
pub mod presentation;
pub mod services;

// Re-export commonly used types
pub use forest::{BreadcrumbTrail, ForestState, IntegrityWarning};
pub use models::*;
pub use operations::{ReparentError, ReparentPlan};
pub use presentation::{ExpandedState, RenderMode, TreeItem};
pub use services::*;
