//! Structural Operations
//!
//! Pure planning for structural edits on the forest. Planning never touches the
//! store; `DocumentService::reparent` applies the plan as one partial update.

pub mod error;
pub mod reparent;

pub use error::ReparentError;
pub use reparent::{is_ancestor, plan_reparent, ReparentPlan};
