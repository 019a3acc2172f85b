//! Forest Engine
//!
//! Converts a flat document set with parent references into a navigable forest:
//!
//! - `builder` wires child lists and picks the roots
//! - `walker` traverses the forest and cuts cycles at the repeated ancestor
//! - `breadcrumbs` enumerates every root-to-document path through the DAG
//! - `natural` orders titles with numeric runs compared by value
//!
//! # Architecture
//!
//! Parent references are unvalidated external data. The builder only wires declared
//! edges, so the child graph may still contain cycles; every traversal goes through an
//! ancestor-set guard and an explicit stack, so malformed data costs a warning, never
//! a hang or a stack overflow.
//!
//! # Examples
//!
//! ```rust
//! use helpdocs_core::forest::ForestState;
//! use helpdocs_core::models::Document;
//!
//! let forest = ForestState::build(vec![
//!     Document::new("r", "Root", vec![]),
//!     Document::new("c1", "B", vec!["r".to_string()]),
//!     Document::new("c2", "A", vec!["r".to_string()]),
//! ]);
//!
//! assert_eq!(forest.roots(), ["r".to_string()]);
//! assert_eq!(forest.get("r").unwrap().children, vec!["c2", "c1"]);
//! ```

pub mod breadcrumbs;
pub mod builder;
mod map;
pub mod natural;
pub mod walker;

pub use breadcrumbs::{all_paths, BreadcrumbPath, BreadcrumbTrail, Crumb, HOME_TITLE};
pub use builder::{build_forest, BuildOutcome};
pub use map::{DocumentMap, ForestState, Node};
pub use natural::natural_cmp;
pub use walker::{walk, WalkEvent};

use serde::Serialize;
use std::fmt;

/// Recoverable data-integrity problem found while building or walking the forest.
///
/// Warnings are logged where they are found and returned to the caller; they never
/// abort a build or a traversal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum IntegrityWarning {
    /// A document names a parent id that is not in the map
    DanglingParent {
        document_id: String,
        title: String,
        missing_parent_id: String,
    },

    /// A traversal re-entered a document already on the current branch
    CycleDetected { id: String, title: String },
}

impl fmt::Display for IntegrityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityWarning::DanglingParent {
                document_id,
                title,
                missing_parent_id,
            } => write!(
                f,
                "document '{title}' ({document_id}) references missing parent {missing_parent_id}"
            ),
            IntegrityWarning::CycleDetected { id, title } => {
                write!(f, "cycle detected at document '{title}' ({id})")
            }
        }
    }
}
