//! DAG builder
//!
//! Wires a flat document set into parent → child lists and picks the roots. Only
//! declared edges are wired; cycles are left in place for the walker to cut.

use std::collections::{HashMap, HashSet};
use tracing::warn;

use super::natural::natural_cmp;
use super::{DocumentMap, IntegrityWarning};

/// Result of one build pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildOutcome {
    /// Root ids sorted by natural title order
    pub roots: Vec<String>,
    /// Dangling parent references found while wiring
    pub warnings: Vec<IntegrityWarning>,
}

/// Rebuild every node's child list and return the sorted roots.
///
/// # Algorithm
///
/// 1. Every child list is reset
/// 2. A node without parents is a root; each resolvable parent gets the node as a
///    child; each unresolvable parent raises a dangling-reference warning
/// 3. A node whose parents all fail to resolve falls back to being a root
/// 4. Child lists are deduplicated by id (first occurrence wins)
/// 5. Child lists and roots are sorted by natural title order
pub fn build_forest(map: &mut DocumentMap) -> BuildOutcome {
    for node in map.nodes_mut() {
        node.children.clear();
    }

    let mut roots = Vec::new();
    let mut warnings = Vec::new();
    let mut edges: HashMap<String, Vec<String>> = HashMap::new();

    for node in map.nodes() {
        if node.document.is_root() {
            roots.push(node.id().to_string());
            continue;
        }

        let mut has_valid_parent = false;
        for parent_id in node.parent_ids() {
            if map.contains(parent_id) {
                edges
                    .entry(parent_id.clone())
                    .or_default()
                    .push(node.id().to_string());
                has_valid_parent = true;
            } else {
                warn!(
                    "Document '{}' ({}) references missing parent {}",
                    node.title(),
                    node.id(),
                    parent_id
                );
                warnings.push(IntegrityWarning::DanglingParent {
                    document_id: node.id().to_string(),
                    title: node.title().to_string(),
                    missing_parent_id: parent_id.clone(),
                });
            }
        }

        if !has_valid_parent {
            roots.push(node.id().to_string());
        }
    }

    let by_title = |a: &String, b: &String| {
        let title_of = |id: &String| map.get(id).map(|n| n.title()).unwrap_or_default();
        natural_cmp(title_of(a), title_of(b))
    };

    let mut wired: Vec<(String, Vec<String>)> = edges
        .into_iter()
        .map(|(parent_id, mut children)| {
            let mut seen = HashSet::new();
            children.retain(|id| seen.insert(id.clone()));
            children.sort_by(by_title);
            (parent_id, children)
        })
        .collect();
    roots.sort_by(by_title);

    for (parent_id, children) in wired.drain(..) {
        if let Some(parent) = map.get_mut(&parent_id) {
            parent.children = children;
        }
    }

    BuildOutcome { roots, warnings }
}
