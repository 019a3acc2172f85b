//! Drag-and-drop reparent planning
//!
//! Planning is pure: it reads the current forest and decides the dragged document's
//! new parent set. The document service performs the single write (or none).

use std::collections::{HashSet, VecDeque};
use tracing::debug;

use super::ReparentError;
use crate::forest::DocumentMap;

/// Outcome of planning a drop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReparentPlan {
    /// Nothing to write: same target, or the parent set would not change
    Unchanged,
    /// Write this parent set for the dragged document
    Update(Vec<String>),
}

/// Whether `ancestor_id` is reachable by walking parent links up from `start_id`.
///
/// Every declared parent is followed; each id is visited at most once, so the walk
/// terminates on cyclic data.
pub fn is_ancestor(map: &DocumentMap, ancestor_id: &str, start_id: &str) -> bool {
    let mut visited: HashSet<&str> = HashSet::new();
    let mut queue: VecDeque<&str> = VecDeque::from([start_id]);

    while let Some(current) = queue.pop_front() {
        if current == ancestor_id {
            return true;
        }
        if !visited.insert(current) {
            continue;
        }
        if let Some(node) = map.get(current) {
            queue.extend(node.parent_ids().iter().map(String::as_str));
        }
    }

    false
}

/// Plan moving `dragged_id` under `new_parent_id`.
///
/// # Arguments
///
/// * `map` - The current forest
/// * `dragged_id` - Document being dropped
/// * `new_parent_id` - Document it was dropped on
/// * `source_parent_id` - Branch the drag started from; that parent is replaced
///   (a move). `None` adds `new_parent_id` as an extra parent.
///
/// # Returns
///
/// `ReparentPlan::Update` with the new parent set (existing order kept, new parent
/// appended), or `ReparentPlan::Unchanged` when the set would be equal to the current
/// one regardless of order.
///
/// # Errors
///
/// - `ReparentError::UnknownDocument` / `UnknownParent` if either id is not in the map
/// - `ReparentError::Cycle` if `new_parent_id` is a descendant of `dragged_id`
pub fn plan_reparent(
    map: &DocumentMap,
    dragged_id: &str,
    new_parent_id: &str,
    source_parent_id: Option<&str>,
) -> Result<ReparentPlan, ReparentError> {
    if dragged_id == new_parent_id {
        return Ok(ReparentPlan::Unchanged);
    }

    let dragged = map
        .get(dragged_id)
        .ok_or_else(|| ReparentError::unknown_document(dragged_id))?;
    if !map.contains(new_parent_id) {
        return Err(ReparentError::unknown_parent(new_parent_id));
    }

    if is_ancestor(map, dragged_id, new_parent_id) {
        debug!(
            "Rejecting drop of {} onto its descendant {}",
            dragged_id, new_parent_id
        );
        return Err(ReparentError::cycle(dragged_id, new_parent_id));
    }

    let current = dragged.parent_ids();
    let mut next: Vec<String> = current
        .iter()
        .filter(|id| Some(id.as_str()) != source_parent_id)
        .cloned()
        .collect();
    if !next.iter().any(|id| id == new_parent_id) {
        next.push(new_parent_id.to_string());
    }

    let before: HashSet<&str> = current.iter().map(String::as_str).collect();
    let after: HashSet<&str> = next.iter().map(String::as_str).collect();
    if before == after {
        return Ok(ReparentPlan::Unchanged);
    }

    Ok(ReparentPlan::Update(next))
}
