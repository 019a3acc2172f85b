//! Tree flattening and filtering
//!
//! Both views are produced by the cycle-safe walker, so a cyclic branch appears up to
//! (not including) the repeated ancestor, exactly as the walker cuts it.

use serde::Serialize;

use crate::forest::{walk, ForestState, IntegrityWarning, WalkEvent};

/// One visible line of the tree in pre-order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeRow {
    pub id: String,
    pub title: String,
    pub depth: usize,
    /// Node this row was reached through; `None` for roots
    pub parent_id: Option<String>,
}

impl TreeRow {
    fn from_event(event: &WalkEvent<'_>) -> Option<Self> {
        match *event {
            WalkEvent::Enter {
                node,
                depth,
                parent_id,
            } => Some(Self {
                id: node.id().to_string(),
                title: node.title().to_string(),
                depth,
                parent_id: parent_id.map(str::to_string),
            }),
            WalkEvent::Leave { .. } => None,
        }
    }
}

/// Flatten the whole forest into pre-order rows.
///
/// A document with several parents yields one row per branch.
pub fn flatten(forest: &ForestState) -> (Vec<TreeRow>, Vec<IntegrityWarning>) {
    let mut rows = Vec::new();
    let warnings = walk(forest.map(), forest.roots(), |event| {
        if let Some(row) = TreeRow::from_event(&event) {
            rows.push(row);
        }
    });
    (rows, warnings)
}

/// Prune the forest to rows whose title contains `query` (case-insensitive) plus the
/// ancestors of such rows.
///
/// A matching row keeps only those descendants that themselves survive the filter.
/// A blank query returns the full tree.
pub fn filter(forest: &ForestState, query: &str) -> (Vec<TreeRow>, Vec<IntegrityWarning>) {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return flatten(forest);
    }

    struct Pending {
        start: usize,
        keep: bool,
    }

    let mut rows: Vec<TreeRow> = Vec::new();
    let mut pending: Vec<Pending> = Vec::new();

    let warnings = walk(forest.map(), forest.roots(), |event| match event {
        WalkEvent::Enter { node, .. } => {
            pending.push(Pending {
                start: rows.len(),
                keep: node.title().to_lowercase().contains(&needle),
            });
            if let Some(row) = TreeRow::from_event(&event) {
                rows.push(row);
            }
        }
        WalkEvent::Leave { .. } => {
            if let Some(done) = pending.pop() {
                if done.keep {
                    if let Some(parent) = pending.last_mut() {
                        parent.keep = true;
                    }
                } else {
                    rows.truncate(done.start);
                }
            }
        }
    });

    (rows, warnings)
}
