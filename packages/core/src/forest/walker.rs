//! Cycle-safe tree walker
//!
//! Depth-first traversal over the child lists of a `DocumentMap`. The walk keeps the
//! set of ids on the current root-to-here branch; a node already on the branch is
//! reported and its subtree is skipped for that branch only. A node shared by two
//! branches is visited once per branch.
//!
//! Traversal uses an explicit stack, so path length is bounded by the document count
//! rather than by the native call stack.

use std::collections::HashSet;
use tracing::warn;

use super::{DocumentMap, IntegrityWarning, Node};

/// Traversal callback payload
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WalkEvent<'a> {
    /// A node is entered; its descendants follow before the matching `Leave`
    Enter {
        node: &'a Node,
        depth: usize,
        /// Id of the node this one was reached through (`None` at the top level)
        parent_id: Option<&'a str>,
    },
    /// All descendants of `node` on this branch have been visited
    Leave { node: &'a Node, depth: usize },
}

struct Frame<'a> {
    owner: Option<&'a Node>,
    siblings: &'a [String],
    next: usize,
    depth: usize,
}

/// Walk the forest from `start` (usually the roots), calling `visit` for every node.
///
/// Ids in `start` that are not in the map are skipped. Returns one
/// `IntegrityWarning::CycleDetected` per cut branch.
pub fn walk<'a, F>(map: &'a DocumentMap, start: &'a [String], mut visit: F) -> Vec<IntegrityWarning>
where
    F: FnMut(WalkEvent<'a>),
{
    let mut warnings = Vec::new();
    let mut ancestors: HashSet<&'a str> = HashSet::new();
    let mut stack = vec![Frame {
        owner: None,
        siblings: start,
        next: 0,
        depth: 0,
    }];

    while let Some(frame) = stack.last_mut() {
        if frame.next == frame.siblings.len() {
            let owner = frame.owner;
            let depth = frame.depth;
            stack.pop();
            if let Some(owner) = owner {
                ancestors.remove(owner.id());
                visit(WalkEvent::Leave {
                    node: owner,
                    depth: depth - 1,
                });
            }
            continue;
        }

        let siblings = frame.siblings;
        let id = &siblings[frame.next];
        frame.next += 1;
        let depth = frame.depth;
        let parent_id = frame.owner.map(Node::id);

        let Some(node) = map.get(id) else {
            continue;
        };

        if ancestors.contains(node.id()) {
            warn!(
                "Cycle detected at document '{}' ({}); skipping its subtree on this branch",
                node.title(),
                node.id()
            );
            warnings.push(IntegrityWarning::CycleDetected {
                id: node.id().to_string(),
                title: node.title().to_string(),
            });
            continue;
        }

        ancestors.insert(node.id());
        visit(WalkEvent::Enter {
            node,
            depth,
            parent_id,
        });
        stack.push(Frame {
            owner: Some(node),
            siblings: &node.children,
            next: 0,
            depth: depth + 1,
        });
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forest::ForestState;
    use crate::models::Document;

    fn doc(id: &str, title: &str, parents: &[&str]) -> Document {
        Document::new(id, title, parents.iter().map(|p| p.to_string()).collect())
    }

    fn entered(forest: &ForestState, start: &[String]) -> (Vec<(String, usize)>, Vec<IntegrityWarning>) {
        let mut seen = Vec::new();
        let warnings = walk(forest.map(), start, |event| {
            if let WalkEvent::Enter { node, depth, .. } = event {
                seen.push((node.id().to_string(), depth));
            }
        });
        (seen, warnings)
    }

    #[test]
    fn test_preorder_with_depths() {
        let forest = ForestState::build(vec![
            doc("r", "Root", &[]),
            doc("a", "A", &["r"]),
            doc("b", "B", &["r"]),
            doc("a1", "A1", &["a"]),
        ]);

        let (seen, warnings) = entered(&forest, forest.roots());

        assert_eq!(
            seen,
            vec![
                ("r".to_string(), 0),
                ("a".to_string(), 1),
                ("a1".to_string(), 2),
                ("b".to_string(), 1),
            ]
        );
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_enter_and_leave_are_balanced() {
        let forest = ForestState::build(vec![doc("r", "Root", &[]), doc("c", "C", &["r"])]);

        let mut events = Vec::new();
        walk(forest.map(), forest.roots(), |event| match event {
            WalkEvent::Enter { node, parent_id, .. } => {
                events.push(format!("enter {} via {:?}", node.id(), parent_id))
            }
            WalkEvent::Leave { node, depth } => events.push(format!("leave {} at {}", node.id(), depth)),
        });

        assert_eq!(
            events,
            vec![
                "enter r via None",
                "enter c via Some(\"r\")",
                "leave c at 1",
                "leave r at 0",
            ]
        );
    }

    #[test]
    fn test_shared_child_visited_under_each_parent() {
        let forest = ForestState::build(vec![
            doc("p1", "P1", &[]),
            doc("p2", "P2", &[]),
            doc("s", "Shared", &["p1", "p2"]),
        ]);

        let (seen, warnings) = entered(&forest, forest.roots());

        let shared_visits = seen.iter().filter(|(id, _)| id == "s").count();
        assert_eq!(shared_visits, 2);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_two_node_cycle_shows_one_level() {
        let forest = ForestState::build(vec![doc("d1", "D1", &["d2"]), doc("d2", "D2", &["d1"])]);

        let start = vec!["d1".to_string()];
        let (seen, warnings) = entered(&forest, &start);

        assert_eq!(seen, vec![("d1".to_string(), 0), ("d2".to_string(), 1)]);
        assert_eq!(
            warnings,
            vec![IntegrityWarning::CycleDetected {
                id: "d1".into(),
                title: "D1".into(),
            }]
        );
    }

    #[test]
    fn test_self_parent_is_cut() {
        let forest = ForestState::build(vec![doc("r", "Root", &[]), doc("s", "Selfish", &["r", "s"])]);

        let (seen, warnings) = entered(&forest, forest.roots());

        assert_eq!(seen, vec![("r".to_string(), 0), ("s".to_string(), 1)]);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_deep_chain_does_not_overflow() {
        let mut docs = vec![doc("n0", "n0", &[])];
        for i in 1..20_000 {
            docs.push(Document::new(
                format!("n{i}"),
                format!("n{i}"),
                vec![format!("n{}", i - 1)],
            ));
        }
        let forest = ForestState::build(docs);

        let (seen, _) = entered(&forest, forest.roots());

        assert_eq!(seen.len(), 20_000);
        assert_eq!(seen.last().unwrap().1, 19_999);
    }

    #[test]
    fn test_unknown_start_ids_are_skipped() {
        let forest = ForestState::build(vec![doc("r", "Root", &[])]);
        let start = vec!["ghost".to_string(), "r".to_string()];

        let (seen, _) = entered(&forest, &start);

        assert_eq!(seen, vec![("r".to_string(), 0)]);
    }
}
