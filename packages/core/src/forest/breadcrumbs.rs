//! Breadcrumb path enumeration
//!
//! A document with several parents is reachable along several root-to-document
//! paths. `all_paths` lists every one of them, depth-first in `parentIds` order. The
//! first path is the primary trail; the rest are shown collapsed.

use serde::Serialize;
use std::collections::HashSet;
use tracing::warn;

use super::{DocumentMap, IntegrityWarning, Node};

/// Title of the synthetic crumb every path starts from
pub const HOME_TITLE: &str = "Home";

/// One breadcrumb entry; the synthetic Home crumb has no id
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Crumb {
    pub id: Option<String>,
    pub title: String,
}

impl Crumb {
    pub fn home() -> Self {
        Self {
            id: None,
            title: HOME_TITLE.to_string(),
        }
    }

    fn for_node(node: &Node) -> Self {
        Self {
            id: Some(node.id().to_string()),
            title: node.title().to_string(),
        }
    }
}

/// Home followed by every document from a root down to the target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreadcrumbPath {
    pub crumbs: Vec<Crumb>,
}

impl BreadcrumbPath {
    /// Document ids along the path, Home excluded
    pub fn ids(&self) -> Vec<&str> {
        self.crumbs.iter().filter_map(|c| c.id.as_deref()).collect()
    }

    /// Number of document crumbs, Home excluded
    pub fn len(&self) -> usize {
        self.crumbs.iter().filter(|c| c.id.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Every breadcrumb path for the viewed document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BreadcrumbTrail {
    pub paths: Vec<BreadcrumbPath>,
}

impl BreadcrumbTrail {
    pub fn new(paths: Vec<BreadcrumbPath>) -> Self {
        Self { paths }
    }

    /// Trail shown on the home page: a single Home crumb
    pub fn home() -> Self {
        Self {
            paths: vec![BreadcrumbPath {
                crumbs: vec![Crumb::home()],
            }],
        }
    }

    pub fn primary(&self) -> Option<&BreadcrumbPath> {
        self.paths.first()
    }

    /// Paths beyond the primary one
    pub fn additional(&self) -> &[BreadcrumbPath] {
        self.paths.get(1..).unwrap_or_default()
    }
}

struct Frame<'a> {
    node: &'a Node,
    /// Nodes already placed below `node`, target first
    below: Vec<&'a Node>,
    /// Ids on the branch from the target up to (not including) `node`
    guard: HashSet<&'a str>,
}

/// Enumerate every root-to-target path for `target_id`.
///
/// # Algorithm
///
/// Walks upward from the target with an explicit stack. Parents are visited in
/// `parentIds` order (duplicates once), each branch carrying its own copy of the
/// ids already on it:
///
/// - a node with no resolvable parent closes a path `[Home, node, .., target]`
/// - a parent already on the branch is a cycle; that branch yields no path
/// - unresolvable parent ids are skipped
///
/// An unknown target yields no paths.
pub fn all_paths(map: &DocumentMap, target_id: &str) -> (Vec<BreadcrumbPath>, Vec<IntegrityWarning>) {
    let mut paths = Vec::new();
    let mut warnings = Vec::new();

    let Some(target) = map.get(target_id) else {
        return (paths, warnings);
    };

    let mut stack = vec![Frame {
        node: target,
        below: Vec::new(),
        guard: HashSet::new(),
    }];

    while let Some(Frame { node, below, guard }) = stack.pop() {
        if guard.contains(node.id()) {
            warn!(
                "Cycle detected at document '{}' ({}) while building breadcrumbs",
                node.title(),
                node.id()
            );
            warnings.push(IntegrityWarning::CycleDetected {
                id: node.id().to_string(),
                title: node.title().to_string(),
            });
            continue;
        }

        let mut seen = HashSet::new();
        let parents: Vec<&Node> = node
            .parent_ids()
            .iter()
            .filter(|id| seen.insert(id.as_str()))
            .filter_map(|id| map.get(id))
            .collect();

        if parents.is_empty() {
            let mut crumbs = Vec::with_capacity(below.len() + 2);
            crumbs.push(Crumb::home());
            crumbs.push(Crumb::for_node(node));
            crumbs.extend(below.iter().rev().map(|n| Crumb::for_node(n)));
            paths.push(BreadcrumbPath { crumbs });
            continue;
        }

        let mut guard = guard;
        guard.insert(node.id());
        let mut below = below;
        below.push(node);

        // Reverse push so the first declared parent is expanded first
        for parent in parents.into_iter().rev() {
            stack.push(Frame {
                node: parent,
                below: below.clone(),
                guard: guard.clone(),
            });
        }
    }

    (paths, warnings)
}
