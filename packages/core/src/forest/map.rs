//! Arena storage for one render pass
//!
//! `DocumentMap` is a flat id → `Node` table; child lists hold ids, never references,
//! so malformed parent data can form cycles without forming ownership cycles.
//! `ForestState` bundles a map with the roots computed by the builder and is the
//! only shared forest state: the controller owns it and replaces it wholesale.

use std::collections::BTreeMap;

use super::builder::build_forest;
use super::IntegrityWarning;
use crate::models::Document;

/// A document wrapped with its resolved child list for one build pass
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub document: Document,
    /// Child ids, deduplicated and sorted by natural title order after a build
    pub children: Vec<String>,
}

impl Node {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.document.id
    }

    pub fn title(&self) -> &str {
        &self.document.title
    }

    pub fn parent_ids(&self) -> &[String] {
        &self.document.parent_ids
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Id → node table for one logical session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentMap {
    nodes: BTreeMap<String, Node>,
}

impl DocumentMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a document, replacing any document with the same id
    pub fn insert(&mut self, document: Document) {
        self.nodes.insert(document.id.clone(), Node::new(document));
    }

    pub fn get(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in id order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub(crate) fn nodes_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.nodes.values_mut()
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }
}

impl FromIterator<Document> for DocumentMap {
    fn from_iter<I: IntoIterator<Item = Document>>(iter: I) -> Self {
        let mut map = DocumentMap::new();
        for document in iter {
            map.insert(document);
        }
        map
    }
}

/// A fully built forest: the node table, its sorted roots and the integrity
/// warnings raised while wiring it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForestState {
    map: DocumentMap,
    roots: Vec<String>,
    warnings: Vec<IntegrityWarning>,
}

impl ForestState {
    /// Build a fresh forest from a full document set
    pub fn build(documents: impl IntoIterator<Item = Document>) -> Self {
        let mut map: DocumentMap = documents.into_iter().collect();
        let outcome = build_forest(&mut map);
        Self {
            map,
            roots: outcome.roots,
            warnings: outcome.warnings,
        }
    }

    /// Replace this forest with one built from `documents`.
    ///
    /// The new forest is fully built before it is swapped in, so readers never see a
    /// half-populated map.
    pub fn replace(&mut self, documents: impl IntoIterator<Item = Document>) {
        *self = Self::build(documents);
    }

    pub fn map(&self) -> &DocumentMap {
        &self.map
    }

    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    pub fn warnings(&self) -> &[IntegrityWarning] {
        &self.warnings
    }

    pub fn get(&self, id: &str) -> Option<&Node> {
        self.map.get(id)
    }

    pub fn document(&self, id: &str) -> Option<&Document> {
        self.map.get(id).map(|node| &node.document)
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Resolve parent ids to `(id, title)` pairs for display, skipping unknown ids
    pub fn parent_labels(&self, parent_ids: &[String]) -> Vec<(String, String)> {
        parent_ids
            .iter()
            .filter_map(|id| {
                self.map
                    .get(id)
                    .map(|node| (id.clone(), node.title().to_string()))
            })
            .collect()
    }
}
