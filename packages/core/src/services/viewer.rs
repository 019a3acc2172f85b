//! Viewer Service - read-only navigation
//!
//! Builds the page shown for a document: every breadcrumb path to it, the document
//! itself and its direct children.

use serde::Serialize;
use tracing::{debug, instrument};

use crate::forest::{all_paths, BreadcrumbTrail, ForestState, IntegrityWarning};
use crate::models::Document;
use crate::services::{DocumentService, DocumentServiceError, SearchHit};

/// Main content of a viewer page
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PageContent {
    /// Landing page listing the root documents
    Home,
    Document { document: Document },
    /// The requested id no longer exists
    Missing { id: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerPage {
    pub trail: BreadcrumbTrail,
    pub content: PageContent,
    /// Direct children in natural title order (roots on the home page)
    pub children: Vec<Document>,
    pub warnings: Vec<IntegrityWarning>,
}

#[derive(Clone)]
pub struct ViewerService {
    documents: DocumentService,
}

impl ViewerService {
    pub fn new(documents: DocumentService) -> Self {
        Self { documents }
    }

    /// Build the page for `id`, or the home page for `None`
    ///
    /// # Errors
    ///
    /// Returns `Store` errors from fetching the document or its children. A missing
    /// document is not an error; it yields `PageContent::Missing`.
    #[instrument(skip(self, forest))]
    pub async fn navigate(
        &self,
        forest: &ForestState,
        id: Option<&str>,
    ) -> Result<ViewerPage, DocumentServiceError> {
        let Some(id) = id else {
            let children = self.documents.children_of(None).await?;
            return Ok(ViewerPage {
                trail: BreadcrumbTrail::home(),
                content: PageContent::Home,
                children,
                warnings: Vec::new(),
            });
        };

        let (paths, warnings) = all_paths(forest.map(), id);
        let trail = BreadcrumbTrail::new(paths);

        let Some(document) = self.documents.get(id).await? else {
            debug!("Document {} not found", id);
            return Ok(ViewerPage {
                trail,
                content: PageContent::Missing { id: id.to_string() },
                children: Vec::new(),
                warnings,
            });
        };

        let children = self.documents.children_of(Some(id)).await?;
        Ok(ViewerPage {
            trail,
            content: PageContent::Document { document },
            children,
            warnings,
        })
    }

    /// Keyword search results page
    pub async fn search(&self, term: &str) -> Result<Vec<SearchHit>, DocumentServiceError> {
        self.documents.search_keywords(term).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::InMemoryDocumentStore;
    use crate::models::DocumentDraft;
    use std::sync::Arc;

    async fn setup() -> (ViewerService, DocumentService, ForestState, String, String) {
        let documents = DocumentService::new(Arc::new(InMemoryDocumentStore::new()));
        let root = documents.save(None, DocumentDraft::new("Manual")).await.unwrap();
        let child = documents
            .save(None, DocumentDraft::new("Chapter 1").with_parents(vec![root.clone()]))
            .await
            .unwrap();
        let forest = ForestState::build(documents.load_all().await.unwrap());
        (ViewerService::new(documents.clone()), documents, forest, root, child)
    }

    #[tokio::test]
    async fn test_home_page_lists_roots() {
        let (viewer, _, forest, root, _) = setup().await;

        let page = viewer.navigate(&forest, None).await.unwrap();

        assert_eq!(page.content, PageContent::Home);
        assert_eq!(page.trail, BreadcrumbTrail::home());
        assert_eq!(page.children.len(), 1);
        assert_eq!(page.children[0].id, root);
    }

    #[tokio::test]
    async fn test_document_page_has_trail_and_children() {
        let (viewer, _, forest, root, child) = setup().await;

        let page = viewer.navigate(&forest, Some(child.as_str())).await.unwrap();

        match &page.content {
            PageContent::Document { document } => assert_eq!(document.title, "Chapter 1"),
            other => panic!("Expected document page, got {other:?}"),
        }
        let primary = page.trail.primary().unwrap();
        assert_eq!(primary.ids(), vec![root.as_str(), child.as_str()]);
        assert!(page.children.is_empty());

        let root_page = viewer.navigate(&forest, Some(root.as_str())).await.unwrap();
        assert_eq!(root_page.children.len(), 1);
    }

    #[tokio::test]
    async fn test_deleted_document_is_missing() {
        let (viewer, documents, forest, _, child) = setup().await;
        documents.delete(&child).await.unwrap();

        let page = viewer.navigate(&forest, Some(child.as_str())).await.unwrap();

        assert_eq!(page.content, PageContent::Missing { id: child });
    }
}
