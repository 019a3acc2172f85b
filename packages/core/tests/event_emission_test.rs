//! Event Emission Tests
//!
//! Verifies that every structural write emits exactly one `DocumentEvent`, after the
//! store call succeeds, and that rejected or failed writes emit nothing.

#[cfg(test)]
mod event_emission_tests {
    use anyhow::Result;
    use helpdocs_core::db::{DocumentEvent, InMemoryDocumentStore};
    use helpdocs_core::models::DocumentDraft;
    use helpdocs_core::services::DocumentService;
    use std::sync::Arc;
    use tokio::sync::broadcast::error::TryRecvError;
    use tokio::time::{timeout, Duration};

    fn create_service() -> (Arc<InMemoryDocumentStore>, DocumentService) {
        let store = Arc::new(InMemoryDocumentStore::new());
        let service = DocumentService::new(store.clone());
        (store, service)
    }

    async fn next_event(
        rx: &mut tokio::sync::broadcast::Receiver<DocumentEvent>,
    ) -> Result<DocumentEvent> {
        Ok(timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("Event should be emitted within 1 second")?)
    }

    #[tokio::test]
    async fn test_create_emits_created_event() -> Result<()> {
        let (_store, service) = create_service();
        let mut rx = service.subscribe_to_events();

        let id = service.save(None, DocumentDraft::new("Getting started")).await?;

        assert_eq!(next_event(&mut rx).await?, DocumentEvent::Created { id });
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_emits_updated_event() -> Result<()> {
        let (_store, service) = create_service();
        let id = service.save(None, DocumentDraft::new("Draft")).await?;

        // Subscribe after creation to skip the Created event
        let mut rx = service.subscribe_to_events();
        service
            .save(Some(id.as_str()), DocumentDraft::new("Final"))
            .await?;

        let event = next_event(&mut rx).await?;
        assert_eq!(event.event_type(), "updated");
        assert_eq!(event.document_id(), id);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_emits_deleted_event() -> Result<()> {
        let (_store, service) = create_service();
        let id = service.save(None, DocumentDraft::new("Obsolete")).await?;
        let mut rx = service.subscribe_to_events();

        service.delete(&id).await?;

        assert_eq!(next_event(&mut rx).await?, DocumentEvent::Deleted { id });
        Ok(())
    }

    #[tokio::test]
    async fn test_rejected_save_emits_nothing() -> Result<()> {
        let (store, service) = create_service();
        let mut rx = service.subscribe_to_events();

        let result = service.save(None, DocumentDraft::new("  ")).await;

        assert!(result.is_err());
        assert_eq!(store.write_count(), 0);
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_store_call_emits_nothing() -> Result<()> {
        let (store, service) = create_service();
        let id = service.save(None, DocumentDraft::new("Kept")).await?;
        let mut rx = service.subscribe_to_events();

        store.set_unavailable(true);
        let result = service.delete(&id).await;

        assert!(result.is_err());
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
        Ok(())
    }

    #[test]
    fn test_events_serialize_with_type_tag() {
        let event = DocumentEvent::Reparented {
            id: "c".to_string(),
            parent_ids: vec!["r".to_string()],
        };

        let value = serde_json::to_value(&event).unwrap();

        assert_eq!(value["type"], "reparented");
        assert_eq!(value["id"], "c");
    }
}
