//! Application controller
//!
//! `AppController` is the one owner of session-wide state: the current forest, the
//! signed-in user and role, the editor selection and both expand/collapse sets. Each
//! UI action reaches it as a `Command` and is routed by the single `match` in
//! `dispatch`.
//!
//! # Rebuild policy
//!
//! Services publish a `DocumentEvent` after every structural write. Around each
//! command the controller drains its event receiver; if anything arrived it re-fetches
//! every document and swaps in a freshly built forest. The forest is never patched.
//! A failed re-fetch leaves the forest marked stale: the rebuild is retried on the
//! next command and drops are refused until it succeeds.
//!
//! # Auth state
//!
//! The controller also follows the provider's auth-state stream. Changes published
//! since the last command are applied before the next one runs: the role is looked
//! up again, and a user without a role is returned to viewer mode.

use std::sync::Arc;

use helpdocs_core::db::{
    DocumentEvent, DocumentStore, JsonFileUiStateStore, StoreError, UiStateStore,
};
use helpdocs_core::forest::{ForestState, IntegrityWarning};
use helpdocs_core::models::{snippet, DocumentDraft, Role, ValidationError};
use helpdocs_core::operations::ReparentPlan;
use helpdocs_core::presentation::{filter, flatten, render, ExpandedState, RenderOptions};
use helpdocs_core::services::{
    AccessService, AuthProvider, AuthUser, DocumentService, DocumentServiceError, NoticeService,
    ViewerService,
};
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{debug, error, info, instrument, warn};

use crate::commands::{Command, ParentLabel, Response, ViewMode};
use crate::config::AppConfig;
use crate::error::AppError;

/// External collaborators the controller talks to
#[derive(Clone)]
pub struct Collaborators {
    pub store: Arc<dyn DocumentStore>,
    pub auth: Arc<dyn AuthProvider>,
    pub ui_state: Arc<dyn UiStateStore>,
}

impl Collaborators {
    /// Use the file-backed UI-state store at the configured path
    pub fn with_file_ui_state(
        store: Arc<dyn DocumentStore>,
        auth: Arc<dyn AuthProvider>,
        config: &AppConfig,
    ) -> Self {
        Self {
            store,
            auth,
            ui_state: Arc::new(JsonFileUiStateStore::new(config.ui_state_path.clone())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub user: Option<AuthUser>,
    pub role: Option<Role>,
}

/// Document open in the editor; `editing_id` is `None` for a new document
#[derive(Debug, Clone, Default, PartialEq)]
struct EditorState {
    editing_id: Option<String>,
    parent_ids: Vec<String>,
}

/// Parent picker dialog; its expansion is not persisted and starts collapsed
#[derive(Debug, Clone, Default)]
struct PickerState {
    expanded: ExpandedState,
    query: String,
}

pub struct AppController {
    config: AppConfig,
    documents: DocumentService,
    viewer: ViewerService,
    access: AccessService,
    notice: NoticeService,
    auth: Arc<dyn AuthProvider>,
    ui_state: Arc<dyn UiStateStore>,
    events: broadcast::Receiver<DocumentEvent>,
    auth_events: broadcast::Receiver<Option<AuthUser>>,
    forest: ForestState,
    /// Set when changes were seen but the forest has not been rebuilt yet
    needs_rebuild: bool,
    session: Session,
    mode: ViewMode,
    editor: EditorState,
    expanded: ExpandedState,
    picker: PickerState,
}

impl AppController {
    /// Wire the services, load every document and build the first forest.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Initialization` when the initial document load fails; the
    /// caller should show `Response::fatal` and stop.
    #[instrument(skip(config, collaborators))]
    pub async fn initialize(config: AppConfig, collaborators: Collaborators) -> Result<Self, AppError> {
        let Collaborators {
            store,
            auth,
            ui_state,
        } = collaborators;

        let documents = DocumentService::new(store.clone())
            .with_collection(config.documents_collection.clone());
        let access = AccessService::new(store.clone()).with_record(
            config.admins_collection.clone(),
            config.authorized_users_record.clone(),
        );
        let notice = NoticeService::new(store)
            .with_record(config.globals_collection.clone(), config.notice_record.clone());
        let viewer = ViewerService::new(documents.clone());
        let events = documents.subscribe_to_events();

        let all = documents.load_all().await.map_err(|e| {
            error!("Initial document load failed: {}", e);
            AppError::initialization(e.to_string())
        })?;
        let forest = ForestState::build(all);

        let auth_events = auth.subscribe();
        let user = auth.current_user().await;
        let role = match &user {
            Some(user) => access.role_for(&user.email).await,
            None => None,
        };
        let expanded = ExpandedState::load(ui_state.as_ref(), &config.expanded_state_key).await;

        info!(
            "Initialized with {} documents ({} roots, {} warnings)",
            forest.map().len(),
            forest.roots().len(),
            forest.warnings().len()
        );

        Ok(Self {
            config,
            documents,
            viewer,
            access,
            notice,
            auth,
            ui_state,
            events,
            auth_events,
            forest,
            needs_rebuild: false,
            session: Session { user, role },
            mode: ViewMode::default(),
            editor: EditorState::default(),
            expanded,
            picker: PickerState::default(),
        })
    }

    pub fn forest(&self) -> &ForestState {
        &self.forest
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn expanded(&self) -> &ExpandedState {
        &self.expanded
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Whether document changes are pending a rebuild that has not succeeded yet
    pub fn is_stale(&self) -> bool {
        self.needs_rebuild
    }

    /// Handle one UI action.
    ///
    /// Auth-state changes are applied first. After the handler runs, pending change
    /// events trigger a full rebuild, even when the handler itself failed part-way.
    /// A failed rebuild is logged and retried later; it never replaces the handler's
    /// own result.
    #[instrument(skip(self))]
    pub async fn dispatch(&mut self, command: Command) -> Result<Response, AppError> {
        self.sync_auth_state().await;
        self.refresh_or_defer().await;

        let result = match command {
            Command::SignIn => self.sign_in().await,
            Command::SignOut => self.sign_out().await,
            Command::ToggleMode => self.toggle_mode(),

            Command::GoHome => self.page(None).await,
            Command::Navigate { id } => self.page(Some(id.as_str())).await,
            Command::Search { term } => self.search(term).await,

            Command::ShowTree => Ok(self.tree()),
            Command::ToggleExpanded { id } => self.toggle_expanded(&id).await,
            Command::Drop {
                dragged_id,
                new_parent_id,
                source_parent_id,
            } => {
                self.drop_document(&dragged_id, &new_parent_id, source_parent_id.as_deref())
                    .await
            }

            Command::NewDocument => self.new_document(),
            Command::SelectDocument { id } => self.select_document(&id),
            Command::SaveDocument {
                title,
                contents,
                keywords,
            } => self.save_document(title, contents, keywords).await,
            Command::DeleteDocument { id } => self.delete_document(&id).await,
            Command::InsertHyperlink { text, url } => snippet::hyperlink(&text, &url)
                .map(|html| Response::Snippet { html })
                .map_err(|e| AppError::validation(e.to_string())),
            Command::InsertFilePath { path } => snippet::file_path(&path)
                .map(|html| Response::Snippet { html })
                .map_err(|e| AppError::validation(e.to_string())),

            Command::OpenParentPicker => {
                self.picker = PickerState::default();
                Ok(self.picker_view())
            }
            Command::FilterParentPicker { query } => {
                self.picker.query = query;
                Ok(self.picker_view())
            }
            Command::TogglePickerExpanded { id } => {
                self.picker.expanded.toggle(&id);
                Ok(self.picker_view())
            }
            Command::ConfirmParents { parent_ids } => self.confirm_parents(parent_ids),

            Command::LoadNotice => self.load_notice().await,
            Command::SaveNotice { content } => self.save_notice(content).await,

            Command::ListAdmins => self
                .access
                .list_users(self.session.role)
                .await
                .map(|users| Response::Admins { users })
                .map_err(|e| AppError::from_service("load the administrator list", e)),
            Command::AddAdmin { email, role } => self
                .access
                .add_user(self.session.role, &email, role)
                .await
                .map(|users| Response::Admins { users })
                .map_err(|e| AppError::from_service("add the administrator", e)),
            Command::UpdateAdminRole { email, role } => self
                .access
                .update_role(self.session.role, &email, role)
                .await
                .map(|users| Response::Admins { users })
                .map_err(|e| AppError::from_service("change the role", e)),
            Command::RemoveAdmin { email } => {
                let caller_email = self
                    .session
                    .user
                    .as_ref()
                    .map(|u| u.email.clone())
                    .unwrap_or_default();
                self.access
                    .remove_user(self.session.role, &caller_email, &email)
                    .await
                    .map(|users| Response::Admins { users })
                    .map_err(|e| AppError::from_service("remove the administrator", e))
            }
        };

        if let Err(e) = &result {
            match e {
                AppError::Validation(msg) => debug!("Command rejected: {}", msg),
                other => warn!("Command failed: {}", other),
            }
        }

        self.refresh_or_defer().await;
        result
    }

    /// Drain change events and rebuild the forest if any arrived or an earlier
    /// rebuild failed.
    ///
    /// Returns whether a rebuild happened. On error the previous forest is kept and
    /// the rebuild stays pending.
    pub async fn refresh(&mut self) -> Result<bool, AppError> {
        loop {
            match self.events.try_recv() {
                Ok(event) => {
                    debug!("{} {}", event.event_type(), event.document_id());
                    self.needs_rebuild = true;
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    debug!("Skipped {} change events", skipped);
                    self.needs_rebuild = true;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        if !self.needs_rebuild {
            return Ok(false);
        }

        let all = self
            .documents
            .load_all()
            .await
            .map_err(|e| AppError::from_service("reload the documents", e))?;
        self.forest.replace(all);
        self.needs_rebuild = false;
        debug!("Rebuilt forest with {} documents", self.forest.map().len());
        Ok(true)
    }

    async fn refresh_or_defer(&mut self) {
        if let Err(e) = self.refresh().await {
            warn!("Forest rebuild deferred: {}", e);
        }
    }

    /// Apply auth-state changes published since the last command
    async fn sync_auth_state(&mut self) {
        let mut latest = None;
        loop {
            match self.auth_events.try_recv() {
                Ok(user) => latest = Some(user),
                Err(TryRecvError::Lagged(skipped)) => {
                    debug!("Skipped {} auth events", skipped);
                    latest = Some(self.auth.current_user().await);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        if let Some(user) = latest {
            self.apply_auth_user(user).await;
        }
    }

    async fn apply_auth_user(&mut self, user: Option<AuthUser>) {
        let role = match &user {
            Some(user) => self.access.role_for(&user.email).await,
            None => None,
        };
        match &user {
            Some(user) => info!("Auth state changed to {}", user.label()),
            None => info!("Auth state changed: signed out"),
        }

        let previous_uid = self.session.user.as_ref().map(|u| &u.uid);
        if user.as_ref().map(|u| &u.uid) != previous_uid {
            self.editor = EditorState::default();
        }
        if role.is_none() {
            self.mode = ViewMode::Viewer;
        }
        self.session = Session { user, role };
    }

    fn require_role(&self, action: &str) -> Result<Role, AppError> {
        self.session.role.ok_or_else(|| {
            AppError::from_service(action, DocumentServiceError::permission_denied(action, "editor"))
        })
    }

    fn session_response(&self) -> Response {
        Response::Session {
            user: self.session.user.clone(),
            role: self.session.role,
            mode: self.mode,
        }
    }

    async fn sign_in(&mut self) -> Result<Response, AppError> {
        let user = self
            .auth
            .sign_in()
            .await
            .map_err(|e| AppError::from_service("sign in", e))?;
        let role = self.access.role_for(&user.email).await;
        if role.is_none() {
            info!("{} signed in without a role", user.email);
        }
        self.session = Session {
            user: Some(user),
            role,
        };
        Ok(self.session_response())
    }

    async fn sign_out(&mut self) -> Result<Response, AppError> {
        self.auth
            .sign_out()
            .await
            .map_err(|e| AppError::from_service("sign out", e))?;
        self.session = Session::default();
        self.mode = ViewMode::Viewer;
        self.editor = EditorState::default();
        Ok(self.session_response())
    }

    fn toggle_mode(&mut self) -> Result<Response, AppError> {
        self.mode = match self.mode {
            ViewMode::Viewer => {
                self.require_role("enter admin mode")?;
                ViewMode::Admin
            }
            ViewMode::Admin => ViewMode::Viewer,
        };
        Ok(self.session_response())
    }

    async fn page(&self, id: Option<&str>) -> Result<Response, AppError> {
        self.viewer
            .navigate(&self.forest, id)
            .await
            .map(|page| Response::Page { page })
            .map_err(|e| AppError::from_service("load the page", e))
    }

    async fn search(&self, term: String) -> Result<Response, AppError> {
        let hits = self
            .viewer
            .search(&term)
            .await
            .map_err(|e| AppError::from_service("search", e))?;
        Ok(Response::SearchResults { term, hits })
    }

    fn tree(&self) -> Response {
        let (rows, walk_warnings) = flatten(&self.forest);
        let items = render(&rows, RenderOptions::inline(&self.expanded));
        let warnings: Vec<IntegrityWarning> = self
            .forest
            .warnings()
            .iter()
            .cloned()
            .chain(walk_warnings)
            .collect();
        Response::Tree { items, warnings }
    }

    async fn toggle_expanded(&mut self, id: &str) -> Result<Response, AppError> {
        self.expanded.toggle(id);
        self.expanded
            .save(self.ui_state.as_ref(), &self.config.expanded_state_key)
            .await;
        Ok(self.tree())
    }

    async fn drop_document(
        &mut self,
        dragged_id: &str,
        new_parent_id: &str,
        source_parent_id: Option<&str>,
    ) -> Result<Response, AppError> {
        self.require_role("move documents")?;
        if self.needs_rebuild {
            // Cycle checks need the current parent links
            return Err(AppError::from_service(
                "move the document",
                StoreError::unavailable("document list is out of date").into(),
            ));
        }
        let plan = self
            .documents
            .reparent(&self.forest, dragged_id, new_parent_id, source_parent_id)
            .await
            .map_err(|e| AppError::from_service("move the document", e))?;

        let parent_ids = match plan {
            ReparentPlan::Unchanged => None,
            ReparentPlan::Update(ids) => Some(ids),
        };
        Ok(Response::Reparented {
            id: dragged_id.to_string(),
            parent_ids,
        })
    }

    fn editor_view(&self) -> Response {
        let document = self
            .editor
            .editing_id
            .as_deref()
            .and_then(|id| self.forest.document(id))
            .cloned();
        let parents = self
            .forest
            .parent_labels(&self.editor.parent_ids)
            .into_iter()
            .map(|(id, title)| ParentLabel { id, title })
            .collect();
        Response::Editor {
            editing_id: self.editor.editing_id.clone(),
            document,
            parents,
        }
    }

    fn new_document(&mut self) -> Result<Response, AppError> {
        self.editor = EditorState::default();
        Ok(self.editor_view())
    }

    fn select_document(&mut self, id: &str) -> Result<Response, AppError> {
        let document = self.forest.document(id).ok_or_else(|| {
            AppError::from_service("open the document", DocumentServiceError::document_not_found(id))
        })?;
        self.editor = EditorState {
            editing_id: Some(id.to_string()),
            parent_ids: document.parent_ids.clone(),
        };
        Ok(self.editor_view())
    }

    async fn save_document(
        &mut self,
        title: String,
        contents: String,
        keywords: Vec<String>,
    ) -> Result<Response, AppError> {
        self.require_role("save documents")?;
        let draft = DocumentDraft::new(title)
            .with_contents(contents)
            .with_keywords(keywords)
            .with_parents(self.editor.parent_ids.clone());

        let id = self
            .documents
            .save(self.editor.editing_id.as_deref(), draft)
            .await
            .map_err(|e| AppError::from_service("save the document", e))?;
        self.editor.editing_id = Some(id.clone());
        Ok(Response::Saved { id })
    }

    async fn delete_document(&mut self, id: &str) -> Result<Response, AppError> {
        self.require_role("delete documents")?;
        self.documents
            .delete(id)
            .await
            .map_err(|e| AppError::from_service("delete the document", e))?;
        if self.editor.editing_id.as_deref() == Some(id) {
            self.editor = EditorState::default();
        }
        Ok(Response::Deleted { id: id.to_string() })
    }

    fn picker_view(&self) -> Response {
        let query = self.picker.query.trim();
        let editing_id = self.editor.editing_id.as_deref();

        let items = if query.is_empty() {
            let (rows, _) = flatten(&self.forest);
            render(
                &rows,
                RenderOptions::picker(&self.picker.expanded, &self.editor.parent_ids, editing_id),
            )
        } else {
            // Every surviving branch is shown open so matches are visible
            let (rows, _) = filter(&self.forest, query);
            let open: ExpandedState = rows.iter().map(|row| row.id.clone()).collect();
            render(
                &rows,
                RenderOptions::picker(&open, &self.editor.parent_ids, editing_id),
            )
        };

        Response::Picker {
            query: self.picker.query.clone(),
            items,
        }
    }

    fn confirm_parents(&mut self, parent_ids: Vec<String>) -> Result<Response, AppError> {
        if let Some(editing_id) = &self.editor.editing_id {
            if parent_ids.contains(editing_id) {
                return Err(AppError::validation(
                    ValidationError::SelfParent(editing_id.clone()).to_string(),
                ));
            }
        }

        let mut unique = Vec::with_capacity(parent_ids.len());
        for id in parent_ids {
            if !unique.contains(&id) {
                unique.push(id);
            }
        }
        self.editor.parent_ids = unique;
        Ok(self.editor_view())
    }

    async fn load_notice(&self) -> Result<Response, AppError> {
        self.notice
            .load()
            .await
            .map(|content| Response::Notice { content })
            .map_err(|e| AppError::from_service("load the notice", e))
    }

    async fn save_notice(&self, content: String) -> Result<Response, AppError> {
        self.notice
            .save(self.session.role, &content)
            .await
            .map_err(|e| AppError::from_service("save the notice", e))?;
        Ok(Response::Notice {
            content: Some(content),
        })
    }
}
