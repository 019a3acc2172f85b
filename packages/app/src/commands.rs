//! UI commands and responses
//!
//! Every user action the front end can raise is one `Command` variant. Commands
//! arrive as JSON of the form `{"action": "...", "params": {...}}` and are handled by
//! `AppController::dispatch`, which answers with a `Response`.

use helpdocs_core::forest::IntegrityWarning;
use helpdocs_core::models::{AuthorizedUsers, Document, Role};
use helpdocs_core::presentation::TreeItem;
use helpdocs_core::services::{AuthUser, SearchHit, ViewerPage};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, CommandError};

/// Which half of the application is showing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ViewMode {
    /// Read-only breadcrumb viewer
    #[default]
    Viewer,
    /// Tree editor; requires a role
    Admin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "params", rename_all = "camelCase")]
pub enum Command {
    // Session
    SignIn,
    SignOut,
    ToggleMode,

    // Viewer
    GoHome,
    Navigate {
        id: String,
    },
    Search {
        term: String,
    },

    // Tree
    ShowTree,
    ToggleExpanded {
        id: String,
    },
    #[serde(rename_all = "camelCase")]
    Drop {
        dragged_id: String,
        new_parent_id: String,
        #[serde(default)]
        source_parent_id: Option<String>,
    },

    // Editor
    NewDocument,
    SelectDocument {
        id: String,
    },
    SaveDocument {
        title: String,
        #[serde(default)]
        contents: String,
        #[serde(default)]
        keywords: Vec<String>,
    },
    DeleteDocument {
        id: String,
    },
    InsertHyperlink {
        text: String,
        url: String,
    },
    InsertFilePath {
        path: String,
    },

    // Parent picker
    OpenParentPicker,
    FilterParentPicker {
        query: String,
    },
    TogglePickerExpanded {
        id: String,
    },
    #[serde(rename_all = "camelCase")]
    ConfirmParents {
        parent_ids: Vec<String>,
    },

    // Notice
    LoadNotice,
    SaveNotice {
        content: String,
    },

    // Administrators
    ListAdmins,
    AddAdmin {
        email: String,
        role: Role,
    },
    UpdateAdminRole {
        email: String,
        role: Role,
    },
    RemoveAdmin {
        email: String,
    },
}

/// A parent shown in the editor as `(id, title)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParentLabel {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Response {
    #[serde(rename_all = "camelCase")]
    Session {
        user: Option<AuthUser>,
        role: Option<Role>,
        mode: ViewMode,
    },

    Page {
        page: ViewerPage,
    },

    SearchResults {
        term: String,
        hits: Vec<SearchHit>,
    },

    Tree {
        items: Vec<TreeItem>,
        warnings: Vec<IntegrityWarning>,
    },

    #[serde(rename_all = "camelCase")]
    Editor {
        editing_id: Option<String>,
        document: Option<Document>,
        parents: Vec<ParentLabel>,
    },

    Picker {
        query: String,
        items: Vec<TreeItem>,
    },

    Saved {
        id: String,
    },

    Deleted {
        id: String,
    },

    /// `parent_ids` is `None` when the drop changed nothing
    #[serde(rename_all = "camelCase")]
    Reparented {
        id: String,
        parent_ids: Option<Vec<String>>,
    },

    Snippet {
        html: String,
    },

    Notice {
        content: Option<String>,
    },

    Admins {
        users: AuthorizedUsers,
    },

    /// Startup failed; the UI shows only this message
    Fatal {
        error: CommandError,
    },
}

impl Response {
    pub fn fatal(err: &AppError) -> Self {
        Response::Fatal {
            error: CommandError::from(err),
        }
    }
}
