//! Authorization record model
//!
//! Access is granted by a single record (`admins/authorized_users`) whose `users`
//! field maps an email address to a role string. The older allow-list shape (a plain
//! array of emails) is not supported: it has no role distinction.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// Field of the authorization record holding the email → role map
pub const USERS_FIELD: &str = "users";

/// Role granted to an authenticated user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// May create, edit, move and delete documents
    Editor,
    /// Editor rights plus notice editing and admin management
    Owner,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Editor => "editor",
            Role::Owner => "owner",
        }
    }

    pub fn is_owner(&self) -> bool {
        matches!(self, Role::Owner)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "editor" => Ok(Role::Editor),
            "owner" => Ok(Role::Owner),
            other => Err(ValidationError::InvalidRole(other.to_string())),
        }
    }
}

/// Email → role map, kept sorted so listings are stable
pub type AuthorizedUsers = BTreeMap<String, Role>;
