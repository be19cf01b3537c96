use serde::{Deserialize, Serialize};

use crate::role::Role;

/// A platform account as returned by `/api/users`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub team_name: Option<String>,
}

impl User {
    /// Team label shown next to the username.
    pub fn team_label(&self) -> &str {
        self.team_name.as_deref().unwrap_or("No team")
    }
}

/// Lightweight `(id, username)` pair held by the lookup cache.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    pub id: String,
    pub username: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_name: Option<String>,
    pub password: String,
}

/// Only role and team are mutable once an account exists.
#[derive(Clone, Debug, Default, Serialize)]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_name: Option<String>,
}
