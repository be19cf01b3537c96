use serde::{Deserialize, Serialize};

/// A named grouping of tasks and users.
///
/// Associations are many-to-many: a task or user may belong to any number
/// of hackathons.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hackathon {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    /// Associated task IDs.
    #[serde(default)]
    pub tasks: Vec<String>,
    /// Associated user IDs.
    #[serde(default)]
    pub users: Vec<String>,
}

impl Hackathon {
    pub fn has_member(&self, user_id: &str) -> bool {
        self.users.iter().any(|id| id == user_id)
    }

    pub fn has_task(&self, task_id: &str) -> bool {
        self.tasks.iter().any(|id| id == task_id)
    }
}

/// Body of the create and update endpoints. Associations are managed
/// through their own endpoints, never through this payload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct HackathonRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}
