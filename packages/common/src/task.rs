use serde::{Deserialize, Serialize};

/// Metadata of a file attached to a task. The payload itself is only
/// available through the download endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFile {
    pub file_name: String,
    #[serde(default)]
    pub content_type: Option<String>,
}

/// A challenge participants submit solutions against.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Dataset files, in the order the download endpoint indexes them.
    #[serde(default)]
    pub files: Vec<TaskFile>,
    /// Reference solution used for automated scoring.
    #[serde(default, rename = "taskFile")]
    pub solution_file: Option<TaskFile>,
}

/// Editable task fields. Sent as JSON on update and as the `task` part of
/// the multipart create request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TaskDetails {
    pub name: String,
    pub description: String,
}
