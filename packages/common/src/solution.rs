use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::task::TaskFile;

/// A participant's submission for a task.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    pub id: String,
    pub user_id: String,
    pub task_id: String,
    #[serde(default)]
    pub file: Option<TaskFile>,
    #[serde(default)]
    pub score: i32,
    #[serde(default, rename = "submissionTimestamp")]
    pub submitted_at: Option<DateTime<Utc>>,
}

/// Solutions of one user grouped by task ID.
pub type SubmissionHistory = BTreeMap<String, Vec<Solution>>;

/// Manual score override issued by a judge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreOverride {
    pub solution_id: String,
    pub user_id: String,
    pub task_id: String,
    pub new_score: i32,
}

impl ScoreOverride {
    pub fn for_solution(solution: &Solution, new_score: i32) -> Self {
        Self {
            solution_id: solution.id.clone(),
            user_id: solution.user_id.clone(),
            task_id: solution.task_id.clone(),
            new_score,
        }
    }
}
