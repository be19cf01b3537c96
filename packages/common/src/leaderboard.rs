use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Best score of one user on one task.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    #[serde(default)]
    pub id: Option<String>,
    pub user_id: String,
    pub task_id: String,
    pub best_score: i32,
    #[serde(default)]
    pub best_score_timestamp: Option<DateTime<Utc>>,
}
