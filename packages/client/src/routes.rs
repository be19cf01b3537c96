//! Backend REST paths, relative to the configured API origin.

use common::Role;

pub const CURRENT_USER: &str = "/api/users/current";
pub const USERS: &str = "/api/users";

pub fn user(id: &str) -> String {
    format!("/api/users/{id}")
}

pub fn users_by_role(role: Role) -> String {
    format!("/api/users/role/{role}")
}

pub fn user_history(id: &str) -> String {
    format!("/api/users/{id}/history")
}

pub const TASKS: &str = "/api/tasks";

pub fn task(id: &str) -> String {
    format!("/api/tasks/{id}")
}

pub fn task_files(id: &str) -> String {
    format!("/api/tasks/{id}/files")
}

pub fn task_file(id: &str, index: usize) -> String {
    format!("/api/tasks/{id}/files/{index}")
}

pub fn task_file_remove(id: &str, index: usize) -> String {
    format!("/api/tasks/{id}/files/{index}/remove")
}

pub fn task_solution(id: &str) -> String {
    format!("/api/tasks/{id}/solution")
}

pub const SOLUTIONS: &str = "/api/solutions";
pub const SUBMIT_SOLUTION: &str = "/api/solutions/submit";
pub const JUDGE_SCORE: &str = "/api/judge/score";

pub fn solution(id: &str) -> String {
    format!("/api/solutions/{id}")
}

pub fn user_solutions(user_id: &str) -> String {
    format!("/api/solutions/user/{user_id}")
}

pub fn task_solutions(task_id: &str) -> String {
    format!("/api/solutions/task/{task_id}")
}

pub fn leaderboard(task_id: &str) -> String {
    format!("/api/leaderboard/{task_id}")
}

pub const HACKATHONS: &str = "/api/hackathons";

pub fn hackathon(id: &str) -> String {
    format!("/api/hackathons/{id}")
}

pub fn hackathon_task(id: &str, task_id: &str) -> String {
    format!("/api/hackathons/{id}/tasks/{task_id}")
}

pub fn hackathon_user(id: &str, user_id: &str) -> String {
    format!("/api/hackathons/{id}/users/{user_id}")
}
