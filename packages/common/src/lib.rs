pub mod config;
pub mod hackathon;
pub mod leaderboard;
pub mod role;
pub mod solution;
pub mod task;
pub mod user;

pub use hackathon::{Hackathon, HackathonRequest};
pub use leaderboard::LeaderboardEntry;
pub use role::Role;
pub use solution::{ScoreOverride, Solution, SubmissionHistory};
pub use task::{Task, TaskDetails, TaskFile};
pub use user::{CreateUserRequest, UpdateUserRequest, User, UserSummary};
