use std::path::PathBuf;

use clap::{Parser, Subcommand};

use common::Role;

#[derive(Parser)]
#[command(name = "hackathon", version)]
#[command(about = "Terminal client for the hackathon platform")]
pub struct Cli {
    /// Config file path, extension optional.
    #[arg(long, global = true, env = "HACKATHON_CONFIG")]
    pub config: Option<String>,

    /// Hackathon to work in. Participants are prompted when omitted.
    #[arg(long, global = true, env = "HACKATHON_ID")]
    pub hackathon: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the signed-in user.
    Whoami,
    /// List the tabs available to your role.
    Tabs,
    /// List the hackathons you can work in.
    Hackathons,
    /// Browse challenges and their dataset files.
    Challenges,
    /// Show best scores per challenge.
    Leaderboard {
        /// Limit to one challenge.
        #[arg(long)]
        task: Option<String>,
    },
    /// Show your submission history.
    Submissions,
    /// Submit a solution file for a challenge.
    Submit { task: String, file: PathBuf },
    /// Download a challenge dataset file.
    Download {
        task: String,
        index: usize,
        /// Destination path. Defaults to the file's own name in the current
        /// directory.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// List submissions for review.
    Review {
        #[arg(long)]
        task: Option<String>,
    },
    /// Override the score of a submission.
    Score { solution: String, score: i32 },
    /// Manage users, challenges, hackathons and submissions.
    Admin {
        #[command(subcommand)]
        command: AdminCommand,
    },
    /// End the identity provider session.
    Logout,
}

#[derive(Subcommand)]
pub enum AdminCommand {
    Users {
        #[command(subcommand)]
        command: UserCommand,
    },
    Tasks {
        #[command(subcommand)]
        command: TaskCommand,
    },
    Hackathons {
        #[command(subcommand)]
        command: HackathonCommand,
    },
    Solutions {
        #[command(subcommand)]
        command: SolutionCommand,
    },
}

#[derive(Subcommand)]
pub enum UserCommand {
    List {
        #[arg(long)]
        role: Option<Role>,
    },
    Create {
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value_t = Role::Participant)]
        role: Role,
        #[arg(long)]
        team: Option<String>,
    },
    Update {
        id: String,
        #[arg(long)]
        role: Option<Role>,
        #[arg(long)]
        team: Option<String>,
    },
    Delete {
        id: String,
    },
    /// Submission history grouped by challenge.
    History {
        id: String,
    },
}

#[derive(Subcommand)]
pub enum TaskCommand {
    List,
    Create {
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Dataset file to attach. Repeatable.
        #[arg(long = "file")]
        files: Vec<PathBuf>,
    },
    /// Change name or description. Omitted fields keep their value.
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    AddFiles {
        id: String,
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Replace the reference solution used for scoring.
    SetSolution {
        id: String,
        file: PathBuf,
    },
    RemoveFile {
        id: String,
        index: usize,
    },
    Delete {
        id: String,
    },
}

#[derive(Subcommand)]
pub enum HackathonCommand {
    List,
    Create {
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        date: Option<String>,
    },
    Update {
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        date: Option<String>,
    },
    Delete {
        id: String,
    },
    AddTask {
        id: String,
        task: String,
    },
    RemoveTask {
        id: String,
        task: String,
    },
    AddUser {
        id: String,
        user: String,
    },
    RemoveUser {
        id: String,
        user: String,
    },
}

#[derive(Subcommand)]
pub enum SolutionCommand {
    List {
        #[arg(long, conflicts_with = "task")]
        user: Option<String>,
        #[arg(long)]
        task: Option<String>,
    },
    Delete {
        id: String,
    },
}
