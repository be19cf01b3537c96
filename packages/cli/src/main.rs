mod admin;
mod cli;
mod context;
mod pages;
mod render;

use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser;
use console::style;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use client::Tab;
use common::config::ClientAppConfig;

use cli::{Cli, Command};
use context::App;

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e:#}", style("error:").red().bold());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => ClientAppConfig::load_from(path),
        None => ClientAppConfig::load(),
    }
    .context("Failed to load config")?;

    let mut app = App::start(&config).await?;
    let result = dispatch(&mut app, cli.command, cli.hackathon.as_deref()).await;

    // The stale token is never retried; sign in again for the next run.
    if result.is_err() && app.session.login_required() {
        warn!("Backend rejected the session token");
        match app.session.login().await {
            Ok(user) => eprintln!(
                "{} signed in again as {}, re-run the command",
                style("note:").yellow().bold(),
                user.username
            ),
            Err(e) => warn!("Re-login failed: {e}"),
        }
    }
    result
}

async fn dispatch(app: &mut App, command: Command, hackathon: Option<&str>) -> anyhow::Result<()> {
    match command {
        Command::Whoami => pages::whoami(app),
        Command::Tabs => pages::tabs(app),
        Command::Hackathons => pages::hackathons(app),
        Command::Challenges => {
            app.open(Tab::Challenges, hackathon).await?;
            pages::challenges(app)
        }
        Command::Download { task, index, out } => {
            app.open(Tab::Challenges, hackathon).await?;
            pages::download(app, &task, index, out).await
        }
        Command::Leaderboard { task } => {
            app.open(Tab::Leaderboard, hackathon).await?;
            pages::leaderboard(app, task.as_deref()).await
        }
        Command::Submissions => {
            app.open(Tab::Submissions, hackathon).await?;
            pages::submissions(app).await
        }
        Command::Submit { task, file } => {
            app.open(Tab::Submissions, hackathon).await?;
            pages::submit(app, &task, file).await
        }
        Command::Review { task } => {
            app.open(Tab::Judge, hackathon).await?;
            pages::review(app, task.as_deref()).await
        }
        Command::Score { solution, score } => {
            app.open(Tab::Judge, hackathon).await?;
            pages::score(app, &solution, score).await
        }
        Command::Admin { command } => {
            app.open(Tab::Admin, hackathon).await?;
            admin::run(app, command).await
        }
        Command::Logout => {
            app.session.logout().await.context("Logout failed")?;
            render::success("Signed out");
            Ok(())
        }
    }
}
