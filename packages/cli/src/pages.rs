use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use console::style;
use tracing::info;

use client::UploadFile;
use client::router::visible_tabs;
use common::{ScoreOverride, Solution, Task};

use crate::context::App;
use crate::render;

pub fn whoami(app: &App) -> Result<()> {
    let user = app.user()?;
    println!("{} ({})", style(&user.username).bold(), user.id);
    println!("  email: {}", user.email);
    println!("  role:  {}", user.role);
    println!("  team:  {}", user.team_label());
    Ok(())
}

pub fn tabs(app: &App) -> Result<()> {
    let role = app.user()?.role;
    render::heading(&format!("Tabs for {role}"));
    for tab in visible_tabs(role) {
        println!("  {:<12} {}", tab.id(), tab.label());
    }
    Ok(())
}

pub fn hackathons(app: &App) -> Result<()> {
    let user = app.user()?;
    render::heading("Hackathons");
    let mine = app.gate.my_hackathons();
    if user.role.is_participant() && mine.is_empty() {
        render::empty("You are not a member of any hackathon yet");
    }
    for hackathon in mine {
        println!(
            "  {} {}  {}",
            style(&hackathon.id).dim(),
            style(&hackathon.name).bold(),
            render::optional(hackathon.date.as_deref())
        );
    }
    if !user.role.is_participant() {
        render::empty("Admins and judges work across all hackathons");
    }
    Ok(())
}

/// The task if it exists and the current scope may see it.
fn visible_task(app: &App, task_id: &str) -> Result<Task> {
    match app.cache.task(task_id) {
        Some(task) if app.gate.is_task_visible(task_id) => Ok(task),
        _ => bail!("Challenge '{task_id}' not found"),
    }
}

pub fn challenges(app: &App) -> Result<()> {
    let tasks = app.gate.visible_tasks(app.cache.all_tasks());
    match app.gate.selected_hackathon() {
        Some(h) => render::heading(&format!("Challenges in {}", h.name)),
        None => render::heading("Challenges"),
    }
    if tasks.is_empty() {
        render::empty("No challenges yet");
    }

    for task in tasks {
        println!();
        println!("{} {}", style(&task.name).bold().cyan(), style(&task.id).dim());
        if let Some(description) = task.description.as_deref().filter(|d| !d.is_empty()) {
            println!("  {description}");
        }
        for (index, file) in task.files.iter().enumerate() {
            println!(
                "  [{index}] {} {}",
                file.file_name,
                style(render::optional(file.content_type.as_deref())).dim()
            );
        }
    }
    Ok(())
}

pub async fn leaderboard(app: &App, task: Option<&str>) -> Result<()> {
    let tasks = match task {
        Some(id) => vec![visible_task(app, id)?],
        None => app.gate.visible_tasks(app.cache.all_tasks()),
    };
    if tasks.is_empty() {
        render::empty("No challenges yet");
    }

    for task in tasks {
        let entries = app
            .api
            .get_leaderboard(&task.id)
            .await
            .with_context(|| format!("Failed to load leaderboard for '{}'", task.name))?;

        println!();
        render::heading(&task.name);
        if entries.is_empty() {
            render::empty("No scores yet");
        }
        for (rank, entry) in render::rank(entries).into_iter().enumerate() {
            println!(
                "  {:>3}. {:<24} {:>6}  {}",
                rank + 1,
                app.cache.user_name(&entry.user_id),
                entry.best_score,
                style(render::timestamp(entry.best_score_timestamp)).dim()
            );
        }
    }
    Ok(())
}

pub async fn submissions(app: &App) -> Result<()> {
    let user = app.user()?;
    let history = app
        .api
        .get_submission_history(&user.id)
        .await
        .context("Failed to load submission history")?;

    render::heading("My Submissions");
    let mut shown = 0;
    for (task_id, solutions) in &history {
        if !app.gate.is_task_visible(task_id) {
            continue;
        }
        shown += 1;
        println!();
        println!("{}", style(app.cache.task_name(task_id)).bold());
        for solution in solutions {
            println!(
                "  {} score {:>6}  {}",
                style(&solution.id).dim(),
                solution.score,
                render::timestamp(solution.submitted_at)
            );
        }
    }
    if shown == 0 {
        render::empty("No submissions in this hackathon yet");
    }
    Ok(())
}

pub async fn submit(app: &App, task_id: &str, file: PathBuf) -> Result<()> {
    let user = app.user()?;
    let task = visible_task(app, task_id)?;
    let upload = UploadFile::from_path(&file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let solution = app
        .api
        .submit_solution(&user.id, &task.id, upload)
        .await
        .context("Submission failed")?;
    info!(solution = %solution.id, task = %task.id, "Solution submitted");
    app.refresh_cache().await;

    render::success(&format!(
        "Submitted to {}: score {}",
        task.name, solution.score
    ));
    Ok(())
}

pub async fn download(app: &App, task_id: &str, index: usize, out: Option<PathBuf>) -> Result<()> {
    let task = visible_task(app, task_id)?;
    let Some(file) = task.files.get(index) else {
        bail!("Challenge '{}' has no file at index {index}", task.name);
    };

    let path = match out {
        Some(path) => path,
        None => local_file_name(&file.file_name)?,
    };

    let bytes = app
        .api
        .download_task_file(&task.id, index)
        .await
        .with_context(|| format!("Failed to download {}", file.file_name))?;
    tokio::fs::write(&path, &bytes)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    render::success(&format!("Saved {} bytes to {}", bytes.len(), path.display()));
    Ok(())
}

/// Where to save a file whose name came from the backend. Only the final
/// path component is kept; names that are empty, hidden or traversal are
/// refused.
fn local_file_name(name: &str) -> Result<PathBuf> {
    let trimmed = name.trim();
    if trimmed.chars().any(|c| c.is_ascii_control()) {
        bail!("Refusing to save {trimmed:?}: control characters in file name");
    }

    let base = trimmed.rsplit(['/', '\\']).next().unwrap_or_default();
    match Path::new(base).file_name() {
        Some(file) if file == base && !base.starts_with('.') => Ok(PathBuf::from(file)),
        _ => bail!("Refusing to save {trimmed:?}: not a plain file name, pass --out"),
    }
}

pub(crate) fn print_solutions(app: &App, solutions: &[Solution]) {
    if solutions.is_empty() {
        render::empty("No submissions");
    }
    for solution in solutions {
        println!(
            "  {} {:<20} {:<20} {:>6}  {}",
            style(&solution.id).dim(),
            app.cache.user_name(&solution.user_id),
            app.cache.task_name(&solution.task_id),
            solution.score,
            render::timestamp(solution.submitted_at)
        );
    }
}

pub async fn review(app: &App, task: Option<&str>) -> Result<()> {
    let solutions = match task {
        Some(id) => app.api.get_solutions_for_task(id).await,
        None => app.api.get_all_solutions().await,
    }
    .context("Failed to load submissions")?;

    render::heading("Review");
    print_solutions(app, &solutions);
    Ok(())
}

pub async fn score(app: &App, solution_id: &str, new_score: i32) -> Result<()> {
    let solutions = app
        .api
        .get_all_solutions()
        .await
        .context("Failed to load submissions")?;
    let Some(solution) = solutions.iter().find(|s| s.id == solution_id) else {
        bail!("Submission '{solution_id}' not found");
    };

    app.api
        .override_score(&ScoreOverride::for_solution(solution, new_score))
        .await
        .context("Score override failed")?;
    app.refresh_cache().await;

    render::success(&format!(
        "Score for {} on {} set to {new_score} (was {})",
        app.cache.user_name(&solution.user_id),
        app.cache.task_name(&solution.task_id),
        solution.score
    ));
    Ok(())
}
