use std::path::PathBuf;

use anyhow::{Context, Result};
use console::style;

use client::UploadFile;
use common::{CreateUserRequest, Hackathon, HackathonRequest, TaskDetails, UpdateUserRequest};

use crate::cli::{AdminCommand, HackathonCommand, SolutionCommand, TaskCommand, UserCommand};
use crate::context::App;
use crate::pages::print_solutions;
use crate::render;

pub async fn run(app: &App, command: AdminCommand) -> Result<()> {
    match command {
        AdminCommand::Users { command } => users(app, command).await,
        AdminCommand::Tasks { command } => tasks(app, command).await,
        AdminCommand::Hackathons { command } => hackathons(app, command).await,
        AdminCommand::Solutions { command } => solutions(app, command).await,
    }
}

async fn read_uploads(paths: &[PathBuf]) -> Result<Vec<UploadFile>> {
    let mut uploads = Vec::with_capacity(paths.len());
    for path in paths {
        let upload = UploadFile::from_path(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        uploads.push(upload);
    }
    Ok(uploads)
}

async fn users(app: &App, command: UserCommand) -> Result<()> {
    match command {
        UserCommand::List { role } => {
            let users = match role {
                Some(role) => app.api.get_users_by_role(role).await,
                None => app.api.get_users().await,
            }
            .context("Failed to load users")?;

            render::heading("Users");
            for user in users {
                println!(
                    "  {} {:<20} {:<12} {:<28} {}",
                    style(&user.id).dim(),
                    user.username,
                    user.role,
                    user.email,
                    user.team_label()
                );
            }
        }
        UserCommand::Create {
            username,
            email,
            password,
            role,
            team,
        } => {
            let user = app
                .api
                .create_user(&CreateUserRequest {
                    username,
                    email,
                    role,
                    team_name: team,
                    password,
                })
                .await
                .context("Failed to create user")?;
            app.refresh_cache().await;
            render::success(&format!("Created user {} ({})", user.username, user.id));
        }
        UserCommand::Update { id, role, team } => {
            let user = app
                .api
                .update_user(
                    &id,
                    &UpdateUserRequest {
                        role,
                        team_name: team,
                    },
                )
                .await
                .context("Failed to update user")?;
            app.refresh_cache().await;
            render::success(&format!(
                "Updated {}: {} / {}",
                user.username,
                user.role,
                user.team_label()
            ));
        }
        UserCommand::Delete { id } => {
            let name = app.cache.user_name(&id);
            app.api
                .delete_user(&id)
                .await
                .context("Failed to delete user")?;
            app.refresh_cache().await;
            render::success(&format!("Deleted user {name}"));
        }
        UserCommand::History { id } => {
            let history = app
                .api
                .get_submission_history(&id)
                .await
                .context("Failed to load submission history")?;

            render::heading(&format!("Submissions by {}", app.cache.user_name(&id)));
            if history.is_empty() {
                render::empty("No submissions");
            }
            for solutions in history.values() {
                print_solutions(app, solutions);
            }
        }
    }
    Ok(())
}

async fn tasks(app: &App, command: TaskCommand) -> Result<()> {
    match command {
        TaskCommand::List => {
            render::heading("Challenges");
            for task in app.cache.all_tasks() {
                let solution = task
                    .solution_file
                    .as_ref()
                    .map(|f| f.file_name.as_str());
                println!(
                    "  {} {:<24} {} file(s), solution: {}",
                    style(&task.id).dim(),
                    task.name,
                    task.files.len(),
                    render::optional(solution)
                );
            }
        }
        TaskCommand::Create {
            name,
            description,
            files,
        } => {
            let uploads = read_uploads(&files).await?;
            let task = app
                .api
                .create_task(&TaskDetails { name, description }, uploads)
                .await
                .context("Failed to create challenge")?;
            app.refresh_cache().await;
            render::success(&format!(
                "Created challenge {} ({}) with {} file(s)",
                task.name,
                task.id,
                task.files.len()
            ));
        }
        TaskCommand::Update {
            id,
            name,
            description,
        } => {
            let current = app
                .api
                .get_task(&id)
                .await
                .context("Failed to load challenge")?;
            let details = TaskDetails {
                name: name.unwrap_or(current.name),
                description: description.or(current.description).unwrap_or_default(),
            };
            let task = app
                .api
                .update_task_details(&id, &details)
                .await
                .context("Failed to update challenge")?;
            app.refresh_cache().await;
            render::success(&format!("Updated challenge {}", task.name));
        }
        TaskCommand::AddFiles { id, files } => {
            let uploads = read_uploads(&files).await?;
            let task = app
                .api
                .add_files_to_task(&id, uploads)
                .await
                .context("Failed to add files")?;
            app.refresh_cache().await;
            render::success(&format!("{} now has {} file(s)", task.name, task.files.len()));
        }
        TaskCommand::SetSolution { id, file } => {
            let upload = UploadFile::from_path(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let task = app
                .api
                .set_task_solution(&id, upload)
                .await
                .context("Failed to set reference solution")?;
            app.refresh_cache().await;
            render::success(&format!("Reference solution set for {}", task.name));
        }
        TaskCommand::RemoveFile { id, index } => {
            let task = app
                .api
                .remove_file_from_task(&id, index)
                .await
                .context("Failed to remove file")?;
            app.refresh_cache().await;
            render::success(&format!("{} now has {} file(s)", task.name, task.files.len()));
        }
        TaskCommand::Delete { id } => {
            let name = app.cache.task_name(&id);
            app.api
                .delete_task(&id)
                .await
                .context("Failed to delete challenge")?;
            app.refresh_cache().await;
            render::success(&format!("Deleted challenge {name}"));
        }
    }
    Ok(())
}

fn print_hackathon(app: &App, hackathon: &Hackathon) {
    println!(
        "{} {}  {}",
        style(&hackathon.name).bold().cyan(),
        style(&hackathon.id).dim(),
        render::optional(hackathon.date.as_deref())
    );
    if let Some(description) = hackathon.description.as_deref().filter(|d| !d.is_empty()) {
        println!("  {description}");
    }
    let tasks: Vec<String> = hackathon.tasks.iter().map(|id| app.cache.task_name(id)).collect();
    let users: Vec<String> = hackathon.users.iter().map(|id| app.cache.user_name(id)).collect();
    println!("  challenges: {}", render::optional(Some(&tasks.join(", "))));
    println!("  members:    {}", render::optional(Some(&users.join(", "))));
}

async fn hackathons(app: &App, command: HackathonCommand) -> Result<()> {
    let updated = match command {
        HackathonCommand::List => {
            let hackathons = app
                .api
                .get_hackathons()
                .await
                .context("Failed to load hackathons")?;
            render::heading("Hackathons");
            for hackathon in &hackathons {
                println!();
                print_hackathon(app, hackathon);
            }
            return Ok(());
        }
        HackathonCommand::Create {
            name,
            description,
            date,
        } => app
            .api
            .create_hackathon(&HackathonRequest {
                name,
                description,
                date,
            })
            .await
            .context("Failed to create hackathon")?,
        HackathonCommand::Update {
            id,
            name,
            description,
            date,
        } => app
            .api
            .update_hackathon(
                &id,
                &HackathonRequest {
                    name,
                    description,
                    date,
                },
            )
            .await
            .context("Failed to update hackathon")?,
        HackathonCommand::Delete { id } => {
            let name = app.cache.hackathon_name(&id);
            app.api
                .delete_hackathon(&id)
                .await
                .context("Failed to delete hackathon")?;
            app.refresh_cache().await;
            render::success(&format!("Deleted hackathon {name}"));
            return Ok(());
        }
        HackathonCommand::AddTask { id, task } => app
            .api
            .add_task_to_hackathon(&id, &task)
            .await
            .context("Failed to add challenge")?,
        HackathonCommand::RemoveTask { id, task } => app
            .api
            .remove_task_from_hackathon(&id, &task)
            .await
            .context("Failed to remove challenge")?,
        HackathonCommand::AddUser { id, user } => app
            .api
            .add_user_to_hackathon(&id, &user)
            .await
            .context("Failed to add member")?,
        HackathonCommand::RemoveUser { id, user } => app
            .api
            .remove_user_from_hackathon(&id, &user)
            .await
            .context("Failed to remove member")?,
    };

    app.refresh_cache().await;
    render::success("Hackathon saved");
    print_hackathon(app, &updated);
    Ok(())
}

async fn solutions(app: &App, command: SolutionCommand) -> Result<()> {
    match command {
        SolutionCommand::List { user, task } => {
            let solutions = match (user, task) {
                (Some(user), _) => app.api.get_solutions_for_user(&user).await,
                (None, Some(task)) => app.api.get_solutions_for_task(&task).await,
                (None, None) => app.api.get_all_solutions().await,
            }
            .context("Failed to load submissions")?;
            render::heading("Submissions");
            print_solutions(app, &solutions);
        }
        SolutionCommand::Delete { id } => {
            app.api
                .delete_solution(&id)
                .await
                .context("Failed to delete submission")?;
            app.refresh_cache().await;
            render::success(&format!("Deleted submission {id}"));
        }
    }
    Ok(())
}
