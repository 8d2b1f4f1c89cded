use anyhow::{anyhow, bail, Result};
use clap::Subcommand;
use tomate_adapters::SqliteTaskRepository;
use tomate_core::{Task, TaskId, TaskPriority, TaskRepository, TaskRepositoryError, Translator};
use tomate_protocol::{Request, Response};

use super::{database_path, expect_ok, send, translator};
use crate::client::{ClientError, DaemonClient};

#[derive(Subcommand)]
pub enum TaskCommand {
    /// Add a task
    Add {
        title: String,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long, default_value = "medium")]
        priority: TaskPriority,
        /// Estimated number of pomodoros
        #[arg(short, long, default_value_t = 1)]
        estimate: u32,
    },
    /// List tasks
    List {
        /// Include completed tasks
        #[arg(short, long)]
        all: bool,
    },
    /// Mark a task as done
    Done { id: TaskId },
    /// Mark a completed task as open again
    Reopen { id: TaskId },
    /// Delete a task
    Delete { id: TaskId },
    /// Credit the next focus sessions to this task
    Select { id: TaskId },
    /// Stop crediting focus sessions to any task
    Unselect,
}

pub async fn execute(command: TaskCommand) -> Result<()> {
    let translator = translator();
    let repository = SqliteTaskRepository::new(&database_path()?)
        .map_err(|error| anyhow!("database access error: {}", error))?;

    match command {
        TaskCommand::Add {
            title,
            description,
            priority,
            estimate,
        } => {
            let mut task = Task::new(title, priority, estimate.max(1));
            if let Some(description) = description {
                task = task.with_description(description);
            }
            let id = repository.save(&mut task)?;
            println!("{}", translator.format("task.added", &[("id", &id.to_string())]));
        }
        TaskCommand::List { all } => {
            let tasks: Vec<Task> = repository
                .find_all()?
                .into_iter()
                .filter(|task| all || !task.completed)
                .collect();
            print_tasks(&tasks, &translator);
        }
        TaskCommand::Done { id } => {
            let mut task = find(&repository, id, &translator)?;
            task.complete();
            repository.update(&task)?;
            println!("{}", translator.format("task.completed", &[("id", &id.to_string())]));
        }
        TaskCommand::Reopen { id } => {
            let mut task = find(&repository, id, &translator)?;
            task.reopen();
            repository.update(&task)?;
            println!("{}", translator.format("task.reopened", &[("id", &id.to_string())]));
        }
        TaskCommand::Delete { id } => {
            find(&repository, id, &translator)?;
            repository.delete(id)?;
            println!("{}", translator.format("task.deleted", &[("id", &id.to_string())]));
            if release_selection(&DaemonClient::new(), id).await? {
                println!("{}", translator.get("command.unselect_task_success"));
            }
        }
        TaskCommand::Select { id } => {
            let task = find(&repository, id, &translator)?;
            let response = send(Request::SelectTask { task_id: Some(id) }, &translator).await?;
            expect_ok(response, &translator)?;
            println!(
                "{}",
                translator.format(
                    "command.select_task_success",
                    &[("id", &id.to_string()), ("title", &task.title)]
                )
            );
        }
        TaskCommand::Unselect => {
            let response = send(Request::SelectTask { task_id: None }, &translator).await?;
            expect_ok(response, &translator)?;
            println!("{}", translator.get("command.unselect_task_success"));
        }
    }

    Ok(())
}

fn find(repository: &SqliteTaskRepository, id: TaskId, translator: &Translator) -> Result<Task> {
    match repository.find_by_id(id) {
        Ok(task) => Ok(task),
        Err(TaskRepositoryError::NotFound { .. }) => {
            bail!("{}", translator.format("task.not_found", &[("id", &id.to_string())]))
        }
        Err(error) => Err(error.into()),
    }
}

/// Clears the daemon's task selection when it points at `id`. Returns whether
/// a selection was released.
async fn release_selection(client: &DaemonClient, id: TaskId) -> Result<bool> {
    let snapshot = match client.send(Request::GetStatus).await {
        Ok(Response::Status(snapshot)) => snapshot,
        Ok(_) | Err(ClientError::DaemonNotRunning) => return Ok(false),
        Err(error) => return Err(error.into()),
    };

    if snapshot.state.current_task_id != Some(id) {
        return Ok(false);
    }

    match client.send(Request::SelectTask { task_id: None }).await? {
        Response::Ok => Ok(true),
        Response::Error { message } => bail!("{}", message),
        other => bail!("unexpected response: {:?}", other),
    }
}

fn print_tasks(tasks: &[Task], translator: &Translator) {
    if tasks.is_empty() {
        println!("{}", translator.get("task.list_empty"));
        return;
    }

    println!("{}\n", translator.get("task.list_header"));
    for task in tasks {
        println!("   {}", format_task(task));
    }
}

fn format_task(task: &Task) -> String {
    let marker = if task.completed { "x" } else { " " };
    let priority = match task.priority {
        TaskPriority::High => "!!",
        TaskPriority::Medium => "! ",
        TaskPriority::Low => "  ",
    };

    format!(
        "#{:<4} [{}] {} {} ({}/{} 🍅)",
        task.id.unwrap_or_default(),
        marker,
        priority,
        task.title,
        task.pomodoro_count,
        task.estimated_pomodoros
    )
}
