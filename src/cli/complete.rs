//! `glance complete` command implementation

use anyhow::{bail, Context, Result};
use clap::Args;
use tracing::info;

use crate::config::Config;
use crate::todoist::TaskService;

#[derive(Args)]
pub struct CompleteArgs {
    /// ID of the task to close
    task_id: String,
}

pub async fn run(token: Option<&str>, args: CompleteArgs) -> Result<()> {
    let task_id = args.task_id.trim();
    if task_id.is_empty() {
        bail!("Task ID cannot be empty");
    }

    let config = Config::load()?;
    let client = config.todoist_client(token)?;

    client
        .close_task(task_id)
        .await
        .with_context(|| format!("Failed to complete task {}", task_id))?;

    info!("Closed task {} from the command line", task_id);
    println!("✓ Completed task: {}", task_id);
    Ok(())
}
