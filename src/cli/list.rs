//! `glance list` command implementation

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Args;
use serde::Serialize;
use std::sync::Arc;

use crate::config::Config;
use crate::tasks::{ClassifiedTasks, TaskFetcher};
use crate::todoist::Task;

const TABLE_COL_PRIORITY: usize = 4;
const TABLE_COL_CONTENT: usize = 48;
const TABLE_COL_DUE: usize = 10;

#[derive(Args)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Classify against this date instead of today
    #[arg(long, value_name = "YYYY-MM-DD")]
    date: Option<NaiveDate>,
}

#[derive(Serialize)]
struct ListJson {
    date: NaiveDate,
    today: Vec<TaskJson>,
    upcoming: Vec<TaskJson>,
}

#[derive(Serialize)]
struct TaskJson {
    id: String,
    content: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    description: String,
    due: Option<NaiveDate>,
    priority: u8,
}

impl From<&Task> for TaskJson {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            content: task.content.clone(),
            description: task.description.clone(),
            due: task.due_date(),
            priority: task.effective_priority().level(),
        }
    }
}

impl ListJson {
    fn new(date: NaiveDate, tasks: &ClassifiedTasks) -> Self {
        Self {
            date,
            today: tasks.today.iter().map(TaskJson::from).collect(),
            upcoming: tasks.upcoming.iter().map(TaskJson::from).collect(),
        }
    }
}

fn format_row(task: &Task) -> String {
    let due = task
        .due_date()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default();
    format!(
        "  {:<width_priority$} {:<width_content$} {:<width_due$} {}",
        task.effective_priority().to_string(),
        super::truncate(&task.content, TABLE_COL_CONTENT),
        due,
        task.id,
        width_priority = TABLE_COL_PRIORITY,
        width_content = TABLE_COL_CONTENT,
        width_due = TABLE_COL_DUE,
    )
}

fn format_section(title: &str, tasks: &[Task], empty_message: &str) -> String {
    let mut out = format!("{} ({})\n", title, tasks.len());
    if tasks.is_empty() {
        out.push_str(&format!("  {}\n", empty_message));
        return out;
    }
    for task in tasks {
        out.push_str(&format_row(task));
        out.push('\n');
    }
    out
}

pub async fn run(token: Option<&str>, args: ListArgs) -> Result<()> {
    let config = Config::load()?;
    let client = config.todoist_client(token)?;
    let date = args.date.unwrap_or_else(|| Local::now().date_naive());

    let fetcher = TaskFetcher::new(Arc::new(client));
    let tasks = fetcher
        .try_fetch_and_classify(date)
        .await
        .context("Failed to fetch tasks from Todoist")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&ListJson::new(date, &tasks))?);
        return Ok(());
    }

    print!("{}", format_section("Today", &tasks.today, "No tasks for today! 🎉"));
    println!();
    print!(
        "{}",
        format_section("Upcoming", &tasks.upcoming, "No upcoming tasks.")
    );

    Ok(())
}
