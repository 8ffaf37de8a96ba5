//! todo-glance - Terminal dashboard for today's and this week's Todoist tasks

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use std::fs::OpenOptions;
use std::sync::Mutex;
use todo_glance::cli::{self, Cli, Commands};
use todo_glance::config::get_app_dir;
use todo_glance::tui;
use tracing_subscriber::EnvFilter;

/// Logs go to a file because stdout belongs to the dashboard.
fn init_logging() -> Result<()> {
    let path = get_app_dir()?.join("glance.log");
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("todo_glance=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    if std::env::var("GLANCE_DEBUG").is_ok() {
        init_logging()?;
    }

    let cli = Cli::parse();
    let token = cli.token.as_deref();

    match cli.command {
        Some(Commands::Completion { shell }) => {
            generate(shell, &mut Cli::command(), "glance", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::List(args)) => cli::list::run(token, args).await,
        Some(Commands::Complete(args)) => cli::complete::run(token, args).await,
        None => tui::run(token, cli.interval).await,
    }
}
