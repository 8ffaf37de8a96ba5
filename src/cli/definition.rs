//! Command-line definitions

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use super::complete::CompleteArgs;
use super::list::ListArgs;
use crate::config::TOKEN_ENV_VAR;

#[derive(Parser)]
#[command(name = "glance")]
#[command(about = "Glance at today's and this week's Todoist tasks")]
#[command(version)]
pub struct Cli {
    /// Todoist API token (overrides the config file)
    #[arg(long, global = true, env = TOKEN_ENV_VAR, hide_env_values = true)]
    pub token: Option<String>,

    /// Dashboard refresh period in seconds
    #[arg(long, value_name = "SECS")]
    pub interval: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print today's and upcoming tasks once
    List(ListArgs),

    /// Mark a task complete
    Complete(CompleteArgs),

    /// Generate shell completions
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
