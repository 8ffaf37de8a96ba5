//! todo-glance library - Todoist client, task classification and the dashboard

pub mod cli;
pub mod config;
pub mod tasks;
pub mod todoist;
pub mod tui;
