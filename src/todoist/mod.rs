//! Todoist service access

mod client;
mod error;
#[cfg(test)]
pub(crate) mod fake;
mod model;

pub use client::{TodoistClient, DEFAULT_BASE_URL, DEFAULT_PAGE_SIZE};
pub use error::{Result, TodoistError};
pub use model::{Due, DueDate, Priority, Task, TaskPage};

use std::future::Future;

/// The two service operations the dashboard needs.
pub trait TaskService: Send + Sync + 'static {
    /// One page of active tasks, starting at `cursor` (`None` for the first page).
    fn list_tasks(&self, cursor: Option<&str>) -> impl Future<Output = Result<TaskPage>> + Send;

    /// Marks a task as done.
    fn close_task(&self, task_id: &str) -> impl Future<Output = Result<()>> + Send;
}
