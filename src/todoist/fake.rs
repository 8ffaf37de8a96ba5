//! In-memory `TaskService` for unit tests

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use super::{Result, Task, TaskPage, TaskService, TodoistError};

#[derive(Default)]
pub(crate) struct FakeTaskService {
    pages: Vec<Vec<Task>>,
    fail_from_page: Mutex<Option<usize>>,
    slow_page: Mutex<Option<(usize, Duration)>>,
    failing_closes: Mutex<HashSet<String>>,
    hang_closes: AtomicBool,
    closed: Mutex<Vec<String>>,
    list_calls: AtomicUsize,
}

impl FakeTaskService {
    pub fn with_pages(pages: Vec<Vec<Task>>) -> Self {
        Self {
            pages,
            ..Default::default()
        }
    }

    pub fn fail_listing(&self, fail: bool) {
        *self.fail_from_page.lock().unwrap() = if fail { Some(0) } else { None };
    }

    pub fn fail_listing_from_page(&self, page: usize) {
        *self.fail_from_page.lock().unwrap() = Some(page);
    }

    /// Makes fetching page `page` take `delay`.
    pub fn delay_page(&self, page: usize, delay: Duration) {
        *self.slow_page.lock().unwrap() = Some((page, delay));
    }

    pub fn fail_close(&self, task_id: &str) {
        self.failing_closes
            .lock()
            .unwrap()
            .insert(task_id.to_string());
    }

    pub fn hang_closes(&self, hang: bool) {
        self.hang_closes.store(hang, Ordering::SeqCst);
    }

    pub fn closed(&self) -> Vec<String> {
        self.closed.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

impl TaskService for FakeTaskService {
    async fn list_tasks(&self, cursor: Option<&str>) -> Result<TaskPage> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let index = cursor.and_then(|c| c.parse::<usize>().ok()).unwrap_or(0);

        let slow = *self.slow_page.lock().unwrap();
        let delay = slow
            .filter(|(page, _)| *page == index)
            .map(|(_, delay)| delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let failing = *self.fail_from_page.lock().unwrap();
        if failing.is_some_and(|from| index >= from) {
            return Err(TodoistError::Status {
                status: 500,
                body: "fake listing failure".to_string(),
            });
        }

        let results = self.pages.get(index).cloned().unwrap_or_default();
        let next_cursor = (index + 1 < self.pages.len()).then(|| (index + 1).to_string());
        Ok(TaskPage {
            results,
            next_cursor,
        })
    }

    async fn close_task(&self, task_id: &str) -> Result<()> {
        if self.hang_closes.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if self.failing_closes.lock().unwrap().contains(task_id) {
            return Err(TodoistError::Status {
                status: 500,
                body: "fake close failure".to_string(),
            });
        }
        self.closed.lock().unwrap().push(task_id.to_string());
        Ok(())
    }
}
