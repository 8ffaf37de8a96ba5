//! Pulling every task from the service and classifying it

use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, error};

use super::classify::{classify, ClassifiedTasks};
use crate::todoist::{Result, Task, TaskService};

/// Follows the page cursor until the service reports no more pages.
pub async fn fetch_all_tasks<S: TaskService>(service: &S) -> Result<Vec<Task>> {
    let mut tasks = Vec::new();
    let mut cursor: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = service.list_tasks(cursor.as_deref()).await?;
        pages += 1;
        tasks.extend(page.results);

        match page.next_cursor {
            Some(next) if !next.is_empty() => cursor = Some(next),
            _ => break,
        }
    }

    debug!("Fetched {} tasks across {} page(s)", tasks.len(), pages);
    Ok(tasks)
}

pub struct TaskFetcher<S> {
    service: Arc<S>,
}

impl<S> Clone for TaskFetcher<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}

impl<S: TaskService> TaskFetcher<S> {
    pub fn new(service: Arc<S>) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &Arc<S> {
        &self.service
    }

    pub async fn try_fetch_and_classify(&self, today: NaiveDate) -> Result<ClassifiedTasks> {
        let tasks = fetch_all_tasks(self.service.as_ref()).await?;
        Ok(classify(tasks, today))
    }

    /// Fetch failures are logged and reported as "no tasks".
    pub async fn fetch_and_classify(&self, today: NaiveDate) -> ClassifiedTasks {
        match self.try_fetch_and_classify(today).await {
            Ok(classified) => classified,
            Err(e) => {
                error!("Failed to fetch tasks: {}", e);
                ClassifiedTasks::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::todoist::fake::FakeTaskService;
    use crate::todoist::Priority;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_all_tasks_walks_every_page() {
        let service = FakeTaskService::with_pages(vec![
            vec![Task::new("1", "one"), Task::new("2", "two")],
            vec![Task::new("3", "three")],
            vec![Task::new("4", "four")],
        ]);

        let tasks = fetch_all_tasks(&service).await.unwrap();
        let ids: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4"]);
        assert_eq!(service.list_calls(), 3);
    }

    #[tokio::test]
    async fn test_classification_spans_pages() {
        let service = FakeTaskService::with_pages(vec![
            vec![Task::new("late", "late")
                .with_due_date(today())
                .with_priority(Priority::P4)],
            vec![Task::new("early", "early")
                .with_due_date(today())
                .with_priority(Priority::P1)],
        ]);
        let fetcher = TaskFetcher::new(Arc::new(service));

        let classified = fetcher.fetch_and_classify(today()).await;
        let ids: Vec<&str> = classified.today.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["early", "late"]);
    }

    #[tokio::test]
    async fn test_fetch_error_degrades_to_empty() {
        let service = FakeTaskService::with_pages(vec![vec![
            Task::new("1", "one").with_due_date(today()),
        ]]);
        service.fail_listing(true);
        let fetcher = TaskFetcher::new(Arc::new(service));

        let classified = fetcher.fetch_and_classify(today()).await;
        assert!(classified.is_empty());
        assert!(fetcher.try_fetch_and_classify(today()).await.is_err());
    }

    #[tokio::test]
    async fn test_error_on_later_page_discards_earlier_pages() {
        let service = FakeTaskService::with_pages(vec![
            vec![Task::new("1", "one").with_due_date(today())],
            vec![Task::new("2", "two").with_due_date(today())],
        ]);
        service.fail_listing_from_page(1);
        let fetcher = TaskFetcher::new(Arc::new(service));

        assert!(fetcher.fetch_and_classify(today()).await.is_empty());
    }
}
