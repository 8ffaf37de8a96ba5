//! Supervised background work for the dashboard
//!
//! Refreshes and completions run as tokio tasks owned by the pool. Their
//! results come back as `WorkerEvent`s on a channel drained by the UI loop,
//! which is the only place board state changes.

use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::tasks::{ClassifiedTasks, TaskFetcher};
use crate::todoist::TaskService;

#[derive(Debug)]
pub enum WorkerEvent {
    Refreshed {
        today: NaiveDate,
        tasks: ClassifiedTasks,
    },
    Completed {
        task_id: String,
        /// Which attempt for `task_id` produced this result.
        generation: u64,
        outcome: Result<(), String>,
    },
}

struct Completion {
    generation: u64,
    handle: JoinHandle<()>,
}

pub struct TaskPool<S> {
    fetcher: TaskFetcher<S>,
    event_tx: mpsc::UnboundedSender<WorkerEvent>,
    event_rx: mpsc::UnboundedReceiver<WorkerEvent>,
    refresh: Option<JoinHandle<()>>,
    completions: HashMap<String, Completion>,
    next_generation: u64,
    /// Tasks closed while the running fetch may already have listed them.
    closed_during_refresh: HashSet<String>,
}

impl<S: TaskService> TaskPool<S> {
    pub fn new(service: Arc<S>) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        Self {
            fetcher: TaskFetcher::new(service),
            event_tx,
            event_rx,
            refresh: None,
            completions: HashMap::new(),
            next_generation: 0,
            closed_during_refresh: HashSet::new(),
        }
    }

    /// Starts a fetch unless one is already running.
    pub fn request_refresh(&mut self, today: NaiveDate) -> bool {
        if self.refresh.is_some() {
            return false;
        }
        self.closed_during_refresh.clear();

        let fetcher = self.fetcher.clone();
        let tx = self.event_tx.clone();
        self.refresh = Some(tokio::spawn(async move {
            let tasks = fetcher.fetch_and_classify(today).await;
            let _ = tx.send(WorkerEvent::Refreshed { today, tasks });
        }));
        true
    }

    /// Starts closing `task_id` unless a close for it is already running.
    pub fn request_completion(&mut self, task_id: &str) -> bool {
        if self.completions.contains_key(task_id) {
            return false;
        }

        let generation = self.next_generation;
        self.next_generation += 1;

        let service = Arc::clone(self.fetcher.service());
        let tx = self.event_tx.clone();
        let id = task_id.to_string();
        let handle = tokio::spawn(async move {
            let outcome = match service.close_task(&id).await {
                Ok(()) => {
                    info!("Completed task {}", id);
                    Ok(())
                }
                Err(e) => {
                    error!("Failed to complete task {}: {}", id, e);
                    Err(e.to_string())
                }
            };
            let _ = tx.send(WorkerEvent::Completed {
                task_id: id,
                generation,
                outcome,
            });
        });

        self.completions
            .insert(task_id.to_string(), Completion { generation, handle });
        true
    }
}

impl<S> TaskPool<S> {
    pub fn refresh_in_flight(&self) -> bool {
        self.refresh.is_some()
    }

    pub fn completions_in_flight(&self) -> usize {
        self.completions.len()
    }

    pub fn pending_completions(&self) -> impl Iterator<Item = &str> + '_ {
        self.completions.keys().map(String::as_str)
    }

    /// Aborts a pending close. Its result will never be delivered, even if
    /// it already sits in the channel.
    pub fn cancel_completion(&mut self, task_id: &str) -> bool {
        match self.completions.remove(task_id) {
            Some(completion) => {
                completion.handle.abort();
                debug!("Cancelled completion of task {}", task_id);
                true
            }
            None => false,
        }
    }

    pub async fn recv(&mut self) -> Option<WorkerEvent> {
        loop {
            let mut event = self.event_rx.recv().await?;
            if self.settle(&mut event) {
                return Some(event);
            }
        }
    }

    /// Updates bookkeeping for a delivered event. Returns `false` for results
    /// of cancelled attempts, which are dropped.
    fn settle(&mut self, event: &mut WorkerEvent) -> bool {
        match event {
            WorkerEvent::Refreshed { tasks, .. } => {
                self.refresh = None;
                let closed = std::mem::take(&mut self.closed_during_refresh);
                if !closed.is_empty() {
                    tasks.today.retain(|task| !closed.contains(&task.id));
                    tasks.upcoming.retain(|task| !closed.contains(&task.id));
                }
                true
            }
            WorkerEvent::Completed {
                task_id,
                generation,
                outcome,
            } => match self.completions.get(task_id.as_str()) {
                Some(current) if current.generation == *generation => {
                    self.completions.remove(task_id.as_str());
                    if outcome.is_ok() && self.refresh.is_some() {
                        self.closed_during_refresh.insert(task_id.clone());
                    }
                    true
                }
                _ => {
                    debug!("Dropping stale close result for task {}", task_id);
                    false
                }
            },
        }
    }

    pub fn shutdown(&mut self) {
        if let Some(handle) = self.refresh.take() {
            handle.abort();
        }
        for (_, completion) in self.completions.drain() {
            completion.handle.abort();
        }
    }
}

impl<S> Drop for TaskPool<S> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
