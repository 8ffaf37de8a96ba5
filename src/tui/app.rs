//! Main TUI application

use anyhow::Result;
use chrono::Local;
use crossterm::event::{Event, EventStream, KeyCode, KeyEventKind, KeyModifiers};
use futures_util::StreamExt;
use ratatui::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

use super::board::{BoardView, StatusInfo};
use super::styles::Theme;
use super::workers::{TaskPool, WorkerEvent};
use crate::todoist::TaskService;

pub struct App<S> {
    board: BoardView,
    pool: TaskPool<S>,
    theme: Theme,
    interval: Duration,
    next_refresh: Option<Instant>,
    should_quit: bool,
}

impl<S: TaskService> App<S> {
    pub fn new(service: Arc<S>, interval: Duration) -> Self {
        Self {
            board: BoardView::new(Local::now().date_naive()),
            pool: TaskPool::new(service),
            theme: Theme::default(),
            interval,
            next_refresh: None,
            should_quit: false,
        }
    }

    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    ) -> Result<()> {
        let mut events = EventStream::new();

        self.refresh_now();
        terminal.clear()?;
        terminal.draw(|f| self.render(f))?;

        while !self.should_quit {
            let deadline = self.next_refresh;
            tokio::select! {
                maybe_event = events.next() => match maybe_event {
                    Some(Ok(event)) => self.handle_event(event),
                    Some(Err(e)) => {
                        self.pool.shutdown();
                        return Err(e.into());
                    }
                    None => break,
                },
                Some(event) = self.pool.recv() => self.apply_worker_event(event),
                _ = wait_until(deadline) => self.refresh_now(),
            }

            terminal.draw(|f| self.render(f))?;
        }

        self.pool.shutdown();
        Ok(())
    }

    /// Starts a refresh. The periodic timer is re-armed once the result lands,
    /// so a slow fetch never overlaps the next one.
    fn refresh_now(&mut self) {
        if self.pool.request_refresh(Local::now().date_naive()) {
            self.next_refresh = None;
        } else {
            debug!("Refresh already in flight, skipping");
        }
    }

    fn handle_event(&mut self, event: Event) {
        let action = match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    Some(Action::Quit)
                } else {
                    self.board.handle_key(key)
                }
            }
            Event::Mouse(mouse) => self.board.handle_mouse(mouse),
            // Resize needs nothing beyond the redraw that follows every event.
            _ => None,
        };

        if let Some(action) = action {
            self.dispatch(action);
        }
    }

    fn dispatch(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Refresh => self.refresh_now(),
            Action::Complete(task_id) => {
                if !self.pool.request_completion(&task_id) {
                    debug!("Completion of {} already pending", task_id);
                }
            }
            Action::CancelCompletion(task_id) => {
                if self.pool.cancel_completion(&task_id) {
                    self.board.completion_cancelled(&task_id);
                }
            }
        }
    }

    fn apply_worker_event(&mut self, event: WorkerEvent) {
        match event {
            WorkerEvent::Refreshed { today, tasks } => {
                debug!(
                    "Refreshed: {} today, {} upcoming",
                    tasks.today.len(),
                    tasks.upcoming.len()
                );
                let mut board = self.board.rebuild(tasks, today, Local::now());
                for task_id in self.pool.pending_completions() {
                    board.resume_completion(task_id);
                }
                self.board = board;
                self.next_refresh = Some(Instant::now() + self.interval);
            }
            WorkerEvent::Completed {
                task_id, outcome, ..
            } => match outcome {
                Ok(()) => {
                    self.board.completion_succeeded(&task_id);
                }
                Err(e) => {
                    warn!("Leaving task {} checked after failed close: {}", task_id, e);
                    self.board.completion_failed(&task_id);
                }
            },
        }
    }

    fn render(&mut self, frame: &mut Frame) {
        let status = StatusInfo {
            refreshing: self.pool.refresh_in_flight(),
            pending_completions: self.pool.completions_in_flight(),
        };
        self.board.render(frame, frame.area(), &self.theme, &status);
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    Refresh,
    Complete(String),
    CancelCompletion(String),
}
