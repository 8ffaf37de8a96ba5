//! Board view - today's and upcoming tasks

use chrono::{DateTime, Local, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use super::app::Action;
use crate::tasks::ClassifiedTasks;
use crate::todoist::Task;

mod render;

pub use render::StatusInfo;

/// Columns taken by the checkbox glyph and its trailing space.
const CHECKBOX_WIDTH: u16 = 2;
const PAGE_STEP: isize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Today,
    Upcoming,
}

/// Lifecycle of one rendered row.
///
/// `Open -> Completing -> (removed)` on success,
/// `Completing -> CompletionFailed` on failure. A failed row keeps its
/// checked look until the next refresh rebuilds the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowState {
    Open,
    Completing,
    CompletionFailed,
}

impl RowState {
    pub fn is_checked(self) -> bool {
        !matches!(self, RowState::Open)
    }
}

#[derive(Debug, Clone)]
pub struct TaskRow {
    pub task: Task,
    pub section: Section,
    pub state: RowState,
}

impl TaskRow {
    fn new(task: Task, section: Section) -> Self {
        Self {
            task,
            section,
            state: RowState::Open,
        }
    }
}

/// One screen line of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BoardLine {
    Header(Section),
    Empty(Section),
    Loading,
    Title(usize),
    Due(usize),
    Gap,
}

#[derive(Debug, Clone)]
pub struct BoardView {
    rows: Vec<TaskRow>,
    today: NaiveDate,
    cursor: usize,
    scroll: usize,
    viewport: Rect,
    refreshed_at: Option<DateTime<Local>>,
    show_help: bool,
}

impl BoardView {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            rows: Vec::new(),
            today,
            cursor: 0,
            scroll: 0,
            viewport: Rect::default(),
            refreshed_at: None,
            show_help: false,
        }
    }

    /// Builds the board for a fresh fetch. Every row starts `Open`; scroll
    /// offset and the selected task carry over where they still fit.
    pub fn rebuild(
        &self,
        tasks: ClassifiedTasks,
        today: NaiveDate,
        refreshed_at: DateTime<Local>,
    ) -> Self {
        let selected_id = self.selected().map(|row| row.task.id.clone());

        let rows: Vec<TaskRow> = tasks
            .today
            .into_iter()
            .map(|task| TaskRow::new(task, Section::Today))
            .chain(
                tasks
                    .upcoming
                    .into_iter()
                    .map(|task| TaskRow::new(task, Section::Upcoming)),
            )
            .collect();

        let cursor = selected_id
            .and_then(|id| rows.iter().position(|row| row.task.id == id))
            .unwrap_or_else(|| self.cursor.min(rows.len().saturating_sub(1)));

        let mut board = Self {
            rows,
            today,
            cursor,
            scroll: self.scroll,
            viewport: self.viewport,
            refreshed_at: Some(refreshed_at),
            show_help: self.show_help,
        };
        board.clamp_scroll();
        board
    }

    pub fn rows(&self) -> &[TaskRow] {
        &self.rows
    }

    pub fn is_loaded(&self) -> bool {
        self.refreshed_at.is_some()
    }

    pub fn selected(&self) -> Option<&TaskRow> {
        self.rows.get(self.cursor)
    }

    fn row_index(&self, task_id: &str) -> Option<usize> {
        self.rows.iter().position(|row| row.task.id == task_id)
    }

    /// Marks the row checked and returns its task id, or `None` if the row
    /// was already triggered.
    pub fn begin_completion(&mut self, index: usize) -> Option<String> {
        let row = self.rows.get_mut(index)?;
        if row.state != RowState::Open {
            return None;
        }
        row.state = RowState::Completing;
        Some(row.task.id.clone())
    }

    /// Re-marks a freshly rebuilt row whose close is still in flight.
    pub fn resume_completion(&mut self, task_id: &str) -> bool {
        match self.row_index(task_id) {
            Some(index) if self.rows[index].state == RowState::Open => {
                self.rows[index].state = RowState::Completing;
                true
            }
            _ => false,
        }
    }

    pub fn completion_succeeded(&mut self, task_id: &str) -> bool {
        let Some(index) = self.row_index(task_id) else {
            return false;
        };
        self.rows.remove(index);

        if index < self.cursor {
            self.cursor -= 1;
        }
        if self.cursor >= self.rows.len() {
            self.cursor = self.rows.len().saturating_sub(1);
        }
        self.clamp_scroll();
        true
    }

    pub fn completion_failed(&mut self, task_id: &str) -> bool {
        match self.row_index(task_id) {
            Some(index) if self.rows[index].state == RowState::Completing => {
                self.rows[index].state = RowState::CompletionFailed;
                true
            }
            _ => false,
        }
    }

    pub fn completion_cancelled(&mut self, task_id: &str) -> bool {
        match self.row_index(task_id) {
            Some(index) if self.rows[index].state == RowState::Completing => {
                self.rows[index].state = RowState::Open;
                true
            }
            _ => false,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        if self.show_help {
            if matches!(
                key.code,
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')
            ) {
                self.show_help = false;
            }
            return None;
        }

        match key.code {
            KeyCode::Char('q') => return Some(Action::Quit),
            KeyCode::Char('?') => {
                self.show_help = true;
            }
            KeyCode::Char('r') | KeyCode::F(5) => {
                return Some(Action::Refresh);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_cursor(1);
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_cursor(-1);
            }
            KeyCode::PageDown => {
                self.move_cursor(PAGE_STEP);
            }
            KeyCode::PageUp => {
                self.move_cursor(-PAGE_STEP);
            }
            KeyCode::Home | KeyCode::Char('g') => {
                self.cursor = 0;
                self.ensure_cursor_visible();
            }
            KeyCode::End | KeyCode::Char('G') => {
                self.cursor = self.rows.len().saturating_sub(1);
                self.ensure_cursor_visible();
            }
            KeyCode::Char(' ') | KeyCode::Char('x') | KeyCode::Enter => {
                return self.begin_completion(self.cursor).map(Action::Complete);
            }
            KeyCode::Char('u') => {
                if let Some(row) = self.selected() {
                    if row.state == RowState::Completing {
                        return Some(Action::CancelCompletion(row.task.id.clone()));
                    }
                }
            }
            _ => {}
        }

        None
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> Option<Action> {
        if self.show_help {
            return None;
        }

        match mouse.kind {
            MouseEventKind::ScrollDown => {
                self.scroll_lines(1);
                None
            }
            MouseEventKind::ScrollUp => {
                self.scroll_lines(-1);
                None
            }
            MouseEventKind::Down(MouseButton::Left) => {
                let (index, on_title) = match self.line_at(mouse.column, mouse.row)? {
                    BoardLine::Title(index) => (index, true),
                    BoardLine::Due(index) => (index, false),
                    _ => return None,
                };
                self.cursor = index;
                if on_title && mouse.column < self.viewport.x + CHECKBOX_WIDTH {
                    return self.begin_completion(index).map(Action::Complete);
                }
                None
            }
            _ => None,
        }
    }

    fn move_cursor(&mut self, delta: isize) {
        if self.rows.is_empty() {
            return;
        }
        let last = self.rows.len() - 1;
        self.cursor = self.cursor.saturating_add_signed(delta).min(last);
        self.ensure_cursor_visible();
    }

    fn scroll_lines(&mut self, delta: isize) {
        self.scroll = self.scroll.saturating_add_signed(delta);
        self.clamp_scroll();
    }

    fn lines(&self) -> Vec<BoardLine> {
        let mut lines = Vec::with_capacity(self.rows.len() * 2 + 5);

        for section in [Section::Today, Section::Upcoming] {
            if section == Section::Upcoming {
                lines.push(BoardLine::Gap);
            }
            lines.push(BoardLine::Header(section));

            let before = lines.len();
            for (index, row) in self.rows.iter().enumerate() {
                if row.section == section {
                    lines.push(BoardLine::Title(index));
                    lines.push(BoardLine::Due(index));
                }
            }

            if lines.len() == before {
                lines.push(if self.is_loaded() {
                    BoardLine::Empty(section)
                } else {
                    BoardLine::Loading
                });
            }
        }

        lines
    }

    fn line_at(&self, column: u16, row: u16) -> Option<BoardLine> {
        let v = self.viewport;
        if column < v.x || column >= v.x + v.width || row < v.y || row >= v.y + v.height {
            return None;
        }
        let index = self.scroll + usize::from(row - v.y);
        self.lines().get(index).copied()
    }

    fn ensure_cursor_visible(&mut self) {
        let height = usize::from(self.viewport.height);
        if height == 0 {
            return;
        }

        let lines = self.lines();
        let Some(mut top) = lines
            .iter()
            .position(|line| *line == BoardLine::Title(self.cursor))
        else {
            return;
        };
        let bottom = top + 1;

        // Bring the section header along for a section's first row.
        if top > 0 && matches!(lines[top - 1], BoardLine::Header(_)) {
            top -= 1;
        }

        if top < self.scroll {
            self.scroll = top;
        } else if bottom >= self.scroll + height {
            self.scroll = bottom + 1 - height;
        }
        self.clamp_scroll();
    }

    fn clamp_scroll(&mut self) {
        let height = usize::from(self.viewport.height);
        if height == 0 {
            return;
        }
        let max_scroll = self.lines().len().saturating_sub(height);
        self.scroll = self.scroll.min(max_scroll);
    }
}
