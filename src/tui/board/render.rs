use ratatui::prelude::*;
use ratatui::widgets::*;

use super::{BoardLine, BoardView, RowState, Section};
use crate::cli::truncate;
use crate::tui::components::HelpOverlay;
use crate::tui::styles::Theme;

/// Worker state shown in the status bar.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusInfo {
    pub refreshing: bool,
    pub pending_completions: usize,
}

impl Section {
    fn label(self) -> &'static str {
        match self {
            Section::Today => "Today",
            Section::Upcoming => "Upcoming",
        }
    }
}

impl BoardView {
    pub fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme, status: &StatusInfo) {
        frame.render_widget(
            Block::default().style(Style::default().bg(theme.background)),
            area,
        );

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(area);

        self.render_list(frame, chunks[0], theme);
        self.render_status_bar(frame, chunks[1], theme, status);

        if self.show_help {
            HelpOverlay::render(frame, area, theme);
        }
    }

    fn render_list(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border))
            .title(format!(" Tasks · {} ", self.today.format("%a %b %d")))
            .title_style(Style::default().fg(theme.title).bold());

        let inner = block.inner(area);
        frame.render_widget(block, area);

        // Mouse hit-testing and scroll clamping work off the last drawn area.
        self.viewport = inner;
        self.clamp_scroll();

        let width = usize::from(inner.width);
        let visible: Vec<Line> = self
            .lines()
            .into_iter()
            .skip(self.scroll)
            .take(usize::from(inner.height))
            .map(|line| self.render_line(line, width, theme))
            .collect();

        frame.render_widget(Paragraph::new(visible), inner);
    }

    fn render_line(&self, line: BoardLine, width: usize, theme: &Theme) -> Line<'static> {
        match line {
            BoardLine::Header(section) => {
                let count = self.rows().iter().filter(|r| r.section == section).count();
                Line::from(vec![
                    Span::styled(section.label(), Style::default().fg(theme.title).bold()),
                    Span::styled(format!(" ({})", count), Style::default().fg(theme.dimmed)),
                ])
            }
            BoardLine::Empty(Section::Today) => Line::from(Span::styled(
                "  No tasks for today! 🎉",
                Style::default().fg(theme.celebrate),
            )),
            BoardLine::Empty(Section::Upcoming) => Line::from(Span::styled(
                "  No upcoming tasks.",
                Style::default().fg(theme.calm),
            )),
            BoardLine::Loading => Line::from(Span::styled(
                "  Loading tasks...",
                Style::default().fg(theme.dimmed),
            )),
            BoardLine::Gap => Line::from(""),
            BoardLine::Title(index) => {
                let row = &self.rows[index];
                let checked = row.state.is_checked();
                let glyph = if checked { "● " } else { "○ " };

                let mut style = Style::default().fg(theme.priority_color(row.task.effective_priority()));
                if checked {
                    style = style.fg(theme.dimmed).add_modifier(Modifier::CROSSED_OUT);
                }
                if row.state == RowState::Completing {
                    style = style.add_modifier(Modifier::ITALIC);
                }

                let content = truncate(&row.task.content, width.saturating_sub(2));
                let selected = index == self.cursor;
                let line = Line::from(vec![
                    Span::styled(glyph, Style::default().fg(theme.text)),
                    Span::styled(content, if selected { style.bold() } else { style }),
                ]);
                if selected {
                    line.style(Style::default().bg(theme.selection))
                } else {
                    line
                }
            }
            BoardLine::Due(index) => {
                let row = &self.rows[index];
                let text = match row.task.due_date() {
                    Some(date) => format!("  Due: {}", date.format("%a %b %d")),
                    None => String::new(),
                };
                let line = Line::from(Span::styled(text, Style::default().fg(theme.dimmed)));
                if index == self.cursor {
                    line.style(Style::default().bg(theme.selection))
                } else {
                    line
                }
            }
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect, theme: &Theme, status: &StatusInfo) {
        let key_style = Style::default().fg(theme.accent).bold();
        let desc_style = Style::default().fg(theme.dimmed);
        let sep_style = Style::default().fg(theme.border);

        // Refresh state goes first so narrow terminals cut the hints instead.
        let state = if status.refreshing {
            " refreshing...".to_string()
        } else {
            match self.refreshed_at {
                Some(at) => format!(" updated {}", at.format("%H:%M")),
                None => " waiting for first refresh".to_string(),
            }
        };
        let mut spans = vec![Span::styled(state, Style::default().fg(theme.hint))];

        if status.pending_completions > 0 {
            spans.push(Span::styled(
                format!(" · {} pending", status.pending_completions),
                Style::default().fg(theme.accent),
            ));
        }

        for (key, desc) in [
            ("j/k", "Navigate"),
            ("Space", "Complete"),
            ("r", "Refresh"),
            ("?", "Help"),
            ("q", "Quit"),
        ] {
            spans.push(Span::styled(" │", sep_style));
            spans.push(Span::styled(format!(" {}", key), key_style));
            spans.push(Span::styled(format!(" {}", desc), desc_style));
        }

        let bar = Paragraph::new(Line::from(spans)).style(Style::default().bg(theme.surface));
        frame.render_widget(bar, area);
    }
}
