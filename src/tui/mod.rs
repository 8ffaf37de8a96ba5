//! Terminal User Interface module

mod app;
mod board;
mod components;
mod styles;
mod workers;

pub use app::*;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::config::Config;

pub async fn run(token: Option<&str>, interval_secs: Option<u64>) -> Result<()> {
    // Fail on a missing token before the terminal is taken over.
    let config = Config::load()?;
    let client = config.todoist_client(token)?;
    let interval = match interval_secs {
        Some(secs) => Duration::from_secs(secs.max(1)),
        None => config.refresh.interval(),
    };
    info!(
        "Starting dashboard against {} (refresh every {}s)",
        client.base_url(),
        interval.as_secs()
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(Arc::new(client), interval);
    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}
