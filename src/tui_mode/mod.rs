pub mod app;
mod helpers;
mod ui;

use crate::calc_engine::AngleMode;
use anyhow::Result;
use app::App;
use crossterm::{
    cursor::{SetCursorStyle, Show},
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use tracing::info;

pub(crate) type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Runs the full-screen calculator until the user quits. The terminal is
/// restored even when the event loop fails.
pub(crate) fn run_tui(angle_mode: AngleMode) -> Result<()> {
    let mut terminal = enter()?;
    let mut app = App::new(angle_mode);
    info!(mode = %angle_mode, "full-screen calculator started");

    let outcome = ui::run_ui_loop(&mut terminal, &mut app);
    leave(&mut terminal)?;

    info!(evaluations = app.history.len(), "full-screen calculator closed");
    outcome
}

fn enter() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        SetCursorStyle::BlinkingBar
    )?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn leave(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen,
        SetCursorStyle::DefaultUserShape,
        Show
    )?;
    Ok(())
}
