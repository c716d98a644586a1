use super::app::App;
use super::helpers::{highlight_expression, wrap_text};
use super::Tui;
use crate::calc_engine::{format_value, AngleMode};
use crate::render_help::render_help;
use crate::session::HistoryEntry;
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use std::time::Duration;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

const MIN_TERMINAL_WIDTH: u16 = 50;
const MIN_TERMINAL_HEIGHT: u16 = 10;
const POLL_INTERVAL: Duration = Duration::from_millis(50);
const WHEEL_STEP: usize = 3;

pub fn run_ui_loop(terminal: &mut Tui, app: &mut App) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| {
            if app.show_help {
                render_help(frame, app);
            } else {
                draw(frame, app);
            }
        })?;

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        match event::read()? {
            Event::Key(KeyEvent {
                code,
                modifiers,
                kind: KeyEventKind::Press,
                ..
            }) => handle_key_event(app, code, modifiers),
            Event::Mouse(mouse) => handle_mouse_event(app, mouse),
            _ => {}
        }
    }
    Ok(())
}

fn handle_key_event(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    if app.show_help {
        help_key(app, code);
    } else {
        editor_key(app, code, modifiers);
    }
}

fn help_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Down => app.help_scroll = app.help_scroll.saturating_add(1),
        KeyCode::Up => app.help_scroll = app.help_scroll.saturating_sub(1),
        KeyCode::PageDown => app.help_scroll = app.help_scroll.saturating_add(10),
        KeyCode::PageUp => app.help_scroll = app.help_scroll.saturating_sub(10),
        KeyCode::Esc | KeyCode::F(1) => {
            app.show_help = false;
            app.help_scroll = 0;
        }
        _ => {}
    }
}

fn editor_key(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    let ctrl = modifiers.contains(KeyModifiers::CONTROL);

    match code {
        KeyCode::Char('u' | 'U') if ctrl => app.clear_input(),
        KeyCode::Char(c) if modifiers.is_empty() || modifiers == KeyModifiers::SHIFT => {
            app.insert_char(c)
        }
        KeyCode::Enter => app.submit(),
        KeyCode::Backspace => app.delete_before_cursor(),
        KeyCode::Delete => app.delete_at_cursor(),
        KeyCode::Left if ctrl => app.move_cursor_by_words(-1),
        KeyCode::Right if ctrl => app.move_cursor_by_words(1),
        KeyCode::Left => app.move_cursor(-1),
        KeyCode::Right => app.move_cursor(1),
        KeyCode::Home => {
            app.cursor_position = 0;
            app.input_scroll = 0;
        }
        KeyCode::End => app.move_cursor_to_end(),
        KeyCode::Up => app.navigate_history(-1),
        KeyCode::Down => app.navigate_history(1),
        KeyCode::PageUp => app.scroll_history(-1),
        KeyCode::PageDown => app.scroll_history(1),
        KeyCode::F(1) => {
            app.show_help = true;
            app.help_scroll = 0;
        }
        KeyCode::F(2) => app.toggle_angle_mode(),
        _ => {}
    }
}

fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    let offset = if app.show_help {
        &mut app.help_scroll
    } else {
        &mut app.history_scroll
    };
    match mouse.kind {
        MouseEventKind::ScrollDown => *offset = offset.saturating_add(WHEEL_STEP),
        MouseEventKind::ScrollUp => *offset = offset.saturating_sub(WHEEL_STEP),
        _ => {}
    }
}

fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.size();
    app.terminal_too_small = area.width < MIN_TERMINAL_WIDTH || area.height < MIN_TERMINAL_HEIGHT;
    if app.terminal_too_small {
        render_resize_message(frame, area);
        return;
    }

    let [input_area, status_area, history_area] = split_screen(area);
    render_input(frame, app, input_area);
    render_status(frame, app.angle_mode, status_area);
    render_history(frame, app, history_area);
    app.list_height = history_area.height as usize;
}

fn split_screen(area: Rect) -> [Rect; 3] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(3),
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2]]
}

fn render_resize_message(frame: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(Span::styled(
            format!(
                "Need at least {}x{}, have {}x{}",
                MIN_TERMINAL_WIDTH, MIN_TERMINAL_HEIGHT, area.width, area.height
            ),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Enlarge the window to use the calculator",
            Style::default().fg(Color::Yellow),
        )),
    ];

    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title(" Terminal Too Small ")
                .title_alignment(Alignment::Center),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

/// One expression line (wrapped) followed by its `= outcome`.
fn expression_items(entry: &HistoryEntry, selected: bool, width: usize) -> Vec<ListItem<'static>> {
    let colour = if selected { Color::Yellow } else { Color::Cyan };
    let base_style = Style::default().fg(colour);
    let outcome_style = Style::default()
        .fg(if entry.result.is_ok() {
            Color::LightMagenta
        } else {
            Color::Red
        })
        .add_modifier(Modifier::BOLD);

    let expression: String = entry.input.chars().filter(|c| !c.is_whitespace()).collect();
    wrap_text(&expression, width)
        .into_iter()
        .enumerate()
        .map(|(idx, chunk)| {
            let marker = if idx == 0 { "> " } else { "  " };
            let mut spans = vec![Span::styled(marker, Style::default().fg(Color::Green))];
            spans.extend(highlight_expression(&chunk, base_style));
            if idx == 0 {
                spans.push(Span::styled(" = ", Style::default().fg(Color::Gray)));
                spans.push(Span::styled(entry.outcome(), outcome_style));
            }
            ListItem::new(Line::from(spans))
        })
        .collect()
}

/// Step list, error, mode and timing of a `details` evaluation.
fn detail_items(entry: &HistoryEntry, width: usize) -> Vec<ListItem<'static>> {
    let mut details: Vec<(String, Color)> = entry
        .detailed_steps
        .iter()
        .enumerate()
        .map(|(n, step)| {
            let text = format!("Step {}: {} = {}", n + 1, step.operation, format_value(step.result));
            (text, Color::DarkGray)
        })
        .collect();
    if let Err(err) = &entry.result {
        details.push((err.to_string(), Color::Red));
    }
    details.push((format!("Mode: {}", entry.angle_mode), Color::DarkGray));
    details.push((
        format!("Time: {:.6} ms", entry.duration.as_secs_f64() * 1000.0),
        Color::Magenta,
    ));

    let mut items = Vec::new();
    for (text, colour) in details {
        for (idx, chunk) in wrap_text(&text, width.saturating_sub(6)).into_iter().enumerate() {
            let bullet = if idx == 0 { "    - " } else { "      " };
            items.push(ListItem::new(Line::from(Span::styled(
                format!("{}{}", bullet, chunk),
                Style::default().fg(colour),
            ))));
        }
    }
    items
}

fn render_history(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" History ")
        .title_alignment(Alignment::Center);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.history.is_empty() {
        let hint = Paragraph::new("Type an expression and press Enter.")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(hint, inner);
        return;
    }

    let width = inner.width.saturating_sub(4) as usize;
    let separator = "-".repeat(inner.width as usize);
    let mut items = Vec::new();
    app.item_start_indices.clear();

    for (i, entry) in app.history.iter().enumerate() {
        if i > 0 {
            items.push(ListItem::new(Line::from(Span::styled(
                separator.clone(),
                Style::default().fg(Color::DarkGray),
            ))));
        }
        app.item_start_indices.push(items.len());
        items.extend(expression_items(entry, i == app.cursor_history, width));
        if entry.detailed_mode {
            items.extend(detail_items(entry, width));
        }
    }

    if app.scroll_to_bottom {
        app.history_scroll = items.len().saturating_sub(inner.height as usize);
        app.scroll_to_bottom = false;
    }

    let selected = app.item_start_indices.get(app.cursor_history).copied();
    let list = List::new(items)
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD));
    let mut state = ListState::default()
        .with_selected(selected)
        .with_offset(app.history_scroll);
    frame.render_stateful_widget(list, inner, &mut state);
}

fn render_status(frame: &mut Frame, angle_mode: AngleMode, area: Rect) {
    const HINTS: [(&str, &str); 5] = [
        ("Enter", "Calculate"),
        ("Up/Down or PgUp/PgDn", "Navigate"),
        ("F1", "Help"),
        ("F2", "rad/deg"),
        ("Ctrl+U", "Clear Input"),
    ];
    let key_style = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let text_style = Style::default().fg(Color::DarkGray);

    let mut spans = vec![Span::styled(
        format!("Mode: {} ", angle_mode),
        Style::default()
            .fg(Color::Black)
            .bg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )];
    for (key, action) in HINTS {
        spans.push(Span::styled(format!(" {}", key), key_style));
        spans.push(Span::styled(format!(" {} ", action), text_style));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_input(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" Expression [{}] ", app.angle_mode))
        .title_alignment(Alignment::Center);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    // two columns for the "> " prompt
    let visible_width = inner.width.saturating_sub(2) as usize;
    app.adjust_input_scroll(visible_width);

    let graphemes: Vec<&str> = app.input.graphemes(true).collect();
    let shown = &graphemes[app.input_scroll.min(graphemes.len())..];
    let shown = &shown[..visible_width.min(shown.len())];
    frame.render_widget(Paragraph::new(format!("> {}", shown.concat())), inner);

    let cursor_offset = app.cursor_position.saturating_sub(app.input_scroll).min(shown.len());
    let cursor_x = inner.x + 2 + shown[..cursor_offset].concat().width() as u16;
    frame.set_cursor(cursor_x, inner.y);

    let marker_style = Style::default().fg(Color::DarkGray);
    if app.input_scroll > 0 {
        frame.render_widget(
            Paragraph::new("<").style(marker_style),
            Rect::new(inner.x, inner.y, 1, 1),
        );
    }
    if graphemes.len() > app.input_scroll + visible_width && inner.width > 0 {
        frame.render_widget(
            Paragraph::new(">").style(marker_style),
            Rect::new(inner.x + inner.width - 1, inner.y, 1, 1),
        );
    }
}
