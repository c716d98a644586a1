use crate::calc_engine::AngleMode;
use crate::session::{parse_command, Command, HistoryEntry};
use anyhow::Result;
use std::io::{stdin, stdout, Stdout, Write};
use termion::{
    clear::CurrentLine as ClearLine,
    cursor::{DetectCursorPos, Goto},
    event::Key,
    input::TermRead,
    raw::{IntoRawMode, RawTerminal},
};
use tracing::info;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

const PROMPT: &str = "Expression: ";

// Функция для преобразования позиции графемы в байтовую позицию
fn grapheme_index_to_byte_index(s: &str, index: usize) -> usize {
    s.grapheme_indices(true)
        .nth(index)
        .map(|(i, _)| i)
        .unwrap_or_else(|| s.len())
}

fn remove_grapheme(s: &mut String, index: usize) {
    let start = grapheme_index_to_byte_index(s, index);
    let end = grapheme_index_to_byte_index(s, index + 1);
    s.drain(start..end);
}

pub fn run_line(mut angle_mode: AngleMode) -> Result<()> {
    println!("padcalc - keypad calculator");
    println!("Supports: +, -, *, /, %, ^ and sin, cos, tan, sqrt, log, ln");
    println!("Navigation: ←/→, Backspace/Delete, Home/End, ↑/↓ for history");
    println!("Commands: 'rad'/'deg' angle mode, 'clear' history, 'quit' to exit");
    println!("Add 'details' before an expression for step-by-step evaluation\n");

    let mut stdout = stdout().into_raw_mode()?;
    let mut history: Vec<String> = Vec::new();
    let mut history_index = 0;

    loop {
        let Some(line) = read_expression(&mut stdout, &history, &mut history_index, angle_mode)? else {
            write!(stdout, "\r\n")?;
            return Ok(());
        };

        let Some(command) = parse_command(&line) else {
            write!(stdout, "\r\n")?;
            continue;
        };

        match command {
            Command::Quit => {
                write!(stdout, "\r\nGoodbye!\r\n")?;
                return Ok(());
            }
            Command::Clear => {
                history.clear();
                history_index = 0;
                write!(stdout, "\r\nHistory cleared\r\n\n")?;
            }
            Command::Help => {
                write!(
                    stdout,
                    "\r\nOperators bind ^ then * / % then + -. Errors are shown as the calculator reports them.\r\n\n"
                )?;
            }
            Command::SetMode(mode) => {
                info!(from = %angle_mode, to = %mode, "angle mode changed");
                angle_mode = mode;
                write!(stdout, "\r\nMode: {}\r\n\n", angle_mode)?;
            }
            Command::MissingExpression => {
                write!(stdout, "\r\nPlease enter a valid expression after 'details'\r\n\n")?;
            }
            Command::Evaluate {
                expression,
                detailed,
            } => {
                history.push(line.trim().to_string());
                history_index = history.len();

                let entry = HistoryEntry::evaluate(expression, detailed, angle_mode);
                print_entry(&mut stdout, &entry)?;
            }
        }
    }
}

fn print_entry(stdout: &mut RawTerminal<Stdout>, entry: &HistoryEntry) -> Result<()> {
    write!(stdout, "\r\n  {}\r\n", entry.transcript_line())?;

    if entry.detailed_mode && !entry.detailed_steps.is_empty() {
        write!(stdout, "\r\n  Step-by-step evaluation ({}):\r\n", entry.angle_mode)?;
        for (i, step) in entry.detailed_steps.iter().enumerate() {
            write!(
                stdout,
                "  Step {}: {} = {}\r\n",
                i + 1,
                step.operation,
                crate::calc_engine::format_value(step.result)
            )?;
        }
        write!(
            stdout,
            "  Time: {:.6} ms\r\n",
            entry.duration.as_secs_f64() * 1000.0
        )?;
    }
    write!(stdout, "\r\n")?;
    stdout.flush()?;
    Ok(())
}

/// Reads one line with cursor editing and history recall. `None` means the
/// input stream ended or the user pressed Ctrl+C / Ctrl+D.
fn read_expression(
    stdout: &mut RawTerminal<Stdout>,
    history: &[String],
    history_index: &mut usize,
    angle_mode: AngleMode,
) -> Result<Option<String>> {
    write!(stdout, "{}[{}] {}", ClearLine, angle_mode, PROMPT)?;
    stdout.flush()?;

    let mut expression = String::new();
    let mut cursor_pos = 0; // позиция курсора в графемах
    let (_, initial_y) = stdout.cursor_pos()?;
    let prompt = format!("[{}] {}", angle_mode, PROMPT);

    let stdin = stdin();
    let mut keys = stdin.keys();

    loop {
        write!(stdout, "{}{}{}{}", Goto(1, initial_y), ClearLine, prompt, expression)?;

        let prefix_end = grapheme_index_to_byte_index(&expression, cursor_pos);
        let column = prompt.width() + expression[..prefix_end].width() + 1;
        write!(stdout, "{}", Goto(column as u16, initial_y))?;
        stdout.flush()?;

        let Some(key) = keys.next() else {
            return Ok(None);
        };
        let len = expression.graphemes(true).count();

        match key? {
            Key::Char('\n') => return Ok(Some(expression)),
            Key::Ctrl('c') | Key::Ctrl('d') => return Ok(None),
            Key::Ctrl('u') => {
                expression.clear();
                cursor_pos = 0;
            }
            Key::Char(c) => {
                let byte_idx = grapheme_index_to_byte_index(&expression, cursor_pos);
                expression.insert(byte_idx, c);
                if expression.graphemes(true).count() > len {
                    cursor_pos += 1;
                }
            }
            Key::Backspace if cursor_pos > 0 => {
                cursor_pos -= 1;
                remove_grapheme(&mut expression, cursor_pos);
            }
            Key::Delete if cursor_pos < len => remove_grapheme(&mut expression, cursor_pos),
            Key::Left if cursor_pos > 0 => cursor_pos -= 1,
            Key::Right if cursor_pos < len => cursor_pos += 1,
            Key::Home => cursor_pos = 0,
            Key::End => cursor_pos = len,
            Key::Up => {
                if *history_index > 0 {
                    *history_index -= 1;
                    expression = history[*history_index].clone();
                    cursor_pos = expression.graphemes(true).count();
                }
            }
            Key::Down => {
                if *history_index < history.len().saturating_sub(1) {
                    *history_index += 1;
                    expression = history[*history_index].clone();
                    cursor_pos = expression.graphemes(true).count();
                } else {
                    *history_index = history.len();
                    expression.clear();
                    cursor_pos = 0;
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn removes_whole_graphemes() {
        let mut s = "2e\u{301}3".to_string();
        remove_grapheme(&mut s, 1);
        assert_eq!(s, "23");
        assert_eq!(grapheme_index_to_byte_index("ab", 5), 2);
    }
}
