use crate::tui_mode::app::App;
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

fn heading(title: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        title,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::UNDERLINED),
    ))
}

pub fn render_help(frame: &mut Frame, app: &mut App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" padcalc Help ")
        .title_alignment(Alignment::Center)
        .style(Style::default().bg(Color::Black));

    let help_text = vec![
        Line::from(Span::styled(
            "padcalc - Keypad Calculator",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("Current angle mode: {}", app.angle_mode)),
        Line::from(""),
        heading("Operators (tightest first):"),
        Line::from("  ^ : Power, groups from the right  (2^3^2 = 512.0)"),
        Line::from("  * / % : Multiply, divide, modulo  (7%3 = 1.0)"),
        Line::from("  + - : Add, subtract               (2+3*4 = 14.0)"),
        Line::from("  -x  : A minus after an operator negates the next number (2*-3 = -6.0)"),
        Line::from(""),
        heading("Functions:"),
        Line::from("  sin(x) cos(x) tan(x) : x in radians or degrees, see angle mode"),
        Line::from("  sqrt(x)              : Square root"),
        Line::from("  log(x)               : Base-10 logarithm"),
        Line::from("  ln(x)                : Natural logarithm"),
        Line::from(""),
        heading("Errors:"),
        Line::from("  ERROR: INVALID FUNCTION USED  : unknown character or misplaced operator"),
        Line::from("  ERROR: CANNOT DIVIDE BY ZERO  : x/0"),
        Line::from("  Error: Cannot Divide By Zero  : x%0 or 0^-n"),
        Line::from("  Error: Unmatched Parenthesis  : a ) without its ("),
        Line::from("  Error: Invalid Function Used  : unknown name before ("),
        Line::from("  Error: Math Domain Error      : sqrt, log or ln outside its domain"),
        Line::from("  Error: Expression Too Deeply Nested : more than 256 nested groups or powers"),
        Line::from(""),
        heading("Commands:"),
        Line::from("  rad / deg : Switch angle mode (or press F2)"),
        Line::from("  details <expression> : Show step-by-step evaluation with time"),
        Line::from("  clear : Clear calculation history"),
        Line::from("  help : Show this help screen"),
        Line::from("  quit : Exit the calculator"),
        Line::from(""),
        heading("Navigation:"),
        Line::from("  ← → : Move cursor left/right"),
        Line::from("  Ctrl+←/→ : Move cursor by words"),
        Line::from("  Home/End : Move to start/end of line"),
        Line::from("  Backspace/Delete : Delete a character"),
        Line::from("  Ctrl+U : Clear current input"),
        Line::from("  ↑ ↓ : Navigate calculation history"),
        Line::from("  PgUp/PgDn : Page through history"),
        Line::from("  Mouse wheel : Scroll through history"),
        Line::from(""),
        heading("Examples:"),
        Line::from("  (2+3)*(4-1)"),
        Line::from("  sqrt(16)+log(1000)"),
        Line::from("  details sin(30)*2"),
    ];

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true })
        .scroll((app.help_scroll as u16, 0));

    frame.render_widget(Clear, frame.size());
    frame.render_widget(paragraph, frame.size());
}
