//! Input handling shared by every front end: command words, the `details`
//! marker and the history record each evaluation leaves behind.

use crate::calc_engine::{display_outcome, evaluate_traced, AngleMode, CalcError, EvaluationTrace, Step};
use std::time::{Duration, Instant};
use tracing::info;

const DETAILS: &str = "details";

#[derive(Debug, PartialEq)]
pub enum Command<'a> {
    Quit,
    Clear,
    Help,
    SetMode(AngleMode),
    /// `details` with nothing to evaluate.
    MissingExpression,
    Evaluate { expression: &'a str, detailed: bool },
}

/// Interprets one submitted line. Returns `None` for blank input.
pub fn parse_command(input: &str) -> Option<Command<'_>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    let command = match input.to_lowercase().as_str() {
        "quit" | "exit" | "q" => Command::Quit,
        "clear" | "reset" => Command::Clear,
        "help" => Command::Help,
        "rad" | "radians" => Command::SetMode(AngleMode::Radians),
        "deg" | "degrees" => Command::SetMode(AngleMode::Degrees),
        "details" => Command::MissingExpression,
        _ => match strip_details(input) {
            Some("") => Command::MissingExpression,
            Some(expression) => Command::Evaluate {
                expression,
                detailed: true,
            },
            None => Command::Evaluate {
                expression: input,
                detailed: false,
            },
        },
    };
    Some(command)
}

/// `details <expr>` or `<expr> details`.
fn strip_details(input: &str) -> Option<&str> {
    let marker = DETAILS.len();
    if input.len() > marker {
        if let (Some(head), Some(rest)) = (input.get(..marker), input.get(marker..)) {
            if head.eq_ignore_ascii_case(DETAILS) && rest.starts_with(char::is_whitespace) {
                return Some(rest.trim());
            }
        }
        let split = input.len() - marker;
        if let (Some(rest), Some(tail)) = (input.get(..split), input.get(split..)) {
            if tail.eq_ignore_ascii_case(DETAILS) && rest.ends_with(char::is_whitespace) {
                return Some(rest.trim());
            }
        }
    }
    None
}

pub struct HistoryEntry {
    pub input: String,
    pub result: Result<f64, CalcError>,
    pub detailed_steps: Vec<Step>,
    pub detailed_mode: bool,
    pub angle_mode: AngleMode,
    pub duration: Duration,
}

impl HistoryEntry {
    /// Evaluates `expression` and keeps everything a front end needs to show.
    pub fn evaluate(expression: &str, detailed_mode: bool, angle_mode: AngleMode) -> Self {
        let start_time = Instant::now();
        let mut trace = EvaluationTrace::new(detailed_mode);
        let result = evaluate_traced(expression, angle_mode, &mut trace);
        let duration = start_time.elapsed();

        let entry = HistoryEntry {
            input: expression.to_string(),
            result,
            detailed_steps: trace.steps,
            detailed_mode,
            angle_mode,
            duration,
        };
        info!(mode = %angle_mode, "{}", entry.transcript_line());
        entry
    }

    pub fn outcome(&self) -> String {
        display_outcome(&self.result)
    }

    /// `<expression> = <result>` with the whitespace of the input removed.
    pub fn transcript_line(&self) -> String {
        let expression: String = self.input.chars().filter(|c| !c.is_whitespace()).collect();
        format!("{} = {}", expression, self.outcome())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn command_words() {
        assert_eq!(parse_command("   "), None);
        assert_eq!(parse_command("Quit"), Some(Command::Quit));
        assert_eq!(parse_command("reset"), Some(Command::Clear));
        assert_eq!(parse_command("help"), Some(Command::Help));
        assert_eq!(
            parse_command("DEG"),
            Some(Command::SetMode(AngleMode::Degrees))
        );
        assert_eq!(
            parse_command("rad"),
            Some(Command::SetMode(AngleMode::Radians))
        );
    }

    #[test]
    fn details_marker() {
        assert_eq!(
            parse_command("details 2+3"),
            Some(Command::Evaluate {
                expression: "2+3",
                detailed: true
            })
        );
        assert_eq!(
            parse_command("2 + 3 DETAILS"),
            Some(Command::Evaluate {
                expression: "2 + 3",
                detailed: true
            })
        );
        assert_eq!(parse_command("details"), Some(Command::MissingExpression));
        assert_eq!(
            parse_command(" 1+1 "),
            Some(Command::Evaluate {
                expression: "1+1",
                detailed: false
            })
        );
    }

    #[test]
    fn details_marker_needs_a_separator() {
        assert_eq!(
            parse_command("detailsx"),
            Some(Command::Evaluate {
                expression: "detailsx",
                detailed: false
            })
        );
    }

    #[test]
    fn transcript_strips_whitespace() {
        let entry = HistoryEntry::evaluate("2 + 3 * 4", false, AngleMode::Radians);
        assert_eq!(entry.transcript_line(), "2+3*4 = 14.0");

        let failed = HistoryEntry::evaluate("1 / 0", false, AngleMode::Radians);
        assert_eq!(failed.transcript_line(), "1/0 = ERROR: CANNOT DIVIDE BY ZERO");
    }

    #[test]
    fn trimmed_command_matches_verbatim_field() {
        let field = "  1 0 / 4 details ";
        let Some(Command::Evaluate { expression, detailed }) = parse_command(field) else {
            panic!("expected an evaluation");
        };
        assert!(detailed);
        assert_eq!(expression, "1 0 / 4");

        let trimmed = HistoryEntry::evaluate(expression, false, AngleMode::Radians);
        let verbatim = HistoryEntry::evaluate("  1 0 / 4 ", false, AngleMode::Radians);
        assert_eq!(trimmed.transcript_line(), "10/4 = 2.5");
        assert_eq!(verbatim.transcript_line(), trimmed.transcript_line());
    }

    #[test]
    fn detailed_entries_keep_steps() {
        let entry = HistoryEntry::evaluate("sin(90)*2", true, AngleMode::Degrees);
        assert_eq!(entry.outcome(), "2.0");
        assert_eq!(entry.detailed_steps.len(), 2);
        assert_eq!(entry.detailed_steps[0].operation, "sin(90°)");
    }
}
