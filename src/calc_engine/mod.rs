//! Expression evaluation for the calculator.
//!
//! Input goes through [`lexer::tokenize`] and is then evaluated by
//! [`parser::Parser`] while it is parsed. Precedence is `^` (right
//! associative), then `* / %`, then `+ -`. Function calls and plain groups
//! are evaluated innermost first.

mod error;
mod lexer;
mod parser;

pub use error::CalcError;
pub use lexer::{FunctionName, Operator};

use lexer::tokenize;
use parser::Parser;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// How `sin`, `cos` and `tan` read their argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AngleMode {
    #[default]
    Radians,
    Degrees,
}

impl AngleMode {
    pub fn toggle(self) -> Self {
        match self {
            AngleMode::Radians => AngleMode::Degrees,
            AngleMode::Degrees => AngleMode::Radians,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AngleMode::Radians => "rad",
            AngleMode::Degrees => "deg",
        }
    }
}

impl fmt::Display for AngleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Error)]
#[error("unknown angle mode '{0}', expected 'rad' or 'deg'")]
pub struct ParseAngleModeError(String);

impl FromStr for AngleMode {
    type Err = ParseAngleModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rad" | "radian" | "radians" => Ok(AngleMode::Radians),
            "deg" | "degree" | "degrees" => Ok(AngleMode::Degrees),
            _ => Err(ParseAngleModeError(s.to_string())),
        }
    }
}

pub struct Step {
    pub operation: String,
    pub result: f64,
}

pub struct EvaluationTrace {
    pub steps: Vec<Step>,
    pub detailed_mode: bool,
}

impl EvaluationTrace {
    pub fn new(detailed_mode: bool) -> Self {
        EvaluationTrace {
            steps: Vec::new(),
            detailed_mode,
        }
    }

    pub fn add_step(&mut self, operation: String, result: f64) {
        if self.detailed_mode {
            self.steps.push(Step { operation, result });
        }
    }
}

pub fn evaluate(expression: &str, mode: AngleMode) -> Result<f64, CalcError> {
    evaluate_traced(expression, mode, &mut EvaluationTrace::new(false))
}

/// Evaluates `expression`, recording each reduction in `trace` when the
/// trace is in detailed mode.
pub fn evaluate_traced(
    expression: &str,
    mode: AngleMode,
    trace: &mut EvaluationTrace,
) -> Result<f64, CalcError> {
    let result = tokenize(expression).and_then(|tokens| Parser::new(tokens, mode).parse(trace));

    match &result {
        Ok(value) => debug!(expression, %mode, value, "evaluated"),
        Err(err) => debug!(
            expression,
            %mode,
            kind = err.kind(),
            detail = %err.detail(),
            "evaluation failed"
        ),
    }
    result
}

/// Renders a result the way the calculator display shows it: whole numbers
/// keep a trailing `.0`.
pub fn format_value(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

/// Text shown for an evaluation outcome, value or error.
pub fn display_outcome(result: &Result<f64, CalcError>) -> String {
    match result {
        Ok(value) => format_value(*value),
        Err(err) => err.to_string(),
    }
}
