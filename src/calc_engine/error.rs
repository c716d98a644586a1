use super::lexer::Operator;
use thiserror::Error;

/// Everything that can stop an evaluation.
///
/// The `Display` text is what the calculator shows to the user, so it is
/// kept exactly as the keypad calculator printed it, including the mixed
/// capitalisation of the two error families.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    /// A character or token sequence the flat tokenizer cannot accept.
    #[error("ERROR: INVALID FUNCTION USED")]
    InvalidToken { found: String },

    /// `/` with a zero divisor.
    #[error("ERROR: CANNOT DIVIDE BY ZERO")]
    DivideByZero,

    /// `%` with a zero divisor, or zero raised to a negative power.
    #[error("Error: Cannot Divide By Zero")]
    ZeroDivision { operator: Operator },

    #[error("Error: Unmatched Parenthesis")]
    UnmatchedParenthesis { position: usize },

    /// A parenthesised group preceded by something that is not a known
    /// function name.
    #[error("Error: Invalid Function Used")]
    InvalidFunction { name: String },

    #[error("Error: Math Domain Error")]
    MathDomain { function: &'static str, argument: f64 },

    /// Groups or `^` exponents nested deeper than the evaluator follows.
    #[error("Error: Expression Too Deeply Nested")]
    TooDeep { limit: usize },
}

impl CalcError {
    pub(crate) fn invalid_token(found: impl Into<String>) -> Self {
        CalcError::InvalidToken {
            found: found.into(),
        }
    }

    /// Short, stable name for log output.
    pub fn kind(&self) -> &'static str {
        match self {
            CalcError::InvalidToken { .. } => "invalid_token",
            CalcError::DivideByZero => "divide_by_zero",
            CalcError::ZeroDivision { .. } => "zero_division",
            CalcError::UnmatchedParenthesis { .. } => "unmatched_parenthesis",
            CalcError::InvalidFunction { .. } => "invalid_function",
            CalcError::MathDomain { .. } => "math_domain",
            CalcError::TooDeep { .. } => "too_deep",
        }
    }

    /// Context for log output; the display text never changes.
    pub fn detail(&self) -> String {
        match self {
            CalcError::InvalidToken { found } if found.is_empty() => "missing operand".to_string(),
            CalcError::InvalidToken { found } => format!("unexpected '{}'", found),
            CalcError::DivideByZero => "division by zero".to_string(),
            CalcError::ZeroDivision { operator } => {
                format!("zero divisor for '{}'", operator.symbol())
            }
            CalcError::UnmatchedParenthesis { position } => {
                format!("')' at token {} has no '('", position)
            }
            CalcError::InvalidFunction { name } => format!("no function named '{}'", name),
            CalcError::MathDomain { function, argument } => {
                format!("{} is undefined for {}", function, argument)
            }
            CalcError::TooDeep { limit } => format!("nesting exceeds {} levels", limit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn display_strings_are_verbatim() {
        assert_eq!(
            CalcError::invalid_token("?").to_string(),
            "ERROR: INVALID FUNCTION USED"
        );
        assert_eq!(
            CalcError::DivideByZero.to_string(),
            "ERROR: CANNOT DIVIDE BY ZERO"
        );
        assert_eq!(
            CalcError::ZeroDivision {
                operator: Operator::Rem
            }
            .to_string(),
            "Error: Cannot Divide By Zero"
        );
        assert_eq!(
            CalcError::UnmatchedParenthesis { position: 0 }.to_string(),
            "Error: Unmatched Parenthesis"
        );
        assert_eq!(
            CalcError::InvalidFunction {
                name: "foo".to_string()
            }
            .to_string(),
            "Error: Invalid Function Used"
        );
        assert_eq!(
            CalcError::MathDomain {
                function: "ln",
                argument: 0.0
            }
            .to_string(),
            "Error: Math Domain Error"
        );
        assert_eq!(
            CalcError::TooDeep { limit: 256 }.to_string(),
            "Error: Expression Too Deeply Nested"
        );
    }

    #[test]
    fn detail_names_the_culprit() {
        assert_eq!(CalcError::invalid_token("&").detail(), "unexpected '&'");
        assert_eq!(CalcError::invalid_token("").detail(), "missing operand");
        assert_eq!(
            CalcError::InvalidFunction {
                name: "foo".to_string()
            }
            .detail(),
            "no function named 'foo'"
        );
    }
}
