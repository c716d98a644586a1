use super::error::CalcError;
use super::lexer::{FunctionName, Operator, Token};
use super::{AngleMode, EvaluationTrace};
use std::f64::consts::PI;

/// Deepest nesting of groups and `^` exponents accepted before evaluation
/// gives up with [`CalcError::TooDeep`].
pub const MAX_DEPTH: usize = 256;

/// Precedence-climbing evaluator over a token list.
///
/// Binding strength, loosest first:
/// `+ -` (left), `* / %` (left), `^` (right), a sign directly after an
/// operator, then numbers, groups and function calls. A leading `-` in an
/// expression or group subtracts from zero, so `-2^2` is `-4` while `2*-3^2`
/// squares the negative operand.
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    mode: AngleMode,
    depth: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>, mode: AngleMode) -> Self {
        Parser {
            tokens,
            current: 0,
            mode,
            depth: 0,
        }
    }

    pub fn parse(&mut self, trace: &mut EvaluationTrace) -> Result<f64, CalcError> {
        check_balance(&self.tokens)?;
        if self.tokens.is_empty() {
            return Err(CalcError::invalid_token(""));
        }

        let result = self.expr(trace)?;
        match self.tokens.get(self.current) {
            None => Ok(result),
            Some(token) => Err(self.unexpected(token)),
        }
    }

    fn peek_op(&self) -> Option<Operator> {
        match self.tokens.get(self.current) {
            Some(Token::Op(op)) => Some(*op),
            _ => None,
        }
    }

    fn expr(&mut self, trace: &mut EvaluationTrace) -> Result<f64, CalcError> {
        let mut left = if self.peek_op() == Some(Operator::Sub) {
            0.0
        } else {
            self.term(trace)?
        };

        while let Some(op @ (Operator::Add | Operator::Sub)) = self.peek_op() {
            self.current += 1;
            let right = self.term(trace)?;
            left = apply(op, left, right, trace)?;
        }
        Ok(left)
    }

    fn term(&mut self, trace: &mut EvaluationTrace) -> Result<f64, CalcError> {
        let mut left = self.power(trace)?;

        while let Some(op @ (Operator::Mul | Operator::Div | Operator::Rem)) = self.peek_op() {
            self.current += 1;
            let right = self.power(trace)?;
            left = apply(op, left, right, trace)?;
        }
        Ok(left)
    }

    fn power(&mut self, trace: &mut EvaluationTrace) -> Result<f64, CalcError> {
        let base = self.operand(trace)?;

        if self.peek_op() == Some(Operator::Pow) {
            self.current += 1;
            self.descend()?;
            let exponent = self.power(trace);
            self.depth -= 1;
            return apply(Operator::Pow, base, exponent?, trace);
        }
        Ok(base)
    }

    fn operand(&mut self, trace: &mut EvaluationTrace) -> Result<f64, CalcError> {
        if self.peek_op() == Some(Operator::Sub) {
            self.current += 1;
            let value = self.primary(trace)?;
            return Ok(-value);
        }
        self.primary(trace)
    }

    fn primary(&mut self, trace: &mut EvaluationTrace) -> Result<f64, CalcError> {
        let Some(token) = self.tokens.get(self.current).cloned() else {
            return Err(CalcError::invalid_token(""));
        };

        match token {
            Token::Number(n) => {
                self.current += 1;
                Ok(n)
            }
            Token::LParen => {
                self.current += 1;
                self.group(trace)
            }
            Token::Function(function) => {
                self.current += 1;
                if self.tokens.get(self.current) != Some(&Token::LParen) {
                    return Err(CalcError::InvalidFunction {
                        name: function.name().to_string(),
                    });
                }
                self.current += 1;
                let argument = self.group(trace)?;
                self.call(function, argument, trace)
            }
            other => Err(CalcError::invalid_token(other.to_string())),
        }
    }

    /// Evaluates the inside of a group whose `(` was already consumed.
    fn group(&mut self, trace: &mut EvaluationTrace) -> Result<f64, CalcError> {
        self.descend()?;
        let value = self.expr(trace);
        self.depth -= 1;
        let value = value?;
        match self.tokens.get(self.current) {
            Some(Token::RParen) => {
                self.current += 1;
                Ok(value)
            }
            // unclosed group
            None => Err(CalcError::invalid_token("(")),
            Some(token) => Err(self.unexpected(token)),
        }
    }

    fn call(
        &self,
        function: FunctionName,
        argument: f64,
        trace: &mut EvaluationTrace,
    ) -> Result<f64, CalcError> {
        let angle = match self.mode {
            AngleMode::Degrees => argument * (PI / 180.0),
            AngleMode::Radians => argument,
        };
        let domain_error = || CalcError::MathDomain {
            function: function.name(),
            argument,
        };

        let result = match function {
            FunctionName::Sin => angle.sin(),
            FunctionName::Cos => angle.cos(),
            FunctionName::Tan => angle.tan(),
            FunctionName::Sqrt => {
                if argument < 0.0 {
                    return Err(domain_error());
                }
                argument.powf(0.5)
            }
            FunctionName::Log => {
                if argument <= 0.0 {
                    return Err(domain_error());
                }
                argument.log10()
            }
            FunctionName::Ln => {
                if argument <= 0.0 {
                    return Err(domain_error());
                }
                argument.ln()
            }
        };

        let operation = if function.is_trigonometric() && self.mode == AngleMode::Degrees {
            format!("{}({}°)", function.name(), argument)
        } else {
            format!("{}({})", function.name(), argument)
        };
        trace.add_step(operation, result);
        Ok(result)
    }

    fn descend(&mut self) -> Result<(), CalcError> {
        if self.depth >= MAX_DEPTH {
            return Err(CalcError::TooDeep { limit: MAX_DEPTH });
        }
        self.depth += 1;
        Ok(())
    }

    /// Error for a token that cannot follow a complete operand.
    fn unexpected(&self, token: &Token) -> CalcError {
        match token {
            Token::LParen => CalcError::InvalidFunction {
                name: self
                    .current
                    .checked_sub(1)
                    .and_then(|i| self.tokens.get(i))
                    .map(ToString::to_string)
                    .unwrap_or_default(),
            },
            other => CalcError::invalid_token(other.to_string()),
        }
    }
}

fn apply(
    op: Operator,
    left: f64,
    right: f64,
    trace: &mut EvaluationTrace,
) -> Result<f64, CalcError> {
    let result = match op {
        Operator::Add => left + right,
        Operator::Sub => left - right,
        Operator::Mul => left * right,
        Operator::Div => {
            if right == 0.0 {
                return Err(CalcError::DivideByZero);
            }
            left / right
        }
        Operator::Rem => {
            if right == 0.0 {
                return Err(CalcError::ZeroDivision { operator: op });
            }
            floored_rem(left, right)
        }
        Operator::Pow => {
            if left == 0.0 && right < 0.0 {
                return Err(CalcError::ZeroDivision { operator: op });
            }
            if left < 0.0 && right.fract() != 0.0 {
                return Err(CalcError::MathDomain {
                    function: "pow",
                    argument: left,
                });
            }
            left.powf(right)
        }
    };

    trace.add_step(format!("{} {} {}", left, op.symbol(), right), result);
    Ok(result)
}

/// Remainder that takes the sign of the divisor.
fn floored_rem(left: f64, right: f64) -> f64 {
    let rem = left % right;
    if rem != 0.0 && (rem < 0.0) != (right < 0.0) {
        rem + right
    } else {
        rem
    }
}

/// Every `)` needs an open `(` somewhere to its left.
fn check_balance(tokens: &[Token]) -> Result<(), CalcError> {
    let mut depth = 0usize;
    for (position, token) in tokens.iter().enumerate() {
        match token {
            Token::LParen => depth += 1,
            Token::RParen => {
                depth = depth
                    .checked_sub(1)
                    .ok_or(CalcError::UnmatchedParenthesis { position })?;
            }
            _ => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc_engine::lexer::tokenize;
    use pretty_assertions::assert_eq;

    fn eval(input: &str) -> Result<f64, CalcError> {
        let tokens = tokenize(input)?;
        Parser::new(tokens, AngleMode::Radians).parse(&mut EvaluationTrace::new(false))
    }

    fn steps(input: &str) -> Vec<String> {
        let tokens = tokenize(input).unwrap();
        let mut trace = EvaluationTrace::new(true);
        Parser::new(tokens, AngleMode::Degrees)
            .parse(&mut trace)
            .unwrap();
        trace.steps.into_iter().map(|step| step.operation).collect()
    }

    #[test]
    fn precedence_classes() {
        assert_eq!(eval("2+3*4"), Ok(14.0));
        assert_eq!(eval("2*3+4"), Ok(10.0));
        assert_eq!(eval("2*2^3"), Ok(16.0));
        assert_eq!(eval("7-4%3"), Ok(6.0));
    }

    #[test]
    fn left_association() {
        assert_eq!(eval("10-5-2"), Ok(3.0));
        assert_eq!(eval("20/4/2"), Ok(2.5));
        assert_eq!(eval("17%5%3"), Ok(2.0));
    }

    #[test]
    fn power_associates_right() {
        assert_eq!(eval("2^3^2"), Ok(512.0));
        assert_eq!(steps("2^3^2"), vec!["3 ^ 2", "2 ^ 9"]);
    }

    #[test]
    fn signs() {
        assert_eq!(eval("-5"), Ok(-5.0));
        assert_eq!(eval("-2^2"), Ok(-4.0));
        assert_eq!(eval("2*-3"), Ok(-6.0));
        assert_eq!(eval("2*-3^2"), Ok(18.0));
        assert_eq!(eval("2^-2"), Ok(0.25));
        assert_eq!(eval("2--3"), Ok(5.0));
        assert_eq!(eval("--3"), Ok(3.0));
        assert_eq!(eval("2*-(1+2)"), Ok(-6.0));
        assert_eq!(steps("-2+3"), vec!["0 - 2", "-2 + 3"]);
    }

    #[test]
    fn malformed_operators() {
        for input in ["2+*3", "2---3", "+3", "2*", "-", "3 sqrt(4)", "()", ""] {
            assert!(
                matches!(eval(input), Err(CalcError::InvalidToken { .. })),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn modulo_takes_divisor_sign() {
        assert_eq!(eval("(0-7)%3"), Ok(2.0));
        assert_eq!(eval("-7%3"), Ok(-1.0));
        assert_eq!(eval("7%-3"), Ok(-2.0));
        assert_eq!(eval("7.5%2"), Ok(1.5));
    }

    #[test]
    fn zero_divisors() {
        assert_eq!(eval("10/0"), Err(CalcError::DivideByZero));
        assert_eq!(eval("1/(2-2)"), Err(CalcError::DivideByZero));
        assert_eq!(
            eval("10%0"),
            Err(CalcError::ZeroDivision {
                operator: Operator::Rem
            })
        );
        assert_eq!(
            eval("0^-1"),
            Err(CalcError::ZeroDivision {
                operator: Operator::Pow
            })
        );
    }

    #[test]
    fn fractional_power_of_negative() {
        assert!(matches!(
            eval("(0-8)^0.5"),
            Err(CalcError::MathDomain { function: "pow", .. })
        ));
        assert_eq!(eval("(0-2)^3"), Ok(-8.0));
    }

    #[test]
    fn groups() {
        assert_eq!(eval("(2+3)*(4-1)"), Ok(15.0));
        assert_eq!(eval("((2))"), Ok(2.0));
        assert_eq!(eval("2^(1+1)"), Ok(4.0));
        assert_eq!(eval("(-3)"), Ok(-3.0));
    }

    #[test]
    fn parenthesis_errors() {
        assert_eq!(
            eval("2+3)"),
            Err(CalcError::UnmatchedParenthesis { position: 3 })
        );
        assert_eq!(
            eval(")2("),
            Err(CalcError::UnmatchedParenthesis { position: 0 })
        );
        assert!(matches!(eval("(2+3"), Err(CalcError::InvalidToken { .. })));
        assert!(matches!(eval("sqrt(16"), Err(CalcError::InvalidToken { .. })));
    }

    #[test]
    fn group_after_operand() {
        assert_eq!(
            eval("2(3)"),
            Err(CalcError::InvalidFunction {
                name: "2".to_string()
            })
        );
        assert_eq!(
            eval("(1)(2)"),
            Err(CalcError::InvalidFunction {
                name: ")".to_string()
            })
        );
    }

    #[test]
    fn domain_guards() {
        assert!(matches!(
            eval("sqrt(0-4)"),
            Err(CalcError::MathDomain { function: "sqrt", .. })
        ));
        assert!(matches!(
            eval("log(0)"),
            Err(CalcError::MathDomain { function: "log", .. })
        ));
        assert!(matches!(
            eval("ln(-1)"),
            Err(CalcError::MathDomain { function: "ln", .. })
        ));
    }

    #[test]
    fn deep_nesting_is_an_error() {
        let nested = format!("{}1{}", "(".repeat(50_000), ")".repeat(50_000));
        assert_eq!(eval(&nested), Err(CalcError::TooDeep { limit: MAX_DEPTH }));

        let tower = format!("{}2", "2^".repeat(50_000));
        assert_eq!(eval(&tower), Err(CalcError::TooDeep { limit: MAX_DEPTH }));

        let sqrts = format!("{}16{}", "sqrt(".repeat(50_000), ")".repeat(50_000));
        assert_eq!(eval(&sqrts), Err(CalcError::TooDeep { limit: MAX_DEPTH }));
    }

    #[test]
    fn nesting_up_to_the_limit() {
        let nested = format!("{}1{}", "(".repeat(MAX_DEPTH), ")".repeat(MAX_DEPTH));
        assert_eq!(eval(&nested), Ok(1.0));
        assert_eq!(eval(&format!("{}1", "1^".repeat(MAX_DEPTH))), Ok(1.0));
    }

    #[test]
    fn function_steps_note_degrees() {
        assert_eq!(steps("sin(30)*2"), vec!["sin(30°)", "0.49999999999999994 * 2"]);
    }
}
