use super::error::CalcError;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
}

impl Operator {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Sub),
            '*' => Some(Operator::Mul),
            '/' => Some(Operator::Div),
            '%' => Some(Operator::Rem),
            '^' => Some(Operator::Pow),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
            Operator::Mul => '*',
            Operator::Div => '/',
            Operator::Rem => '%',
            Operator::Pow => '^',
        }
    }
}

/// Functions that may prefix a parenthesised group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionName {
    Sin,
    Cos,
    Tan,
    Sqrt,
    Log,
    Ln,
}

impl FunctionName {
    pub const ALL: [FunctionName; 6] = [
        FunctionName::Sin,
        FunctionName::Cos,
        FunctionName::Tan,
        FunctionName::Sqrt,
        FunctionName::Log,
        FunctionName::Ln,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|function| function.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            FunctionName::Sin => "sin",
            FunctionName::Cos => "cos",
            FunctionName::Tan => "tan",
            FunctionName::Sqrt => "sqrt",
            FunctionName::Log => "log",
            FunctionName::Ln => "ln",
        }
    }

    pub fn is_trigonometric(self) -> bool {
        matches!(self, FunctionName::Sin | FunctionName::Cos | FunctionName::Tan)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    Op(Operator),
    Function(FunctionName),
    LParen,
    RParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{}", n),
            Token::Op(op) => write!(f, "{}", op.symbol()),
            Token::Function(function) => f.write_str(function.name()),
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
        }
    }
}

/// Splits raw calculator input into tokens.
///
/// Whitespace is skipped everywhere, including between the digits of a
/// literal (`2 3` is `23`). A name is accepted only when it is
/// immediately followed by `(`; known names become [`Token::Function`],
/// unknown ones are reported as [`CalcError::InvalidFunction`].
pub fn tokenize(input: &str) -> Result<Vec<Token>, CalcError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                tokens.push(Token::LParen);
                chars.next();
            }
            ')' => {
                tokens.push(Token::RParen);
                chars.next();
            }
            '0'..='9' | '.' => {
                let mut literal = String::new();
                // spaces inside a literal are ignored, so "1 0" reads as 10
                while let Some(&ch) = chars.peek() {
                    if ch.is_ascii_digit() || ch == '.' {
                        literal.push(ch);
                    } else if !ch.is_whitespace() {
                        break;
                    }
                    chars.next();
                }

                let value = literal
                    .parse::<f64>()
                    .map_err(|_| CalcError::invalid_token(literal.as_str()))?;
                tokens.push(Token::Number(value));
            }
            c if c.is_alphabetic() => {
                let mut name = String::new();
                while let Some(&ch) = chars.peek() {
                    if ch.is_alphabetic() {
                        name.push(ch);
                        chars.next();
                    } else {
                        break;
                    }
                }

                if chars.peek() != Some(&'(') {
                    return Err(CalcError::invalid_token(name));
                }
                match FunctionName::from_name(&name) {
                    Some(function) => tokens.push(Token::Function(function)),
                    None => return Err(CalcError::InvalidFunction { name }),
                }
            }
            _ => match Operator::from_char(c) {
                Some(op) => {
                    tokens.push(Token::Op(op));
                    chars.next();
                }
                None => return Err(CalcError::invalid_token(c.to_string())),
            },
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn coalesces_digit_runs() {
        assert_eq!(
            tokenize("12.5+3").unwrap(),
            vec![
                Token::Number(12.5),
                Token::Op(Operator::Add),
                Token::Number(3.0)
            ]
        );
        assert_eq!(tokenize(".5").unwrap(), vec![Token::Number(0.5)]);
        assert_eq!(tokenize("5.").unwrap(), vec![Token::Number(5.0)]);
    }

    #[test]
    fn spaces_inside_literals_are_skipped() {
        assert_eq!(tokenize(" 2 3 ").unwrap(), vec![Token::Number(23.0)]);
        assert_eq!(
            tokenize("1 0/2").unwrap(),
            vec![
                Token::Number(10.0),
                Token::Op(Operator::Div),
                Token::Number(2.0)
            ]
        );
        assert_eq!(tokenize("1 . 5").unwrap(), vec![Token::Number(1.5)]);
        assert_eq!(
            tokenize("2 (").unwrap(),
            vec![Token::Number(2.0), Token::LParen]
        );
    }

    #[test]
    fn recognises_function_keywords() {
        assert_eq!(
            tokenize("sqrt(16)").unwrap(),
            vec![
                Token::Function(FunctionName::Sqrt),
                Token::LParen,
                Token::Number(16.0),
                Token::RParen
            ]
        );
        for function in FunctionName::ALL {
            let input = format!("{}(1)", function.name());
            assert_eq!(tokenize(&input).unwrap()[0], Token::Function(function));
        }
    }

    #[test]
    fn unknown_function_name() {
        assert_eq!(
            tokenize("foo(2)"),
            Err(CalcError::InvalidFunction {
                name: "foo".to_string()
            })
        );
        assert!(matches!(
            tokenize("SIN(2)"),
            Err(CalcError::InvalidFunction { .. })
        ));
    }

    #[test]
    fn bare_names_and_stray_characters() {
        assert!(matches!(tokenize("pi"), Err(CalcError::InvalidToken { .. })));
        assert!(matches!(tokenize("sin 30"), Err(CalcError::InvalidToken { .. })));
        assert!(matches!(tokenize("2&3"), Err(CalcError::InvalidToken { .. })));
        assert!(matches!(tokenize("1.2.3"), Err(CalcError::InvalidToken { .. })));
        assert!(matches!(tokenize("."), Err(CalcError::InvalidToken { .. })));
    }
}
