//! Calculator tool.
//!
//! Evaluates plain arithmetic (`+ - * /`, unary sign, parentheses) with a
//! small recursive-descent parser. Anything else is rejected; input text is
//! never executed.

use async_trait::async_trait;

use crate::error::Result;
use crate::tool::Tool;

pub const INVALID_EXPRESSION: &str =
    "Invalid expression. Only allow numbers and operations(+ - * /)";

#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    Invalid,
    DivisionByZero,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CalculatorTool;

#[async_trait]
impl Tool for CalculatorTool {
    fn name(&self) -> &str {
        "calculator"
    }

    fn parameters(&self) -> Vec<String> {
        vec!["expression".into()]
    }

    async fn call(&self, input: Option<String>) -> Result<String> {
        let expression = input.unwrap_or_default();
        Ok(match evaluate(&expression) {
            Ok(value) => format_number(value),
            Err(EvalError::DivisionByZero) => "Division by zero is undefined".into(),
            Err(EvalError::Invalid) => INVALID_EXPRESSION.into(),
        })
    }
}

pub fn evaluate(expression: &str) -> std::result::Result<f64, EvalError> {
    let mut parser = Parser {
        chars: expression.chars().filter(|c| !c.is_whitespace()).collect(),
        pos: 0,
        depth: 0,
    };
    if parser.chars.is_empty() {
        return Err(EvalError::Invalid);
    }
    let value = parser.expr()?;
    if parser.pos != parser.chars.len() {
        return Err(EvalError::Invalid);
    }
    Ok(value)
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// Deepest parenthesis nesting accepted.
const MAX_NESTING: usize = 64;

struct Parser {
    chars: Vec<char>,
    pos: usize,
    depth: usize,
}

type Eval = std::result::Result<f64, EvalError>;

impl Parser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    // expr := term (('+' | '-') term)*
    fn expr(&mut self) -> Eval {
        let mut value = self.term()?;
        while let Some(op @ ('+' | '-')) = self.peek() {
            self.pos += 1;
            let rhs = self.term()?;
            value = if op == '+' { value + rhs } else { value - rhs };
        }
        Ok(value)
    }

    // term := factor (('*' | '/') factor)*
    fn term(&mut self) -> Eval {
        let mut value = self.factor()?;
        while let Some(op @ ('*' | '/')) = self.peek() {
            self.pos += 1;
            let rhs = self.factor()?;
            if op == '*' {
                value *= rhs;
            } else if rhs == 0.0 {
                return Err(EvalError::DivisionByZero);
            } else {
                value /= rhs;
            }
        }
        Ok(value)
    }

    // factor := ('+' | '-')* (number | '(' expr ')')
    fn factor(&mut self) -> Eval {
        let mut negate = false;
        while let Some(sign @ ('+' | '-')) = self.peek() {
            self.pos += 1;
            negate ^= sign == '-';
        }
        let value = match self.peek() {
            Some('(') => {
                if self.depth >= MAX_NESTING {
                    return Err(EvalError::Invalid);
                }
                self.depth += 1;
                self.pos += 1;
                let value = self.expr()?;
                if self.peek() != Some(')') {
                    return Err(EvalError::Invalid);
                }
                self.pos += 1;
                self.depth -= 1;
                value
            }
            Some(c) if c.is_ascii_digit() || c == '.' => self.number()?,
            _ => return Err(EvalError::Invalid),
        };
        Ok(if negate { -value } else { value })
    }

    fn number(&mut self) -> Eval {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == '.') {
            self.pos += 1;
        }
        let literal: String = self.chars[start..self.pos].iter().collect();
        literal.parse::<f64>().map_err(|_| EvalError::Invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn respects_precedence_and_parentheses() {
        assert_eq!(evaluate("2 + 3 * 4").unwrap(), 14.0);
        assert_eq!(evaluate("(2 + 3) * 4").unwrap(), 20.0);
        assert_eq!(evaluate("-3 - -2").unwrap(), -1.0);
        assert_eq!(evaluate("7 / 2").unwrap(), 3.5);
        assert_eq!(evaluate("10 - 4 - 3").unwrap(), 3.0);
    }

    #[test]
    fn rejects_anything_but_arithmetic() {
        assert_eq!(evaluate("process.exit()"), Err(EvalError::Invalid));
        assert_eq!(evaluate("2 +"), Err(EvalError::Invalid));
        assert_eq!(evaluate("(1"), Err(EvalError::Invalid));
        assert_eq!(evaluate("1.2.3"), Err(EvalError::Invalid));
        assert_eq!(evaluate(""), Err(EvalError::Invalid));
        assert_eq!(evaluate("1 / 0"), Err(EvalError::DivisionByZero));
    }

    #[test]
    fn long_sign_runs_and_deep_nesting_stay_bounded() {
        assert_eq!(evaluate(&format!("{}1", "-".repeat(2_000_000))).unwrap(), 1.0);
        assert_eq!(evaluate(&format!("{}1", "-".repeat(2_000_001))).unwrap(), -1.0);
        assert_eq!(evaluate("-(+-(2))").unwrap(), 2.0);

        let nested = format!("{}1{}", "(".repeat(64), ")".repeat(64));
        assert_eq!(evaluate(&nested).unwrap(), 1.0);
        let too_deep = format!("{}1{}", "(".repeat(100_000), ")".repeat(100_000));
        assert_eq!(evaluate(&too_deep), Err(EvalError::Invalid));
        let signs_and_parens = "-(".repeat(100_000);
        assert_eq!(evaluate(&signs_and_parens), Err(EvalError::Invalid));
    }

    #[tokio::test]
    async fn tool_reports_invalid_input_as_observation() {
        let tool = CalculatorTool;
        assert_eq!(tool.call(Some("15 * 2".into())).await.unwrap(), "30");
        assert_eq!(tool.call(Some("1 / 4".into())).await.unwrap(), "0.25");
        assert_eq!(tool.call(Some("rm -rf".into())).await.unwrap(), INVALID_EXPRESSION);
        assert_eq!(tool.call(None).await.unwrap(), INVALID_EXPRESSION);
        assert_eq!(tool.signature().render(), "calculator[expression]");
    }
}
