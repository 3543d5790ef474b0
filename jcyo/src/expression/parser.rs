//! Expression parser
//!
//! Parses a flat sequence `value (op value)*` and then folds it by operator
//! priority: operators are visited tightest first (stable, so ties fold left to
//! right), each combining the nearest unconsumed operand on its left with the
//! operand directly on its right.

use super::{BinaryOperator, Expression, UnaryOperator, Value};
use crate::config::compile_time::expression::MAX_EXPRESSION_DEPTH;
use crate::error::{JcyoError, JcyoResult};
use crate::tokens::{JavaKeyword, PeekableTokenStream, Token};

pub struct ExpressionParser<'s, S> {
    stream: &'s mut S,
    depth: usize,
}

impl<'s, S: PeekableTokenStream> ExpressionParser<'s, S> {
    pub fn new(stream: &'s mut S) -> Self {
        Self { stream, depth: 0 }
    }

    /// Parse one expression, leaving the first token after it unconsumed
    pub fn parse(&mut self) -> JcyoResult<Expression> {
        let mut values = vec![self.next_value()?];
        let mut operators = Vec::new();

        loop {
            self.skip_whitespace()?;
            let Some(operator) = self.try_binary_operator()? else {
                break;
            };
            self.skip_whitespace()?;
            operators.push(operator);
            values.push(self.next_value()?);
        }

        fold_operators(values, operators)
    }

    fn next_value(&mut self) -> JcyoResult<Expression> {
        self.skip_whitespace()?;
        self.depth += 1;
        if self.depth > MAX_EXPRESSION_DEPTH {
            return Err(JcyoError::parse(format!(
                "Expression nesting exceeds {} levels",
                MAX_EXPRESSION_DEPTH
            )));
        }
        let value = self.parse_value();
        self.depth -= 1;
        value
    }

    fn parse_value(&mut self) -> JcyoResult<Expression> {
        let token = self.stream.peek_token()?.clone();
        match token {
            Token::Operator('(') => {
                self.stream.next_token()?;
                let inner = self.parse()?;
                self.skip_whitespace()?;
                match self.stream.next_token()? {
                    Token::Operator(')') => Ok(inner),
                    other => Err(JcyoError::parse(format!(
                        "Expected closing parenthesis, got: {}",
                        other
                    ))),
                }
            }
            Token::Operator('-') => {
                self.stream.next_token()?;
                Ok(Expression::unary(UnaryOperator::Minus, self.next_value()?))
            }
            Token::Operator('!') => {
                self.stream.next_token()?;
                Ok(Expression::unary(UnaryOperator::Not, self.next_value()?))
            }
            Token::Keyword(JavaKeyword::True) => {
                self.stream.next_token()?;
                Ok(Expression::constant(true))
            }
            Token::Keyword(JavaKeyword::False) => {
                self.stream.next_token()?;
                Ok(Expression::constant(false))
            }
            Token::Number(raw) => {
                self.stream.next_token()?;
                parse_number(&raw).map(Expression::constant)
            }
            Token::StringLiteral(raw) => {
                self.stream.next_token()?;
                unescape_string(&raw).map(Expression::Constant)
            }
            Token::Identifier(name) => {
                self.stream.next_token()?;
                Ok(Expression::Variable(name))
            }
            Token::Keyword(keyword) => {
                self.stream.next_token()?;
                Ok(Expression::variable(keyword.as_str()))
            }
            other => Err(JcyoError::parse(format!("Unexpected token {}", other))),
        }
    }

    fn try_binary_operator(&mut self) -> JcyoResult<Option<BinaryOperator>> {
        let Token::Operator(c) = *self.stream.peek_token()? else {
            return Ok(None);
        };

        let operator = match c {
            '+' => BinaryOperator::Plus,
            '-' => BinaryOperator::Minus,
            '*' => BinaryOperator::Multiply,
            '/' => BinaryOperator::Divide,
            '&' => {
                self.stream.next_token()?;
                return self
                    .require_second('&', "And operator requires double ampersand")
                    .map(|_| Some(BinaryOperator::And));
            }
            '|' => {
                self.stream.next_token()?;
                return self
                    .require_second('|', "Or operator requires double pipe")
                    .map(|_| Some(BinaryOperator::Or));
            }
            '=' => {
                self.stream.next_token()?;
                return self
                    .require_second('=', "Equals operator requires double equals")
                    .map(|_| Some(BinaryOperator::Equal));
            }
            '!' => {
                self.stream.next_token()?;
                return self
                    .require_second('=', "Not equals operator requires an equals sign")
                    .map(|_| Some(BinaryOperator::NotEqual));
            }
            '<' | '>' => {
                self.stream.next_token()?;
                let or_equal = self.stream.peek_token()?.is_operator('=');
                if or_equal {
                    self.stream.next_token()?;
                }
                return Ok(Some(match (c, or_equal) {
                    ('<', false) => BinaryOperator::LessThan,
                    ('<', true) => BinaryOperator::LessThanOrEqual,
                    (_, false) => BinaryOperator::GreaterThan,
                    (_, true) => BinaryOperator::GreaterThanOrEqual,
                }));
            }
            _ => return Ok(None),
        };

        self.stream.next_token()?;
        Ok(Some(operator))
    }

    fn require_second(&mut self, expected: char, message: &str) -> JcyoResult<()> {
        if self.stream.peek_token()?.is_operator(expected) {
            self.stream.next_token()?;
            Ok(())
        } else {
            Err(JcyoError::parse(format!(
                "{}, got: {}",
                message,
                self.stream.peek_token()?
            )))
        }
    }

    fn skip_whitespace(&mut self) -> JcyoResult<()> {
        while self.stream.peek_token()?.is_whitespace() {
            self.stream.next_token()?;
        }
        Ok(())
    }
}

fn fold_operators(
    values: Vec<Expression>,
    operators: Vec<BinaryOperator>,
) -> JcyoResult<Expression> {
    let mut slots: Vec<Option<Expression>> = values.into_iter().map(Some).collect();

    let mut order: Vec<usize> = (0..operators.len()).collect();
    order.sort_by_key(|&index| operators[index].priority());

    for index in order {
        let left_index = (0..=index)
            .rev()
            .find(|&i| slots[i].is_some())
            .ok_or_else(|| JcyoError::parse("Missing left operand"))?;
        let left = slots[left_index].take();
        let right = slots.get_mut(index + 1).and_then(Option::take);
        match (left, right) {
            (Some(left), Some(right)) => {
                slots[left_index] = Some(Expression::binary(operators[index], left, right));
            }
            _ => {
                return Err(JcyoError::parse(format!(
                    "Missing operand for {}",
                    operators[index].symbol()
                )))
            }
        }
    }

    slots
        .into_iter()
        .next()
        .flatten()
        .ok_or_else(|| JcyoError::parse("Empty expression"))
}

fn parse_number(raw: &str) -> JcyoResult<Value> {
    let digits = raw
        .strip_suffix(['d', 'D', 'f', 'F'])
        .filter(|rest| !rest.is_empty() && !rest.ends_with(['e', 'E']))
        .unwrap_or(raw);
    digits
        .parse::<f64>()
        .map(Value::Number)
        .map_err(|_| JcyoError::parse(format!("Unexpected number literal {}", raw)))
}

/// Decode a quoted string literal; text blocks lose three quotes on each side
fn unescape_string(raw: &str) -> JcyoResult<Value> {
    let (body, closing) = if raw.len() >= 6 && raw.starts_with("\"\"\"") && raw.ends_with("\"\"\"") {
        (&raw[3..raw.len() - 3], None)
    } else {
        (raw.get(1..).unwrap_or_default(), Some('"'))
    };

    let unterminated = || JcyoError::parse(format!("Unterminated string literal {}", raw));
    let mut text = String::with_capacity(body.len());
    let mut chars = body.chars();
    let mut terminated = closing.is_none();
    while let Some(c) = chars.next() {
        if Some(c) == closing {
            if chars.next().is_some() {
                return Err(unterminated());
            }
            terminated = true;
            break;
        }
        if c != '\\' {
            text.push(c);
            continue;
        }
        text.push(match chars.next() {
            Some('n') => '\n',
            Some('r') => '\r',
            Some('t') => '\t',
            Some('"') => '"',
            Some('\\') => '\\',
            Some(other) => {
                return Err(JcyoError::parse(format!(
                    "Unexpected escape sequence \\{}",
                    other
                )))
            }
            None => return Err(unterminated()),
        });
    }

    if terminated {
        Ok(Value::String(text))
    } else {
        Err(unterminated())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::Lexer;
    use crate::options::JcyoOptions;
    use crate::tokens::{Peekable, TokenStream};
    use assert_matches::assert_matches;

    fn parse(source: &str) -> JcyoResult<Expression> {
        let mut stream = Peekable::new(Lexer::new(source, &JcyoOptions::default()));
        ExpressionParser::new(&mut stream).parse()
    }

    fn shape(source: &str) -> String {
        parse(source).unwrap().to_string()
    }

    #[test]
    fn test_constants_and_variables() {
        assert_eq!(parse("true").unwrap(), Expression::constant(true));
        assert_eq!(parse("1E100").unwrap(), Expression::constant(1e100));
        assert_eq!(parse("2.5f").unwrap(), Expression::constant(2.5));
        assert_eq!(parse(r#""a\tb""#).unwrap(), Expression::constant("a\tb"));
        assert_eq!(parse("Foo").unwrap(), Expression::variable("Foo"));
        assert_eq!(parse("class").unwrap(), Expression::variable("class"));
    }

    #[test]
    fn test_text_block_string() {
        assert_eq!(
            parse("\"\"\"ab\\\"c\"\"\"").unwrap(),
            Expression::constant("ab\"c")
        );
    }

    #[test]
    fn test_precedence_shapes() {
        assert_eq!(shape("1 + 2 * 3 == 7"), "((1 + (2 * 3)) == 7)");
        assert_eq!(shape("2 * (3 + 4) == 14"), "((2 * (3 + 4)) == 14)");
        assert_eq!(shape("a*b+c*d"), "((a * b) + (c * d))");
        assert_eq!(shape("a - b - c"), "((a - b) - c)");
        assert_eq!(shape("a < b == c"), "(a < (b == c))");
        assert_eq!(shape("a || b && c"), "((a || b) && c)");
        assert_eq!(shape("!a && -b <= 3"), "(!a && (-b <= 3))");
    }

    #[test]
    fn test_comparison_operators() {
        assert_eq!(shape("a<=b"), "(a <= b)");
        assert_eq!(shape("a >= b"), "(a >= b)");
        assert_eq!(shape("a > b"), "(a > b)");
        assert_eq!(shape("a != b"), "(a != b)");
    }

    #[test]
    fn test_stops_before_trailing_tokens() {
        let mut stream = Peekable::new(Lexer::new("A && B */", &JcyoOptions::default()));
        let expression = ExpressionParser::new(&mut stream).parse().unwrap();
        assert_eq!(expression.to_string(), "(A && B)");
        assert_eq!(stream.next_token().unwrap(), Token::end("*/"));
    }

    #[test]
    fn test_malformed_expressions() {
        assert_matches!(parse("a & b"), Err(JcyoError::Parse { .. }));
        assert_matches!(parse("a = b"), Err(JcyoError::Parse { .. }));
        assert_matches!(parse("(a"), Err(JcyoError::Parse { .. }));
        assert_matches!(parse("0xZZ"), Err(JcyoError::Parse { .. }));
        assert_matches!(parse(r#""\q""#), Err(JcyoError::Parse { .. }));
        assert_matches!(parse("\"open"), Err(JcyoError::Parse { .. }));
        assert_eq!(parse(r#""a\\""#).unwrap(), Expression::constant("a\\"));
        assert_matches!(parse("+"), Err(JcyoError::Parse { .. }));
    }

    #[test]
    fn test_depth_limit() {
        let source = "(".repeat(MAX_EXPRESSION_DEPTH + 1) + "1";
        assert_matches!(parse(&source), Err(JcyoError::Parse { .. }));
    }
}
