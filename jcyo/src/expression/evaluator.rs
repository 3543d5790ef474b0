//! Reduces expression trees to values

use super::{BinaryOperator, Expression, UnaryOperator, Value, Variables};
use crate::error::{JcyoError, JcyoResult};
use std::cmp::Ordering;

pub struct Evaluator<'v> {
    variables: &'v Variables,
}

impl<'v> Evaluator<'v> {
    pub fn new(variables: &'v Variables) -> Self {
        Self { variables }
    }

    pub fn evaluate(&self, expression: &Expression) -> JcyoResult<Value> {
        match expression {
            Expression::Constant(value) => Ok(value.clone()),
            Expression::Variable(name) => Ok(self
                .variables
                .get(name)
                .cloned()
                .unwrap_or_else(|| Value::Undefined(name.clone()))),
            Expression::Unary { operator, operand } => {
                let value = self.evaluate(operand)?;
                match operator {
                    UnaryOperator::Minus => {
                        Ok(Value::Number(-expect_number(&value, "in unary minus")?))
                    }
                    UnaryOperator::Not => Ok(Value::Boolean(!value.truthy())),
                }
            }
            Expression::Binary {
                operator,
                left,
                right,
            } => self.evaluate_binary(*operator, left, right),
        }
    }

    /// Truthiness of an expression, the question every `if`/`elif` asks
    pub fn is_truthy(&self, expression: &Expression) -> JcyoResult<bool> {
        Ok(self.evaluate(expression)?.truthy())
    }

    fn evaluate_binary(
        &self,
        operator: BinaryOperator,
        left: &Expression,
        right: &Expression,
    ) -> JcyoResult<Value> {
        let left = self.evaluate(left)?;

        // Logical operators short-circuit
        match operator {
            BinaryOperator::And if !left.truthy() => Ok(Value::Boolean(false)),
            BinaryOperator::Or if left.truthy() => Ok(Value::Boolean(true)),
            _ => combine(operator, left, self.evaluate(right)?),
        }
    }
}

fn combine(operator: BinaryOperator, left: Value, right: Value) -> JcyoResult<Value> {
    let value = match operator {
        BinaryOperator::Plus => {
            if matches!(left, Value::String(_)) || matches!(right, Value::String(_)) {
                Value::String(left.canonical_string() + &right.canonical_string())
            } else {
                Value::Number(
                    expect_number(&left, "on left side of plus")?
                        + expect_number(&right, "on right side of plus")?,
                )
            }
        }
        BinaryOperator::Minus => Value::Number(
            expect_number(&left, "on left side of minus")?
                - expect_number(&right, "on right side of minus")?,
        ),
        BinaryOperator::Multiply => Value::Number(
            expect_number(&left, "on left side of multiply")?
                * expect_number(&right, "on right side of multiply")?,
        ),
        BinaryOperator::Divide => Value::Number(
            expect_number(&left, "on left side of divide")?
                / expect_number(&right, "on right side of divide")?,
        ),
        BinaryOperator::Equal => Value::Boolean(left.loose_eq(&right)?),
        BinaryOperator::NotEqual => Value::Boolean(!left.loose_eq(&right)?),
        BinaryOperator::LessThan => {
            Value::Boolean(left.loose_cmp(&right)? == Some(Ordering::Less))
        }
        BinaryOperator::GreaterThan => {
            Value::Boolean(left.loose_cmp(&right)? == Some(Ordering::Greater))
        }
        BinaryOperator::LessThanOrEqual => Value::Boolean(matches!(
            left.loose_cmp(&right)?,
            Some(Ordering::Less | Ordering::Equal)
        )),
        BinaryOperator::GreaterThanOrEqual => Value::Boolean(matches!(
            left.loose_cmp(&right)?,
            Some(Ordering::Greater | Ordering::Equal)
        )),
        BinaryOperator::And => Value::Boolean(left.truthy() && right.truthy()),
        BinaryOperator::Or => Value::Boolean(left.truthy() || right.truthy()),
    };
    Ok(value)
}

fn expect_number(value: &Value, context: &str) -> JcyoResult<f64> {
    value.as_number().ok_or_else(|| {
        JcyoError::evaluation(format!("Expected number {}, got: {}", context, value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::ExpressionParser;
    use crate::lexical::Lexer;
    use crate::options::JcyoOptions;
    use crate::tokens::Peekable;
    use assert_matches::assert_matches;

    fn eval_with(source: &str, variables: &Variables) -> JcyoResult<Value> {
        let mut stream = Peekable::new(Lexer::new(source, &JcyoOptions::default()));
        let expression = ExpressionParser::new(&mut stream).parse()?;
        Evaluator::new(variables).evaluate(&expression)
    }

    fn eval(source: &str) -> JcyoResult<Value> {
        eval_with(source, &Variables::new())
    }

    #[test]
    fn test_precedence() {
        assert_eq!(eval("1 + 2 * 3 == 7").unwrap(), Value::Boolean(true));
        assert_eq!(eval("2 * (3 + 4) == 14").unwrap(), Value::Boolean(true));
        assert_eq!(eval("10 - 4 - 3").unwrap(), Value::Number(3.0));
        assert_eq!(eval("8 / 2 / 2").unwrap(), Value::Number(2.0));
    }

    #[test]
    fn test_string_concatenation() {
        assert_eq!(eval(r#""v" + 1.5"#).unwrap(), Value::from("v1.5"));
        assert_eq!(eval(r#"true + "!""#).unwrap(), Value::from("true!"));
        assert_eq!(eval(r#"MISSING + "x""#).unwrap(), Value::from("x"));
        assert_matches!(eval("true + 1"), Err(JcyoError::Evaluation { .. }));
    }

    #[test]
    fn test_variables_are_case_insensitive() {
        let mut variables = Variables::new();
        variables.set("Version", 17.0);
        variables.set("flavor", "fabric");
        assert_eq!(
            eval_with("version >= 17 && FLAVOR == \"fabric\"", &variables).unwrap(),
            Value::Boolean(true)
        );
        assert_eq!(
            eval_with("VERSION < 9", &variables).unwrap(),
            Value::Boolean(false)
        );
    }

    #[test]
    fn test_undefined_is_falsy_not_fatal() {
        assert_eq!(eval("UNSET").unwrap(), Value::Undefined("UNSET".into()));
        assert_eq!(eval("!UNSET").unwrap(), Value::Boolean(true));
        assert_eq!(eval("UNSET || 1").unwrap(), Value::Boolean(true));
    }

    #[test]
    fn test_logical_operators_short_circuit() {
        assert_eq!(eval("false && -\"x\"").unwrap(), Value::Boolean(false));
        assert_eq!(eval("true || -\"x\"").unwrap(), Value::Boolean(true));
        assert_matches!(eval("true && -\"x\""), Err(JcyoError::Evaluation { .. }));
        assert_matches!(eval("false || -\"x\""), Err(JcyoError::Evaluation { .. }));
        assert_eq!(eval("1 && \"\"").unwrap(), Value::Boolean(false));
        assert_eq!(eval("UNSET || \"x\"").unwrap(), Value::Boolean(true));
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(eval("3 > 2").unwrap(), Value::Boolean(true));
        assert_eq!(eval("2 >= 2").unwrap(), Value::Boolean(true));
        assert_eq!(eval("2 <= 1").unwrap(), Value::Boolean(false));
        assert_eq!(eval(r#""b" > "a""#).unwrap(), Value::Boolean(true));
        assert_eq!(eval(r#""10" == 10"#).unwrap(), Value::Boolean(true));
        assert_eq!(eval("1 != 2").unwrap(), Value::Boolean(true));
        assert_matches!(eval(r#""a" < 1"#), Err(JcyoError::Evaluation { .. }));
    }

    #[test]
    fn test_unary_minus_requires_number() {
        assert_eq!(eval("-(2 * 3)").unwrap(), Value::Number(-6.0));
        assert_matches!(eval("-true"), Err(JcyoError::Evaluation { .. }));
    }
}
