//! Directive expression language
//!
//! A small boolean/arithmetic/string language used by `if` and `elif`
//! directives. Expressions are parsed from the token stream by
//! [`ExpressionParser`] and reduced to a [`Value`] by [`Evaluator`] against a
//! case-insensitive [`Variables`] environment.

pub mod evaluator;
pub mod parser;
pub mod value;
pub mod variables;

pub use evaluator::Evaluator;
pub use parser::ExpressionParser;
pub use value::Value;
pub use variables::{Variables, VariablesError};

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Minus,
    Not,
}

impl UnaryOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOperator::Minus => "-",
            UnaryOperator::Not => "!",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Plus,
    Minus,
    Multiply,
    Divide,
    And,
    Or,
    Equal,
    NotEqual,
    LessThan,
    GreaterThan,
    LessThanOrEqual,
    GreaterThanOrEqual,
}

impl BinaryOperator {
    /// Folding order: lower values bind tighter and are combined first
    pub fn priority(&self) -> u8 {
        match self {
            BinaryOperator::Multiply | BinaryOperator::Divide => 1,
            BinaryOperator::Plus | BinaryOperator::Minus => 2,
            BinaryOperator::Equal | BinaryOperator::NotEqual => 3,
            BinaryOperator::LessThan
            | BinaryOperator::GreaterThan
            | BinaryOperator::LessThanOrEqual
            | BinaryOperator::GreaterThanOrEqual => 4,
            BinaryOperator::And | BinaryOperator::Or => 5,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOperator::Plus => "+",
            BinaryOperator::Minus => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::And => "&&",
            BinaryOperator::Or => "||",
            BinaryOperator::Equal => "==",
            BinaryOperator::NotEqual => "!=",
            BinaryOperator::LessThan => "<",
            BinaryOperator::GreaterThan => ">",
            BinaryOperator::LessThanOrEqual => "<=",
            BinaryOperator::GreaterThanOrEqual => ">=",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Constant(Value),
    /// Variable reference, name as written in the source
    Variable(String),
    Unary {
        operator: UnaryOperator,
        operand: Box<Expression>,
    },
    Binary {
        operator: BinaryOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
}

impl Expression {
    pub fn constant(value: impl Into<Value>) -> Self {
        Expression::Constant(value.into())
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Expression::Variable(name.into())
    }

    pub fn unary(operator: UnaryOperator, operand: Expression) -> Self {
        Expression::Unary {
            operator,
            operand: Box::new(operand),
        }
    }

    pub fn binary(operator: BinaryOperator, left: Expression, right: Expression) -> Self {
        Expression::Binary {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

/// Fully parenthesized rendering, used in diagnostics
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Constant(value) => write!(f, "{}", value),
            Expression::Variable(name) => f.write_str(name),
            Expression::Unary { operator, operand } => {
                write!(f, "{}{}", operator.symbol(), operand)
            }
            Expression::Binary {
                operator,
                left,
                right,
            } => write!(f, "({} {} {})", left, operator.symbol(), right),
        }
    }
}
