//! Runtime values of the directive expression language

use crate::error::{JcyoError, JcyoResult};
use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Boolean(bool),
    Number(f64),
    String(String),
    /// Result of reading a variable that is not set; carries the variable name
    Undefined(String),
}

impl Value {
    pub fn string(text: impl Into<String>) -> Self {
        Value::String(text.into())
    }

    pub fn truthy(&self) -> bool {
        match self {
            Value::Boolean(b) => *b,
            Value::Number(n) => *n != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::Undefined(_) => false,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Boolean(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Undefined(_) => "undefined",
        }
    }

    /// Text used for string concatenation; undefined renders as the empty string
    pub fn canonical_string(&self) -> String {
        match self {
            Value::Boolean(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            Value::String(s) => s.clone(),
            Value::Undefined(_) => String::new(),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Number, or text whose canonical form parses as a number
    fn coerce_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            other => other.canonical_string().trim().parse().ok(),
        }
    }

    /// Equality as used by `==` and `!=`
    ///
    /// Two booleans compare directly, so `DEBUG == true` works; every other
    /// non-string pair must coerce to numbers or fails with "Cannot compare".
    pub fn loose_eq(&self, other: &Value) -> JcyoResult<bool> {
        match (self, other) {
            (Value::String(a), Value::String(b)) => Ok(a == b),
            (Value::Boolean(a), Value::Boolean(b)) => Ok(a == b),
            _ => {
                let (a, b) = self.coerce_pair(other)?;
                Ok(a == b)
            }
        }
    }

    /// Ordering as used by `<`, `>`, `<=` and `>=`; `None` when a NaN is involved
    pub fn loose_cmp(&self, other: &Value) -> JcyoResult<Option<Ordering>> {
        match (self, other) {
            (Value::String(a), Value::String(b)) => Ok(Some(a.cmp(b))),
            _ => {
                let (a, b) = self.coerce_pair(other)?;
                Ok(a.partial_cmp(&b))
            }
        }
    }

    fn coerce_pair(&self, other: &Value) -> JcyoResult<(f64, f64)> {
        match (self.coerce_number(), other.coerce_number()) {
            (Some(a), Some(b)) => Ok((a, b)),
            _ => Err(JcyoError::evaluation(format!(
                "Cannot compare {} and {}",
                self, other
            ))),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "\"{}\"", s.escape_debug()),
            Value::Undefined(name) => write!(f, "undefined ({})", name),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(value as f64)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_truthiness() {
        assert!(Value::from(true).truthy());
        assert!(!Value::from(0.0).truthy());
        assert!(Value::from(-2.5).truthy());
        assert!(!Value::from("").truthy());
        assert!(Value::from("x").truthy());
        assert!(!Value::Undefined("X".into()).truthy());
    }

    #[test]
    fn test_canonical_string() {
        assert_eq!(Value::from(3.0).canonical_string(), "3");
        assert_eq!(Value::from(0.5).canonical_string(), "0.5");
        assert_eq!(Value::from(false).canonical_string(), "false");
        assert_eq!(Value::Undefined("X".into()).canonical_string(), "");
    }

    #[test]
    fn test_string_and_number_comparison() {
        assert!(Value::from("abc").loose_eq(&Value::from("abc")).unwrap());
        assert_eq!(
            Value::from("abc").loose_cmp(&Value::from("abd")).unwrap(),
            Some(Ordering::Less)
        );
        assert!(Value::from("17").loose_eq(&Value::from(17.0)).unwrap());
        assert_eq!(
            Value::from(2.0).loose_cmp(&Value::from("10")).unwrap(),
            Some(Ordering::Less)
        );
    }

    #[test]
    fn test_incomparable_values() {
        assert_matches!(
            Value::from("abc").loose_eq(&Value::from(1.0)),
            Err(JcyoError::Evaluation { .. })
        );
        assert_matches!(
            Value::from(true).loose_cmp(&Value::from(1.0)),
            Err(JcyoError::Evaluation { .. })
        );
        assert!(Value::from(true).loose_eq(&Value::from(true)).unwrap());
        assert!(!Value::from(true).loose_eq(&Value::from(false)).unwrap());
    }
}
