//! Variable environment for directive evaluation
//!
//! Names are case-insensitive: they are stored and looked up in upper case.
//! The environment is filled before processing starts and only read afterwards.

use super::Value;
use crate::config::compile_time::expression::MAX_VARIABLES;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum VariablesError {
    #[error("Failed to read variables file {path}: {message}")]
    Io { path: String, message: String },

    #[error("Invalid variables TOML: {message}")]
    Toml { message: String },

    #[error("Variable '{name}' has unsupported type {kind}")]
    UnsupportedValue { name: String, kind: &'static str },

    #[error("Invalid variable assignment '{text}': expected NAME=VALUE")]
    InvalidAssignment { text: String },

    #[error("Too many variables: more than {max}")]
    TooMany { max: usize },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Variables {
    values: HashMap<String, Value>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: &str, value: impl Into<Value>) {
        self.values.insert(name.to_uppercase(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(&name.to_uppercase())
    }

    pub fn extend(&mut self, other: Variables) {
        self.values.extend(other.values);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Parse a top-level TOML table of booleans, numbers and strings
    pub fn from_toml_str(source: &str) -> Result<Self, VariablesError> {
        let table: toml::Table = source.parse().map_err(|e: toml::de::Error| {
            VariablesError::Toml {
                message: e.to_string(),
            }
        })?;

        if table.len() > MAX_VARIABLES {
            return Err(VariablesError::TooMany { max: MAX_VARIABLES });
        }

        let mut variables = Variables::new();
        for (name, value) in table {
            let value = match value {
                toml::Value::Boolean(b) => Value::Boolean(b),
                toml::Value::Integer(i) => Value::Number(i as f64),
                toml::Value::Float(f) => Value::Number(f),
                toml::Value::String(s) => Value::String(s),
                other => {
                    return Err(VariablesError::UnsupportedValue {
                        name,
                        kind: other.type_str(),
                    })
                }
            };
            variables.set(&name, value);
        }
        Ok(variables)
    }

    pub fn load(path: &Path) -> Result<Self, VariablesError> {
        let source = std::fs::read_to_string(path).map_err(|e| VariablesError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&source)
    }

    /// `NAME=value`: `true`/`false` become booleans, numeric text a number, anything else a string
    pub fn parse_assignment(text: &str) -> Result<(String, Value), VariablesError> {
        let invalid = || VariablesError::InvalidAssignment {
            text: text.to_string(),
        };
        let (name, raw) = text.split_once('=').ok_or_else(invalid)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(invalid());
        }

        let value = match raw {
            "true" => Value::Boolean(true),
            "false" => Value::Boolean(false),
            _ => match raw.parse::<f64>() {
                Ok(n) if !raw.trim().is_empty() => Value::Number(n),
                _ => Value::String(raw.to_string()),
            },
        };
        Ok((name.to_string(), value))
    }

    pub fn set_assignment(&mut self, text: &str) -> Result<(), VariablesError> {
        let (name, value) = Self::parse_assignment(text)?;
        self.set(&name, value);
        Ok(())
    }
}

impl<K: AsRef<str>, V: Into<Value>> FromIterator<(K, V)> for Variables {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut variables = Variables::new();
        for (name, value) in iter {
            variables.set(name.as_ref(), value);
        }
        variables
    }
}
