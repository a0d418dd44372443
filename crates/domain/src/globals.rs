use std::collections::BTreeMap;

use derive_more::{Display, From};

use crate::{StorageError, Tick};

/// Key of the start time of the running exercise timer. Zero means the timer is stopped.
pub const EXERCISE_START_TIME: &str = "exerciseStartTime";

pub trait GlobalsRepository {
    fn read_globals(&self) -> BTreeMap<String, Value>;
    fn read_global(&self, key: &str) -> Option<Value>;
    fn write_global(&self, key: &str, value: Value) -> Result<(), StorageError>;
}

/// A primitive setting value.
#[derive(Debug, Display, Clone, From, PartialEq)]
pub enum Value {
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Value {
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            Value::Number(_) | Value::Bool(_) => None,
        }
    }

    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(number) => Some(*number),
            Value::Text(text) => text.trim().parse().ok(),
            Value::Bool(_) => None,
        }
    }

    /// Whether the value holds anything. Empty text, zero, NaN and `false` count as unset.
    #[must_use]
    pub fn is_set(&self) -> bool {
        match self {
            Value::Text(text) => !text.is_empty(),
            Value::Number(number) => *number != 0.0 && !number.is_nan(),
            Value::Bool(b) => *b,
        }
    }

    /// Interpret the value as a tick. Zero, non-numeric and non-finite values yield `None`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn as_tick(&self) -> Option<Tick> {
        self.as_number()
            .filter(|number| number.is_finite() && *number != 0.0)
            .map(|number| Tick::from(number as i64))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<Tick> for Value {
    #[allow(clippy::cast_precision_loss)]
    fn from(value: Tick) -> Self {
        Value::Number(*value as f64)
    }
}
