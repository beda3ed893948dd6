//! Tagged field values and their textual coercion policy.
//!
//! # Invariants
//! - Only four value shapes exist: text, integer, float, list of text.
//! - Float values are finite so they survive JSON encoding; `FieldKind::parse`
//!   and [`FieldValue::check`] are the two gates that enforce it.

use crate::error::{StoreError, StoreResult};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Shape of a field value, used for defaults and update coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Float,
    TextList,
}

impl FieldKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::TextList => "text list",
        }
    }

    /// Zero value a fresh record inherits for a declared field of this kind.
    pub fn default_value(self) -> FieldValue {
        match self {
            Self::Text => FieldValue::Text(String::new()),
            Self::Integer => FieldValue::Integer(0),
            Self::Float => FieldValue::Float(0.0),
            Self::TextList => FieldValue::TextList(Vec::new()),
        }
    }

    /// Parses user-supplied text as a value of this kind.
    ///
    /// Text lists accept either a JSON array of strings or comma-separated
    /// items; empty input yields an empty list.
    ///
    /// # Errors
    /// - `InvalidValue` when `raw` does not parse as this kind.
    pub fn parse(self, field: &str, raw: &str) -> StoreResult<FieldValue> {
        let invalid = || StoreError::InvalidValue {
            field: field.to_string(),
            expected: self,
            value: raw.to_string(),
        };

        match self {
            Self::Text => Ok(FieldValue::Text(raw.to_string())),
            Self::Integer => raw
                .trim()
                .parse::<i64>()
                .map(FieldValue::Integer)
                .map_err(|_| invalid()),
            Self::Float => match raw.trim().parse::<f64>() {
                Ok(value) if value.is_finite() => Ok(FieldValue::Float(value)),
                _ => Err(invalid()),
            },
            Self::TextList => {
                let trimmed = raw.trim();
                if trimmed.starts_with('[') {
                    return serde_json::from_str::<Vec<String>>(trimmed)
                        .map(FieldValue::TextList)
                        .map_err(|_| invalid());
                }
                Ok(FieldValue::TextList(
                    trimmed
                        .split(',')
                        .map(str::trim)
                        .filter(|item| !item.is_empty())
                        .map(str::to_string)
                        .collect(),
                ))
            }
        }
    }
}

/// One field value as stored on a record and in the durable file.
///
/// Serialized untagged so the file carries plain JSON scalars and arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Float(f64),
    Text(String),
    TextList(Vec<String>),
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Integer(_) => FieldKind::Integer,
            Self::Float(_) => FieldKind::Float,
            Self::Text(_) => FieldKind::Text,
            Self::TextList(_) => FieldKind::TextList,
        }
    }

    /// Rejects values the durable file cannot carry back (NaN, infinities).
    ///
    /// # Errors
    /// - `InvalidValue` naming `field` when a float is not finite.
    pub fn check(&self, field: &str) -> StoreResult<()> {
        match self {
            Self::Float(value) if !value.is_finite() => Err(StoreError::InvalidValue {
                field: field.to_string(),
                expected: FieldKind::Float,
                value: value.to_string(),
            }),
            _ => Ok(()),
        }
    }

    /// Reads a persisted JSON value verbatim, without coercion.
    ///
    /// Returns `None` for shapes outside the four supported kinds
    /// (booleans, nulls, objects, mixed arrays, non-finite numbers).
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        Self::deserialize(value).ok()
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Integer(value) => serde_json::Value::from(*value),
            Self::Float(value) => serde_json::Value::from(*value),
            Self::Text(value) => serde_json::Value::from(value.as_str()),
            Self::TextList(items) => serde_json::Value::from(items.clone()),
        }
    }
}

impl Display for FieldValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "{value}"),
            // Debug keeps the fractional part visible (`0.0`, not `0`).
            Self::Float(value) => write!(f, "{value:?}"),
            Self::Text(value) => write!(f, "{value:?}"),
            Self::TextList(items) => write!(f, "{items:?}"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        Self::TextList(value)
    }
}
