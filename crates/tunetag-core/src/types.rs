//! Core types for tunetag

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// One of the three difficulty levels attached to a training example
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyBand {
    Easy,
    Medium,
    Hard,
}

impl DifficultyBand {
    /// All bands, lowest first
    pub const ALL: [DifficultyBand; 3] = [Self::Easy, Self::Medium, Self::Hard];

    /// Band name as it appears inside a marker
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    /// Literal marker prepended to a record's `input`
    pub fn marker(&self) -> &'static str {
        match self {
            Self::Easy => "<difficulty=easy>",
            Self::Medium => "<difficulty=medium>",
            Self::Hard => "<difficulty=hard>",
        }
    }

    /// Parse a band name, ignoring ASCII case
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|band| band.as_str().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for DifficultyBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Two ascending cut points splitting the score line into three bands.
///
/// `score <= easy_max` is easy, `score <= medium_max` is medium, anything
/// above is hard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdPair {
    pub easy_max: f64,
    pub medium_max: f64,
}

impl ThresholdPair {
    /// Thresholds used when calibration collects no scores
    pub const FALLBACK: ThresholdPair = ThresholdPair {
        easy_max: 10.0,
        medium_max: 30.0,
    };

    pub fn new(easy_max: f64, medium_max: f64) -> Self {
        Self {
            easy_max,
            medium_max,
        }
    }

    /// Whether the cut points are in ascending order
    pub fn is_ordered(&self) -> bool {
        self.easy_max <= self.medium_max
    }
}

impl Default for ThresholdPair {
    fn default() -> Self {
        Self::FALLBACK
    }
}

/// Task category of a training example
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Generation,
    #[default]
    Cataloging,
    Segmentation,
}

impl TaskKind {
    /// Kinds in the order their markers are searched for
    pub const ALL: [TaskKind; 3] = [Self::Generation, Self::Cataloging, Self::Segmentation];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Generation => "generation",
            Self::Cataloging => "cataloging",
            Self::Segmentation => "segmentation",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One dataset line: a JSON object whose key order is preserved.
///
/// Unknown keys are carried through untouched, numbers included: they keep
/// their source digits rather than being re-encoded through `f64`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse one line of line-delimited JSON
    pub fn from_json_line(line: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(line).map_err(|e| Error::parse(e.to_string()))?;

        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(Error::parse(format!(
                "expected a JSON object, found {}",
                value_kind(&other)
            ))),
        }
    }

    /// Serialize to a single line (no trailing newline)
    pub fn to_json_line(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.fields)?)
    }

    /// Raw field value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Set a field, keeping its position if it already exists
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    /// String value of a field, `None` when missing or not a string
    pub fn text(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// String value of a field, empty when missing or not a string
    pub fn text_or_empty(&self, key: &str) -> &str {
        self.text(key).unwrap_or("")
    }

    /// Whether a field is present with a truthy value
    pub fn has_truthy(&self, key: &str) -> bool {
        self.fields.get(key).is_some_and(is_truthy)
    }

    /// Field value rendered as text, for fields whose JSON type may vary
    pub fn display_text(&self, key: &str) -> Option<String> {
        self.fields.get(key).map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

impl From<Map<String, Value>> for Record {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

/// JSON truthiness: null, false, zero, and empty strings/arrays/objects are falsy
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
