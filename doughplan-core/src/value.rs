//! Session field values and the resolved session record.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::numbers::parse_locale_number;

/// A single session field value as supplied by catalogs, presets, or users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum FieldValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl FieldValue {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Null or a string with no visible characters.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(text) => text.trim().is_empty(),
            Self::Bool(_) | Self::Number(_) => false,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Arithmetic view of the value: numbers pass, numeric strings parse, everything else is 0.
    #[must_use]
    pub fn coerce_number(&self) -> f64 {
        let value = match self {
            Self::Number(value) => *value,
            Self::Bool(true) => 1.0,
            Self::Text(text) => parse_locale_number(text).unwrap_or(0.0),
            Self::Null | Self::Bool(false) => 0.0,
        };
        if value.is_finite() { value } else { 0.0 }
    }

    /// Truthiness used for `_enabled` flags.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(flag) => *flag,
            Self::Number(value) => *value != 0.0 && !value.is_nan(),
            Self::Text(text) => matches!(
                text.trim().to_ascii_lowercase().as_str(),
                "true" | "yes" | "on" | "1"
            ),
            Self::Null => false,
        }
    }

    /// Compare against a raw catalog value (used for enum membership).
    #[must_use]
    pub fn matches_json(&self, other: &serde_json::Value) -> bool {
        match (self, other) {
            (Self::Text(text), serde_json::Value::String(allowed)) => text == allowed,
            (Self::Number(value), serde_json::Value::Number(allowed)) => {
                allowed.as_f64().is_some_and(|allowed| allowed == *value)
            }
            (Self::Bool(flag), serde_json::Value::Bool(allowed)) => flag == allowed,
            (Self::Null, serde_json::Value::Null) => true,
            _ => false,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(flag) => write!(f, "{flag}"),
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(text) => write!(f, "{text}"),
        }
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
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

/// Override layers keyed by field name.
pub type FieldOverrides = BTreeMap<String, FieldValue>;

/// Fully resolved mapping of every schema field to a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct SessionRecord(BTreeMap<String, FieldValue>);

impl SessionRecord {
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.0.get(field)
    }

    /// Value for a field, treating an absent field as null.
    #[must_use]
    pub fn value(&self, field: &str) -> &FieldValue {
        static NULL: FieldValue = FieldValue::Null;
        self.0.get(field).unwrap_or(&NULL)
    }

    /// Numeric view of a field; absent and non-numeric values read as 0.
    #[must_use]
    pub fn number(&self, field: &str) -> f64 {
        self.value(field).coerce_number()
    }

    #[must_use]
    pub fn flag(&self, field: &str) -> bool {
        self.value(field).is_truthy()
    }

    #[must_use]
    pub fn text(&self, field: &str) -> Option<&str> {
        self.value(field).as_text()
    }

    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn set(&mut self, field: &str, value: impl Into<FieldValue>) {
        self.0.insert(field.to_string(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, FieldValue)> for SessionRecord {
    fn from_iter<T: IntoIterator<Item = (String, FieldValue)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
