//! Field typing and default session construction.
use serde::{Deserialize, Serialize};

use crate::config::Schema;
use crate::value::{FieldValue, SessionRecord};

/// Semantic type of a session field, derived once from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Baker's percentage; numeric, defaults to 0, never negative.
    Percent,
    /// `_enabled` switch; strictly boolean, defaults to false.
    Flag,
    Generic,
}

impl FieldKind {
    #[must_use]
    pub fn of(field: &str) -> Self {
        if field.contains("_percent") {
            Self::Percent
        } else if field.ends_with("_enabled") {
            Self::Flag
        } else {
            Self::Generic
        }
    }

    #[must_use]
    pub const fn default_value(self) -> FieldValue {
        match self {
            Self::Percent => FieldValue::Number(0.0),
            Self::Flag => FieldValue::Bool(false),
            Self::Generic => FieldValue::Null,
        }
    }
}

/// Ordered, de-duplicated schema fields with their kinds.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldCatalog {
    fields: Vec<(String, FieldKind)>,
}

impl FieldCatalog {
    #[must_use]
    pub fn from_schema(schema: &Schema) -> Self {
        let mut fields: Vec<(String, FieldKind)> = Vec::new();
        for name in schema.all_fields() {
            if fields.iter().any(|(existing, _)| existing == name) {
                continue;
            }
            fields.push((name.to_string(), FieldKind::of(name)));
        }
        Self { fields }
    }

    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.kind(field).is_some()
    }

    #[must_use]
    pub fn kind(&self, field: &str) -> Option<FieldKind> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, kind)| *kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, FieldKind)> {
        self.fields.iter().map(|(name, kind)| (name.as_str(), *kind))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// A session holding every field at its category default.
    #[must_use]
    pub fn build_defaults(&self) -> SessionRecord {
        self.iter()
            .map(|(name, kind)| (name.to_string(), kind.default_value()))
            .collect()
    }
}
