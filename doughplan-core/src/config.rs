//! Formulation configuration snapshot: schema, method and preset catalogs, global defaults.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::value::{FieldOverrides, FieldValue};

const DEFAULT_FORMULATION_DATA: &str = include_str!("../data/formulation.json");

/// Field categories; their union is the full session field set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Schema {
    #[serde(default)]
    pub required_core_fields: Vec<String>,
    #[serde(default)]
    pub required_time_model_fields: Vec<String>,
    #[serde(default)]
    pub optional_fields: Vec<String>,
}

impl Schema {
    /// Required fields in category order (core first, then time model).
    pub fn required_fields(&self) -> impl Iterator<Item = &str> {
        self.required_core_fields
            .iter()
            .chain(&self.required_time_model_fields)
            .map(String::as_str)
    }

    /// Every schema field in category order, duplicates included.
    pub fn all_fields(&self) -> impl Iterator<Item = &str> {
        self.required_fields()
            .chain(self.optional_fields.iter().map(String::as_str))
    }
}

/// Preferment style declared by a method's calculation model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PrefermentKind {
    #[default]
    Poolish,
    Biga,
    /// Hybrid poolish + biga split by share percentages.
    PoolishBiga,
    Sponge,
    #[serde(other)]
    Other,
}

impl PrefermentKind {
    #[must_use]
    pub const fn is_hybrid(self) -> bool {
        matches!(self, Self::PoolishBiga)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PrefermentModel {
    #[serde(default, rename = "type")]
    pub kind: PrefermentKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StarterModel {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

/// Which pre-mixed portions are taken out of the final mix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FinalMixModel {
    #[serde(default)]
    pub subtract_preferment: bool,
    #[serde(default)]
    pub subtract_starter: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CalculationModel {
    #[serde(default)]
    pub preferment: Option<PrefermentModel>,
    #[serde(default)]
    pub starter: Option<StarterModel>,
    #[serde(default)]
    pub final_mix: FinalMixModel,
}

/// A named formulation family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Method {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub calculation_model: CalculationModel,
    #[serde(default)]
    pub defaults: FieldOverrides,
    /// Inclusive `[min, max]` clamp ranges keyed by field.
    #[serde(default)]
    pub ranges: BTreeMap<String, [f64; 2]>,
}

impl Method {
    #[must_use]
    pub fn range(&self, field: &str) -> Option<(f64, f64)> {
        self.ranges.get(field).map(|[min, max]| (*min, *max))
    }

    #[must_use]
    pub fn default_value(&self, field: &str) -> Option<&FieldValue> {
        self.defaults.get(field)
    }

    #[must_use]
    pub fn preferment_kind(&self) -> Option<PrefermentKind> {
        self.calculation_model
            .preferment
            .as_ref()
            .map(|model| model.kind)
    }
}

/// A named shortcut bundling selection fields and explicit overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Preset {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub pizza_style_id: Option<String>,
    #[serde(default)]
    pub oven_type: Option<String>,
    #[serde(default)]
    pub flour_blend_id: Option<String>,
    #[serde(default)]
    pub overrides: FieldOverrides,
}

/// Ceiling rule for a single ingredient percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct IngredientCeiling {
    #[serde(default)]
    pub disallowed_oven_types: Vec<String>,
    #[serde(default)]
    pub max_percent: Option<f64>,
    #[serde(default)]
    pub max_percent_by_oven_type: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct IngredientSafetyRules {
    #[serde(default, rename = "diastatic_malt_percent")]
    pub diastatic_malt: Option<IngredientCeiling>,
    #[serde(default, rename = "honey_percent")]
    pub honey: Option<IngredientCeiling>,
    #[serde(default, rename = "oil_percent")]
    pub oil: Option<IngredientCeiling>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BatchingDefaults {
    #[serde(default)]
    pub max_batch_dough_g: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GlobalDefaults {
    #[serde(default)]
    pub ingredient_safety_rules: IngredientSafetyRules,
    #[serde(default)]
    pub batching: BatchingDefaults,
}

/// Read-only configuration consumed by every resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ConfigSnapshot {
    #[serde(default)]
    pub schema: Schema,
    #[serde(default)]
    pub methods: Vec<Method>,
    #[serde(default)]
    pub presets: Vec<Preset>,
    #[serde(default)]
    pub global_defaults: GlobalDefaults,
    #[serde(default)]
    pub enums: BTreeMap<String, Vec<serde_json::Value>>,
}

/// Errors raised while loading a configuration snapshot.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse formulation config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read formulation config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigSnapshot {
    /// Parse a snapshot from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into a snapshot.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a snapshot file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    /// Embedded default catalog; an unparsable bundle degrades to an empty snapshot.
    #[must_use]
    pub fn load_from_static() -> Self {
        serde_json::from_str(DEFAULT_FORMULATION_DATA).unwrap_or_default()
    }

    /// Method by id, else the first cataloged method, else an empty method.
    #[must_use]
    pub fn method_or_default(&self, method_id: Option<&str>) -> Method {
        method_id
            .and_then(|id| self.methods.iter().find(|m| m.id == id))
            .or_else(|| self.methods.first())
            .cloned()
            .unwrap_or_default()
    }

    #[must_use]
    pub fn preset(&self, preset_id: Option<&str>) -> Option<&Preset> {
        let id = preset_id?;
        self.presets.iter().find(|p| p.id == id)
    }

    #[must_use]
    pub fn enum_values(&self, field: &str) -> Option<&[serde_json::Value]> {
        self.enums.get(field).map(Vec::as_slice)
    }
}

/// Platform seam for supplying the configuration snapshot.
pub trait ConfigSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the configuration snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be produced.
    fn load_snapshot(&self) -> Result<ConfigSnapshot, Self::Error>;
}

/// Snapshot compiled into the crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedConfig;

impl ConfigSource for EmbeddedConfig {
    type Error = ConfigError;

    fn load_snapshot(&self) -> Result<ConfigSnapshot, Self::Error> {
        ConfigSnapshot::from_json(DEFAULT_FORMULATION_DATA)
    }
}

/// Snapshot read from a JSON file on every load.
#[derive(Debug, Clone)]
pub struct FileConfig {
    pub path: PathBuf,
}

impl FileConfig {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ConfigSource for FileConfig {
    type Error = ConfigError;

    fn load_snapshot(&self) -> Result<ConfigSnapshot, Self::Error> {
        ConfigSnapshot::from_path(&self.path)
    }
}
