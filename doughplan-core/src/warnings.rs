//! Human-readable auto-correction and validation notices.
//!
//! Resolution never fails; every anomaly becomes a [`Warning`] appended to a
//! shared accumulator and reported as text alongside the result.
use serde::Serialize;
use thiserror::Error;

/// A single anomaly observed while resolving a session.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(into = "String")]
pub enum Warning {
    #[error("Missing required field: {field}")]
    MissingRequiredField { field: String },
    #[error("Invalid value for {field}: {value}")]
    InvalidEnumValue { field: String, value: String },
    #[error("Could not parse {field} value \"{raw}\" as a number; using 0")]
    UnparseableNumber { field: String, raw: String },
    #[error(
        "Poolish/biga shares summed to {sum}%; normalized to poolish {poolish}% and biga {biga}%"
    )]
    PrefermentSharesNormalized { sum: f64, poolish: f64, biga: f64 },
    #[error("Diastatic malt is not allowed for oven type {oven_type}; set to 0%")]
    MaltDisallowedForOven { oven_type: String },
    #[error("Diastatic malt {value}% exceeds the {max}% ceiling; clamped")]
    MaltCeilingExceeded { value: f64, max: f64 },
    #[error("Honey {value}% exceeds the {max}% ceiling for oven type {oven_type}; clamped")]
    HoneyOvenCeilingExceeded {
        value: f64,
        max: f64,
        oven_type: String,
    },
    #[error("Honey {value}% exceeds the {max}% ceiling; clamped")]
    HoneyCeilingExceeded { value: f64, max: f64 },
    #[error("Oil {value}% exceeds the {max}% ceiling; clamped")]
    OilCeilingExceeded { value: f64, max: f64 },
}

impl From<Warning> for String {
    fn from(warning: Warning) -> Self {
        warning.to_string()
    }
}

/// Ordered warning accumulator threaded through the pipeline.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Warnings(Vec<Warning>);

impl Warnings {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, warning: Warning) {
        log::debug!("resolution warning: {warning}");
        self.0.push(warning);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Warning> {
        self.0.iter()
    }

    #[must_use]
    pub fn into_messages(self) -> Vec<String> {
        self.0.into_iter().map(String::from).collect()
    }
}
