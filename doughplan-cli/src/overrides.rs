use anyhow::{Context, Result};
use doughplan_core::{FieldOverrides, FieldValue};
use std::path::Path;

/// Interpret a command-line value. Numbers stay text so the engine's
/// normalizer handles locale decimals the same way it does for any caller.
pub fn parse_value(raw: &str) -> FieldValue {
    match raw.trim() {
        "true" => FieldValue::Bool(true),
        "false" => FieldValue::Bool(false),
        "null" => FieldValue::Null,
        _ => FieldValue::Text(raw.to_string()),
    }
}

/// Parse a `key=value` assignment for `--set`.
pub fn parse_assignment(raw: &str) -> Result<(String, FieldValue), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got `{raw}`"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing field name in `{raw}`"));
    }
    Ok((key.to_string(), parse_value(value)))
}

pub fn load_overrides_file(path: &Path) -> Result<FieldOverrides> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read overrides {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse overrides {}", path.display()))
}

/// File overrides first, then `--set` assignments on top; `None` when neither was given.
pub fn collect_overrides(
    file: Option<&Path>,
    assignments: &[(String, FieldValue)],
) -> Result<Option<FieldOverrides>> {
    if file.is_none() && assignments.is_empty() {
        return Ok(None);
    }
    let mut overrides = match file {
        Some(path) => load_overrides_file(path)?,
        None => FieldOverrides::new(),
    };
    for (key, value) in assignments {
        overrides.insert(key.clone(), value.clone());
    }
    log::debug!("collected {} user override(s)", overrides.len());
    Ok(Some(overrides))
}
