//! Numeric normalization and range clamping of session fields.
use crate::config::Method;
use crate::numbers::{clamp_to_range, parse_locale_number};
use crate::schema::{FieldCatalog, FieldKind};
use crate::value::{FieldValue, SessionRecord};
use crate::warnings::{Warning, Warnings};

/// Parse a raw string: blank becomes the kind's empty value, numbers parse, anything else stays.
fn parse_text(kind: FieldKind, raw: String) -> FieldValue {
    if raw.trim().is_empty() {
        return match kind {
            FieldKind::Percent => FieldValue::Number(0.0),
            FieldKind::Flag | FieldKind::Generic => FieldValue::Null,
        };
    }
    parse_locale_number(&raw).map_or(FieldValue::Text(raw), FieldValue::Number)
}

fn normalize_field(
    field: &str,
    kind: FieldKind,
    raw: FieldValue,
    range: Option<(f64, f64)>,
    warnings: &mut Warnings,
) -> FieldValue {
    let parsed = match raw {
        FieldValue::Text(text) => parse_text(kind, text),
        other => other,
    };
    let typed = match (kind, parsed) {
        (_, FieldValue::Number(value)) if !value.is_finite() => kind.default_value(),
        (_, FieldValue::Null) => kind.default_value(),
        (FieldKind::Percent, FieldValue::Number(value)) => FieldValue::Number(value.max(0.0)),
        (FieldKind::Percent, FieldValue::Text(raw)) => {
            warnings.push(Warning::UnparseableNumber {
                field: field.to_string(),
                raw,
            });
            FieldValue::Number(0.0)
        }
        (FieldKind::Percent, other) => FieldValue::Number(other.coerce_number()),
        (FieldKind::Flag, other) => FieldValue::Bool(other.is_truthy()),
        (FieldKind::Generic, other) => other,
    };
    match (typed, range) {
        (FieldValue::Number(value), Some((min, max))) => {
            let clamped = clamp_to_range(value, min, max);
            if clamped != value {
                log::debug!("clamped {field} from {value} into [{min}, {max}]");
            }
            FieldValue::Number(clamped)
        }
        (typed, _) => typed,
    }
}

/// Coerce every schema field to its typed form and clamp into the method's ranges.
///
/// Idempotent: normalizing an already normalized session changes nothing.
#[must_use]
pub fn normalize_session(
    mut session: SessionRecord,
    catalog: &FieldCatalog,
    method: &Method,
    warnings: &mut Warnings,
) -> SessionRecord {
    for (field, kind) in catalog.iter() {
        let raw = session.value(field).clone();
        let normalized = normalize_field(field, kind, raw, method.range(field), warnings);
        log::trace!("normalized {field} -> {normalized}");
        session.set(field, normalized);
    }
    session
}
