//! Required-field and enum checks plus hybrid preferment share renormalization.
use crate::config::{ConfigSnapshot, Method};
use crate::fields;
use crate::numbers::round_to;
use crate::value::SessionRecord;
use crate::warnings::{Warning, Warnings};

const SHARE_TOTAL: f64 = 100.0;

fn check_required(session: &SessionRecord, snapshot: &ConfigSnapshot, warnings: &mut Warnings) {
    for field in snapshot.schema.required_fields() {
        if session.value(field).is_blank() {
            warnings.push(Warning::MissingRequiredField {
                field: field.to_string(),
            });
        }
    }
}

fn check_enums(session: &SessionRecord, snapshot: &ConfigSnapshot, warnings: &mut Warnings) {
    for (field, allowed) in &snapshot.enums {
        let value = session.value(field);
        if value.is_blank() {
            continue;
        }
        if !allowed.iter().any(|candidate| value.matches_json(candidate)) {
            warnings.push(Warning::InvalidEnumValue {
                field: field.clone(),
                value: value.to_string(),
            });
        }
    }
}

/// Rescale poolish/biga shares so they sum to exactly 100.
#[allow(clippy::float_cmp)]
fn normalize_hybrid_shares(session: &mut SessionRecord, warnings: &mut Warnings) {
    let poolish = session.number(fields::POOLISH_SHARE_PERCENT);
    let biga = session.number(fields::BIGA_SHARE_PERCENT);
    let sum = poolish + biga;
    if sum == 0.0 || sum == SHARE_TOTAL {
        return;
    }
    let poolish_normalized = round_to(poolish / sum * SHARE_TOTAL, 2);
    let biga_normalized = round_to(SHARE_TOTAL - poolish_normalized, 2);
    session.set(fields::POOLISH_SHARE_PERCENT, poolish_normalized);
    session.set(fields::BIGA_SHARE_PERCENT, biga_normalized);
    warnings.push(Warning::PrefermentSharesNormalized {
        sum: round_to(sum, 2),
        poolish: poolish_normalized,
        biga: biga_normalized,
    });
}

/// Report missing and invalid fields; the only mutation is share renormalization.
#[must_use]
pub fn validate_session(
    mut session: SessionRecord,
    snapshot: &ConfigSnapshot,
    method: &Method,
    warnings: &mut Warnings,
) -> SessionRecord {
    check_required(&session, snapshot, warnings);
    check_enums(&session, snapshot, warnings);
    if method.preferment_kind().is_some_and(|kind| kind.is_hybrid()) {
        normalize_hybrid_shares(&mut session, warnings);
    }
    session
}
