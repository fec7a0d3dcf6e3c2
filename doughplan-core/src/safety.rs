//! Ingredient safety ceilings, some dependent on the oven type.
use crate::config::{IngredientCeiling, IngredientSafetyRules};
use crate::fields;
use crate::value::SessionRecord;
use crate::warnings::{Warning, Warnings};

fn apply_malt_rule(
    session: &mut SessionRecord,
    rule: &IngredientCeiling,
    oven_type: Option<&str>,
    warnings: &mut Warnings,
) {
    if let Some(oven_type) = oven_type {
        if rule.disallowed_oven_types.iter().any(|o| o == oven_type) {
            session.set(fields::DIASTATIC_MALT_PERCENT, 0.0);
            warnings.push(Warning::MaltDisallowedForOven {
                oven_type: oven_type.to_string(),
            });
        }
    }
    if let Some(max) = rule.max_percent {
        let value = session.number(fields::DIASTATIC_MALT_PERCENT);
        if value > max {
            session.set(fields::DIASTATIC_MALT_PERCENT, max);
            warnings.push(Warning::MaltCeilingExceeded { value, max });
        }
    }
}

fn apply_honey_rule(
    session: &mut SessionRecord,
    rule: &IngredientCeiling,
    oven_type: Option<&str>,
    warnings: &mut Warnings,
) {
    let oven_ceiling = oven_type.and_then(|oven| {
        rule.max_percent_by_oven_type
            .get(oven)
            .map(|max| (*max, oven.to_string()))
    });
    let value = session.number(fields::HONEY_PERCENT);
    match (oven_ceiling, rule.max_percent) {
        (Some((max, oven_type)), _) if value > max => {
            session.set(fields::HONEY_PERCENT, max);
            warnings.push(Warning::HoneyOvenCeilingExceeded {
                value,
                max,
                oven_type,
            });
        }
        (None, Some(max)) if value > max => {
            session.set(fields::HONEY_PERCENT, max);
            warnings.push(Warning::HoneyCeilingExceeded { value, max });
        }
        _ => {}
    }
}

fn apply_oil_rule(session: &mut SessionRecord, rule: &IngredientCeiling, warnings: &mut Warnings) {
    let Some(max) = rule.max_percent else {
        return;
    };
    let value = session.number(fields::OIL_PERCENT);
    if value > max {
        session.set(fields::OIL_PERCENT, max);
        warnings.push(Warning::OilCeilingExceeded { value, max });
    }
}

/// Clamp malt, honey, and oil percentages against their configured ceilings.
#[must_use]
pub fn apply_safety_rules(
    mut session: SessionRecord,
    rules: &IngredientSafetyRules,
    warnings: &mut Warnings,
) -> SessionRecord {
    let oven_type = session.text(fields::OVEN_TYPE).map(str::to_string);
    let oven_type = oven_type.as_deref();
    if let Some(rule) = &rules.diastatic_malt {
        apply_malt_rule(&mut session, rule, oven_type, warnings);
    }
    if let Some(rule) = &rules.honey {
        apply_honey_rule(&mut session, rule, oven_type, warnings);
    }
    if let Some(rule) = &rules.oil {
        apply_oil_rule(&mut session, rule, warnings);
    }
    session
}
