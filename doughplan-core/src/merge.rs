//! Override layering: schema defaults, method defaults, style sizing, preset, user.
use crate::config::{Method, Preset};
use crate::fields;
use crate::schema::FieldCatalog;
use crate::style::PizzaStyle;
use crate::value::{FieldOverrides, FieldValue, SessionRecord};

/// Seed a preset's selection fields, then layer its explicit overrides on top.
#[must_use]
pub fn preset_overrides(preset: Option<&Preset>) -> FieldOverrides {
    let mut overrides = FieldOverrides::new();
    let Some(preset) = preset else {
        return overrides;
    };
    let selections = [
        (fields::PIZZA_STYLE_ID, &preset.pizza_style_id),
        (fields::OVEN_TYPE, &preset.oven_type),
        (fields::FLOUR_BLEND_ID, &preset.flour_blend_id),
    ];
    for (field, value) in selections {
        if let Some(value) = value {
            overrides.insert(field.to_string(), FieldValue::Text(value.clone()));
        }
    }
    for (field, value) in &preset.overrides {
        overrides.insert(field.clone(), value.clone());
    }
    overrides
}

/// Copy every schema-known key of `layer` into the session; unknown keys are dropped.
fn apply_layer(session: &mut SessionRecord, catalog: &FieldCatalog, layer: &FieldOverrides) {
    for (field, value) in layer {
        if catalog.contains(field) {
            session.set(field, value.clone());
        } else {
            log::trace!("dropping unknown override key {field}");
        }
    }
}

fn style_id<'a>(
    user: &'a FieldOverrides,
    preset: &'a FieldOverrides,
    session: &'a SessionRecord,
) -> Option<&'a str> {
    user.get(fields::PIZZA_STYLE_ID)
        .and_then(FieldValue::as_text)
        .or_else(|| {
            preset
                .get(fields::PIZZA_STYLE_ID)
                .and_then(FieldValue::as_text)
        })
        .or_else(|| session.text(fields::PIZZA_STYLE_ID))
}

/// Fill target sizing from the style table unless the preset already sizes the dough.
fn apply_style_sizing(
    session: &mut SessionRecord,
    catalog: &FieldCatalog,
    preset: &FieldOverrides,
    user: &FieldOverrides,
) {
    if preset.contains_key(fields::TARGET_PIZZA_COUNT)
        || preset.contains_key(fields::DOUGH_UNIT_WEIGHT_G)
    {
        return;
    }
    let Some(style) = style_id(user, preset, session).and_then(PizzaStyle::from_id) else {
        return;
    };
    let sizing = style.sizing();
    let defaults = [
        (fields::TARGET_PIZZA_COUNT, sizing.target_pizza_count),
        (fields::DOUGH_UNIT_WEIGHT_G, sizing.dough_unit_weight_g),
    ];
    for (field, value) in defaults {
        if catalog.contains(field) && session.value(field).is_null() {
            session.set(field, value);
        }
    }
    log::debug!("applied {} sizing defaults", style.id());
}

/// Layer every source of truth over the schema defaults, later layers winning.
#[must_use]
pub fn merge_overrides(
    mut session: SessionRecord,
    catalog: &FieldCatalog,
    method: &Method,
    preset: Option<&Preset>,
    user: &FieldOverrides,
) -> SessionRecord {
    let preset = preset_overrides(preset);
    apply_layer(&mut session, catalog, &method.defaults);
    apply_style_sizing(&mut session, catalog, &preset, user);
    apply_layer(&mut session, catalog, &preset);
    apply_layer(&mut session, catalog, user);
    session
}
