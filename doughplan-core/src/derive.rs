//! Baker's percentages to absolute ingredient masses.
//!
//! Total dough mass comes from either a pan area and dough density or a pizza
//! count and unit weight. Flour is backed out of the total through the sum of
//! all percentages, every other ingredient is a fraction of flour, and the
//! preferment and starter portions are carved out of the flour and water
//! before the final mix is computed.
use serde::{Deserialize, Serialize};

use crate::batch::{BatchList, max_batch_mass, plan_batches};
use crate::config::{GlobalDefaults, Method, PrefermentKind};
use crate::fields;
use crate::numbers::round_to;
use crate::value::{FieldValue, SessionRecord};

const DEFAULT_POOLISH_HYDRATION: f64 = 100.0;
const DEFAULT_BIGA_HYDRATION: f64 = 45.0;
const DEFAULT_STARTER_HYDRATION: f64 = 100.0;

/// Mass precision in decimal places; yeast is weighed finer.
const MASS_PLACES: u8 = 1;
const YEAST_PLACES: u8 = 3;

/// Nested poolish/biga split of a hybrid preferment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HybridComponents {
    pub poolish_flour_g: f64,
    pub poolish_water_g: f64,
    pub biga_flour_g: f64,
    pub biga_water_g: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrefermentBreakdown {
    pub kind: PrefermentKind,
    pub flour_g: f64,
    pub water_g: f64,
    pub yeast_g: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<HybridComponents>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StarterBreakdown {
    pub flour_g: f64,
    pub water_g: f64,
}

/// Masses added at the final mix after preferment/starter portions are removed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct FinalMix {
    pub flour_g: f64,
    pub water_g: f64,
    pub salt_g: f64,
    pub oil_g: f64,
    pub honey_g: f64,
    pub malt_g: f64,
    pub sugar_g: f64,
    pub yeast_g: f64,
}

/// Every quantity computed from a resolved session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DerivedSession {
    pub target_total_dough_g: f64,
    pub total_percent: f64,
    pub total_flour_g: f64,
    pub total_water_g: f64,
    pub total_salt_g: f64,
    pub total_oil_g: f64,
    pub total_honey_g: f64,
    pub total_malt_g: f64,
    pub total_sugar_g: f64,
    pub total_yeast_g: f64,
    #[serde(default)]
    pub preferment: Option<PrefermentBreakdown>,
    #[serde(default)]
    pub starter: Option<StarterBreakdown>,
    pub final_mix: FinalMix,
    pub max_batch_dough_g: f64,
    #[serde(default)]
    pub batches: BatchList,
}

/// Baker's percentages summed into the flour divisor.
const PERCENT_FIELDS: [&str; 7] = [
    fields::HYDRATION_PERCENT,
    fields::SALT_PERCENT,
    fields::OIL_PERCENT,
    fields::HONEY_PERCENT,
    fields::SUGAR_PERCENT,
    fields::DIASTATIC_MALT_PERCENT,
    fields::YEAST_PERCENT,
];

/// Area times density when both are positive, else count times unit weight, else 0.
#[must_use]
pub fn target_dough_mass(session: &SessionRecord) -> f64 {
    let area = session.number(fields::PAN_AREA_CM2);
    let density = session.number(fields::DOUGH_GRAMS_PER_CM2);
    if area > 0.0 && density > 0.0 {
        return round_to(area * density, MASS_PLACES);
    }
    let count = session.number(fields::TARGET_PIZZA_COUNT);
    let unit_weight = session.number(fields::DOUGH_UNIT_WEIGHT_G);
    if count > 0.0 && unit_weight > 0.0 {
        return round_to(count * unit_weight, MASS_PLACES);
    }
    0.0
}

/// Flour mass implied by a total dough mass and the sum of all percentages.
#[must_use]
pub fn flour_mass(total_dough_g: f64, total_percent: f64) -> f64 {
    if total_percent > 0.0 {
        total_dough_g / (1.0 + total_percent / 100.0)
    } else {
        total_dough_g
    }
}

/// Raw (unrounded) ingredient masses shared by the split calculations.
struct Totals {
    flour: f64,
    water: f64,
    yeast: f64,
}

/// First positive value wins: session override, then method default, then fallback.
fn component_hydration(
    session: &SessionRecord,
    method: &Method,
    field: &str,
    fallback: f64,
) -> f64 {
    let session_value = session.number(field);
    if session_value > 0.0 {
        return session_value;
    }
    let method_value = method
        .default_value(field)
        .map_or(0.0, FieldValue::coerce_number);
    if method_value > 0.0 {
        return method_value;
    }
    fallback
}

fn preferment_split(
    session: &SessionRecord,
    method: &Method,
    totals: &Totals,
) -> Option<(PrefermentBreakdown, f64, f64, f64)> {
    let kind = method.preferment_kind()?;
    let share = session.number(fields::PREFERMENT_FLOUR_PERCENT);
    if !session.flag(fields::PREFERMENT_ENABLED) || share <= 0.0 {
        return None;
    }
    let flour = totals.flour * share / 100.0;
    let (water, components) = if kind.is_hybrid() {
        let poolish_flour = flour * session.number(fields::POOLISH_SHARE_PERCENT) / 100.0;
        let biga_flour = flour * session.number(fields::BIGA_SHARE_PERCENT) / 100.0;
        let poolish_hydration = component_hydration(
            session,
            method,
            fields::POOLISH_HYDRATION_PERCENT,
            DEFAULT_POOLISH_HYDRATION,
        );
        let biga_hydration = component_hydration(
            session,
            method,
            fields::BIGA_HYDRATION_PERCENT,
            DEFAULT_BIGA_HYDRATION,
        );
        let poolish_water = poolish_flour * poolish_hydration / 100.0;
        let biga_water = biga_flour * biga_hydration / 100.0;
        let components = HybridComponents {
            poolish_flour_g: round_to(poolish_flour, MASS_PLACES),
            poolish_water_g: round_to(poolish_water, MASS_PLACES),
            biga_flour_g: round_to(biga_flour, MASS_PLACES),
            biga_water_g: round_to(biga_water, MASS_PLACES),
        };
        (poolish_water + biga_water, Some(components))
    } else {
        let hydration = session.number(fields::PREFERMENT_HYDRATION_PERCENT);
        (flour * hydration / 100.0, None)
    };
    let flour_basis = if totals.flour > 0.0 { totals.flour } else { 1.0 };
    let yeast = totals.yeast * (flour / flour_basis);
    log::debug!("preferment {kind:?}: {flour:.1} g flour, {water:.1} g water");
    let breakdown = PrefermentBreakdown {
        kind,
        flour_g: round_to(flour, MASS_PLACES),
        water_g: round_to(water, MASS_PLACES),
        yeast_g: round_to(yeast, YEAST_PLACES),
        components,
    };
    Some((breakdown, flour, water, yeast))
}

fn starter_split(
    session: &SessionRecord,
    method: &Method,
    totals: &Totals,
) -> Option<(StarterBreakdown, f64, f64)> {
    method.calculation_model.starter.as_ref()?;
    let inoculation = session.number(fields::STARTER_INOCULATION_PERCENT);
    if !session.flag(fields::STARTER_ENABLED) || inoculation <= 0.0 {
        return None;
    }
    let hydration = match session.number(fields::STARTER_HYDRATION_PERCENT) {
        value if value > 0.0 => value,
        _ => DEFAULT_STARTER_HYDRATION,
    };
    let flour = totals.flour * inoculation / 100.0;
    let water = flour * hydration / 100.0;
    log::debug!("starter: {flour:.1} g flour, {water:.1} g water");
    let breakdown = StarterBreakdown {
        flour_g: round_to(flour, MASS_PLACES),
        water_g: round_to(water, MASS_PLACES),
    };
    Some((breakdown, flour, water))
}

/// Compute every derived quantity; the total dough mass is written back into the session.
#[must_use]
pub fn derive_session(
    mut session: SessionRecord,
    method: &Method,
    global: &GlobalDefaults,
) -> (SessionRecord, DerivedSession) {
    let target_total = target_dough_mass(&session);
    session.set(fields::TARGET_TOTAL_DOUGH_G, target_total);

    let total_percent: f64 = PERCENT_FIELDS.iter().map(|f| session.number(f)).sum();
    let flour = flour_mass(target_total, total_percent);
    let of_flour = |field: &str| flour * session.number(field) / 100.0;
    let totals = Totals {
        flour,
        water: of_flour(fields::HYDRATION_PERCENT),
        yeast: of_flour(fields::YEAST_PERCENT),
    };
    let salt = round_to(of_flour(fields::SALT_PERCENT), MASS_PLACES);
    let oil = round_to(of_flour(fields::OIL_PERCENT), MASS_PLACES);
    let honey = round_to(of_flour(fields::HONEY_PERCENT), MASS_PLACES);
    let malt = round_to(of_flour(fields::DIASTATIC_MALT_PERCENT), MASS_PLACES);
    let sugar = round_to(of_flour(fields::SUGAR_PERCENT), MASS_PLACES);

    let preferment = preferment_split(&session, method, &totals);
    let starter = starter_split(&session, method, &totals);

    let model = method.calculation_model.final_mix;
    let mut final_flour = totals.flour;
    let mut final_water = totals.water;
    let mut preferment_yeast = 0.0;
    if let Some((_, pf_flour, pf_water, pf_yeast)) = &preferment {
        if model.subtract_preferment {
            final_flour -= pf_flour;
            final_water -= pf_water;
        }
        preferment_yeast = *pf_yeast;
    }
    if let Some((_, st_flour, st_water)) = &starter {
        if model.subtract_starter {
            final_flour -= st_flour;
            final_water -= st_water;
        }
    }

    let max_batch = max_batch_mass(
        session.number(fields::MAX_BATCH_DOUGH_G),
        global.batching.max_batch_dough_g,
    );
    let batches = plan_batches(target_total, max_batch);

    let derived = DerivedSession {
        target_total_dough_g: target_total,
        total_percent: round_to(total_percent, 3),
        total_flour_g: round_to(totals.flour, MASS_PLACES),
        total_water_g: round_to(totals.water, MASS_PLACES),
        total_salt_g: salt,
        total_oil_g: oil,
        total_honey_g: honey,
        total_malt_g: malt,
        total_sugar_g: sugar,
        total_yeast_g: round_to(totals.yeast, YEAST_PLACES),
        preferment: preferment.map(|(breakdown, ..)| breakdown),
        starter: starter.map(|(breakdown, ..)| breakdown),
        final_mix: FinalMix {
            flour_g: round_to(final_flour, MASS_PLACES),
            water_g: round_to(final_water, MASS_PLACES),
            salt_g: salt,
            oil_g: oil,
            honey_g: honey,
            malt_g: malt,
            sugar_g: sugar,
            yeast_g: round_to(totals.yeast - preferment_yeast, YEAST_PLACES),
        },
        max_batch_dough_g: max_batch,
        batches,
    };
    log::debug!(
        "derived {:.1} g dough across {} batch(es)",
        derived.target_total_dough_g,
        derived.batches.len()
    );
    (session, derived)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        BatchingDefaults, CalculationModel, FinalMixModel, PrefermentModel, StarterModel,
    };

    fn close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    fn neapolitan_session() -> SessionRecord {
        let mut session = SessionRecord::new();
        session.set("target_pizza_count", 6.0);
        session.set("dough_unit_weight_g", 280.0);
        session.set("hydration_percent", 65.0);
        session.set("salt_percent", 2.0);
        session.set("yeast_percent", 0.3);
        session
    }

    fn method_with(preferment: Option<PrefermentKind>, final_mix: FinalMixModel) -> Method {
        Method {
            calculation_model: CalculationModel {
                preferment: preferment.map(|kind| PrefermentModel { kind }),
                starter: Some(StarterModel::default()),
                final_mix,
            },
            ..Method::default()
        }
    }

    #[test]
    fn derives_masses_from_count_and_unit_weight() {
        let (session, derived) = derive_session(
            neapolitan_session(),
            &Method::default(),
            &GlobalDefaults::default(),
        );
        assert_eq!(
            session.value("target_total_dough_g"),
            &FieldValue::Number(1680.0)
        );
        close(derived.target_total_dough_g, 1680.0);
        close(derived.total_percent, 67.3);
        close(derived.total_flour_g, 1004.2);
        close(derived.total_water_g, 652.7);
        close(derived.total_salt_g, 20.1);
        close(derived.total_yeast_g, 3.013);
        close(derived.final_mix.flour_g, 1004.2);
        assert!(derived.preferment.is_none());
        assert!(derived.batches.is_empty());
    }

    #[test]
    fn pan_area_takes_precedence() {
        let mut session = neapolitan_session();
        session.set("pan_area_cm2", 1200.0);
        session.set("dough_grams_per_cm2", 0.55);
        close(target_dough_mass(&session), 660.0);
        close(target_dough_mass(&SessionRecord::new()), 0.0);
    }

    #[test]
    fn zero_percent_uses_total_as_flour() {
        close(flour_mass(500.0, 0.0), 500.0);
        close(flour_mass(0.0, 60.0), 0.0);
    }

    #[test]
    fn preferment_subtraction_follows_flag() {
        let mut session = SessionRecord::new();
        session.set("target_pizza_count", 1.0);
        session.set("dough_unit_weight_g", 1000.0);
        session.set("yeast_percent", 0.0);
        session.set("preferment_enabled", true);
        session.set("preferment_flour_percent", 20.0);
        session.set("preferment_hydration_percent", 100.0);

        let subtracting = method_with(
            Some(PrefermentKind::Poolish),
            FinalMixModel {
                subtract_preferment: true,
                subtract_starter: false,
            },
        );
        let (_, derived) =
            derive_session(session.clone(), &subtracting, &GlobalDefaults::default());
        let preferment = derived.preferment.as_ref().unwrap();
        close(preferment.flour_g, 200.0);
        close(preferment.water_g, 200.0);
        close(derived.final_mix.flour_g, 800.0);

        let keeping = method_with(Some(PrefermentKind::Poolish), FinalMixModel::default());
        let (_, derived) = derive_session(session, &keeping, &GlobalDefaults::default());
        close(derived.final_mix.flour_g, 1000.0);
    }

    #[test]
    fn disabled_preferment_is_ignored() {
        let mut session = neapolitan_session();
        session.set("preferment_enabled", false);
        session.set("preferment_flour_percent", 30.0);
        let method = method_with(Some(PrefermentKind::Biga), FinalMixModel::default());
        let (_, derived) = derive_session(session, &method, &GlobalDefaults::default());
        assert!(derived.preferment.is_none());
        close(derived.final_mix.yeast_g, derived.total_yeast_g);
    }

    #[test]
    fn hybrid_preferment_splits_components() {
        let mut session = SessionRecord::new();
        session.set("target_pizza_count", 1.0);
        session.set("dough_unit_weight_g", 1000.0);
        session.set("yeast_percent", 1.0);
        session.set("preferment_enabled", true);
        session.set("preferment_flour_percent", 50.0);
        session.set("poolish_share_percent", 60.0);
        session.set("biga_share_percent", 40.0);
        session.set("poolish_hydration_percent", 0.0);
        let mut method = method_with(
            Some(PrefermentKind::PoolishBiga),
            FinalMixModel {
                subtract_preferment: true,
                subtract_starter: false,
            },
        );
        method
            .defaults
            .insert("biga_hydration_percent".into(), FieldValue::Number(50.0));

        let (_, derived) = derive_session(session, &method, &GlobalDefaults::default());
        close(derived.total_flour_g, 990.1);
        let preferment = derived.preferment.unwrap();
        let components = preferment.components.unwrap();
        close(components.poolish_flour_g, 297.0);
        close(components.poolish_water_g, 297.0);
        close(components.biga_flour_g, 198.0);
        close(components.biga_water_g, 99.0);
        close(preferment.water_g, 396.0);
        close(preferment.yeast_g, 4.95);
        close(derived.final_mix.yeast_g, 4.95);
    }

    #[test]
    fn starter_defaults_to_full_hydration() {
        let mut session = SessionRecord::new();
        session.set("target_pizza_count", 1.0);
        session.set("dough_unit_weight_g", 1000.0);
        session.set("starter_enabled", true);
        session.set("starter_inoculation_percent", 20.0);
        let method = method_with(
            None,
            FinalMixModel {
                subtract_preferment: false,
                subtract_starter: true,
            },
        );
        let (_, derived) = derive_session(session, &method, &GlobalDefaults::default());
        let starter = derived.starter.unwrap();
        close(starter.flour_g, 200.0);
        close(starter.water_g, 200.0);
        close(derived.final_mix.flour_g, 800.0);
    }

    #[test]
    fn batches_use_global_default_when_session_is_unset() {
        let mut session = SessionRecord::new();
        session.set("target_pizza_count", 15.0);
        session.set("dough_unit_weight_g", 300.0);
        let global = GlobalDefaults {
            batching: BatchingDefaults {
                max_batch_dough_g: Some(2000.0),
            },
            ..GlobalDefaults::default()
        };
        let (_, derived) = derive_session(session, &Method::default(), &global);
        let masses: Vec<f64> = derived.batches.iter().map(|b| b.dough_mass_g).collect();
        assert_eq!(masses, vec![2000.0, 2000.0, 500.0]);
        close(derived.max_batch_dough_g, 2000.0);
    }
}
