#![allow(clippy::float_cmp)]

use std::collections::BTreeMap;
use std::hash::Hasher;

use doughplan_core::{
    BatchingDefaults, CalculationModel, ConfigSnapshot, FieldValue, FinalMixModel,
    GlobalDefaults, IngredientCeiling, IngredientSafetyRules, Method, PrefermentKind,
    PrefermentModel, ResolutionRequest, Schema, resolve_session,
};
use twox_hash::XxHash64;

fn strings(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| (*n).to_string()).collect()
}

fn bakery_schema() -> Schema {
    Schema {
        required_core_fields: strings(&["oven_type", "hydration_percent"]),
        required_time_model_fields: Vec::new(),
        optional_fields: strings(&[
            "target_pizza_count",
            "dough_unit_weight_g",
            "salt_percent",
            "oil_percent",
            "honey_percent",
            "sugar_percent",
            "diastatic_malt_percent",
            "yeast_percent",
            "preferment_enabled",
            "preferment_flour_percent",
            "preferment_hydration_percent",
            "max_batch_dough_g",
        ]),
    }
}

fn poolish_method(subtract_preferment: bool) -> Method {
    Method {
        id: "poolish".into(),
        calculation_model: CalculationModel {
            preferment: Some(PrefermentModel {
                kind: PrefermentKind::Poolish,
            }),
            starter: None,
            final_mix: FinalMixModel {
                subtract_preferment,
                subtract_starter: false,
            },
        },
        ..Method::default()
    }
}

fn bakery_snapshot(methods: Vec<Method>) -> ConfigSnapshot {
    ConfigSnapshot {
        schema: bakery_schema(),
        methods,
        ..ConfigSnapshot::default()
    }
}

fn digest(value: &serde_json::Value) -> u64 {
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(serde_json::to_string(value).unwrap().as_bytes());
    hasher.finish()
}

#[test]
fn neapolitan_masses_match_bakers_math() {
    let snapshot = ConfigSnapshot::load_from_static();
    let request = ResolutionRequest::new(Some("direct"), None)
        .with_override("target_pizza_count", 6.0)
        .with_override("dough_unit_weight_g", 280.0)
        .with_override("hydration_percent", 65.0)
        .with_override("salt_percent", 2.0)
        .with_override("yeast_percent", 0.3);
    let resolution = resolve_session(&snapshot, &request);
    let derived = &resolution.derived_session;
    assert_eq!(derived.target_total_dough_g, 1680.0);
    assert_eq!(
        resolution.resolved_session.value("target_total_dough_g"),
        &FieldValue::Number(1680.0)
    );
    assert_eq!(derived.total_percent, 67.3);
    assert_eq!(derived.total_flour_g, 1004.2);
    assert_eq!(derived.total_water_g, 652.7);
    assert!(resolution.warnings.is_empty(), "{:?}", resolution.warnings);
}

#[test]
fn locale_strings_flow_through_to_masses() {
    let snapshot = ConfigSnapshot::load_from_static();
    let request = ResolutionRequest::new(Some("direct"), None)
        .with_override("yeast_percent", "0,3")
        .with_override("hydration_percent", " 65 ");
    let resolution = resolve_session(&snapshot, &request);
    assert_eq!(
        resolution.resolved_session.value("yeast_percent"),
        &FieldValue::Number(0.3)
    );
    assert_eq!(
        resolution.resolved_session.value("hydration_percent"),
        &FieldValue::Number(65.0)
    );
}

#[test]
fn hybrid_shares_are_renormalized_once() {
    let snapshot = ConfigSnapshot::load_from_static();
    let request = ResolutionRequest::new(Some("poolish_biga"), None)
        .with_override("poolish_share_percent", 70.0)
        .with_override("biga_share_percent", 40.0);
    let resolution = resolve_session(&snapshot, &request);
    let session = &resolution.resolved_session;
    assert_eq!(session.value("poolish_share_percent"), &FieldValue::Number(63.64));
    assert_eq!(session.value("biga_share_percent"), &FieldValue::Number(36.36));
    assert_eq!(resolution.warnings.len(), 1, "{:?}", resolution.warnings);
    assert!(resolution.warnings[0].contains("normalized"));

    let components = resolution
        .derived_session
        .preferment
        .as_ref()
        .and_then(|p| p.components)
        .expect("hybrid components");
    assert!(components.poolish_flour_g > components.biga_flour_g);

    let balanced = resolve_session(
        &snapshot,
        &ResolutionRequest::new(Some("poolish_biga"), None),
    );
    assert_eq!(
        balanced.resolved_session.value("poolish_share_percent"),
        &FieldValue::Number(50.0)
    );
    assert!(balanced.warnings.is_empty(), "{:?}", balanced.warnings);
}

#[test]
fn honey_ceiling_prefers_oven_specific_limit() {
    let mut snapshot = bakery_snapshot(vec![Method::default()]);
    snapshot.global_defaults = GlobalDefaults {
        ingredient_safety_rules: IngredientSafetyRules {
            honey: Some(IngredientCeiling {
                max_percent: Some(8.0),
                max_percent_by_oven_type: BTreeMap::from([("wood_fired".to_string(), 5.0)]),
                ..IngredientCeiling::default()
            }),
            ..IngredientSafetyRules::default()
        },
        batching: BatchingDefaults::default(),
    };
    let base = ResolutionRequest::default()
        .with_override("hydration_percent", 60.0)
        .with_override("honey_percent", 10.0);

    let wood = resolve_session(&snapshot, &base.clone().with_override("oven_type", "wood_fired"));
    assert_eq!(
        wood.resolved_session.value("honey_percent"),
        &FieldValue::Number(5.0)
    );
    assert_eq!(wood.warnings.len(), 1);

    let electric = resolve_session(&snapshot, &base.with_override("oven_type", "electric"));
    assert_eq!(
        electric.resolved_session.value("honey_percent"),
        &FieldValue::Number(8.0)
    );
    assert_eq!(electric.warnings.len(), 1);
}

#[test]
fn batches_sum_to_target() {
    let snapshot = bakery_snapshot(vec![Method::default()]);
    let request = ResolutionRequest::default()
        .with_override("oven_type", "deck")
        .with_override("hydration_percent", 60.0)
        .with_override("target_pizza_count", 15.0)
        .with_override("dough_unit_weight_g", 300.0)
        .with_override("max_batch_dough_g", 2000.0);
    let resolution = resolve_session(&snapshot, &request);
    let batches: Vec<(u32, f64)> = resolution
        .derived_session
        .batches
        .iter()
        .map(|b| (b.batch_index, b.dough_mass_g))
        .collect();
    assert_eq!(batches, vec![(1, 2000.0), (2, 2000.0), (3, 500.0)]);
    let total: f64 = batches.iter().map(|(_, mass)| mass).sum();
    assert_eq!(total, resolution.derived_session.target_total_dough_g);
}

#[test]
fn fractional_batch_capacity_still_sums_to_target() {
    let snapshot = ConfigSnapshot::load_from_static();
    let request = ResolutionRequest::new(Some("direct"), None)
        .with_override("target_pizza_count", 6.0)
        .with_override("dough_unit_weight_g", 280.0)
        .with_override("max_batch_dough_g", "333,33");
    let derived = resolve_session(&snapshot, &request).derived_session;
    assert_eq!(derived.max_batch_dough_g, 333.33);
    assert_eq!(derived.batches.len(), 6);
    assert!(derived.batches[..5].iter().all(|b| b.dough_mass_g == 333.33));
    let total: f64 = derived.batches.iter().map(|b| b.dough_mass_g).sum();
    assert_eq!(total, derived.target_total_dough_g);
    assert_eq!(total, 1680.0);
}

#[test]
fn final_mix_subtraction_is_flag_driven() {
    let request = ResolutionRequest::new(Some("poolish"), None)
        .with_override("oven_type", "gas")
        .with_override("target_pizza_count", 1.0)
        .with_override("dough_unit_weight_g", 1000.0)
        .with_override("preferment_enabled", true)
        .with_override("preferment_flour_percent", 20.0)
        .with_override("preferment_hydration_percent", 100.0);

    let subtracting = resolve_session(&bakery_snapshot(vec![poolish_method(true)]), &request);
    assert_eq!(subtracting.derived_session.total_flour_g, 1000.0);
    assert_eq!(
        subtracting.derived_session.preferment.as_ref().unwrap().flour_g,
        200.0
    );
    assert_eq!(subtracting.derived_session.final_mix.flour_g, 800.0);

    let keeping = resolve_session(&bakery_snapshot(vec![poolish_method(false)]), &request);
    assert_eq!(keeping.derived_session.final_mix.flour_g, 1000.0);
}

#[test]
fn missing_required_fields_warn_but_resolve() {
    let snapshot = bakery_snapshot(Vec::new());
    let resolution = resolve_session(&snapshot, &ResolutionRequest::default());
    assert_eq!(
        resolution.warnings,
        vec!["Missing required field: oven_type".to_string()]
    );
    assert_eq!(resolution.derived_session.target_total_dough_g, 0.0);
    assert!(resolution.derived_session.batches.is_empty());
}

#[test]
fn unknown_methods_and_keys_degrade_quietly() {
    let snapshot = ConfigSnapshot::load_from_static();
    let request = ResolutionRequest::new(Some("no_such_method"), Some("no_such_preset"))
        .with_override("definitely_not_a_field", 42.0);
    let resolution = resolve_session(&snapshot, &request);
    assert!(!resolution.resolved_session.contains("definitely_not_a_field"));
    assert_eq!(
        resolution.resolved_session.value("flour_blend_id"),
        &FieldValue::from("tipo00")
    );
    assert!(resolution.warnings.is_empty(), "{:?}", resolution.warnings);
}

#[test]
fn resolution_is_deterministic() {
    let snapshot = ConfigSnapshot::load_from_static();
    let request = ResolutionRequest::new(Some("poolish_biga"), Some("pizza_rossa_bakery"))
        .with_override("poolish_share_percent", "65,5")
        .with_override("honey_percent", 9.0);
    let first = serde_json::to_value(resolve_session(&snapshot, &request)).unwrap();
    let second = serde_json::to_value(resolve_session(&snapshot, &request)).unwrap();
    assert_eq!(digest(&first), digest(&second));
    assert_eq!(first, second);
}
