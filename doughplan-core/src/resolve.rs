//! Single entry point threading a request through every pipeline stage.
use serde::{Deserialize, Serialize};

use crate::config::ConfigSnapshot;
use crate::derive::{DerivedSession, derive_session};
use crate::fields;
use crate::merge::merge_overrides;
use crate::normalize::normalize_session;
use crate::safety::apply_safety_rules;
use crate::schema::FieldCatalog;
use crate::validate::validate_session;
use crate::value::{FieldOverrides, FieldValue, SessionRecord};
use crate::warnings::Warnings;

/// A partially specified formulation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ResolutionRequest {
    #[serde(default)]
    pub method_id: Option<String>,
    #[serde(default)]
    pub preset_id: Option<String>,
    #[serde(default)]
    pub user_session_overrides: Option<FieldOverrides>,
}

impl ResolutionRequest {
    #[must_use]
    pub fn new(method_id: Option<&str>, preset_id: Option<&str>) -> Self {
        Self {
            method_id: method_id.map(str::to_string),
            preset_id: preset_id.map(str::to_string),
            user_session_overrides: None,
        }
    }

    /// Add a user override, creating the override map on first use.
    #[must_use]
    pub fn with_override(mut self, field: &str, value: impl Into<FieldValue>) -> Self {
        self.user_session_overrides
            .get_or_insert_with(FieldOverrides::new)
            .insert(field.to_string(), value.into());
        self
    }
}

/// The resolved session, its derived masses, and the reported warnings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Resolution {
    pub resolved_session: SessionRecord,
    pub derived_session: DerivedSession,
    pub warnings: Vec<String>,
}

impl Resolution {
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Resolve a request against a configuration snapshot.
///
/// Stages run in a fixed order: schema defaults, override merge, numeric
/// normalization, validation, safety ceilings, derivation. Identical inputs
/// always produce identical outputs.
#[must_use]
pub fn resolve_session(snapshot: &ConfigSnapshot, request: &ResolutionRequest) -> Resolution {
    let method = snapshot.method_or_default(request.method_id.as_deref());
    let preset = snapshot.preset(request.preset_id.as_deref());
    let empty = FieldOverrides::new();
    let user = request.user_session_overrides.as_ref().unwrap_or(&empty);
    log::debug!(
        "resolving method {:?} preset {:?} with {} override(s)",
        method.id,
        preset.map(|p| p.id.as_str()),
        user.len()
    );

    let catalog = FieldCatalog::from_schema(&snapshot.schema);
    let mut warnings = Warnings::new();

    let session = catalog.build_defaults();
    let session = merge_overrides(session, &catalog, &method, preset, user);
    let session = normalize_session(session, &catalog, &method, &mut warnings);
    let session = validate_session(session, snapshot, &method, &mut warnings);
    let session = apply_safety_rules(
        session,
        &snapshot.global_defaults.ingredient_safety_rules,
        &mut warnings,
    );
    let (resolved_session, derived_session) =
        derive_session(session, &method, &snapshot.global_defaults);

    let suppressed =
        resolved_session.get(fields::WARNINGS_ENABLED) == Some(&FieldValue::Bool(false));
    if suppressed && !warnings.is_empty() {
        log::debug!("suppressing {} warning(s)", warnings.len());
    }
    let warnings = if suppressed {
        Vec::new()
    } else {
        warnings.into_messages()
    };

    Resolution {
        resolved_session,
        derived_session,
        warnings,
    }
}
