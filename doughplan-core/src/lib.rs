//! Doughplan Formulation Engine
//!
//! Platform-agnostic resolution of dough formulation requests into validated
//! sessions and absolute ingredient masses. This crate performs no I/O beyond
//! parsing configuration documents handed to it.

pub mod batch;
pub mod config;
pub mod derive;
pub mod fields;
pub mod merge;
pub mod normalize;
pub mod numbers;
pub mod resolve;
pub mod safety;
pub mod schema;
pub mod style;
pub mod validate;
pub mod value;
pub mod warnings;

// Re-export commonly used types
pub use batch::{Batch, BatchList, max_batch_mass, plan_batches};
pub use config::{
    BatchingDefaults, CalculationModel, ConfigError, ConfigSnapshot, ConfigSource, EmbeddedConfig,
    FileConfig, FinalMixModel, GlobalDefaults, IngredientCeiling, IngredientSafetyRules, Method,
    PrefermentKind, PrefermentModel, Preset, Schema, StarterModel,
};
pub use derive::{
    DerivedSession, FinalMix, HybridComponents, PrefermentBreakdown, StarterBreakdown,
    derive_session,
};
pub use resolve::{Resolution, ResolutionRequest, resolve_session};
pub use schema::{FieldCatalog, FieldKind};
pub use style::{PizzaStyle, TargetSizing};
pub use value::{FieldOverrides, FieldValue, SessionRecord};
pub use warnings::{Warning, Warnings};

/// Read-through accessor for a previously produced resolution.
/// Session-state holders outside this crate provide this.
pub trait ResolutionCache {
    /// The last resolution the holder kept, if any.
    fn current_resolution(&self) -> Option<Resolution>;
}

/// A holder that never has anything cached.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

impl ResolutionCache for NoCache {
    fn current_resolution(&self) -> Option<Resolution> {
        None
    }
}

/// Main engine pairing a configuration source with a resolution accessor
pub struct FormulationEngine<C, R>
where
    C: ConfigSource,
    R: ResolutionCache,
{
    config: C,
    cache: R,
}

impl<C, R> FormulationEngine<C, R>
where
    C: ConfigSource,
    R: ResolutionCache,
{
    /// Create a new engine with the provided configuration source and cache accessor
    pub const fn new(config: C, cache: R) -> Self {
        Self { config, cache }
    }

    /// Load the snapshot and resolve a request against it.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration snapshot cannot be loaded.
    pub fn resolve(&self, request: &ResolutionRequest) -> Result<Resolution, C::Error> {
        let snapshot = self.config.load_snapshot()?;
        Ok(resolve_session(&snapshot, request))
    }

    /// Return the cached resolution when present, otherwise resolve the request.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing is cached and the snapshot cannot be loaded.
    pub fn current_or_resolve(&self, request: &ResolutionRequest) -> Result<Resolution, C::Error> {
        if let Some(cached) = self.cache.current_resolution() {
            log::debug!("using cached resolution");
            return Ok(cached);
        }
        self.resolve(request)
    }
}
