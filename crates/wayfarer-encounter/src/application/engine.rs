//! Wires the collaborators and configuration into the engine components.

use std::sync::Arc;

use wayfarer_core::rng::{DeterministicRng, SeededRng};

use crate::config::EngineConfig;
use crate::rules::{BaseValueGenerator, LocationEffects, NoLocationEffects, RuleTable, StandardRules};

use super::calculator::ChoiceCalculator;
use super::executor::ChoiceExecutor;
use super::generator::ChoiceGenerator;
use super::selector::TemplateSelector;

/// Shared, read-only engine setup. Per-round components borrow from it.
#[derive(Clone)]
pub struct EncounterEngine {
    rules: Arc<dyn RuleTable>,
    base_values: Arc<dyn BaseValueGenerator>,
    location: Arc<dyn LocationEffects>,
    config: EngineConfig,
}

impl EncounterEngine {
    #[must_use]
    pub fn new(
        rules: Arc<dyn RuleTable>,
        base_values: Arc<dyn BaseValueGenerator>,
        location: Arc<dyn LocationEffects>,
        config: EngineConfig,
    ) -> Self {
        Self {
            rules,
            base_values,
            location,
            config,
        }
    }

    /// The standard rule set with no location effects.
    #[must_use]
    pub fn standard(config: EngineConfig) -> Self {
        let rules = Arc::new(StandardRules::new());
        Self::new(rules.clone(), rules, Arc::new(NoLocationEffects), config)
    }

    /// Replaces the location effects.
    #[must_use]
    pub fn with_location(mut self, location: Arc<dyn LocationEffects>) -> Self {
        self.location = location;
        self
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn selector(&self) -> TemplateSelector {
        TemplateSelector::new(self.config.template_shortlist_size)
    }

    #[must_use]
    pub fn calculator(&self) -> ChoiceCalculator<'_> {
        ChoiceCalculator::new(&*self.rules, &*self.location, self.config.pressure_requirement_cap)
    }

    /// A generator with a fresh combination set.
    #[must_use]
    pub fn generator(&self) -> ChoiceGenerator<'_> {
        ChoiceGenerator::new(
            &*self.rules,
            &*self.base_values,
            self.calculator(),
            self.config.target_choice_count,
            self.config.desperate_pressure_threshold,
        )
    }

    #[must_use]
    pub fn executor(&self) -> ChoiceExecutor {
        ChoiceExecutor
    }

    /// An RNG for a new session: seeded when configured, entropy otherwise.
    #[must_use]
    pub fn session_rng(&self) -> Box<dyn DeterministicRng + Send> {
        match self.config.seed {
            Some(seed) => Box::new(SeededRng::from_seed(seed)),
            None => Box::new(SeededRng::from_entropy()),
        }
    }
}

impl std::fmt::Debug for EncounterEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncounterEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
