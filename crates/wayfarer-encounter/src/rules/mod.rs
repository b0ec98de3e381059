//! Collaborator interfaces consulted during generation and calculation.
//!
//! The engine treats every implementation as a total function over valid
//! inputs; none of these calls can fail.

mod location;
mod standard;

pub use location::{LocationEffectRule, PropertyLocationEffects};
pub use standard::StandardRules;

use crate::domain::choice::{ChoiceApproach, ChoiceArchetype, EncounterChoice};
use crate::domain::encounter::EncounterContext;
use crate::domain::outcome::Outcome;
use crate::domain::player::PlayerState;
use crate::domain::requirement::Requirement;
use crate::domain::values::{EncounterValues, ValueModification};

/// Availability, ordering and base effects of archetype/approach pairs.
pub trait RuleTable: Send + Sync {
    /// Base value modifications for the choice's archetype and approach.
    fn choice_base_value_effects(&self, choice: &EncounterChoice) -> Vec<ValueModification>;

    /// Approaches the archetype may use in the given state.
    fn available_approaches(
        &self,
        archetype: ChoiceArchetype,
        values: &EncounterValues,
        player: &PlayerState,
    ) -> Vec<ChoiceApproach>;

    /// Approaches in the order the generator should prefer them.
    fn priority_order(&self, archetype: ChoiceArchetype, values: &EncounterValues) -> Vec<ChoiceApproach>;

    /// The channel an archetype builds, read from `values`.
    fn archetype_value(&self, archetype: ChoiceArchetype, values: &EncounterValues) -> i32;

    fn is_choice_possible(
        &self,
        archetype: ChoiceArchetype,
        approach: ChoiceApproach,
        values: &EncounterValues,
        player: &PlayerState,
    ) -> bool;
}

/// Produces the base value changes shown on a freshly built choice.
pub trait BaseValueGenerator: Send + Sync {
    fn generate_base_value_changes(
        &self,
        archetype: ChoiceArchetype,
        approach: ChoiceApproach,
    ) -> Vec<ValueModification>;
}

/// Effects a location contributes to a choice.
pub trait LocationEffects: Send + Sync {
    /// Energy cost added by the location, before momentum reductions.
    fn energy_cost_modifier(&self, choice: &EncounterChoice, context: &EncounterContext) -> i32;

    fn location_requirements(&self, choice: &EncounterChoice, context: &EncounterContext) -> Vec<Requirement>;

    fn location_costs(&self, choice: &EncounterChoice, context: &EncounterContext) -> Vec<Outcome>;

    fn location_rewards(&self, choice: &EncounterChoice, context: &EncounterContext) -> Vec<Outcome>;
}

/// Location effects for places with no notable properties.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocationEffects;

impl LocationEffects for NoLocationEffects {
    fn energy_cost_modifier(&self, _choice: &EncounterChoice, _context: &EncounterContext) -> i32 {
        0
    }

    fn location_requirements(&self, _choice: &EncounterChoice, _context: &EncounterContext) -> Vec<Requirement> {
        Vec::new()
    }

    fn location_costs(&self, _choice: &EncounterChoice, _context: &EncounterContext) -> Vec<Outcome> {
        Vec::new()
    }

    fn location_rewards(&self, _choice: &EncounterChoice, _context: &EncounterContext) -> Vec<Outcome> {
        Vec::new()
    }
}
