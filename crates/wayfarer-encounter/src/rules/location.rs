//! Location effects driven by location property rules.

use serde::{Deserialize, Serialize};

use crate::domain::choice::{ChoiceApproach, ChoiceArchetype, EncounterChoice};
use crate::domain::encounter::EncounterContext;
use crate::domain::outcome::Outcome;
use crate::domain::requirement::Requirement;
use crate::domain::template::PropertyCondition;

use super::LocationEffects;

/// Effects granted while a location property holds, optionally limited to
/// one archetype or approach.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationEffectRule {
    pub when: PropertyCondition,
    #[serde(default)]
    pub archetype: Option<ChoiceArchetype>,
    #[serde(default)]
    pub approach: Option<ChoiceApproach>,
    #[serde(default)]
    pub energy_cost_modifier: i32,
    #[serde(default)]
    pub requirements: Vec<Requirement>,
    #[serde(default)]
    pub costs: Vec<Outcome>,
    #[serde(default)]
    pub rewards: Vec<Outcome>,
}

impl LocationEffectRule {
    fn applies(&self, choice: &EncounterChoice, context: &EncounterContext) -> bool {
        self.archetype.is_none_or(|a| a == choice.archetype)
            && self.approach.is_none_or(|a| a == choice.approach)
            && self.when.is_met(&context.location_properties)
    }
}

/// Sums every matching [`LocationEffectRule`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyLocationEffects {
    rules: Vec<LocationEffectRule>,
}

impl PropertyLocationEffects {
    #[must_use]
    pub fn new(rules: Vec<LocationEffectRule>) -> Self {
        Self { rules }
    }

    fn matching<'a>(
        &'a self,
        choice: &'a EncounterChoice,
        context: &'a EncounterContext,
    ) -> impl Iterator<Item = &'a LocationEffectRule> {
        self.rules.iter().filter(move |rule| rule.applies(choice, context))
    }
}

impl LocationEffects for PropertyLocationEffects {
    fn energy_cost_modifier(&self, choice: &EncounterChoice, context: &EncounterContext) -> i32 {
        self.matching(choice, context)
            .fold(0, |total: i32, rule| total.saturating_add(rule.energy_cost_modifier))
    }

    fn location_requirements(&self, choice: &EncounterChoice, context: &EncounterContext) -> Vec<Requirement> {
        self.matching(choice, context)
            .flat_map(|rule| rule.requirements.iter().cloned())
            .collect()
    }

    fn location_costs(&self, choice: &EncounterChoice, context: &EncounterContext) -> Vec<Outcome> {
        self.matching(choice, context)
            .flat_map(|rule| rule.costs.iter().cloned())
            .collect()
    }

    fn location_rewards(&self, choice: &EncounterChoice, context: &EncounterContext) -> Vec<Outcome> {
        self.matching(choice, context)
            .flat_map(|rule| rule.rewards.iter().cloned())
            .collect()
    }
}
