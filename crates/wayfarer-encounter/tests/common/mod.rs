//! Shared fixtures for encounter integration tests.
#![allow(dead_code)]

use uuid::Uuid;
use wayfarer_encounter::domain::choice::{
    ChoiceApproach, ChoiceArchetype, ChoiceCalculationResult, EncounterChoice,
};
use wayfarer_encounter::domain::encounter::{ChoiceSlot, Encounter, EncounterContext};
use wayfarer_encounter::domain::player::PlayerState;
use wayfarer_encounter::domain::template::ActionType;
use wayfarer_encounter::domain::values::{EncounterValues, ValueModification};
use wayfarer_encounter::rules::{BaseValueGenerator, RuleTable};

/// Rule table that offers every approach to every archetype, in
/// declaration order, with no effects of its own.
#[derive(Debug, Default)]
pub struct OpenRules;

impl RuleTable for OpenRules {
    fn choice_base_value_effects(&self, _choice: &EncounterChoice) -> Vec<ValueModification> {
        Vec::new()
    }

    fn available_approaches(
        &self,
        _archetype: ChoiceArchetype,
        _values: &EncounterValues,
        _player: &PlayerState,
    ) -> Vec<ChoiceApproach> {
        ChoiceApproach::ALL.to_vec()
    }

    fn priority_order(&self, _archetype: ChoiceArchetype, _values: &EncounterValues) -> Vec<ChoiceApproach> {
        ChoiceApproach::ALL.to_vec()
    }

    fn archetype_value(&self, _archetype: ChoiceArchetype, _values: &EncounterValues) -> i32 {
        0
    }

    fn is_choice_possible(
        &self,
        _archetype: ChoiceArchetype,
        _approach: ChoiceApproach,
        _values: &EncounterValues,
        _player: &PlayerState,
    ) -> bool {
        true
    }
}

impl BaseValueGenerator for OpenRules {
    fn generate_base_value_changes(
        &self,
        _archetype: ChoiceArchetype,
        _approach: ChoiceApproach,
    ) -> Vec<ValueModification> {
        Vec::new()
    }
}

/// An active encounter with the given values and base slots.
pub fn encounter(values: EncounterValues, base_slots: Vec<ChoiceSlot>) -> Encounter {
    Encounter::new(
        Uuid::new_v4(),
        EncounterContext::new(ActionType::Investigate).with_values(values),
        base_slots,
    )
}

/// A choice whose calculation result carries exactly `result`.
pub fn calculated_choice(
    archetype: ChoiceArchetype,
    approach: ChoiceApproach,
    result: ChoiceCalculationResult,
) -> EncounterChoice {
    let mut choice = EncounterChoice::new(0, archetype, approach);
    choice.calculation_result = result;
    choice
}

/// A player with some of every resource.
pub fn rested_player() -> PlayerState {
    PlayerState {
        physical_energy: 6,
        focus_energy: 6,
        social_energy: 6,
        coins: 10,
        confidence: 3,
        health: 10,
        ..PlayerState::default()
    }
}

/// Template content used by the end-to-end tests.
pub const TEMPLATES: &str = r"
village:
  - name: Night watch
    action_type: Investigate
    composition:
      primary_archetype: Focus
      secondary_archetype: Physical
    world_conditions:
      - property: TimeOfDay
        value: Night
  - name: Market questions
    action_type: Investigate
    composition:
      primary_archetype: Social
      secondary_archetype: Focus
    value_conditions:
      - value_type: Pressure
        max: 6
";
