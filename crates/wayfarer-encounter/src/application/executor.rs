//! Validates and applies a selected choice.

use thiserror::Error;
use tracing::{info, instrument, warn};
use wayfarer_core::error::DomainError;

use crate::domain::choice::{ChoiceCalculationResult, EncounterChoice};
use crate::domain::encounter::Encounter;
use crate::domain::player::{GameState, PlayerState};
use crate::domain::requirement::Requirement;

/// Why a choice could not be applied. Nothing is mutated on rejection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChoiceRejected {
    /// The first requirement that did not hold.
    #[error("{0}")]
    UnmetRequirement(Requirement),
    /// The encounter already has a terminal result.
    #[error("encounter is closed")]
    EncounterClosed,
}

impl From<ChoiceRejected> for DomainError {
    fn from(rejection: ChoiceRejected) -> Self {
        Self::ChoiceRejected(rejection.to_string())
    }
}

/// Summary of an applied choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedChoice {
    pub label: String,
    pub costs_applied: usize,
    pub rewards_applied: usize,
    pub slot_removed: Option<String>,
    pub slots_added: usize,
}

/// Applies choices to an encounter and its player.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChoiceExecutor;

impl ChoiceExecutor {
    /// Checks every requirement of `result` against the current state, then
    /// applies costs, the merged value delta and rewards, in that order,
    /// followed by the choice's slot changes.
    ///
    /// # Errors
    ///
    /// Returns `ChoiceRejected::EncounterClosed` if the encounter is terminal
    /// and `ChoiceRejected::UnmetRequirement` for the first failing
    /// requirement. Neither the encounter nor the player is touched.
    #[instrument(skip_all, fields(encounter_id = %encounter.id(), choice = %choice.label))]
    pub fn execute_choice(
        &self,
        encounter: &mut Encounter,
        player: &mut PlayerState,
        choice: &EncounterChoice,
        result: &ChoiceCalculationResult,
    ) -> Result<AppliedChoice, ChoiceRejected> {
        if !encounter.is_active() {
            warn!("choice rejected: encounter closed");
            return Err(ChoiceRejected::EncounterClosed);
        }

        let state = GameState::new(player, encounter.values());
        if let Some(unmet) = result
            .requirements
            .iter()
            .find(|requirement| !requirement.is_satisfied(&state))
        {
            warn!(requirement = %unmet, "choice rejected: requirement not met");
            return Err(ChoiceRejected::UnmetRequirement(unmet.clone()));
        }

        for cost in &result.costs {
            cost.apply(player);
        }
        let deltas = result.merged_value_modifications();
        encounter.apply_resolution(&deltas, choice.archetype, choice.approach);
        for reward in &result.rewards {
            reward.apply(player);
        }

        if let Some(slot) = &choice.choice_slot_to_remove {
            encounter.remove_slot(slot);
        }
        for slot in &choice.choice_slot_modifications {
            encounter.add_modified_slot(slot.clone());
        }

        let values = encounter.values();
        info!(
            momentum = values.momentum(),
            insight = values.insight(),
            resonance = values.resonance(),
            outcome = values.outcome(),
            pressure = values.pressure(),
            "choice applied"
        );

        Ok(AppliedChoice {
            label: choice.label.clone(),
            costs_applied: result.costs.len(),
            rewards_applied: result.rewards.len(),
            slot_removed: choice.choice_slot_to_remove.as_ref().map(|slot| slot.name.clone()),
            slots_added: choice.choice_slot_modifications.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::domain::choice::{ChoiceApproach, ChoiceArchetype, EnergyType};
    use crate::domain::encounter::{EncounterContext, EncounterResult};
    use crate::domain::outcome::Outcome;
    use crate::domain::template::ActionType;
    use crate::domain::values::{EncounterValues, ValueModification, ValueType};

    fn encounter(values: EncounterValues) -> Encounter {
        Encounter::new(
            Uuid::new_v4(),
            EncounterContext::new(ActionType::Labor).with_values(values),
            Vec::new(),
        )
    }

    #[test]
    fn test_costs_apply_before_rewards() {
        let mut encounter = encounter(EncounterValues::default());
        let mut player = PlayerState {
            physical_energy: 1,
            ..PlayerState::default()
        };
        let choice = EncounterChoice::new(0, ChoiceArchetype::Physical, ChoiceApproach::Careful);
        // A cost that floors at zero must not swallow a later reward.
        let result = ChoiceCalculationResult {
            costs: vec![Outcome::Energy {
                energy_type: EnergyType::Physical,
                amount: -3,
            }],
            rewards: vec![Outcome::Energy {
                energy_type: EnergyType::Physical,
                amount: 2,
            }],
            ..ChoiceCalculationResult::default()
        };

        let applied = ChoiceExecutor
            .execute_choice(&mut encounter, &mut player, &choice, &result)
            .unwrap();

        assert_eq!(player.physical_energy, 2);
        assert_eq!(applied.costs_applied, 1);
        assert_eq!(applied.rewards_applied, 1);
    }

    #[test]
    fn test_history_records_resolved_choice() {
        let mut encounter = encounter(EncounterValues::default());
        let mut player = PlayerState::default();
        let choice = EncounterChoice::new(0, ChoiceArchetype::Social, ChoiceApproach::Careful);
        let result = ChoiceCalculationResult {
            value_modifications: vec![ValueModification::encounter(ValueType::Resonance, 4, "Social Careful")],
            ..ChoiceCalculationResult::default()
        };

        ChoiceExecutor
            .execute_choice(&mut encounter, &mut player, &choice, &result)
            .unwrap();

        assert_eq!(encounter.values().resonance(), 4);
        assert_eq!(encounter.values().last_archetype(), Some(ChoiceArchetype::Social));
        assert_eq!(encounter.values().last_approach(), Some(ChoiceApproach::Careful));
    }

    #[test]
    fn test_unmet_requirement_is_reported() {
        let mut encounter = encounter(EncounterValues::default());
        let mut player = PlayerState::default();
        let choice = EncounterChoice::new(0, ChoiceArchetype::Focus, ChoiceApproach::Tactical);
        let result = ChoiceCalculationResult {
            requirements: vec![Requirement::Insight(3)],
            ..ChoiceCalculationResult::default()
        };

        let rejection = ChoiceExecutor
            .execute_choice(&mut encounter, &mut player, &choice, &result)
            .unwrap_err();

        assert_eq!(rejection, ChoiceRejected::UnmetRequirement(Requirement::Insight(3)));
        assert_eq!(
            DomainError::from(rejection).to_string(),
            "choice rejected: requires Insight at 3 or above"
        );
    }

    #[test]
    fn test_closed_encounter_rejects_choices() {
        let mut encounter = encounter(EncounterValues::default());
        encounter.record_result(EncounterResult::Success);
        let before = encounter.clone();
        let mut player = PlayerState::default();
        let choice = EncounterChoice::new(0, ChoiceArchetype::Focus, ChoiceApproach::Careful);

        let rejection = ChoiceExecutor
            .execute_choice(&mut encounter, &mut player, &choice, &ChoiceCalculationResult::default())
            .unwrap_err();

        assert_eq!(rejection, ChoiceRejected::EncounterClosed);
        assert_eq!(encounter, before);
    }
}
