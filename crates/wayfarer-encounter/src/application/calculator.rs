//! Computes the effect bundle of a generated choice.

use std::collections::BTreeMap;

use tracing::trace;

use crate::domain::choice::{ChoiceCalculationResult, EncounterChoice};
use crate::domain::encounter::EncounterContext;
use crate::domain::outcome::Outcome;
use crate::domain::requirement::Requirement;
use crate::domain::values::{EncounterValues, ValueModification, ValueType};
use crate::rules::{LocationEffects, RuleTable};

/// Each point of projected Momentum in this many reduces energy cost by one.
const MOMENTUM_PER_ENERGY_POINT: i32 = 3;
const MAX_ENERGY_REDUCTION: i32 = 3;

/// Fills in a choice's value modifications, requirements, costs and rewards.
#[derive(Clone, Copy)]
pub struct ChoiceCalculator<'a> {
    rules: &'a dyn RuleTable,
    location: &'a dyn LocationEffects,
    pressure_requirement_cap: i32,
}

impl<'a> ChoiceCalculator<'a> {
    #[must_use]
    pub fn new(rules: &'a dyn RuleTable, location: &'a dyn LocationEffects, pressure_requirement_cap: i32) -> Self {
        Self {
            rules,
            location,
            pressure_requirement_cap,
        }
    }

    /// Appends the choice's effects to `choice.calculation_result`.
    ///
    /// Not idempotent: a second call on the same choice appends every entry
    /// again. The generator calls it exactly once per choice.
    pub fn calculate_choice_effects(
        &self,
        choice: &mut EncounterChoice,
        context: &EncounterContext,
        initial: &EncounterValues,
    ) {
        let mut value_modifications = self.rules.choice_base_value_effects(choice);
        value_modifications.extend(self.pressure_modification(choice, initial));

        let mut requirements = self.value_requirements(&value_modifications, initial);

        let projected = initial.projected(&merge(&value_modifications));
        let reduction = (projected.momentum() / MOMENTUM_PER_ENERGY_POINT).clamp(0, MAX_ENERGY_REDUCTION);
        if reduction > 0 {
            value_modifications.push(ValueModification::EnergyCostReduction { amount: reduction });
        }
        let energy_cost = self
            .location
            .energy_cost_modifier(choice, context)
            .saturating_sub(reduction)
            .max(0);

        let mut costs = Vec::new();
        if energy_cost > 0 {
            let energy_type = choice.archetype.energy_type();
            requirements.push(Requirement::Energy {
                energy_type,
                amount: energy_cost,
            });
            costs.push(Outcome::Energy {
                energy_type,
                amount: -energy_cost,
            });
        }

        requirements.extend(self.location.location_requirements(choice, context));
        costs.extend(self.location.location_costs(choice, context));
        let rewards = self.location.location_rewards(choice, context);

        trace!(
            choice = %choice.label,
            modifications = value_modifications.len(),
            requirements = requirements.len(),
            energy_cost,
            "calculated choice effects"
        );

        choice.calculation_result.append(ChoiceCalculationResult {
            value_modifications,
            requirements,
            costs,
            rewards,
        });
    }

    /// The "High Pressure" outcome penalty for pressure-sensitive approaches
    /// once Pressure exceeds the archetype's own channel.
    fn pressure_modification(&self, choice: &EncounterChoice, initial: &EncounterValues) -> Option<ValueModification> {
        if !choice.approach.is_pressure_sensitive() {
            return None;
        }
        let threshold = self.rules.archetype_value(choice.archetype, initial);
        if initial.pressure() <= threshold {
            return None;
        }
        let penalty = ((initial.pressure() - threshold) / 3).max(0);
        Some(ValueModification::encounter(ValueType::Outcome, -penalty, "High Pressure"))
    }

    /// Spending a channel requires holding at least that much of it.
    /// Pressure rises are capped against the current Pressure.
    fn value_requirements(&self, modifications: &[ValueModification], initial: &EncounterValues) -> Vec<Requirement> {
        modifications
            .iter()
            .filter_map(ValueModification::as_encounter)
            .filter_map(|(value_type, amount)| {
                if amount < 0 {
                    Requirement::minimum_value(value_type, amount.saturating_neg())
                } else if value_type == ValueType::Pressure
                    && initial.pressure().saturating_add(amount) > self.pressure_requirement_cap
                {
                    Some(Requirement::Pressure(self.pressure_requirement_cap.saturating_sub(amount)))
                } else {
                    None
                }
            })
            .collect()
    }
}

fn merge(modifications: &[ValueModification]) -> BTreeMap<ValueType, i32> {
    ChoiceCalculationResult {
        value_modifications: modifications.to_vec(),
        ..ChoiceCalculationResult::default()
    }
    .merged_value_modifications()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::choice::{ChoiceApproach, ChoiceArchetype, EnergyType};
    use crate::domain::template::{ActionType, PropertyCondition};
    use crate::rules::{LocationEffectRule, NoLocationEffects, PropertyLocationEffects, StandardRules};

    fn context(values: EncounterValues) -> EncounterContext {
        EncounterContext::new(ActionType::Labor).with_values(values)
    }

    fn calculate(choice: &mut EncounterChoice, values: EncounterValues, location: &dyn LocationEffects, cap: i32) {
        let calculator = ChoiceCalculator::new(&StandardRules, location, cap);
        calculator.calculate_choice_effects(choice, &context(values), &values);
    }

    #[test]
    fn test_negative_changes_become_minimum_requirements() {
        // Arrange
        let values = EncounterValues::with_values(6, 0, 0, 0, 0);
        let mut choice = EncounterChoice::new(0, ChoiceArchetype::Physical, ChoiceApproach::Tactical);

        // Act
        calculate(&mut choice, values, &NoLocationEffects, 20);

        // Assert: Momentum -3 needs 3 Momentum; Pressure -4 needs nothing.
        assert_eq!(choice.calculation_result.requirements, vec![Requirement::Momentum(3)]);
    }

    #[test]
    fn test_high_pressure_penalises_pressure_sensitive_approaches() {
        let values = EncounterValues::with_values(1, 0, 0, 0, 8);
        let mut careful = EncounterChoice::new(0, ChoiceArchetype::Physical, ChoiceApproach::Careful);
        let mut strategic = EncounterChoice::new(1, ChoiceArchetype::Physical, ChoiceApproach::Strategic);

        calculate(&mut careful, values, &NoLocationEffects, 20);
        calculate(&mut strategic, values, &NoLocationEffects, 20);

        assert!(careful.calculation_result.value_modifications.contains(&ValueModification::encounter(
            ValueType::Outcome,
            -2,
            "High Pressure"
        )));
        assert!(!strategic.calculation_result.value_modifications.iter().any(|m| matches!(
            m,
            ValueModification::Encounter { source, .. } if source == "High Pressure"
        )));
    }

    #[test]
    fn test_no_pressure_penalty_at_or_below_archetype_value() {
        let values = EncounterValues::with_values(5, 0, 0, 0, 5);
        let mut choice = EncounterChoice::new(0, ChoiceArchetype::Physical, ChoiceApproach::Aggressive);

        calculate(&mut choice, values, &NoLocationEffects, 20);

        assert_eq!(choice.calculation_result.merged_value_modifications()[&ValueType::Outcome], 5);
    }

    #[test]
    fn test_pressure_rise_past_cap_requires_headroom() {
        let values = EncounterValues::with_values(0, 0, 0, 0, 2);
        let mut choice = EncounterChoice::new(0, ChoiceArchetype::Social, ChoiceApproach::Aggressive);

        // Base +1 and Aggressive +2 each checked against a cap of 2.
        calculate(&mut choice, values, &NoLocationEffects, 2);

        assert_eq!(
            choice.calculation_result.requirements,
            vec![Requirement::Pressure(1), Requirement::Pressure(0)]
        );
    }

    #[test]
    fn test_energy_cost_is_reduced_by_projected_momentum() {
        let location = PropertyLocationEffects::new(vec![LocationEffectRule {
            when: PropertyCondition::new("Terrain", "Rough"),
            archetype: None,
            approach: None,
            energy_cost_modifier: 3,
            requirements: Vec::new(),
            costs: Vec::new(),
            rewards: Vec::new(),
        }]);
        let values = EncounterValues::with_values(2, 0, 0, 0, 0);
        let mut ctx = context(values);
        ctx.location_properties.insert("Terrain".to_owned(), "Rough".to_owned());
        let mut choice = EncounterChoice::new(0, ChoiceArchetype::Physical, ChoiceApproach::Careful);

        // Careful adds 4 Momentum: projected 6 reduces the cost by 2.
        ChoiceCalculator::new(&StandardRules, &location, 20).calculate_choice_effects(&mut choice, &ctx, &values);

        let result = &choice.calculation_result;
        assert!(result.value_modifications.contains(&ValueModification::EnergyCostReduction { amount: 2 }));
        assert_eq!(
            result.costs,
            vec![Outcome::Energy {
                energy_type: EnergyType::Physical,
                amount: -1
            }]
        );
        assert!(result.requirements.contains(&Requirement::Energy {
            energy_type: EnergyType::Physical,
            amount: 1
        }));
    }

    #[test]
    fn test_free_choice_has_no_energy_cost() {
        let values = EncounterValues::default();
        let mut choice = EncounterChoice::new(0, ChoiceArchetype::Focus, ChoiceApproach::Careful);

        calculate(&mut choice, values, &NoLocationEffects, 20);

        assert!(choice.calculation_result.costs.is_empty());
        assert!(choice.calculation_result.rewards.is_empty());
    }

    #[test]
    fn test_second_calculation_duplicates_entries() {
        let values = EncounterValues::with_values(6, 0, 0, 0, 0);
        let mut choice = EncounterChoice::new(0, ChoiceArchetype::Physical, ChoiceApproach::Tactical);

        calculate(&mut choice, values, &NoLocationEffects, 20);
        let once = choice.calculation_result.value_modifications.len();
        calculate(&mut choice, values, &NoLocationEffects, 20);

        assert_eq!(choice.calculation_result.value_modifications.len(), once * 2);
        assert_eq!(choice.calculation_result.requirements.len(), 2);
    }
}
