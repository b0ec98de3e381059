//! Allocates archetype/approach combinations into a bounded choice set.

use std::collections::HashSet;

use tracing::{debug, instrument};

use crate::domain::choice::{ChoiceApproach, ChoiceArchetype, ChoiceSet, EncounterChoice};
use crate::domain::encounter::{ChoiceSlot, EncounterContext};
use crate::domain::player::PlayerState;
use crate::domain::template::ChoiceSetTemplate;
use crate::rules::{BaseValueGenerator, RuleTable};

use super::calculator::ChoiceCalculator;

/// Builds choice sets from a template and the current context.
pub struct ChoiceGenerator<'a> {
    rules: &'a dyn RuleTable,
    base_values: &'a dyn BaseValueGenerator,
    calculator: ChoiceCalculator<'a>,
    target_choice_count: usize,
    desperate_pressure_threshold: i32,
    used_combinations: HashSet<(ChoiceArchetype, ChoiceApproach)>,
}

impl<'a> ChoiceGenerator<'a> {
    #[must_use]
    pub fn new(
        rules: &'a dyn RuleTable,
        base_values: &'a dyn BaseValueGenerator,
        calculator: ChoiceCalculator<'a>,
        target_choice_count: usize,
        desperate_pressure_threshold: i32,
    ) -> Self {
        Self {
            rules,
            base_values,
            calculator,
            target_choice_count,
            desperate_pressure_threshold,
            used_combinations: HashSet::new(),
        }
    }

    /// Generates a fully calculated choice set.
    ///
    /// No two choices share an archetype/approach pair, except in the
    /// desperate set produced once Pressure reaches the desperate threshold.
    /// Archetypes with too few available approaches contribute fewer
    /// choices; the set may come back smaller than the target.
    pub fn generate(
        &mut self,
        template: &ChoiceSetTemplate,
        context: &EncounterContext,
        player: &PlayerState,
    ) -> ChoiceSet {
        self.generate_with_slots(template, context, player, &[])
    }

    /// Like [`generate`](Self::generate), but first offers one choice per
    /// eligible encounter slot, in slot order. Slot choices bypass the
    /// availability tables but count towards the target; regular allocation
    /// fills whatever remains. The desperate set ignores slots.
    #[instrument(
        skip_all,
        fields(template = %template.name, pressure = context.current_values.pressure(), slots = slots.len())
    )]
    pub fn generate_with_slots(
        &mut self,
        template: &ChoiceSetTemplate,
        context: &EncounterContext,
        player: &PlayerState,
        slots: &[&ChoiceSlot],
    ) -> ChoiceSet {
        self.used_combinations.clear();
        let pattern = template.composition;
        let values = &context.current_values;

        let mut choices = if values.pressure() >= self.desperate_pressure_threshold {
            let complement = pattern.primary_archetype.desperate_complement();
            debug!(primary = %pattern.primary_archetype, %complement, "pressure forces desperate choices");
            vec![
                self.build_choice(0, pattern.primary_archetype, ChoiceApproach::Desperate),
                self.build_choice(1, pattern.primary_archetype, ChoiceApproach::Desperate),
                self.build_choice(2, complement, ChoiceApproach::Desperate),
            ]
        } else {
            let target = self.target_choice_count;
            let mut choices = Vec::with_capacity(target);

            for slot in slots {
                if choices.len() == target {
                    break;
                }
                if self.used_combinations.contains(&(slot.archetype, slot.approach)) {
                    debug!(slot = %slot.name, "slot pair already offered");
                    continue;
                }
                let choice = self.register(EncounterChoice::from_slot(choices.len(), slot));
                choices.push(choice);
            }

            let primary_count = (target / 2).max(1).min(target.saturating_sub(choices.len()));
            self.allocate(pattern.primary_archetype, primary_count, context, player, &mut choices);
            let secondary_count = (target / 3).max(1).min(target.saturating_sub(choices.len()));
            self.allocate(pattern.secondary_archetype, secondary_count, context, player, &mut choices);

            while choices.len() < target {
                if self.allocate(pattern.primary_archetype, 1, context, player, &mut choices) == 0
                    && self.allocate(pattern.secondary_archetype, 1, context, player, &mut choices) == 0
                {
                    break;
                }
            }
            choices
        };

        for choice in &mut choices {
            self.calculator.calculate_choice_effects(choice, context, values);
        }

        debug!(count = choices.len(), "generated choice set");
        ChoiceSet::new(template.name.clone(), choices)
    }

    /// Adds up to `count` choices of `archetype`, highest priority first.
    /// Returns how many were added.
    fn allocate(
        &mut self,
        archetype: ChoiceArchetype,
        count: usize,
        context: &EncounterContext,
        player: &PlayerState,
        choices: &mut Vec<EncounterChoice>,
    ) -> usize {
        let values = &context.current_values;
        let mut candidates: Vec<ChoiceApproach> = self
            .rules
            .available_approaches(archetype, values, player)
            .into_iter()
            .filter(|approach| !self.used_combinations.contains(&(archetype, *approach)))
            .collect();
        let priority = self.rules.priority_order(archetype, values);

        let mut added = 0;
        while added < count {
            let Some(position) = priority
                .iter()
                .find_map(|wanted| candidates.iter().position(|c| c == wanted))
            else {
                debug!(%archetype, requested = count, added, "no further approaches available");
                break;
            };
            let approach = candidates.remove(position);
            let choice = self.build_choice(choices.len(), archetype, approach);
            choices.push(choice);
            added += 1;
        }
        added
    }

    fn build_choice(&mut self, index: usize, archetype: ChoiceArchetype, approach: ChoiceApproach) -> EncounterChoice {
        self.register(EncounterChoice::new(index, archetype, approach))
    }

    fn register(&mut self, mut choice: EncounterChoice) -> EncounterChoice {
        choice.base_value_changes = self
            .base_values
            .generate_base_value_changes(choice.archetype, choice.approach);
        self.used_combinations.insert(choice.combination());
        choice
    }
}
