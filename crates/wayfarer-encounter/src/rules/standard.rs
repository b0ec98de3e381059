//! The standard rule set: availability, priorities and base effects.

use crate::domain::choice::{ChoiceApproach, ChoiceArchetype, EncounterChoice};
use crate::domain::player::PlayerState;
use crate::domain::values::{EncounterValues, ValueModification, ValueType};

use super::{BaseValueGenerator, RuleTable};

const TACTICAL_MINIMUM: i32 = 6;
const STRATEGIC_MINIMUM: i32 = 6;
const PAIRED_MINIMUM: i32 = 4;
const DESPERATE_PRESSURE: i32 = 6;
const ESCALATION_PRESSURE: i32 = 6;

/// Every choice adds this much Pressure on top of its own effects.
const BASE_PRESSURE: i32 = 1;

/// Standard rules for all three archetypes.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardRules;

impl StandardRules {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn is_available(archetype: ChoiceArchetype, approach: ChoiceApproach, values: &EncounterValues) -> bool {
        let momentum = values.momentum();
        let insight = values.insight();
        let resonance = values.resonance();
        match approach {
            ChoiceApproach::Tactical => Self::channel(archetype, values) >= TACTICAL_MINIMUM,
            ChoiceApproach::Strategic => values.outcome() >= STRATEGIC_MINIMUM,
            ChoiceApproach::Diplomatic => resonance >= PAIRED_MINIMUM && insight >= PAIRED_MINIMUM,
            ChoiceApproach::Methodical => insight >= PAIRED_MINIMUM && momentum >= PAIRED_MINIMUM,
            ChoiceApproach::Forceful => momentum >= PAIRED_MINIMUM && resonance >= PAIRED_MINIMUM,
            ChoiceApproach::Desperate => values.pressure() > DESPERATE_PRESSURE,
            ChoiceApproach::Aggressive => values.pressure() <= DESPERATE_PRESSURE,
            ChoiceApproach::Careful => true,
        }
    }

    fn channel(archetype: ChoiceArchetype, values: &EncounterValues) -> i32 {
        match archetype {
            ChoiceArchetype::Physical => values.momentum(),
            ChoiceArchetype::Focus => values.insight(),
            ChoiceArchetype::Social => values.resonance(),
        }
    }

    /// The signature approach of an archetype.
    fn signature_approach(archetype: ChoiceArchetype) -> ChoiceApproach {
        match archetype {
            ChoiceArchetype::Physical => ChoiceApproach::Forceful,
            ChoiceArchetype::Focus => ChoiceApproach::Methodical,
            ChoiceArchetype::Social => ChoiceApproach::Diplomatic,
        }
    }

    fn effects(archetype: ChoiceArchetype, approach: ChoiceApproach) -> Vec<(ValueType, i32)> {
        use ChoiceApproach as A;
        use ValueType::{Insight, Momentum, Outcome, Pressure, Resonance};

        // The archetype's own channel, and the neighbouring channel its
        // signature approach spends and its Strategic approach feeds.
        let (own, neighbour) = match archetype {
            ChoiceArchetype::Physical => (Momentum, Resonance),
            ChoiceArchetype::Focus => (Insight, Momentum),
            ChoiceArchetype::Social => (Resonance, Insight),
        };
        let tactical_relief = if archetype == ChoiceArchetype::Focus { -5 } else { -4 };

        match approach {
            A::Forceful | A::Methodical | A::Diplomatic => {
                if approach != Self::signature_approach(archetype) {
                    return Vec::new();
                }
                vec![(Outcome, 4), (own, -1), (neighbour, -1)]
            }
            A::Tactical => vec![(Outcome, 3), (Pressure, tactical_relief), (own, -3)],
            A::Strategic => vec![(Outcome, 1), (own, -2), (neighbour, 4)],
            A::Careful => vec![(Outcome, -1), (own, 4)],
            A::Aggressive => vec![(Outcome, 5), (Pressure, 2)],
            A::Desperate => vec![(Outcome, 4), (own, -4), (Pressure, 2)],
        }
    }

    fn modifications(archetype: ChoiceArchetype, approach: ChoiceApproach) -> Vec<ValueModification> {
        let source = format!("{archetype} {approach}");
        Self::effects(archetype, approach)
            .into_iter()
            .map(|(value_type, amount)| ValueModification::encounter(value_type, amount, source.clone()))
            .collect()
    }
}

impl RuleTable for StandardRules {
    fn choice_base_value_effects(&self, choice: &EncounterChoice) -> Vec<ValueModification> {
        let mut modifications = vec![ValueModification::encounter(ValueType::Pressure, BASE_PRESSURE, "Base")];
        modifications.extend(Self::modifications(choice.archetype, choice.approach));
        modifications
    }

    fn available_approaches(
        &self,
        archetype: ChoiceArchetype,
        values: &EncounterValues,
        _player: &PlayerState,
    ) -> Vec<ChoiceApproach> {
        ChoiceApproach::ALL
            .into_iter()
            .filter(|approach| Self::is_available(archetype, *approach, values))
            .collect()
    }

    fn priority_order(&self, archetype: ChoiceArchetype, values: &EncounterValues) -> Vec<ChoiceApproach> {
        let mut order = vec![
            Self::signature_approach(archetype),
            ChoiceApproach::Tactical,
            ChoiceApproach::Strategic,
            ChoiceApproach::Careful,
        ];
        if values.last_archetype() == Some(archetype) {
            order.push(ChoiceApproach::Aggressive);
            if values.pressure() >= ESCALATION_PRESSURE {
                order.push(ChoiceApproach::Desperate);
            }
        }
        order
    }

    fn archetype_value(&self, archetype: ChoiceArchetype, values: &EncounterValues) -> i32 {
        Self::channel(archetype, values)
    }

    fn is_choice_possible(
        &self,
        archetype: ChoiceArchetype,
        approach: ChoiceApproach,
        values: &EncounterValues,
        player: &PlayerState,
    ) -> bool {
        self.available_approaches(archetype, values, player)
            .contains(&approach)
    }
}

impl BaseValueGenerator for StandardRules {
    fn generate_base_value_changes(
        &self,
        archetype: ChoiceArchetype,
        approach: ChoiceApproach,
    ) -> Vec<ValueModification> {
        Self::modifications(archetype, approach)
    }
}
