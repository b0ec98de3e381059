//! The five-channel encounter value model and its clamp rules.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::choice::{ChoiceApproach, ChoiceArchetype};

/// Upper bound enforced on Pressure whenever a change is applied.
pub const PRESSURE_CEILING: i32 = 8;

/// The numeric channels of an encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ValueType {
    /// Physical drive built by Physical choices.
    Momentum,
    /// Understanding built by Focus choices.
    Insight,
    /// Rapport built by Social choices.
    Resonance,
    /// Progress toward resolving the encounter.
    Outcome,
    /// Accumulated danger or tension.
    Pressure,
}

impl ValueType {
    /// Every channel, in display order.
    pub const ALL: [Self; 5] = [
        Self::Momentum,
        Self::Insight,
        Self::Resonance,
        Self::Outcome,
        Self::Pressure,
    ];

    /// Clamps a raw channel value to the channel's legal range.
    #[must_use]
    pub fn clamp(self, value: i32) -> i32 {
        match self {
            Self::Pressure => value.clamp(0, PRESSURE_CEILING),
            Self::Momentum | Self::Insight | Self::Resonance | Self::Outcome => value.max(0),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Momentum => "Momentum",
            Self::Insight => "Insight",
            Self::Resonance => "Resonance",
            Self::Outcome => "Outcome",
            Self::Pressure => "Pressure",
        };
        f.write_str(name)
    }
}

/// Current numeric state of an encounter plus the last resolved choice.
///
/// Values passed to [`EncounterValues::with_values`] are taken as given;
/// the clamp rules only apply when a change is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterValues {
    momentum: i32,
    insight: i32,
    resonance: i32,
    outcome: i32,
    pressure: i32,
    last_archetype: Option<ChoiceArchetype>,
    last_approach: Option<ChoiceApproach>,
}

impl EncounterValues {
    /// Creates a value set with no resolution history.
    #[must_use]
    pub fn with_values(momentum: i32, insight: i32, resonance: i32, outcome: i32, pressure: i32) -> Self {
        Self {
            momentum,
            insight,
            resonance,
            outcome,
            pressure,
            last_archetype: None,
            last_approach: None,
        }
    }

    /// Returns a copy carrying the given resolution history.
    #[must_use]
    pub fn with_last_choice(mut self, archetype: ChoiceArchetype, approach: ChoiceApproach) -> Self {
        self.last_archetype = Some(archetype);
        self.last_approach = Some(approach);
        self
    }

    #[must_use]
    pub fn momentum(&self) -> i32 {
        self.momentum
    }

    #[must_use]
    pub fn insight(&self) -> i32 {
        self.insight
    }

    #[must_use]
    pub fn resonance(&self) -> i32 {
        self.resonance
    }

    #[must_use]
    pub fn outcome(&self) -> i32 {
        self.outcome
    }

    #[must_use]
    pub fn pressure(&self) -> i32 {
        self.pressure
    }

    /// Archetype of the most recently resolved choice.
    #[must_use]
    pub fn last_archetype(&self) -> Option<ChoiceArchetype> {
        self.last_archetype
    }

    /// Approach of the most recently resolved choice.
    #[must_use]
    pub fn last_approach(&self) -> Option<ChoiceApproach> {
        self.last_approach
    }

    /// Reads a channel by type.
    #[must_use]
    pub fn get(&self, value_type: ValueType) -> i32 {
        match value_type {
            ValueType::Momentum => self.momentum,
            ValueType::Insight => self.insight,
            ValueType::Resonance => self.resonance,
            ValueType::Outcome => self.outcome,
            ValueType::Pressure => self.pressure,
        }
    }

    fn slot_mut(&mut self, value_type: ValueType) -> &mut i32 {
        match value_type {
            ValueType::Momentum => &mut self.momentum,
            ValueType::Insight => &mut self.insight,
            ValueType::Resonance => &mut self.resonance,
            ValueType::Outcome => &mut self.outcome,
            ValueType::Pressure => &mut self.pressure,
        }
    }

    /// Adds `amount` to one channel and clamps the result.
    pub(crate) fn apply_value_change(&mut self, value_type: ValueType, amount: i32) {
        let slot = self.slot_mut(value_type);
        *slot = value_type.clamp(slot.saturating_add(amount));
    }

    /// Applies a merged delta map in a single pass and records the
    /// resolved choice as the new history entry.
    pub(crate) fn apply_resolution(
        &mut self,
        deltas: &BTreeMap<ValueType, i32>,
        archetype: ChoiceArchetype,
        approach: ChoiceApproach,
    ) {
        for (value_type, amount) in deltas {
            self.apply_value_change(*value_type, *amount);
        }
        self.last_archetype = Some(archetype);
        self.last_approach = Some(approach);
    }

    /// Returns a copy with the merged delta applied, history untouched.
    #[must_use]
    pub fn projected(&self, deltas: &BTreeMap<ValueType, i32>) -> Self {
        let mut projected = *self;
        for (value_type, amount) in deltas {
            projected.apply_value_change(*value_type, *amount);
        }
        projected
    }
}

/// A single change attached to a choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueModification {
    /// A signed change to one encounter channel, with the rule that produced it.
    Encounter {
        value_type: ValueType,
        amount: i32,
        source: String,
    },
    /// An energy discount; never touches encounter values.
    EnergyCostReduction { amount: i32 },
}

impl ValueModification {
    /// Shorthand for an [`ValueModification::Encounter`] entry.
    #[must_use]
    pub fn encounter(value_type: ValueType, amount: i32, source: impl Into<String>) -> Self {
        Self::Encounter {
            value_type,
            amount,
            source: source.into(),
        }
    }

    /// The channel and amount, if this modification targets encounter values.
    #[must_use]
    pub fn as_encounter(&self) -> Option<(ValueType, i32)> {
        match self {
            Self::Encounter {
                value_type, amount, ..
            } => Some((*value_type, *amount)),
            Self::EnergyCostReduction { .. } => None,
        }
    }
}

/// Inclusive bounds on one channel, used by templates and slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueCondition {
    pub value_type: ValueType,
    #[serde(default)]
    pub min: Option<i32>,
    #[serde(default)]
    pub max: Option<i32>,
}

impl ValueCondition {
    #[must_use]
    pub fn is_met(&self, values: &EncounterValues) -> bool {
        let current = values.get(self.value_type);
        self.min.is_none_or(|min| current >= min) && self.max.is_none_or(|max| current <= max)
    }
}
