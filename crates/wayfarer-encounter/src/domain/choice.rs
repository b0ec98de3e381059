//! Choice tags, generated choices and their precomputed effect bundles.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::encounter::ChoiceSlot;
use super::outcome::Outcome;
use super::requirement::Requirement;
use super::values::{EncounterValues, ValueModification, ValueType};

/// The "style" of a choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ChoiceArchetype {
    Physical,
    Focus,
    Social,
}

impl ChoiceArchetype {
    pub const ALL: [Self; 3] = [Self::Physical, Self::Focus, Self::Social];

    /// The energy pool a choice of this archetype draws on.
    #[must_use]
    pub fn energy_type(self) -> EnergyType {
        match self {
            Self::Physical => EnergyType::Physical,
            Self::Focus => EnergyType::Focus,
            Self::Social => EnergyType::Social,
        }
    }

    /// Archetype paired with this one when only desperate choices remain.
    ///
    /// Focus and Social toggle onto each other; Physical pairs with Focus.
    #[must_use]
    pub fn desperate_complement(self) -> Self {
        match self {
            Self::Focus => Self::Social,
            Self::Social | Self::Physical => Self::Focus,
        }
    }
}

impl fmt::Display for ChoiceArchetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Physical => "Physical",
            Self::Focus => "Focus",
            Self::Social => "Social",
        };
        f.write_str(name)
    }
}

/// The "manner" of a choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ChoiceApproach {
    Aggressive,
    Careful,
    Desperate,
    Strategic,
    Tactical,
    Diplomatic,
    Methodical,
    Forceful,
}

impl ChoiceApproach {
    pub const ALL: [Self; 8] = [
        Self::Diplomatic,
        Self::Methodical,
        Self::Forceful,
        Self::Careful,
        Self::Strategic,
        Self::Tactical,
        Self::Aggressive,
        Self::Desperate,
    ];

    /// Approaches whose outcome suffers when pressure outgrows the archetype.
    #[must_use]
    pub fn is_pressure_sensitive(self) -> bool {
        matches!(self, Self::Aggressive | Self::Careful | Self::Desperate)
    }
}

impl fmt::Display for ChoiceApproach {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Aggressive => "Aggressive",
            Self::Careful => "Careful",
            Self::Desperate => "Desperate",
            Self::Strategic => "Strategic",
            Self::Tactical => "Tactical",
            Self::Diplomatic => "Diplomatic",
            Self::Methodical => "Methodical",
            Self::Forceful => "Forceful",
        };
        f.write_str(name)
    }
}

/// Player energy pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EnergyType {
    Physical,
    Focus,
    Social,
}

impl fmt::Display for EnergyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Physical => "Physical",
            Self::Focus => "Focus",
            Self::Social => "Social",
        };
        f.write_str(name)
    }
}

/// Primary/secondary archetype weighting for one generation round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositionPattern {
    pub primary_archetype: ChoiceArchetype,
    pub secondary_archetype: ChoiceArchetype,
}

impl CompositionPattern {
    #[must_use]
    pub fn new(primary_archetype: ChoiceArchetype, secondary_archetype: ChoiceArchetype) -> Self {
        Self {
            primary_archetype,
            secondary_archetype,
        }
    }
}

impl Default for CompositionPattern {
    /// Social first, Physical second.
    fn default() -> Self {
        Self::new(ChoiceArchetype::Social, ChoiceArchetype::Physical)
    }
}

/// Requirements, costs, rewards and value changes computed for one choice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceCalculationResult {
    pub value_modifications: Vec<ValueModification>,
    pub requirements: Vec<Requirement>,
    pub costs: Vec<Outcome>,
    pub rewards: Vec<Outcome>,
}

impl ChoiceCalculationResult {
    /// Appends every list of `other` onto this result.
    pub fn append(&mut self, other: Self) {
        self.value_modifications.extend(other.value_modifications);
        self.requirements.extend(other.requirements);
        self.costs.extend(other.costs);
        self.rewards.extend(other.rewards);
    }

    /// Collapses all encounter modifications into one net delta per channel.
    /// Energy reductions are skipped.
    #[must_use]
    pub fn merged_value_modifications(&self) -> BTreeMap<ValueType, i32> {
        let mut merged = BTreeMap::new();
        for (value_type, amount) in self
            .value_modifications
            .iter()
            .filter_map(ValueModification::as_encounter)
        {
            let entry: &mut i32 = merged.entry(value_type).or_insert(0);
            *entry = entry.saturating_add(amount);
        }
        merged
    }

    /// Values the encounter would hold if this choice were applied to `initial`.
    #[must_use]
    pub fn projected_values(&self, initial: &EncounterValues) -> EncounterValues {
        initial.projected(&self.merged_value_modifications())
    }
}

/// One action offered to the player.
///
/// `calculation_result` accumulates: running the calculator twice on the
/// same choice duplicates every entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterChoice {
    pub index: usize,
    pub label: String,
    pub archetype: ChoiceArchetype,
    pub approach: ChoiceApproach,
    pub base_value_changes: Vec<ValueModification>,
    /// Strategic flags for presentation; no requirement check reads them.
    pub requires_tool: bool,
    pub requires_knowledge: bool,
    pub requires_reputation: bool,
    pub calculation_result: ChoiceCalculationResult,
    pub choice_slot_to_remove: Option<ChoiceSlot>,
    pub choice_slot_modifications: Vec<ChoiceSlot>,
}

impl EncounterChoice {
    /// Creates an uncalculated choice. Strategic approaches carry the special
    /// requirement matching their archetype.
    #[must_use]
    pub fn new(index: usize, archetype: ChoiceArchetype, approach: ChoiceApproach) -> Self {
        let strategic = approach == ChoiceApproach::Strategic;
        Self {
            index,
            label: format!("{archetype} - {approach}"),
            archetype,
            approach,
            base_value_changes: Vec::new(),
            requires_tool: strategic && archetype == ChoiceArchetype::Physical,
            requires_knowledge: strategic && archetype == ChoiceArchetype::Focus,
            requires_reputation: strategic && archetype == ChoiceArchetype::Social,
            calculation_result: ChoiceCalculationResult::default(),
            choice_slot_to_remove: None,
            choice_slot_modifications: Vec::new(),
        }
    }

    /// Creates the choice an eligible slot offers, labelled with the slot's
    /// name. Resolving it removes the slot and unlocks the slot's follow-ups.
    #[must_use]
    pub fn from_slot(index: usize, slot: &ChoiceSlot) -> Self {
        let mut choice = Self::new(index, slot.archetype, slot.approach);
        choice.label.clone_from(&slot.name);
        choice.choice_slot_modifications.clone_from(&slot.unlocks);
        choice.choice_slot_to_remove = Some(slot.clone());
        choice
    }

    /// Marks a slot to be removed from the encounter when this choice resolves.
    #[must_use]
    pub fn removing_slot(mut self, slot: ChoiceSlot) -> Self {
        self.choice_slot_to_remove = Some(slot);
        self
    }

    /// Adds a slot to be unlocked when this choice resolves.
    #[must_use]
    pub fn unlocking_slot(mut self, slot: ChoiceSlot) -> Self {
        self.choice_slot_modifications.push(slot);
        self
    }

    #[must_use]
    pub fn combination(&self) -> (ChoiceArchetype, ChoiceApproach) {
        (self.archetype, self.approach)
    }
}

/// The immutable output of one generation round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceSet {
    pub template_name: String,
    pub choices: Vec<EncounterChoice>,
}

impl ChoiceSet {
    #[must_use]
    pub fn new(template_name: String, choices: Vec<EncounterChoice>) -> Self {
        Self {
            template_name,
            choices,
        }
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&EncounterChoice> {
        self.choices.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.choices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_choice_derives_label_and_flags() {
        let choice = EncounterChoice::new(0, ChoiceArchetype::Physical, ChoiceApproach::Strategic);

        assert_eq!(choice.label, "Physical - Strategic");
        assert!(choice.requires_tool);
        assert!(!choice.requires_knowledge);
        assert!(!choice.requires_reputation);
    }

    #[test]
    fn test_special_flags_follow_archetype() {
        let focus = EncounterChoice::new(0, ChoiceArchetype::Focus, ChoiceApproach::Strategic);
        let social = EncounterChoice::new(1, ChoiceArchetype::Social, ChoiceApproach::Strategic);
        let careful = EncounterChoice::new(2, ChoiceArchetype::Physical, ChoiceApproach::Careful);

        assert!(focus.requires_knowledge);
        assert!(social.requires_reputation);
        assert!(!careful.requires_tool);
    }

    #[test]
    fn test_desperate_complement_toggles() {
        assert_eq!(ChoiceArchetype::Focus.desperate_complement(), ChoiceArchetype::Social);
        assert_eq!(ChoiceArchetype::Social.desperate_complement(), ChoiceArchetype::Focus);
        assert_eq!(ChoiceArchetype::Physical.desperate_complement(), ChoiceArchetype::Focus);
    }

    #[test]
    fn test_default_composition_is_social_then_physical() {
        let pattern = CompositionPattern::default();
        assert_eq!(pattern.primary_archetype, ChoiceArchetype::Social);
        assert_eq!(pattern.secondary_archetype, ChoiceArchetype::Physical);
    }

    #[test]
    fn test_merge_sums_same_channel_and_skips_energy() {
        let result = ChoiceCalculationResult {
            value_modifications: vec![
                ValueModification::encounter(ValueType::Momentum, 3, "a"),
                ValueModification::encounter(ValueType::Momentum, -1, "b"),
                ValueModification::encounter(ValueType::Pressure, 1, "Base"),
                ValueModification::EnergyCostReduction { amount: 2 },
            ],
            ..ChoiceCalculationResult::default()
        };

        let merged = result.merged_value_modifications();

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[&ValueType::Momentum], 2);
        assert_eq!(merged[&ValueType::Pressure], 1);
    }

    #[test]
    fn test_merge_saturates_instead_of_overflowing() {
        let result = ChoiceCalculationResult {
            value_modifications: vec![
                ValueModification::encounter(ValueType::Outcome, i32::MAX, "location"),
                ValueModification::encounter(ValueType::Outcome, 5, "Base"),
            ],
            ..ChoiceCalculationResult::default()
        };

        assert_eq!(result.merged_value_modifications()[&ValueType::Outcome], i32::MAX);
    }

    #[test]
    fn test_slot_choice_removes_slot_and_carries_unlocks() {
        let follow_up = ChoiceSlot::new("pick_the_lock", ChoiceArchetype::Focus, ChoiceApproach::Careful);
        let slot = ChoiceSlot::new("find_the_key", ChoiceArchetype::Focus, ChoiceApproach::Tactical)
            .unlocking(follow_up.clone());

        let choice = EncounterChoice::from_slot(3, &slot);

        assert_eq!(choice.index, 3);
        assert_eq!(choice.label, "find_the_key");
        assert_eq!(choice.combination(), (ChoiceArchetype::Focus, ChoiceApproach::Tactical));
        assert_eq!(choice.choice_slot_to_remove, Some(slot));
        assert_eq!(choice.choice_slot_modifications, vec![follow_up]);
    }

    #[test]
    fn test_append_concatenates_lists() {
        let mut result = ChoiceCalculationResult {
            requirements: vec![Requirement::Momentum(1)],
            ..ChoiceCalculationResult::default()
        };

        result.append(ChoiceCalculationResult {
            requirements: vec![Requirement::Insight(2)],
            rewards: vec![Outcome::Coins(3)],
            ..ChoiceCalculationResult::default()
        });

        assert_eq!(
            result.requirements,
            vec![Requirement::Momentum(1), Requirement::Insight(2)]
        );
        assert_eq!(result.rewards, vec![Outcome::Coins(3)]);
    }

    #[test]
    fn test_projected_values_uses_merged_delta() {
        let result = ChoiceCalculationResult {
            value_modifications: vec![
                ValueModification::encounter(ValueType::Momentum, -5, "a"),
                ValueModification::encounter(ValueType::Momentum, 4, "b"),
            ],
            ..ChoiceCalculationResult::default()
        };
        let initial = EncounterValues::with_values(2, 0, 0, 0, 0);

        // Sequential clamping would give 4; the merged delta gives 1.
        assert_eq!(result.projected_values(&initial).momentum(), 1);
    }
}
