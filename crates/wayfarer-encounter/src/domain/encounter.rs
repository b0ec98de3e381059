//! The encounter aggregate: its slots, context and lifecycle.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::choice::{ChoiceApproach, ChoiceArchetype};
use super::template::ActionType;
use super::values::{EncounterValues, ValueCondition, ValueType};

/// Location and action snapshot for the current round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterContext {
    pub action_type: ActionType,
    #[serde(default)]
    pub location_properties: BTreeMap<String, String>,
    #[serde(default)]
    pub spot_properties: BTreeMap<String, String>,
    #[serde(default)]
    pub world_properties: BTreeMap<String, String>,
    #[serde(default)]
    pub current_values: EncounterValues,
}

impl EncounterContext {
    #[must_use]
    pub fn new(action_type: ActionType) -> Self {
        Self {
            action_type,
            location_properties: BTreeMap::new(),
            spot_properties: BTreeMap::new(),
            world_properties: BTreeMap::new(),
            current_values: EncounterValues::default(),
        }
    }

    /// Replaces the current values.
    #[must_use]
    pub fn with_values(mut self, values: EncounterValues) -> Self {
        self.current_values = values;
        self
    }
}

/// A named source of a potential future choice.
///
/// While its conditions hold, an eligible slot is offered as a choice.
/// Resolving that choice removes the slot and adds its `unlocks` to the
/// encounter's modified slots.
///
/// Slots are identified by name; removing a slot removes every slot with
/// that name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceSlot {
    pub name: String,
    pub archetype: ChoiceArchetype,
    pub approach: ChoiceApproach,
    #[serde(default)]
    pub conditions: Vec<ValueCondition>,
    #[serde(default)]
    pub unlocks: Vec<ChoiceSlot>,
}

impl ChoiceSlot {
    #[must_use]
    pub fn new(name: impl Into<String>, archetype: ChoiceArchetype, approach: ChoiceApproach) -> Self {
        Self {
            name: name.into(),
            archetype,
            approach,
            conditions: Vec::new(),
            unlocks: Vec::new(),
        }
    }

    /// Adds a value condition that must hold for the slot to be eligible.
    #[must_use]
    pub fn when(mut self, condition: ValueCondition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Adds a slot that becomes available once this one is resolved.
    #[must_use]
    pub fn unlocking(mut self, slot: ChoiceSlot) -> Self {
        self.unlocks.push(slot);
        self
    }

    #[must_use]
    pub fn is_eligible(&self, values: &EncounterValues) -> bool {
        self.conditions.iter().all(|c| c.is_met(values))
    }
}

/// Result of an external evaluation after a choice resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncounterResult {
    Ongoing,
    Success,
    Failure,
}

/// Lifecycle state of an encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncounterStatus {
    Active,
    Terminal(EncounterResult),
}

/// Long-lived aggregate mutated once per resolved choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Encounter {
    id: Uuid,
    base_slots: Vec<ChoiceSlot>,
    modified_slots: Vec<ChoiceSlot>,
    context: EncounterContext,
    status: EncounterStatus,
}

impl Encounter {
    /// Creates an active encounter.
    #[must_use]
    pub fn new(id: Uuid, context: EncounterContext, base_slots: Vec<ChoiceSlot>) -> Self {
        Self {
            id,
            base_slots,
            modified_slots: Vec::new(),
            context,
            status: EncounterStatus::Active,
        }
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn base_slots(&self) -> &[ChoiceSlot] {
        &self.base_slots
    }

    #[must_use]
    pub fn modified_slots(&self) -> &[ChoiceSlot] {
        &self.modified_slots
    }

    #[must_use]
    pub fn context(&self) -> &EncounterContext {
        &self.context
    }

    #[must_use]
    pub fn values(&self) -> &EncounterValues {
        &self.context.current_values
    }

    #[must_use]
    pub fn status(&self) -> EncounterStatus {
        self.status
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == EncounterStatus::Active
    }

    /// Slots from both pools whose conditions hold for the current values.
    #[must_use]
    pub fn eligible_slots(&self) -> Vec<&ChoiceSlot> {
        self.base_slots
            .iter()
            .chain(&self.modified_slots)
            .filter(|slot| slot.is_eligible(&self.context.current_values))
            .collect()
    }

    /// Records the externally computed result. Anything other than
    /// `Ongoing` closes the encounter; a closed encounter stays closed.
    pub fn record_result(&mut self, result: EncounterResult) {
        if self.is_active() && result != EncounterResult::Ongoing {
            self.status = EncounterStatus::Terminal(result);
        }
    }

    pub(crate) fn apply_resolution(
        &mut self,
        deltas: &BTreeMap<ValueType, i32>,
        archetype: ChoiceArchetype,
        approach: ChoiceApproach,
    ) {
        self.context
            .current_values
            .apply_resolution(deltas, archetype, approach);
    }

    pub(crate) fn remove_slot(&mut self, slot: &ChoiceSlot) {
        self.base_slots.retain(|s| s.name != slot.name);
        self.modified_slots.retain(|s| s.name != slot.name);
    }

    pub(crate) fn add_modified_slot(&mut self, slot: ChoiceSlot) {
        self.modified_slots.push(slot);
    }
}
