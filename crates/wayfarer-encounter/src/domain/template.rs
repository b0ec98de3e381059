//! Choice-set templates and the conditions that gate their selection.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::choice::CompositionPattern;
use super::encounter::EncounterContext;
use super::player::PlayerState;
use super::values::ValueCondition;

/// The kind of action that opened the encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ActionType {
    Labor,
    Gather,
    Travel,
    Investigate,
    Study,
    Reflect,
    Rest,
    Recover,
    Mingle,
    Discuss,
    Persuade,
    Perform,
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Requires a named property to hold an exact value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyCondition {
    pub property: String,
    pub value: String,
}

impl PropertyCondition {
    #[must_use]
    pub fn new(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
        }
    }

    #[must_use]
    pub fn is_met(&self, properties: &BTreeMap<String, String>) -> bool {
        properties
            .get(&self.property)
            .is_some_and(|actual| *actual == self.value)
    }
}

/// A composition pattern plus the conditions under which it applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceSetTemplate {
    pub name: String,
    pub action_type: ActionType,
    #[serde(default)]
    pub composition: CompositionPattern,
    #[serde(default)]
    pub location_conditions: Vec<PropertyCondition>,
    #[serde(default)]
    pub spot_conditions: Vec<PropertyCondition>,
    #[serde(default)]
    pub world_conditions: Vec<PropertyCondition>,
    #[serde(default)]
    pub player_conditions: Vec<PropertyCondition>,
    #[serde(default)]
    pub value_conditions: Vec<ValueCondition>,
}

impl ChoiceSetTemplate {
    /// Creates an unconditional template.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        action_type: ActionType,
        composition: CompositionPattern,
    ) -> Self {
        Self {
            name: name.into(),
            action_type,
            composition,
            location_conditions: Vec::new(),
            spot_conditions: Vec::new(),
            world_conditions: Vec::new(),
            player_conditions: Vec::new(),
            value_conditions: Vec::new(),
        }
    }

    /// The default template callers substitute when selection finds nothing.
    #[must_use]
    pub fn fallback(action_type: ActionType) -> Self {
        Self::new("Default", action_type, CompositionPattern::default())
    }

    /// Whether the action type matches and every condition group holds.
    #[must_use]
    pub fn matches(&self, context: &EncounterContext, player: &PlayerState) -> bool {
        self.action_type == context.action_type
            && self
                .location_conditions
                .iter()
                .all(|c| c.is_met(&context.location_properties))
            && self
                .spot_conditions
                .iter()
                .all(|c| c.is_met(&context.spot_properties))
            && self
                .world_conditions
                .iter()
                .all(|c| c.is_met(&context.world_properties))
            && self
                .player_conditions
                .iter()
                .all(|c| c.is_met(&player.status))
            && self
                .value_conditions
                .iter()
                .all(|c| c.is_met(&context.current_values))
    }
}
