//! Query handlers for the encounter engine.
//!
//! Return read-only view DTOs of a session's encounter.

use std::collections::BTreeMap;

use serde::Serialize;
use uuid::Uuid;
use wayfarer_core::error::DomainError;

use crate::domain::choice::EncounterChoice;
use crate::domain::encounter::{ChoiceSlot, EncounterStatus};
use crate::domain::player::{GameState, PlayerState};
use crate::domain::values::EncounterValues;

use super::session::{SessionRegistry, lock_session};

/// Read-only view of the five encounter channels.
#[derive(Debug, Serialize)]
pub struct ValuesView {
    pub momentum: i32,
    pub insight: i32,
    pub resonance: i32,
    pub outcome: i32,
    pub pressure: i32,
    /// The last resolved archetype, if any.
    pub last_archetype: Option<String>,
    /// The last resolved approach, if any.
    pub last_approach: Option<String>,
}

impl From<&EncounterValues> for ValuesView {
    fn from(values: &EncounterValues) -> Self {
        Self {
            momentum: values.momentum(),
            insight: values.insight(),
            resonance: values.resonance(),
            outcome: values.outcome(),
            pressure: values.pressure(),
            last_archetype: values.last_archetype().as_ref().map(ToString::to_string),
            last_approach: values.last_approach().as_ref().map(ToString::to_string),
        }
    }
}

/// Read-only view of a presented choice.
#[derive(Debug, Serialize)]
pub struct ChoiceView {
    /// Index to pass back when resolving.
    pub index: usize,
    /// Display label: "Archetype - Approach", or the slot name.
    pub label: String,
    /// Net change per channel.
    pub value_changes: BTreeMap<String, i32>,
    /// Requirement descriptions.
    pub requirements: Vec<String>,
    /// Cost descriptions.
    pub costs: Vec<String>,
    /// Reward descriptions.
    pub rewards: Vec<String>,
    /// Special requirements of strategic choices: "tool", "knowledge" or
    /// "reputation". Shown to the player, not checked.
    pub special_requirements: Vec<&'static str>,
    /// Slot consumed by this choice, if it came from one.
    pub slot: Option<String>,
    /// Whether every requirement currently holds.
    pub available: bool,
    /// Values after the choice, were it applied now.
    pub projected: ValuesView,
}

impl ChoiceView {
    fn new(choice: &EncounterChoice, state: &GameState<'_>) -> Self {
        let result = &choice.calculation_result;
        Self {
            index: choice.index,
            label: choice.label.clone(),
            value_changes: result
                .merged_value_modifications()
                .into_iter()
                .map(|(value_type, amount)| (value_type.to_string(), amount))
                .collect(),
            requirements: result.requirements.iter().map(ToString::to_string).collect(),
            costs: result.costs.iter().map(ToString::to_string).collect(),
            rewards: result.rewards.iter().map(ToString::to_string).collect(),
            special_requirements: [
                (choice.requires_tool, "tool"),
                (choice.requires_knowledge, "knowledge"),
                (choice.requires_reputation, "reputation"),
            ]
            .into_iter()
            .filter_map(|(required, name)| required.then_some(name))
            .collect(),
            slot: choice.choice_slot_to_remove.as_ref().map(|slot| slot.name.clone()),
            available: result.requirements.iter().all(|r| r.is_satisfied(state)),
            projected: ValuesView::from(&result.projected_values(state.values)),
        }
    }
}

/// Read-only view of a session's encounter.
#[derive(Debug, Serialize)]
pub struct EncounterView {
    /// The encounter identifier.
    pub encounter_id: Uuid,
    /// "Active", or the terminal result.
    pub status: String,
    /// The action that opened the encounter.
    pub action_type: String,
    /// Current channel values.
    pub values: ValuesView,
    /// The player's current resources.
    pub player: PlayerState,
    /// Names of the base slots.
    pub base_slots: Vec<String>,
    /// Names of the slots unlocked during play.
    pub modified_slots: Vec<String>,
    /// Names of slots whose conditions currently hold.
    pub eligible_slots: Vec<String>,
    /// Template behind the presented set, if any.
    pub template_name: Option<String>,
    /// The presented choices awaiting a selection.
    pub choices: Vec<ChoiceView>,
}

fn slot_names<'a>(slots: impl IntoIterator<Item = &'a ChoiceSlot>) -> Vec<String> {
    slots.into_iter().map(|slot| slot.name.clone()).collect()
}

/// Returns a view of the session's encounter.
///
/// # Errors
///
/// Returns `DomainError::SessionNotFound` for an unknown session, or
/// `DomainError::Infrastructure` if a lock is poisoned.
pub fn get_encounter(session_id: Uuid, registry: &SessionRegistry) -> Result<EncounterView, DomainError> {
    let shared = registry.session(session_id)?;
    let session = lock_session(&shared)?;
    let encounter = &session.encounter;
    let state = GameState::new(&session.player, encounter.values());

    let status = match encounter.status() {
        EncounterStatus::Active => "Active".to_owned(),
        EncounterStatus::Terminal(result) => format!("{result:?}"),
    };

    Ok(EncounterView {
        encounter_id: encounter.id(),
        status,
        action_type: encounter.context().action_type.to_string(),
        values: ValuesView::from(encounter.values()),
        player: session.player.clone(),
        base_slots: slot_names(encounter.base_slots()),
        modified_slots: slot_names(encounter.modified_slots()),
        eligible_slots: slot_names(encounter.eligible_slots()),
        template_name: session.presented.as_ref().map(|set| set.template_name.clone()),
        choices: session
            .presented
            .iter()
            .flat_map(|set| &set.choices)
            .map(|choice| ChoiceView::new(choice, &state))
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use wayfarer_test_support::MockRng;

    use super::*;
    use crate::application::session::EncounterSession;
    use crate::domain::choice::{ChoiceApproach, ChoiceArchetype, ChoiceCalculationResult, ChoiceSet};
    use crate::domain::encounter::{Encounter, EncounterContext};
    use crate::domain::requirement::Requirement;
    use crate::domain::template::ActionType;
    use crate::domain::values::{ValueModification, ValueType};

    #[test]
    fn test_view_reports_values_slots_and_choices() {
        // Arrange
        let registry = SessionRegistry::new();
        let session_id = Uuid::new_v4();
        let encounter = Encounter::new(
            Uuid::new_v4(),
            EncounterContext::new(ActionType::Persuade).with_values(EncounterValues::with_values(0, 0, 2, 1, 3)),
            vec![ChoiceSlot::new("plead", ChoiceArchetype::Social, ChoiceApproach::Careful)],
        );
        let mut session = EncounterSession::new(encounter, PlayerState::default(), Vec::new(), Box::new(MockRng));
        let mut choice = EncounterChoice::new(0, ChoiceArchetype::Social, ChoiceApproach::Tactical);
        choice.calculation_result = ChoiceCalculationResult {
            value_modifications: vec![
                ValueModification::encounter(ValueType::Resonance, -3, "Social Tactical"),
                ValueModification::encounter(ValueType::Outcome, 3, "Social Tactical"),
            ],
            requirements: vec![Requirement::Resonance(3)],
            ..ChoiceCalculationResult::default()
        };
        session.presented = Some(ChoiceSet::new("Haggle".to_owned(), vec![choice]));
        registry.register(session_id, session).unwrap();

        // Act
        let view = get_encounter(session_id, &registry).unwrap();

        // Assert
        assert_eq!(view.status, "Active");
        assert_eq!(view.action_type, "Persuade");
        assert_eq!(view.values.pressure, 3);
        assert_eq!(view.base_slots, vec!["plead".to_owned()]);
        assert_eq!(view.eligible_slots, vec!["plead".to_owned()]);
        assert_eq!(view.template_name.as_deref(), Some("Haggle"));
        let choice = &view.choices[0];
        assert!(!choice.available);
        assert_eq!(choice.value_changes["Outcome"], 3);
        assert_eq!(choice.projected.resonance, 0);
        assert_eq!(choice.projected.outcome, 4);
        assert_eq!(choice.requirements, vec!["requires Resonance at 3 or above".to_owned()]);

        assert!(choice.special_requirements.is_empty());
        assert_eq!(choice.slot, None);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["choices"][0]["label"], "Social - Tactical");
    }

    #[test]
    fn test_view_shows_special_requirements_and_slot() {
        let registry = SessionRegistry::new();
        let session_id = Uuid::new_v4();
        let plead = ChoiceSlot::new("plead", ChoiceArchetype::Social, ChoiceApproach::Careful);
        let encounter = Encounter::new(
            Uuid::new_v4(),
            EncounterContext::new(ActionType::Persuade),
            vec![plead.clone()],
        );
        let mut session = EncounterSession::new(encounter, PlayerState::default(), Vec::new(), Box::new(MockRng));
        session.presented = Some(ChoiceSet::new(
            "Haggle".to_owned(),
            vec![
                EncounterChoice::new(0, ChoiceArchetype::Focus, ChoiceApproach::Strategic),
                EncounterChoice::from_slot(1, &plead),
            ],
        ));
        registry.register(session_id, session).unwrap();

        let view = get_encounter(session_id, &registry).unwrap();

        assert_eq!(view.choices[0].special_requirements, vec!["knowledge"]);
        assert_eq!(view.choices[0].slot, None);
        assert!(view.choices[1].special_requirements.is_empty());
        assert_eq!(view.choices[1].slot.as_deref(), Some("plead"));
        assert_eq!(view.choices[1].label, "plead");
    }

    #[test]
    fn test_unknown_session_is_not_found() {
        let registry = SessionRegistry::new();
        assert!(matches!(
            get_encounter(Uuid::new_v4(), &registry),
            Err(DomainError::SessionNotFound(_))
        ));
    }
}
