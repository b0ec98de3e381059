//! Runs a seeded encounter end to end and logs every round.

use std::error::Error;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use uuid::Uuid;
use wayfarer_encounter::application::command_handlers::{
    handle_present_choices, handle_record_result, handle_resolve_choice,
};
use wayfarer_encounter::application::engine::EncounterEngine;
use wayfarer_encounter::application::query_handlers::get_encounter;
use wayfarer_encounter::application::session::{EncounterSession, SessionRegistry};
use wayfarer_encounter::config::EngineConfig;
use wayfarer_encounter::content::{TemplateRepository, YamlTemplateRepository};
use wayfarer_encounter::domain::choice::{ChoiceApproach, ChoiceArchetype};
use wayfarer_encounter::domain::commands::{PresentChoices, RecordEncounterResult, ResolveChoice};
use wayfarer_encounter::domain::encounter::{
    ChoiceSlot, Encounter, EncounterContext, EncounterResult, EncounterStatus,
};
use wayfarer_encounter::domain::player::PlayerState;
use wayfarer_encounter::domain::template::ActionType;
use wayfarer_encounter::domain::values::{EncounterValues, ValueCondition, ValueType};
use wayfarer_encounter::rules::{LocationEffectRule, PropertyLocationEffects};

const DEFAULT_TEMPLATES: &str = include_str!("../content/templates.yaml");
const DEFAULT_LOCATIONS: &str = include_str!("../content/locations.yaml");

/// Outcome at which the simulated encounter counts as won.
const WINNING_OUTCOME: i32 = 10;

fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Wayfarer encounter simulation");

    // Read configuration from environment.
    let config = EngineConfig::from_env()?;
    let provider = std::env::var("ENCOUNTER_PROVIDER").unwrap_or_else(|_| "village".to_string());
    let rounds: usize = std::env::var("ENCOUNTER_ROUNDS")
        .unwrap_or_else(|_| "8".to_string())
        .parse()
        .map_err(|e| format!("ENCOUNTER_ROUNDS must be a valid usize: {e}"))?;
    let repository = match std::env::var("TEMPLATES_PATH") {
        Ok(path) => YamlTemplateRepository::load(path)?,
        Err(_) => YamlTemplateRepository::from_yaml_str(DEFAULT_TEMPLATES)?,
    };
    let location_rules: Vec<LocationEffectRule> = serde_yaml::from_str(DEFAULT_LOCATIONS)?;

    let engine = EncounterEngine::standard(config)
        .with_location(Arc::new(PropertyLocationEffects::new(location_rules)));
    let registry = SessionRegistry::new();
    let session_id = Uuid::new_v4();
    registry.register(
        session_id,
        EncounterSession::new(
            opening_encounter(),
            opening_player(),
            repository.templates(&provider),
            engine.session_rng(),
        ),
    )?;
    tracing::info!(%session_id, %provider, rounds, "session registered");

    for round in 1..=rounds {
        let set = handle_present_choices(
            &PresentChoices {
                correlation_id: Uuid::new_v4(),
                session_id,
            },
            &engine,
            &registry,
        )?;

        let view = get_encounter(session_id, &registry)?;
        let mut affordable = view.choices.iter().filter(|choice| choice.available);
        let Some(pick) = affordable
            .clone()
            .find(|choice| choice.slot.is_some())
            .or_else(|| affordable.next_back())
        else {
            tracing::warn!(round, "no affordable choice; abandoning encounter");
            record(session_id, EncounterResult::Failure, &registry)?;
            break;
        };
        tracing::info!(
            round,
            template = %set.template_name,
            offered = set.len(),
            picked = %pick.label,
            "round presented"
        );

        handle_resolve_choice(
            &ResolveChoice {
                correlation_id: Uuid::new_v4(),
                session_id,
                choice_index: pick.index,
            },
            &engine,
            &registry,
        )?;

        let values = get_encounter(session_id, &registry)?.values;
        let result = if values.outcome >= WINNING_OUTCOME {
            EncounterResult::Success
        } else if round == rounds {
            EncounterResult::Failure
        } else {
            EncounterResult::Ongoing
        };
        if record(session_id, result, &registry)? != EncounterStatus::Active {
            break;
        }
    }

    let summary = get_encounter(session_id, &registry)?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    registry.remove(session_id)?;

    Ok(())
}

fn record(
    session_id: Uuid,
    result: EncounterResult,
    registry: &SessionRegistry,
) -> Result<EncounterStatus, Box<dyn Error>> {
    let status = handle_record_result(
        &RecordEncounterResult {
            correlation_id: Uuid::new_v4(),
            session_id,
            result,
        },
        registry,
    )?;
    Ok(status)
}

fn opening_encounter() -> Encounter {
    let mut context = EncounterContext::new(ActionType::Investigate)
        .with_values(EncounterValues::with_values(2, 2, 2, 1, 2));
    context
        .location_properties
        .insert("Population".to_string(), "Crowded".to_string());
    context
        .world_properties
        .insert("TimeOfDay".to_string(), "Day".to_string());

    Encounter::new(
        Uuid::new_v4(),
        context,
        vec![
            ChoiceSlot::new("ask_the_warden", ChoiceArchetype::Social, ChoiceApproach::Careful).unlocking(
                ChoiceSlot::new("show_the_writ", ChoiceArchetype::Social, ChoiceApproach::Diplomatic),
            ),
            ChoiceSlot::new("force_the_door", ChoiceArchetype::Physical, ChoiceApproach::Forceful).when(
                ValueCondition {
                    value_type: ValueType::Momentum,
                    min: Some(4),
                    max: None,
                },
            ),
        ],
    )
}

fn opening_player() -> PlayerState {
    PlayerState {
        physical_energy: 8,
        focus_energy: 8,
        social_energy: 8,
        coins: 12,
        confidence: 2,
        health: 10,
        ..PlayerState::default()
    }
}
