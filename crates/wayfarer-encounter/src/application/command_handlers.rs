//! Command handlers for the encounter engine.
//!
//! Each handler locks the addressed session for the whole command, so
//! generation and execution never interleave within one session.

use tracing::{info, instrument, warn};
use wayfarer_core::command::Command;
use wayfarer_core::error::DomainError;

use crate::domain::choice::ChoiceSet;
use crate::domain::commands::{PresentChoices, RecordEncounterResult, ResolveChoice};
use crate::domain::encounter::EncounterStatus;
use crate::domain::template::ChoiceSetTemplate;

use super::engine::EncounterEngine;
use super::executor::AppliedChoice;
use super::session::{SessionRegistry, lock_session};

/// Handles the `PresentChoices` command: selects a template (falling back to
/// the default), generates a choice set led by the encounter's eligible
/// slots and stores it on the session.
///
/// # Errors
///
/// Returns `DomainError::SessionNotFound` for an unknown session,
/// `DomainError::Validation` if the encounter is closed, and
/// `DomainError::Infrastructure` if a lock is poisoned.
#[instrument(skip(engine, registry), fields(session_id = %command.session_id))]
pub fn handle_present_choices(
    command: &PresentChoices,
    engine: &EncounterEngine,
    registry: &SessionRegistry,
) -> Result<ChoiceSet, DomainError> {
    info!(correlation_id = %command.correlation_id(), "handling {} command", command.command_type());

    let shared = registry.session(command.session_id)?;
    let mut guard = lock_session(&shared)?;
    let session = &mut *guard;

    if !session.encounter.is_active() {
        return Err(DomainError::Validation(format!(
            "encounter {} is closed",
            session.encounter.id()
        )));
    }

    let context = session.encounter.context();
    let template = engine
        .selector()
        .select_template(&session.templates, context, &session.player, &mut *session.rng)
        .cloned()
        .unwrap_or_else(|| ChoiceSetTemplate::fallback(context.action_type));

    let slots = session.encounter.eligible_slots();
    let choice_set = engine
        .generator()
        .generate_with_slots(&template, context, &session.player, &slots);
    info!(template = %choice_set.template_name, choices = choice_set.len(), "presenting choices");

    session.presented = Some(choice_set.clone());
    Ok(choice_set)
}

/// Handles the `ResolveChoice` command: executes the chosen entry of the
/// presented set against the session's encounter and player.
///
/// A rejected choice leaves the presented set in place so another entry can
/// be chosen; an applied choice consumes it.
///
/// # Errors
///
/// Returns `DomainError::ChoiceNotFound` if no set is presented or the index
/// is out of range, `DomainError::ChoiceRejected` if the encounter is closed
/// or a requirement is unmet, plus the session lookup errors.
#[instrument(skip(engine, registry), fields(session_id = %command.session_id, choice_index = command.choice_index))]
pub fn handle_resolve_choice(
    command: &ResolveChoice,
    engine: &EncounterEngine,
    registry: &SessionRegistry,
) -> Result<AppliedChoice, DomainError> {
    info!(correlation_id = %command.correlation_id(), "handling {} command", command.command_type());

    let shared = registry.session(command.session_id)?;
    let mut guard = lock_session(&shared)?;
    let session = &mut *guard;

    let not_found = || DomainError::ChoiceNotFound {
        session_id: command.session_id,
        index: command.choice_index,
    };
    let choice = session
        .presented
        .as_ref()
        .and_then(|set| set.get(command.choice_index))
        .cloned()
        .ok_or_else(not_found)?;

    let applied = engine
        .executor()
        .execute_choice(
            &mut session.encounter,
            &mut session.player,
            &choice,
            &choice.calculation_result,
        )
        .inspect_err(|rejection| warn!(%rejection, "choice not applied"))?;

    session.presented = None;
    Ok(applied)
}

/// Handles the `RecordEncounterResult` command. A terminal result closes the
/// encounter and discards any presented set.
///
/// # Errors
///
/// Returns the session lookup errors.
#[instrument(skip(registry), fields(session_id = %command.session_id))]
pub fn handle_record_result(
    command: &RecordEncounterResult,
    registry: &SessionRegistry,
) -> Result<EncounterStatus, DomainError> {
    info!(correlation_id = %command.correlation_id(), "handling {} command", command.command_type());

    let shared = registry.session(command.session_id)?;
    let mut session = lock_session(&shared)?;

    session.encounter.record_result(command.result);
    let status = session.encounter.status();
    if status != EncounterStatus::Active {
        session.presented = None;
        info!(?status, "encounter closed");
    }
    Ok(status)
}
