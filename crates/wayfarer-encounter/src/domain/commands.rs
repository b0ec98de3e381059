//! Commands for the encounter engine.

use uuid::Uuid;
use wayfarer_core::command::Command;

use super::encounter::EncounterResult;

/// Command to generate and present a new choice set for a session.
#[derive(Debug, Clone)]
pub struct PresentChoices {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session to generate choices for.
    pub session_id: Uuid,
}

impl Command for PresentChoices {
    fn command_type(&self) -> &'static str {
        "encounter.present_choices"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn session_id(&self) -> Uuid {
        self.session_id
    }
}

/// Command to resolve one choice from the presented set.
#[derive(Debug, Clone)]
pub struct ResolveChoice {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session the choice belongs to.
    pub session_id: Uuid,
    /// Index of the choice within the presented set.
    pub choice_index: usize,
}

impl Command for ResolveChoice {
    fn command_type(&self) -> &'static str {
        "encounter.resolve_choice"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn session_id(&self) -> Uuid {
        self.session_id
    }
}

/// Command to record the externally computed result of the last round.
#[derive(Debug, Clone)]
pub struct RecordEncounterResult {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session the encounter belongs to.
    pub session_id: Uuid,
    /// The computed result.
    pub result: EncounterResult,
}

impl Command for RecordEncounterResult {
    fn command_type(&self) -> &'static str {
        "encounter.record_result"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn session_id(&self) -> Uuid {
        self.session_id
    }
}
