//! Per-session state and the registry that isolates sessions.
//!
//! Each session is guarded by its own mutex, so generation and execution
//! for one session run serially while other sessions proceed.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use uuid::Uuid;
use wayfarer_core::error::DomainError;
use wayfarer_core::rng::DeterministicRng;

use crate::domain::choice::ChoiceSet;
use crate::domain::encounter::Encounter;
use crate::domain::player::PlayerState;
use crate::domain::template::ChoiceSetTemplate;

/// Everything one player's encounter needs between turns.
pub struct EncounterSession {
    pub encounter: Encounter,
    pub player: PlayerState,
    pub templates: Vec<ChoiceSetTemplate>,
    pub rng: Box<dyn DeterministicRng + Send>,
    /// The choice set awaiting a selection, if any.
    pub presented: Option<ChoiceSet>,
}

impl EncounterSession {
    #[must_use]
    pub fn new(
        encounter: Encounter,
        player: PlayerState,
        templates: Vec<ChoiceSetTemplate>,
        rng: Box<dyn DeterministicRng + Send>,
    ) -> Self {
        Self {
            encounter,
            player,
            templates,
            rng,
            presented: None,
        }
    }
}

impl std::fmt::Debug for EncounterSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncounterSession")
            .field("encounter", &self.encounter.id())
            .field("templates", &self.templates.len())
            .field("presented", &self.presented.as_ref().map(ChoiceSet::len))
            .finish_non_exhaustive()
    }
}

/// Handle to one session's state.
pub type SharedSession = Arc<Mutex<EncounterSession>>;

/// Session id to session state.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<Uuid, SharedSession>>,
}

impl SessionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a session under `session_id`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the id is already taken, or
    /// `DomainError::Infrastructure` if the registry lock is poisoned.
    pub fn register(&self, session_id: Uuid, session: EncounterSession) -> Result<SharedSession, DomainError> {
        let mut sessions = self.sessions()?;
        if sessions.contains_key(&session_id) {
            return Err(DomainError::Validation(format!(
                "session {session_id} is already registered"
            )));
        }
        let shared = Arc::new(Mutex::new(session));
        sessions.insert(session_id, Arc::clone(&shared));
        Ok(shared)
    }

    /// # Errors
    ///
    /// Returns `DomainError::SessionNotFound` for an unknown id, or
    /// `DomainError::Infrastructure` if the registry lock is poisoned.
    pub fn session(&self, session_id: Uuid) -> Result<SharedSession, DomainError> {
        self.sessions()?
            .get(&session_id)
            .cloned()
            .ok_or(DomainError::SessionNotFound(session_id))
    }

    /// Removes a session, typically once its encounter is archived.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SessionNotFound` for an unknown id, or
    /// `DomainError::Infrastructure` if the registry lock is poisoned.
    pub fn remove(&self, session_id: Uuid) -> Result<SharedSession, DomainError> {
        self.sessions()?
            .remove(&session_id)
            .ok_or(DomainError::SessionNotFound(session_id))
    }

    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the registry lock is poisoned.
    pub fn session_count(&self) -> Result<usize, DomainError> {
        Ok(self.sessions()?.len())
    }

    fn sessions(&self) -> Result<MutexGuard<'_, HashMap<Uuid, SharedSession>>, DomainError> {
        self.sessions
            .lock()
            .map_err(|e| DomainError::Infrastructure(format!("session registry mutex poisoned: {e}")))
    }
}

/// Locks one session.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the session mutex is poisoned.
pub fn lock_session(session: &SharedSession) -> Result<MutexGuard<'_, EncounterSession>, DomainError> {
    session
        .lock()
        .map_err(|e| DomainError::Infrastructure(format!("session mutex poisoned: {e}")))
}

#[cfg(test)]
mod tests {
    use wayfarer_test_support::MockRng;

    use super::*;
    use crate::domain::encounter::EncounterContext;
    use crate::domain::template::ActionType;

    fn session() -> EncounterSession {
        EncounterSession::new(
            Encounter::new(Uuid::new_v4(), EncounterContext::new(ActionType::Rest), Vec::new()),
            PlayerState::default(),
            Vec::new(),
            Box::new(MockRng),
        )
    }

    #[test]
    fn test_register_then_lookup() {
        let registry = SessionRegistry::new();
        let id = Uuid::new_v4();

        registry.register(id, session()).unwrap();

        assert!(registry.session(id).is_ok());
        assert_eq!(registry.session_count().unwrap(), 1);
    }

    #[test]
    fn test_duplicate_registration_is_rejected() {
        let registry = SessionRegistry::new();
        let id = Uuid::new_v4();
        registry.register(id, session()).unwrap();

        let result = registry.register(id, session());

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_unknown_session_is_not_found() {
        let registry = SessionRegistry::new();
        let id = Uuid::new_v4();

        assert!(matches!(registry.session(id), Err(DomainError::SessionNotFound(found)) if found == id));
        assert!(matches!(registry.remove(id), Err(DomainError::SessionNotFound(_))));
    }

    #[test]
    fn test_remove_drops_session() {
        let registry = SessionRegistry::new();
        let id = Uuid::new_v4();
        registry.register(id, session()).unwrap();

        registry.remove(id).unwrap();

        assert_eq!(registry.session_count().unwrap(), 0);
    }

    #[test]
    fn test_sessions_are_independent() {
        let registry = SessionRegistry::new();
        let first = registry.register(Uuid::new_v4(), session()).unwrap();
        let second = registry.register(Uuid::new_v4(), session()).unwrap();

        let _held = lock_session(&first).unwrap();

        assert!(second.try_lock().is_ok());
    }
}
