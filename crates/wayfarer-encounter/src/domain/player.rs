//! Player resources touched by choice costs, rewards and requirements.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::choice::EnergyType;
use super::values::EncounterValues;

/// The player's status as seen by the encounter engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub physical_energy: i32,
    pub focus_energy: i32,
    pub social_energy: i32,
    pub coins: i32,
    pub confidence: i32,
    pub health: i32,
    /// Standing with named characters; may go negative.
    #[serde(default)]
    pub relationships: BTreeMap<String, i32>,
    /// Free-form status properties matched by template conditions.
    #[serde(default)]
    pub status: BTreeMap<String, String>,
}

impl PlayerState {
    #[must_use]
    pub fn energy(&self, energy_type: EnergyType) -> i32 {
        match energy_type {
            EnergyType::Physical => self.physical_energy,
            EnergyType::Focus => self.focus_energy,
            EnergyType::Social => self.social_energy,
        }
    }

    pub(crate) fn adjust_energy(&mut self, energy_type: EnergyType, amount: i32) {
        let pool = match energy_type {
            EnergyType::Physical => &mut self.physical_energy,
            EnergyType::Focus => &mut self.focus_energy,
            EnergyType::Social => &mut self.social_energy,
        };
        *pool = pool.saturating_add(amount).max(0);
    }

    #[must_use]
    pub fn relationship(&self, character: &str) -> i32 {
        self.relationships.get(character).copied().unwrap_or(0)
    }
}

/// Read-only view handed to requirement checks.
#[derive(Debug, Clone, Copy)]
pub struct GameState<'a> {
    pub player: &'a PlayerState,
    pub values: &'a EncounterValues,
}

impl<'a> GameState<'a> {
    #[must_use]
    pub fn new(player: &'a PlayerState, values: &'a EncounterValues) -> Self {
        Self { player, values }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjust_energy_floors_at_zero() {
        let mut player = PlayerState {
            focus_energy: 2,
            ..PlayerState::default()
        };

        player.adjust_energy(EnergyType::Focus, -5);

        assert_eq!(player.energy(EnergyType::Focus), 0);
    }

    #[test]
    fn test_unknown_relationship_is_neutral() {
        let player = PlayerState::default();
        assert_eq!(player.relationship("innkeeper"), 0);
    }
}
