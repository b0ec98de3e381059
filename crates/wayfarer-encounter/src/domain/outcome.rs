//! Costs and rewards applied to the player when a choice resolves.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::choice::EnergyType;
use super::player::PlayerState;

/// A signed change to player state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Energy { energy_type: EnergyType, amount: i32 },
    Coins(i32),
    Confidence(i32),
    Relationship { character: String, amount: i32 },
    Health(i32),
}

impl Outcome {
    /// Applies the change. Energy, coins, confidence and health floor at zero.
    pub fn apply(&self, player: &mut PlayerState) {
        match self {
            Self::Energy {
                energy_type,
                amount,
            } => player.adjust_energy(*energy_type, *amount),
            Self::Coins(amount) => player.coins = player.coins.saturating_add(*amount).max(0),
            Self::Confidence(amount) => {
                player.confidence = player.confidence.saturating_add(*amount).max(0);
            }
            Self::Relationship { character, amount } => {
                let standing = player.relationships.entry(character.clone()).or_insert(0);
                *standing = standing.saturating_add(*amount);
            }
            Self::Health(amount) => player.health = player.health.saturating_add(*amount).max(0),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Energy {
                energy_type,
                amount,
            } => write!(f, "{amount:+} {energy_type} energy"),
            Self::Coins(amount) => write!(f, "{amount:+} coins"),
            Self::Confidence(amount) => write!(f, "{amount:+} confidence"),
            Self::Relationship { character, amount } => {
                write!(f, "{amount:+} relationship with {character}")
            }
            Self::Health(amount) => write!(f, "{amount:+} health"),
        }
    }
}
