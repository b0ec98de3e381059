//! Requirements a choice must satisfy before it can be applied.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::choice::EnergyType;
use super::player::GameState;
use super::values::ValueType;

/// A predicate over the current game state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Requirement {
    /// Momentum at or above the amount.
    Momentum(i32),
    /// Insight at or above the amount.
    Insight(i32),
    /// Resonance at or above the amount.
    Resonance(i32),
    /// Pressure at or below the amount.
    Pressure(i32),
    Energy { energy_type: EnergyType, amount: i32 },
    Coins(i32),
    Confidence(i32),
    Health(i32),
}

impl Requirement {
    /// The "at least this much available" requirement for a spendable
    /// channel. Outcome and Pressure have none.
    #[must_use]
    pub fn minimum_value(value_type: ValueType, amount: i32) -> Option<Self> {
        match value_type {
            ValueType::Momentum => Some(Self::Momentum(amount)),
            ValueType::Insight => Some(Self::Insight(amount)),
            ValueType::Resonance => Some(Self::Resonance(amount)),
            ValueType::Outcome | ValueType::Pressure => None,
        }
    }

    #[must_use]
    pub fn is_satisfied(&self, state: &GameState<'_>) -> bool {
        match self {
            Self::Momentum(required) => state.values.momentum() >= *required,
            Self::Insight(required) => state.values.insight() >= *required,
            Self::Resonance(required) => state.values.resonance() >= *required,
            Self::Pressure(max) => state.values.pressure() <= *max,
            Self::Energy {
                energy_type,
                amount,
            } => state.player.energy(*energy_type) >= *amount,
            Self::Coins(required) => state.player.coins >= *required,
            Self::Confidence(required) => state.player.confidence >= *required,
            Self::Health(required) => state.player.health >= *required,
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Momentum(amount) => write!(f, "requires Momentum at {amount} or above"),
            Self::Insight(amount) => write!(f, "requires Insight at {amount} or above"),
            Self::Resonance(amount) => write!(f, "requires Resonance at {amount} or above"),
            Self::Pressure(amount) => write!(f, "requires Pressure at {amount} or below"),
            Self::Energy {
                energy_type,
                amount,
            } => write!(f, "requires {amount} {energy_type} energy"),
            Self::Coins(amount) => write!(f, "requires {amount} coins"),
            Self::Confidence(amount) => write!(f, "requires Confidence at {amount} or above"),
            Self::Health(amount) => write!(f, "requires Health at {amount} or above"),
        }
    }
}
