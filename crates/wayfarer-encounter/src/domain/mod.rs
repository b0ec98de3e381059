//! Domain layer for the encounter engine.

pub mod choice;
pub mod commands;
pub mod encounter;
pub mod outcome;
pub mod player;
pub mod requirement;
pub mod template;
pub mod values;
