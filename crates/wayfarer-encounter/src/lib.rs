//! Wayfarer encounter engine.
//!
//! Generates bounded sets of mechanically distinct choices for an encounter
//! round, precomputes each choice's requirements, costs, rewards and value
//! changes, and applies a selected choice atomically to the encounter and
//! the player.

pub mod application;
pub mod config;
pub mod content;
pub mod domain;
pub mod rules;
