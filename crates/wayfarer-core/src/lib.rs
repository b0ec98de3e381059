//! Wayfarer Core: shared domain abstractions.
//!
//! This crate defines the fundamental traits and types that the encounter
//! engine and its drivers depend on. It contains no game rules.

pub mod command;
pub mod error;
pub mod rng;
