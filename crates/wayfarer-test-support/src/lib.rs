//! Shared test mocks and utilities for the Wayfarer encounter engine.

mod rng;

pub use rng::{MockRng, SequenceRng};
