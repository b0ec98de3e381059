//! Application layer: the engine components and the handlers that drive them.

pub mod calculator;
pub mod command_handlers;
pub mod engine;
pub mod executor;
pub mod generator;
pub mod query_handlers;
pub mod selector;
pub mod session;
