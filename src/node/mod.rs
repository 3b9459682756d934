//! Node façade translating persisted controls into engine calls.

/// Node state and control actions.
pub mod instance;
/// Persisted control state.
pub mod settings;
