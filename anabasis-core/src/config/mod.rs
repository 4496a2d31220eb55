//! Configuration types
//!
//! Board-agnostic shaft configuration. There is no persisted configuration:
//! a deployment compiles its `CabinConfig` in, and `validate` rejects a bad
//! one at startup before any task runs.

pub mod types;

pub use types::*;
