//! Memory-setting mutation engine for Hadoop/Oozie property documents.
//!
//! Parses a property-list XML document, bumps the values of the memory
//! related properties according to the selected mode, and serializes the
//! result back only when something actually changed. The engine performs no
//! I/O of its own; bytes come in, bytes and a change count go out.

mod document;
mod error;
mod mutator;
mod value;

/// Event-stream document model.
pub use document::{Property, PropertyDocument};
/// Public error type returned by parse and mutate APIs.
pub use error::EngineError;
/// Mutation pass entry point and its result types.
pub use mutator::{MutationResult, PropertyOutcome, TransformMode, ValueOutcome, mutate};
/// Pure value rewrite rules.
pub use value::{REDUCE_HEAP_HEADROOM_MB, bump_general_value, bump_yarn_value};
