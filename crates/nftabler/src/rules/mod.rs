//! Rule file selection and application.

pub mod applier;
pub mod engine;
pub mod selector;

pub use applier::{ApplyOutcome, RulesetApplier};
pub use engine::{EngineOutput, NftEngine, RuleEngine};
pub use selector::{RuleFileSelector, Selection};
