//! Runtime side of rulekit.
//!
//! The [`Engine`] pairs a value-domain optimizer with an async interpreter.
//! Rules are validated once against the engine's schema and can then be
//! evaluated against any number of scopes, concurrently if needed.
//!
//! Features registered on the engine implement [`FeatureFunction`]: a pure
//! static descriptor, mirrored into the optimizer, and an async runtime
//! function that may perform I/O.

mod engine;
mod feature;
mod interpreter;

pub use engine::Engine;
pub use feature::{FeatureFunction, FeatureRegistry};
pub use interpreter::Interpreter;

pub use rulekit_optimizer::{ArgumentCompiler, EvaluationResult, FeatureDescriptor};
