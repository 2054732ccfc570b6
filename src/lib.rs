//! rulekit - rule expressions for transaction monitoring
//!
//! Rules arrive as expression trees. A schema-driven optimizer validates and
//! folds them, a SQL compiler turns fully static rules into SQL, and an async
//! interpreter evaluates the rest against a runtime scope, running cheap
//! operands before expensive feature calls.

#![forbid(unsafe_code)]
#![allow(clippy::module_name_repetitions)]

// Re-export member crates
pub use common_config as config;
pub use common_error as error;
pub use common_runtime as runtime;
pub use rulekit_core as core;
pub use rulekit_engine as engine;
pub use rulekit_features as features;
pub use rulekit_optimizer as optimizer;

pub use common_config::RuleConfig;
pub use common_error::{ExpressionError, ExpressionResult};
pub use rulekit_core::{Node, Schema, Scope, Shape, Value};
pub use rulekit_engine::{Engine, FeatureFunction};
pub use rulekit_optimizer::{SqlCompiler, StaticFeature};

/// rulekit version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
