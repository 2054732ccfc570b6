//! Configuration management for rulekit.
//!
//! Provides configuration for the static optimizer and the runtime interpreter.

use serde::{Deserialize, Serialize};

/// Global rulekit configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    /// Static optimizer configuration.
    pub optimizer: OptimizerConfig,
    /// Runtime interpreter configuration.
    pub interpreter: InterpreterConfig,
}

impl RuleConfig {
    /// Replace the optimizer section.
    pub fn with_optimizer(mut self, optimizer: OptimizerConfig) -> Self {
        self.optimizer = optimizer;
        self
    }

    /// Replace the interpreter section.
    pub fn with_interpreter(mut self, interpreter: InterpreterConfig) -> Self {
        self.interpreter = interpreter;
        self
    }
}

/// Static optimizer configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Maximum expression nesting accepted by `validate`.
    pub max_depth: usize,
    /// Merge nested logical expressions that share an operator.
    pub enable_flattening: bool,
    /// Drop or collapse constant operands of logical expressions.
    pub enable_absorption: bool,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_depth: 256,
            enable_flattening: true,
            enable_absorption: true,
        }
    }
}

impl OptimizerConfig {
    /// Set the maximum nesting depth.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Enable or disable logical flattening.
    pub fn with_flattening(mut self, enable: bool) -> Self {
        self.enable_flattening = enable;
        self
    }

    /// Enable or disable absorption of constant logical operands.
    pub fn with_absorption(mut self, enable: bool) -> Self {
        self.enable_absorption = enable;
        self
    }
}

/// Runtime interpreter configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpreterConfig {
    /// Upper bound on subtree evaluations in flight for one array or argument
    /// list. `None` issues them all at once.
    pub max_fanout: Option<usize>,
    /// Fail with `UnknownPath` when a member path is absent from the runtime
    /// value instead of yielding `undefined`.
    pub strict_members: bool,
}

impl InterpreterConfig {
    /// Bound the fan-out of concurrent subtree evaluations.
    pub fn with_max_fanout(mut self, max_fanout: usize) -> Self {
        self.max_fanout = Some(max_fanout.max(1));
        self
    }

    /// Enable or disable strict member access.
    pub fn with_strict_members(mut self, strict: bool) -> Self {
        self.strict_members = strict;
        self
    }
}
