//! Runtime side of the feature extension protocol.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common_error::ExpressionResult;
use log::warn;
use rulekit_core::{Scope, Value};
use rulekit_optimizer::{ArgumentCompiler, EvaluationResult, FeatureDescriptor, StaticFeature};

/// A named callable extension usable from rules.
///
/// `describe` is called once per call site while a rule is validated and
/// must be pure. `call` runs once per call site per evaluation and may
/// suspend.
#[async_trait]
pub trait FeatureFunction: Send + Sync {
    /// Declared cost and return shape of a call site.
    fn describe(&self, arguments: &[EvaluationResult<Value>]) -> ExpressionResult<FeatureDescriptor<Value>>;

    /// Compiler applied to call arguments during validation.
    fn argument_compiler(&self) -> Option<Arc<dyn ArgumentCompiler>> {
        None
    }

    /// Produce the call's value.
    async fn call(&self, scope: &Scope, arguments: Vec<Value>) -> ExpressionResult<Value>;
}

/// Exposes the static side of a runtime feature to the optimizer.
pub(crate) struct StaticSide(pub(crate) Arc<dyn FeatureFunction>);

impl StaticFeature<Value> for StaticSide {
    fn describe(&self, arguments: &[EvaluationResult<Value>]) -> ExpressionResult<FeatureDescriptor<Value>> {
        // Runtime features always run, so their calls never fold
        let mut descriptor = self.0.describe(arguments)?;
        descriptor.value = None;
        Ok(descriptor)
    }

    fn argument_compiler(&self) -> Option<Arc<dyn ArgumentCompiler>> {
        self.0.argument_compiler()
    }
}

/// Append-only mapping from feature name to implementation.
#[derive(Default, Clone)]
pub struct FeatureRegistry {
    features: HashMap<String, Arc<dyn FeatureFunction>>,
}

impl FeatureRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a feature. Names are never rebound: registering a taken
    /// name is rejected and returns `false`.
    pub fn register(&mut self, name: impl Into<String>, feature: Arc<dyn FeatureFunction>) -> bool {
        match self.features.entry(name.into()) {
            Entry::Occupied(entry) => {
                warn!("Feature `{}` is already registered", entry.key());
                false
            }
            Entry::Vacant(entry) => {
                entry.insert(feature);
                true
            }
        }
    }

    /// Look up a feature.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn FeatureFunction>> {
        self.features.get(name)
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.features.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.features.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for FeatureRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeatureRegistry")
            .field("features", &self.names())
            .finish()
    }
}
