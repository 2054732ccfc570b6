//! Core error types for rulekit.

use thiserror::Error;

/// Result type alias using `ExpressionError`.
pub type ExpressionResult<T> = std::result::Result<T, ExpressionError>;

/// Generic boxed error for external error sources.
pub type GenericError = Box<dyn std::error::Error + Send + Sync>;

/// Error raised while optimizing, compiling or evaluating a rule.
///
/// Any error is fatal to the rule instance it was raised for: the optimizer
/// never hands back a partially rewritten tree and the interpreter never
/// substitutes a default value.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExpressionError {
    /// A node could not be optimized. Carries the offending node (as JSON)
    /// and the underlying fault.
    #[error("SyntaxError: invalid node {node}: {source}")]
    Syntax {
        node: String,
        #[source]
        source: Box<ExpressionError>,
    },

    /// Name is neither a registered feature nor declared in the schema.
    #[error("UnknownIdentifier: {0}")]
    UnknownIdentifier(String),

    /// Member access into a path the schema (or literal) does not declare.
    #[error("UnknownPath: {0}")]
    UnknownPath(String),

    /// Operator has no mapping in the active domain's table.
    #[error("UnsupportedOperator: {operator} in {domain} domain")]
    UnsupportedOperator {
        operator: String,
        domain: &'static str,
    },

    /// Callee does not resolve to a registered feature.
    #[error("NotCallable: {0}")]
    NotCallable(String),

    /// Expression was required to fold to a constant but did not.
    #[error("NotConstant: {0}")]
    NotConstant(String),

    /// Type mismatch or invalid type operation.
    #[error("TypeError: {0}")]
    TypeError(String),

    /// Expression tree is nested deeper than the configured limit.
    #[error("DepthExceeded: expression nesting exceeds {0}")]
    DepthExceeded(usize),

    /// A feature's runtime function failed.
    #[error("FeatureFailed: {name}: {source}")]
    FeatureFailed {
        name: String,
        #[source]
        source: GenericError,
    },

    /// Rule evaluation error.
    #[error("ExecutionError: {0}")]
    ExecutionError(String),

    /// Invalid parameter provided.
    #[error("InvalidParameter: {0}")]
    InvalidParameter(String),

    /// IO error.
    #[error("IoError: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("SerdeJsonError: {0}")]
    SerdeJsonError(#[from] serde_json::Error),
}

impl ExpressionError {
    /// Wrap `source` as a `Syntax` error for the given serialized node.
    ///
    /// An error that is already a `Syntax` error is returned unchanged, so the
    /// innermost offending node is the one reported.
    pub fn syntax<S: Into<String>>(node: S, source: Self) -> Self {
        match source {
            Self::Syntax { .. } => source,
            other => Self::Syntax {
                node: node.into(),
                source: Box::new(other),
            },
        }
    }

    /// Create a new `UnknownIdentifier` error.
    pub fn unknown_identifier<S: Into<String>>(name: S) -> Self {
        Self::UnknownIdentifier(name.into())
    }

    /// Create a new `UnknownPath` error.
    pub fn unknown_path<S: Into<String>>(path: S) -> Self {
        Self::UnknownPath(path.into())
    }

    /// Create a new `UnsupportedOperator` error.
    pub fn unsupported_operator<S: Into<String>>(operator: S, domain: &'static str) -> Self {
        Self::UnsupportedOperator {
            operator: operator.into(),
            domain,
        }
    }

    /// Create a new `NotCallable` error.
    pub fn not_callable<S: Into<String>>(msg: S) -> Self {
        Self::NotCallable(msg.into())
    }

    /// Create a new `NotConstant` error.
    pub fn not_constant<S: Into<String>>(msg: S) -> Self {
        Self::NotConstant(msg.into())
    }

    /// Create a new `TypeError`.
    pub fn type_error<S: Into<String>>(msg: S) -> Self {
        Self::TypeError(msg.into())
    }

    /// Create a new `ExecutionError`.
    pub fn execution<S: Into<String>>(msg: S) -> Self {
        Self::ExecutionError(msg.into())
    }

    /// Create a new `InvalidParameter` error.
    pub fn invalid_parameter<S: Into<String>>(msg: S) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Wrap a failure raised by the runtime function of feature `name`.
    pub fn feature_failed<S, E>(name: S, source: E) -> Self
    where
        S: Into<String>,
        E: Into<GenericError>,
    {
        Self::FeatureFailed {
            name: name.into(),
            source: source.into(),
        }
    }

    /// The fault underneath any `Syntax` wrapping.
    pub fn root_cause(&self) -> &Self {
        match self {
            Self::Syntax { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Whether this is a `Syntax` wrapper.
    pub fn is_syntax(&self) -> bool {
        matches!(self, Self::Syntax { .. })
    }
}

/// Ensure a condition holds, returning an `ExecutionError` if not.
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $msg:expr) => {
        if !$cond {
            return Err($crate::ExpressionError::ExecutionError($msg.to_string()));
        }
    };
    ($cond:expr, $variant:ident: $($msg:tt)*) => {
        if !$cond {
            return Err($crate::ExpressionError::$variant(format!($($msg)*)));
        }
    };
}
