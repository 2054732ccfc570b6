//! Static optimizer for rulekit expressions.
//!
//! One generic reducer walks the expression tree bottom-up, validating
//! identifiers against a schema, assigning cost weights, folding constant
//! subtrees and simplifying boolean chains. The operator semantics come from a
//! [`Domain`]:
//! - [`ValueDomain`] folds to concrete runtime values
//! - [`SqlDomain`] folds to SQL text; its optimizer doubles as the
//!   [`SqlCompiler`]

mod compiler;
pub mod domain;
mod feature;
mod reducer;
mod result;

pub use compiler::SqlCompiler;
pub use domain::{Domain, SqlDomain, SqlFragment, ValueDomain};
pub use feature::{ArgumentCompiler, FeatureDescriptor, StaticFeature};
pub use reducer::{Optimizer, SqlOptimizer, ValueOptimizer};
pub use result::{EvaluationResult, Origin};
