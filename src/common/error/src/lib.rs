//! Error types and result aliases for rulekit.
//!
//! Every stage of the pipeline (optimizer, SQL compiler, interpreter and
//! feature implementations) reports failures through [`ExpressionError`].

mod error;

pub use error::{ExpressionError, ExpressionResult, GenericError};
