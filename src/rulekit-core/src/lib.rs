//! Core data model for rulekit.
//!
//! This crate provides the types shared by the optimizer and the interpreter:
//! - `Node` and its operators, the expression tree handed over by the parser
//! - `Value` and `TypeEstimate` for the runtime and static type systems
//! - `Schema`, `Shape` and `Scope` for static and runtime name resolution

pub mod ast;
pub mod schema;
pub mod types;

// Re-export commonly used types
pub use ast::{BinaryOperator, LogicalOperator, Node, NodeKind, PathSegment, UnaryOperator};
pub use schema::{Schema, Scope, Shape};
pub use types::{TypeEstimate, Value};
