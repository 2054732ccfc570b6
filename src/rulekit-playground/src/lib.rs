//! rulekit playground.
//!
//! Sample schemas, a sample scope and ready-made rules for experimenting with
//! the optimizer, the SQL compiler and the engine.
//!
//! # Usage
//!
//! ```bash
//! cargo run --package rulekit-playground --bin rule-runner -- demo
//! cargo run --package rulekit-playground --bin rule-runner -- eval --ast rule.json
//! ```

pub mod data;
pub mod utils;

pub use data::{create_compiler, create_engine, sample_rules, sample_scope, sql_schema, value_schema};
pub use utils::{format_node, print_divider, print_header, print_outcome};
