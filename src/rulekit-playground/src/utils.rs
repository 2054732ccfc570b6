//! Formatting helpers for the playground.

use rulekit_core::{Node, Value};

pub fn print_header(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

pub fn print_divider() {
    println!("{}", "-".repeat(60));
}

/// Render a tree as indented JSON, weights included.
pub fn format_node(node: &Node) -> String {
    serde_json::to_string_pretty(node).unwrap_or_else(|_| node.to_string())
}

/// Print a validated tree and the value it produced.
pub fn print_outcome(rule: &str, validated: &Node, value: &Value) {
    println!("rule:      {rule}");
    println!("validated: {validated}");
    println!("weight:    {}", validated.weight);
    println!("result:    {value} ({})", value.type_name());
}
