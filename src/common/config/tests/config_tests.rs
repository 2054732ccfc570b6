//! Unit tests for common-config crate

use common_config::{InterpreterConfig, OptimizerConfig, RuleConfig};

#[test]
fn test_rule_config_default() {
    let config = RuleConfig::default();

    assert_eq!(config.optimizer.max_depth, 256);
    assert!(config.optimizer.enable_flattening);
    assert!(config.optimizer.enable_absorption);

    assert_eq!(config.interpreter.max_fanout, None);
    assert!(!config.interpreter.strict_members);
}

#[test]
fn test_rule_config_serialization() {
    let mut config = RuleConfig::default();
    config.optimizer.max_depth = 32;
    config.optimizer.enable_absorption = false;
    config.interpreter.max_fanout = Some(4);

    let json = serde_json::to_string(&config).unwrap();
    let deserialized: RuleConfig = serde_json::from_str(&json).unwrap();

    assert_eq!(deserialized.optimizer.max_depth, 32);
    assert!(!deserialized.optimizer.enable_absorption);
    assert!(deserialized.optimizer.enable_flattening);
    assert_eq!(deserialized.interpreter.max_fanout, Some(4));
}

#[test]
fn test_config_partial_json() {
    let json = r#"{
        "optimizer": {
            "max_depth": 10
        }
    }"#;

    let config: RuleConfig = serde_json::from_str(json).unwrap();
    assert_eq!(config.optimizer.max_depth, 10);
    // Missing fields should use defaults
    assert!(config.optimizer.enable_flattening);
    assert_eq!(config.interpreter, InterpreterConfig::default());
}

#[test]
fn test_config_with_null_values() {
    let json = r#"{
        "interpreter": {
            "max_fanout": null,
            "strict_members": true
        }
    }"#;

    let config: RuleConfig = serde_json::from_str(json).unwrap();
    assert_eq!(config.interpreter.max_fanout, None);
    assert!(config.interpreter.strict_members);
}

#[test]
fn test_invalid_max_depth_deserialization() {
    // usize cannot be negative
    let json = r#"{ "optimizer": { "max_depth": -1 } }"#;

    let result: Result<RuleConfig, _> = serde_json::from_str(json);
    assert!(result.is_err());
}

#[test]
fn test_config_builder_pattern() {
    let config = RuleConfig::default()
        .with_optimizer(OptimizerConfig::default().with_max_depth(8).with_flattening(false))
        .with_interpreter(
            InterpreterConfig::default()
                .with_max_fanout(0)
                .with_strict_members(true),
        );

    assert_eq!(config.optimizer.max_depth, 8);
    assert!(!config.optimizer.enable_flattening);
    // A zero fan-out would never make progress
    assert_eq!(config.interpreter.max_fanout, Some(1));
    assert!(config.interpreter.strict_members);
}

#[test]
fn test_config_clone_is_independent() {
    let base = RuleConfig::default();

    let mut changed = base.clone();
    changed.optimizer.enable_absorption = false;

    assert!(base.optimizer.enable_absorption);
    assert!(!changed.optimizer.enable_absorption);
}
