// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Switchyard configuration system.

use switchyard_config::diagnostic::ConfigError;
use switchyard_config::model::SwitchyardConfig;
use switchyard_config::{load_and_validate_str, load_config_from_str};
use switchyard_core::types::{ModelDescriptor, QualityClass, SpeedClass, TaskType};

/// A full configuration with every section deserializes.
#[test]
fn valid_toml_deserializes_into_config() {
    let toml = r#"
[agent]
name = "router-test"
log_level = "debug"
history_window = 4

[[models]]
name = "primary-model"
provider = "mock"
capabilities = ["coding", "reasoning"]
cost_per_token = 0.01
speed = "slow"
quality = "high"

[[models]]
name = "backup-model"
provider = "mock"
capabilities = ["general"]
speed = "fast"

[selector]
preferred_models = ["primary-model"]
preferred_bonus = 7

[[selector.affinity]]
task_type = "coding"
tag = "coding"
points = 50

[executor]
fallback_model = "backup-model"
timeout_secs = 10

[memory]
database_path = "/tmp/switchyard-test.db"
recall_limit = 3

[tools]
shell_timeout_secs = 5
blocked_commands = ["rm -rf"]

[capabilities]
disabled = ["web_search"]

[backend]
base_url = "http://localhost:8080/v1"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.agent.name, "router-test");
    assert_eq!(config.agent.history_window, 4);
    assert_eq!(config.models.len(), 2);
    assert_eq!(config.models[0].speed, SpeedClass::Slow);
    assert_eq!(config.models[0].quality, QualityClass::High);
    assert_eq!(config.models[1].quality, QualityClass::Medium);
    assert_eq!(config.models[1].cost_per_token, 0.0);
    assert_eq!(config.selector.affinity.len(), 1);
    assert_eq!(config.selector.affinity[0].task_type, TaskType::Coding);
    assert_eq!(config.selector.affinity[0].points, 50);
    assert_eq!(config.selector.preferred_bonus, 7);
    assert_eq!(config.executor.fallback_model.as_deref(), Some("backup-model"));
    assert_eq!(config.memory.recall_limit, 3);
    assert_eq!(config.tools.blocked_commands, vec!["rm -rf"]);
    assert_eq!(config.capabilities.disabled, vec!["web_search"]);
    assert_eq!(config.backend.base_url, "http://localhost:8080/v1");
}

/// An empty file yields the compiled defaults.
#[test]
fn empty_toml_uses_defaults() {
    let config = load_config_from_str("").expect("empty TOML is valid");
    let defaults = SwitchyardConfig::default();
    assert_eq!(config.models, defaults.models);
    assert_eq!(config.tools.shell_timeout_secs, 30);
    assert_eq!(config.executor.fallback_model.as_deref(), Some("gpt-3.5-turbo"));
    assert!(config.selector.affinity.len() >= 8);
}

/// Search provider keys are optional and endpoints have defaults.
#[test]
fn search_provider_keys_are_optional() {
    let defaults = load_config_from_str("").unwrap();
    assert!(defaults.tools.tavily_api_key.is_none());
    assert!(defaults.tools.serpapi_api_key.is_none());
    assert_eq!(defaults.tools.tavily_endpoint, "https://api.tavily.com/search");

    let config = load_config_from_str(
        r#"
[tools]
tavily_api_key = "tvly-abc"
serpapi_endpoint = "http://localhost:9000/search"
"#,
    )
    .unwrap();
    assert_eq!(config.tools.tavily_api_key.as_deref(), Some("tvly-abc"));
    assert!(config.tools.serpapi_api_key.is_none());
    assert_eq!(config.tools.serpapi_endpoint, "http://localhost:9000/search");
}

/// Models convert to descriptors field by field.
#[test]
fn model_config_converts_to_descriptor() {
    let config = SwitchyardConfig::default();
    let descriptor = ModelDescriptor::from(&config.models[0]);
    assert_eq!(descriptor.name, config.models[0].name);
    assert_eq!(descriptor.capabilities, config.models[0].capabilities);
    assert_eq!(descriptor.speed, config.models[0].speed);
}

/// Unknown field in [executor] produces a diagnostic with a suggestion.
#[test]
fn unknown_field_produces_suggestion() {
    let toml = r#"
[executor]
falback_model = "gpt-4o"
"#;
    let errors = load_and_validate_str(toml).expect_err("should reject unknown field");
    assert!(errors.iter().any(|e| matches!(
        e,
        ConfigError::UnknownKey { key, suggestion: Some(s), .. }
            if key == "falback_model" && s == "fallback_model"
    )));
}

/// Misspelled enum values are reported as unknown values.
#[test]
fn unknown_speed_value_is_reported() {
    let toml = r#"
[[models]]
name = "m"
speed = "warp"
"#;
    let errors = load_and_validate_str(toml).expect_err("should reject unknown variant");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::UnknownValue { value, .. } if value == "warp")),
        "got: {errors:?}"
    );
}

/// Wrong value types are reported.
#[test]
fn wrong_type_is_reported() {
    let toml = r#"
[executor]
timeout_secs = "soon"
"#;
    assert!(load_and_validate_str(toml).is_err());
}

/// A fallback outside the model list fails semantic validation.
#[test]
fn fallback_must_be_registered() {
    let toml = r#"
[[models]]
name = "only-model"

[executor]
fallback_model = "missing-model"
"#;
    let errors = load_and_validate_str(toml).expect_err("fallback is unknown");
    assert!(errors
        .iter()
        .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("missing-model"))));
}
