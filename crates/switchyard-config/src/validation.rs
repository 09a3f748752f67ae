// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks constraints serde cannot express: unique model names, a fallback
//! that refers to a registered model, non-negative costs, and non-zero bounds.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::SwitchyardConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or every collected error
/// (does not fail fast).
pub fn validate_config(config: &SwitchyardConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut push = |message: String| errors.push(ConfigError::Validation { message });

    if !LOG_LEVELS.contains(&config.agent.log_level.as_str()) {
        push(format!(
            "agent.log_level `{}` must be one of {}",
            config.agent.log_level,
            LOG_LEVELS.join(", ")
        ));
    }

    if config.models.is_empty() {
        push("at least one [[models]] entry is required".to_string());
    }

    let mut seen = HashSet::new();
    for (i, model) in config.models.iter().enumerate() {
        if model.name.trim().is_empty() {
            push(format!("models[{i}].name must not be empty"));
        } else if !seen.insert(model.name.as_str()) {
            push(format!("duplicate model name `{}` in [[models]] array", model.name));
        }
        if model.provider.trim().is_empty() {
            push(format!("models[{i}].provider must not be empty"));
        }
        if !(model.cost_per_token >= 0.0 && model.cost_per_token.is_finite()) {
            push(format!(
                "models[{i}].cost_per_token must be a non-negative number, got {}",
                model.cost_per_token
            ));
        }
    }

    if let Some(fallback) = &config.executor.fallback_model
        && !config.models.iter().any(|m| &m.name == fallback)
    {
        push(format!(
            "executor.fallback_model `{fallback}` is not a registered model"
        ));
    }

    if config.executor.timeout_secs == 0 {
        push("executor.timeout_secs must be greater than 0".to_string());
    }

    if config.tools.shell_timeout_secs == 0 {
        push("tools.shell_timeout_secs must be greater than 0".to_string());
    }

    if config.selector.low_cost_threshold < 0.0 {
        push(format!(
            "selector.low_cost_threshold must be non-negative, got {}",
            config.selector.low_cost_threshold
        ));
    }

    if config.memory.database_path.trim().is_empty() {
        push("memory.database_path must not be empty".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = SwitchyardConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn unknown_fallback_fails_validation() {
        let mut config = SwitchyardConfig::default();
        config.executor.fallback_model = Some("ghost".to_string());
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("ghost"));
    }

    #[test]
    fn duplicate_and_negative_models_are_all_reported() {
        let mut config = SwitchyardConfig::default();
        let mut dup = config.models[0].clone();
        dup.cost_per_token = -1.0;
        config.models.push(dup);
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn zero_timeouts_fail_validation() {
        let mut config = SwitchyardConfig::default();
        config.executor.timeout_secs = 0;
        config.tools.shell_timeout_secs = 0;
        assert_eq!(validate_config(&config).unwrap_err().len(), 2);
    }

    #[test]
    fn bad_log_level_fails_validation() {
        let mut config = SwitchyardConfig::default();
        config.agent.log_level = "loud".to_string();
        assert!(validate_config(&config).is_err());
    }
}
