// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Registration-ordered model registry.
//!
//! Descriptors are kept in a `Vec` so iteration order is registration order,
//! which the selector relies on for tie-breaking. Overwriting a model keeps
//! its original position. Usage stats are created and dropped under the same
//! write guard as the descriptor.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use switchyard_config::model::ModelConfig;
use switchyard_core::{ModelDescriptor, SwitchyardError, UsageStats};
use tracing::debug;

use crate::usage::UsageTracker;

/// Consistent view of the registry handed to the selector.
#[derive(Debug, Clone, Default)]
pub struct RegistrySnapshot {
    /// Descriptors in registration order.
    pub models: Vec<ModelDescriptor>,
    pub usage: HashMap<String, UsageStats>,
}

#[derive(Debug, Default)]
pub struct ModelRegistry {
    models: RwLock<Vec<ModelDescriptor>>,
    usage: UsageTracker,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from the configured `[[models]]` list, in order.
    pub fn from_config(models: &[ModelConfig]) -> Result<Self, SwitchyardError> {
        let registry = Self::new();
        for model in models {
            registry.register(ModelDescriptor::from(model))?;
        }
        Ok(registry)
    }

    /// Adds or overwrites a model. Existing usage stats are preserved on overwrite.
    ///
    /// The cost rate must be finite and non-negative, so execution costs are too.
    pub fn register(&self, descriptor: ModelDescriptor) -> Result<(), SwitchyardError> {
        if !(descriptor.cost_per_token.is_finite() && descriptor.cost_per_token >= 0.0) {
            return Err(SwitchyardError::Config(format!(
                "model `{}` has invalid cost_per_token {}",
                descriptor.name, descriptor.cost_per_token
            )));
        }
        let mut models = self.models.write().unwrap_or_else(PoisonError::into_inner);
        self.usage.ensure(&descriptor.name);
        debug!(model = descriptor.name.as_str(), provider = descriptor.provider.as_str(), "model registered");
        match models.iter_mut().find(|m| m.name == descriptor.name) {
            Some(existing) => *existing = descriptor,
            None => models.push(descriptor),
        }
        Ok(())
    }

    /// Returns the descriptor for `name`.
    pub fn get(&self, name: &str) -> Result<ModelDescriptor, SwitchyardError> {
        self.models
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|m| m.name == name)
            .cloned()
            .ok_or_else(|| SwitchyardError::ModelNotAvailable {
                model: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.models
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|m| m.name == name)
    }

    /// All descriptors in registration order.
    pub fn list(&self) -> Vec<ModelDescriptor> {
        self.models
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Deletes a model and its stats. Removing an absent model is a no-op.
    pub fn remove(&self, name: &str) {
        let mut models = self.models.write().unwrap_or_else(PoisonError::into_inner);
        models.retain(|m| m.name != name);
        self.usage.remove(name);
    }

    pub fn len(&self) -> usize {
        self.models
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn usage(&self) -> &UsageTracker {
        &self.usage
    }

    /// Copies descriptors and stats under one read guard.
    pub fn snapshot(&self) -> RegistrySnapshot {
        let models = self.models.read().unwrap_or_else(PoisonError::into_inner);
        RegistrySnapshot {
            models: models.clone(),
            usage: self.usage.snapshot(),
        }
    }
}
