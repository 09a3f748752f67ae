// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Switchyard routing core.

use thiserror::Error;

/// Boxed source error carried by wrapping variants.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The primary error type used across every Switchyard crate.
#[derive(Debug, Error)]
pub enum SwitchyardError {
    /// Malformed or missing request input. No backend call is attempted.
    #[error("validation error: {0}")]
    Validation(String),

    /// The requested or selected model has no registry entry or no backend instance.
    #[error("model not available: {model}")]
    ModelNotAvailable { model: String },

    /// A backend invocation failed (timeout, network, malformed response).
    #[error("backend execution failed for {model}: {message}")]
    BackendExecutionFailed {
        model: String,
        message: String,
        source: Option<BoxError>,
    },

    /// A search, shell, file, or scanner collaborator failed.
    #[error("{collaborator} failed: {message}")]
    Collaborator {
        collaborator: String,
        message: String,
        source: Option<BoxError>,
    },

    /// The classifier's backend output could not be parsed into an intent.
    #[error("classification output could not be parsed: {0}")]
    ClassificationParse(String),

    /// Configuration errors (invalid values, missing sections).
    #[error("configuration error: {0}")]
    Config(String),

    /// Memory store errors (database connection, query failure, migrations).
    #[error("storage error: {source}")]
    Storage { source: BoxError },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SwitchyardError {
    /// Builds a collaborator failure without an underlying source.
    pub fn collaborator(collaborator: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Collaborator {
            collaborator: collaborator.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Builds a backend failure without an underlying source.
    pub fn backend(model: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BackendExecutionFailed {
            model: model.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Whether this error should be surfaced to callers as a non-success status.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
