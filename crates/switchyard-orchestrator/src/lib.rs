// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request orchestration for Switchyard.
//!
//! The [`Orchestrator`] is the single entry point for user messages:
//! - Classifies the message into an intent
//! - Resolves the enabled capability set for that intent
//! - Dispatches to the handler for the intent type
//! - Records the exchange in the conversation history and the memory log
//! - Returns the response with suggestions and execution metadata

pub mod capabilities;
mod handlers;
pub mod orchestrator;
pub mod request;
pub mod stats;
pub mod suggestions;

pub use capabilities::{ALL_CAPABILITIES, CapabilityRegistry, CapabilityStatus, capabilities_for};
pub use handlers::ERROR_HANDLER;
pub use orchestrator::{Orchestrator, OrchestratorBuilder, RequestState};
pub use request::{
    Action, ActionKind, ProcessRequest, ProcessResponse, RequestContext, ResponseMetadata,
};
pub use stats::SessionStats;
pub use suggestions::suggestions_for;
