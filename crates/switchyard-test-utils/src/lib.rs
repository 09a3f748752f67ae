// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Switchyard integration tests.
//!
//! Provides mock backends, mock collaborators, and a harness that wires a
//! complete orchestrator for fast, deterministic tests without network access
//! or real shell commands.
//!
//! # Components
//!
//! - [`MockBackend`] - Scripted model backend with failure and delay injection
//! - [`MockWebSearch`], [`MockCommandRunner`], [`MockFileOps`], [`MockProjectScanner`] - Recording collaborators
//! - [`TestHarness`] - Orchestrator stack over the mocks and a temp SQLite memory log

pub mod harness;
pub mod mock_backend;
pub mod mock_tools;

pub use harness::{TestHarness, TestHarnessBuilder, mock_model};
pub use mock_backend::{DEFAULT_MOCK_RESPONSE, MockBackend, MockCall};
pub use mock_tools::{
    MockCommandRunner, MockFileOps, MockProjectScanner, MockWebSearch, search_result,
};
