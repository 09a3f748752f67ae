// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Task execution against registered backends.
//!
//! [`TaskExecutor`] resolves a model (forced or selected), invokes its backend
//! under a timeout, estimates tokens and cost, records usage once on success,
//! and retries a failed call once on the configured fallback model.

pub mod executor;
pub mod tokens;

pub use executor::TaskExecutor;
pub use tokens::estimate_tokens;
