// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI-compatible HTTP backend.
//!
//! [`OpenAiBackend`] posts `{model, messages}` to `<base_url>/chat/completions`
//! and returns the first choice's message content. Any server speaking this
//! wire format (hosted gateways, local inference servers) can sit behind it.

pub mod client;
pub mod types;

pub use client::OpenAiBackend;
