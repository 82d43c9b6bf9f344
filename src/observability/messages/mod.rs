// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each diagnostic event is a small struct implementing `Display` for the
//! human-readable text and [`StructuredLog`] for the field-carrying
//! `tracing` write. This keeps magic strings out of the dispatch hot path
//! and gives every log site a consistent shape.
//!
//! Messages are organized by subsystem:
//! * `dispatch` - fan-out lifecycle and downstream call failures
//! * `registry` - channel construction and preconnect warm-up
//! * `ingress` - HTTP ingress request outcomes

use tracing::Span;

pub mod dispatch;
pub mod ingress;
pub mod registry;

/// Structured logging behavior shared by all message types.
pub trait StructuredLog {
    /// Write the message through `tracing` at its designated level.
    fn log(&self);

    /// Create a span carrying the message's fields.
    fn span(&self, name: &str) -> Span;
}
