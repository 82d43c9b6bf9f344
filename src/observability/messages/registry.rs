// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for connection registry events.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A channel to a peer was constructed and cached for the process lifetime.
///
/// # Log Level
/// `info!` - happens at most once per peer
pub struct ChannelCreated<'a> {
    pub peer: &'a str,
    pub target: &'a str,
}

impl Display for ChannelCreated<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Created channel to peer '{}' at {}", self.peer, self.target)
    }
}

impl StructuredLog for ChannelCreated<'_> {
    fn log(&self) {
        tracing::info!(
            peer = self.peer,
            target = self.target,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "channel_created",
            span_name = name,
            peer = self.peer,
            target = self.target,
        )
    }
}

/// Startup warm-up reached a peer's channel constructor successfully.
pub struct PreconnectSucceeded<'a> {
    pub peer: &'a str,
}

impl Display for PreconnectSucceeded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Preconnect to '{}' succeeded", self.peer)
    }
}

impl StructuredLog for PreconnectSucceeded<'_> {
    fn log(&self) {
        tracing::info!(peer = self.peer, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("preconnect_succeeded", span_name = name, peer = self.peer)
    }
}

/// Startup warm-up could not build a channel for a peer. Non-fatal; the next
/// fan-out retries construction.
pub struct PreconnectFailed<'a> {
    pub peer: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for PreconnectFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Preconnect to '{}' failed: {}", self.peer, self.error)
    }
}

impl StructuredLog for PreconnectFailed<'_> {
    fn log(&self) {
        tracing::error!(
            peer = self.peer,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "preconnect_failed",
            span_name = name,
            peer = self.peer,
            error = %self.error,
        )
    }
}
