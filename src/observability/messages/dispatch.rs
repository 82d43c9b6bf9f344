// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for call-tree dispatch events.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A downstream fan-out call failed and was absorbed.
///
/// # Log Level
/// `error!` - the only externally observable signal of partial failure
///
/// # Example
/// ```
/// use meshbench::observability::messages::dispatch::DownstreamCallFailed;
/// use meshbench::observability::messages::StructuredLog;
///
/// let error = std::io::Error::new(std::io::ErrorKind::Other, "connection refused");
/// let msg = DownstreamCallFailed {
///     peer: "svc-b",
///     error: &error,
/// };
///
/// msg.log();
/// ```
pub struct DownstreamCallFailed<'a> {
    pub peer: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for DownstreamCallFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Downstream call to '{}' failed and was dropped from the aggregate: {}",
            self.peer, self.error
        )
    }
}

impl StructuredLog for DownstreamCallFailed<'_> {
    fn log(&self) {
        tracing::error!(
            peer = self.peer,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "downstream_call_failed",
            span_name = name,
            peer = self.peer,
            error = %self.error,
        )
    }
}

/// Fan-out to all configured peers finished (successes and failures alike).
///
/// # Log Level
/// `debug!` - per-request event, high volume under load
pub struct FanOutCompleted<'a> {
    pub node: &'a str,
    pub peer_count: usize,
    pub failures: usize,
    pub duration: std::time::Duration,
}

impl Display for FanOutCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Fan-out from '{}' completed: {} peers, {} failures in {:?}",
            self.node, self.peer_count, self.failures, self.duration
        )
    }
}

impl StructuredLog for FanOutCompleted<'_> {
    fn log(&self) {
        tracing::debug!(
            node = self.node,
            peer_count = self.peer_count,
            failures = self.failures,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "fan_out_completed",
            span_name = name,
            node = self.node,
            peer_count = self.peer_count,
            failures = self.failures,
        )
    }
}
