// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Lifecycle trace emitter.
//!
//! Every dispatcher phase transition produces one [`TraceEvent`], written
//! synchronously as a structured `tracing` record under the `trace_log`
//! target. The write never blocks on backpressure and a missing or closed
//! sink is silently tolerated, so emission cannot perturb the timing
//! behavior under measurement.

use std::time::{SystemTime, UNIX_EPOCH};

/// Operation names carried by trace events.
pub mod operations {
    /// A node started processing an inbound work unit.
    pub const PROCESS_START: &str = "process_start";
    /// A node finished processing and is about to reply.
    pub const PROCESS_END: &str = "process_end";
    /// A downstream call to the named peer is about to be issued.
    pub const REQ_START: &str = "req_start";
    /// A downstream reply arrived from the named responder.
    pub const REQ_RESP: &str = "req_resp";
    /// The HTTP ingress accepted a request.
    pub const HTTP_START: &str = "http_start";
    /// The HTTP ingress finished a request.
    pub const HTTP_END: &str = "http_end";
}

/// One lifecycle record. Emitted, never stored or queried by this process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEvent {
    pub operation: String,
    pub bench_id: String,
    pub trace_id: String,
    /// Node emitting the event.
    pub node: String,
    /// Peer the event relates to: the sender for process events, the callee
    /// or responder for request events. Empty at the ingress boundary.
    pub related_node: String,
    pub topology: String,
    pub cni: String,
    /// Unix timestamp in nanoseconds at emission.
    pub timestamp_nanos: i64,
}

/// Stateless-beyond-configuration emitter owned by the dispatcher.
#[derive(Debug, Clone)]
pub struct TraceEmitter {
    node: String,
    topology: String,
    cni: String,
}

impl TraceEmitter {
    pub fn new(node: impl Into<String>, topology: impl Into<String>, cni: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            topology: topology.into(),
            cni: cni.into(),
        }
    }

    /// Build the event that `emit` would write, timestamped now.
    pub fn event(
        &self,
        operation: &str,
        bench_id: &str,
        trace_id: &str,
        related_node: &str,
    ) -> TraceEvent {
        let timestamp_nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos() as i64;

        TraceEvent {
            operation: operation.to_string(),
            bench_id: bench_id.to_string(),
            trace_id: trace_id.to_string(),
            node: self.node.clone(),
            related_node: related_node.to_string(),
            topology: self.topology.clone(),
            cni: self.cni.clone(),
            timestamp_nanos,
        }
    }

    /// Write one lifecycle record. Fire-and-forget: no retry, no
    /// acknowledgement, no error path back to the caller.
    pub fn emit(&self, operation: &str, bench_id: &str, trace_id: &str, related_node: &str) {
        let event = self.event(operation, bench_id, trace_id, related_node);
        tracing::debug!(
            target: "trace_log",
            operation = %event.operation,
            bench_id = %event.bench_id,
            trace_id = %event.trace_id,
            node = %event.node,
            related_node = %event.related_node,
            topology = %event.topology,
            cni = %event.cni,
            timestamp_nanos = event.timestamp_nanos,
            "trace_log"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_carries_configuration_and_arguments() {
        let tracer = TraceEmitter::new("svc-a", "ring-8", "cilium");
        let event = tracer.event(operations::REQ_START, "run-1", "t-1", "svc-b");

        assert_eq!(event.operation, "req_start");
        assert_eq!(event.bench_id, "run-1");
        assert_eq!(event.trace_id, "t-1");
        assert_eq!(event.node, "svc-a");
        assert_eq!(event.related_node, "svc-b");
        assert_eq!(event.topology, "ring-8");
        assert_eq!(event.cni, "cilium");
        assert!(event.timestamp_nanos > 0);
    }

    #[test]
    fn timestamps_are_monotonic_enough_to_order_one_task() {
        let tracer = TraceEmitter::new("svc-a", "t", "c");
        let first = tracer.event(operations::PROCESS_START, "b", "t", "");
        let second = tracer.event(operations::PROCESS_END, "b", "t", "");
        assert!(second.timestamp_nanos >= first.timestamp_nanos);
    }
}
