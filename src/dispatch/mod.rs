// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Call-tree dispatcher: the request-processing state machine.
//!
//! One inbound [`WorkUnit`] moves through four phases: *start* (trace event),
//! *delay* (simulated processing cost), *fan-out* (concurrent downstream
//! calls through the connection registry), *end* (trace event + aggregated
//! reply). The dispatcher is infallible from its caller's point of view:
//! downstream failures are logged and absorbed, never propagated, so a
//! caller cannot distinguish "no peers configured" from "all peers failed"
//! by inspecting the reply. Partial failure is observable only through the
//! trace/log output.

mod deadline;
mod service;


pub use deadline::deadline_from_metadata;

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::Instrument;

use crate::config::consts::DEFAULT_PEER_PORT;
use crate::config::NodeConfig;
use crate::errors::DownstreamError;
use crate::observability::messages::dispatch::{DownstreamCallFailed, FanOutCompleted};
use crate::observability::messages::StructuredLog;
use crate::observability::{operations, TraceEmitter};
use crate::proto::meshbench_v1::mesh_node_client::MeshNodeClient;
use crate::proto::WorkUnit;
use crate::registry::ConnectionRegistry;

/// One node's dispatcher. Owns the node identity, the peer list, the
/// simulated delay, the connection registry, and the trace emitter; shared
/// (via `Arc`) between the gRPC service and the HTTP ingress.
pub struct Dispatcher {
    name: String,
    peers: Vec<String>,
    delay: Duration,
    registry: Arc<ConnectionRegistry>,
    tracer: TraceEmitter,
}

impl Dispatcher {
    pub fn new(config: &NodeConfig) -> Self {
        Self {
            name: config.name.clone(),
            peers: config.peers.clone(),
            delay: config.delay(),
            registry: Arc::new(ConnectionRegistry::new(DEFAULT_PEER_PORT)),
            tracer: TraceEmitter::new(
                config.name.clone(),
                config.topology_label(),
                config.cni_label(),
            ),
        }
    }

    /// Node identity, used as the `origin` of outgoing work units.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The lifecycle trace emitter, shared with the HTTP ingress.
    pub fn tracer(&self) -> &TraceEmitter {
        &self.tracer
    }

    /// The connection registry backing fan-out calls.
    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    /// Best-effort channel warm-up for every configured peer.
    pub async fn preconnect(&self) {
        self.registry.preconnect(&self.peers).await;
    }

    /// Process one unit of work. Never fails: downstream failures are
    /// absorbed and the reply is best-effort.
    ///
    /// `deadline` is the end-to-end deadline of the call tree this unit
    /// belongs to, if one is known; the remainder is applied to every
    /// outbound call as its gRPC timeout.
    pub async fn process(&self, unit: WorkUnit, deadline: Option<Instant>) -> WorkUnit {
        let span = tracing::info_span!(
            "process",
            node = %self.name,
            origin = %unit.origin,
            bench_id = %unit.bench_id,
            trace_id = %unit.trace_id,
            depth = unit.depth,
        );
        self.process_inner(unit, deadline).instrument(span).await
    }

    async fn process_inner(&self, unit: WorkUnit, deadline: Option<Instant>) -> WorkUnit {
        self.tracer.emit(
            operations::PROCESS_START,
            &unit.bench_id,
            &unit.trace_id,
            &unit.origin,
        );

        // Simulated processing cost precedes fan-out; it is not overlapped
        // with the downstream calls
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay)
                .instrument(tracing::debug_span!("processing_delay"))
                .await;
        }

        let next_depth = unit.depth + 1;

        if self.peers.is_empty() {
            self.tracer.emit(
                operations::PROCESS_END,
                &unit.bench_id,
                &unit.trace_id,
                &unit.origin,
            );
            return WorkUnit {
                origin: self.name.clone(),
                bench_id: unit.bench_id,
                trace_id: unit.trace_id,
                depth: next_depth,
            };
        }

        let started = Instant::now();
        let mut tasks = Vec::with_capacity(self.peers.len());

        for peer in &self.peers {
            let peer = peer.clone();
            let registry = Arc::clone(&self.registry);
            let tracer = self.tracer.clone();
            let request = WorkUnit {
                origin: self.name.clone(),
                bench_id: unit.bench_id.clone(),
                trace_id: unit.trace_id.clone(),
                depth: next_depth,
            };

            tasks.push(tokio::spawn(async move {
                tracer.emit(
                    operations::REQ_START,
                    &request.bench_id,
                    &request.trace_id,
                    &peer,
                );
                match call_peer(&registry, &peer, request, deadline).await {
                    Ok(reply) => {
                        tracer.emit(
                            operations::REQ_RESP,
                            &reply.bench_id,
                            &reply.trace_id,
                            &reply.origin,
                        );
                        true
                    }
                    Err(error) => {
                        DownstreamCallFailed {
                            peer: &peer,
                            error: &error,
                        }
                        .log();
                        false
                    }
                }
            }));
        }

        // Wait-for-all barrier: no short-circuit on first failure
        let mut failures = 0usize;
        for task in tasks {
            match task.await {
                Ok(true) => {}
                Ok(false) => failures += 1,
                Err(join_error) => {
                    tracing::error!(error = %join_error, "fan-out task failed to complete");
                    failures += 1;
                }
            }
        }

        FanOutCompleted {
            node: &self.name,
            peer_count: self.peers.len(),
            failures,
            duration: started.elapsed(),
        }
        .log();

        self.tracer.emit(
            operations::PROCESS_END,
            &unit.bench_id,
            &unit.trace_id,
            &unit.origin,
        );

        // Depth resets at branch points; the counter is meaningful only
        // along a single leaf path
        WorkUnit {
            origin: self.name.clone(),
            bench_id: unit.bench_id,
            trace_id: unit.trace_id,
            depth: 0,
        }
    }
}

/// Issue one downstream call: channel from the registry, unary `Process`
/// with the remaining deadline as the gRPC timeout.
async fn call_peer(
    registry: &ConnectionRegistry,
    peer: &str,
    unit: WorkUnit,
    deadline: Option<Instant>,
) -> Result<WorkUnit, DownstreamError> {
    let channel = registry
        .get_channel(peer)
        .await
        .map_err(|source| DownstreamError::Connect {
            peer: peer.to_string(),
            source,
        })?;

    let mut client = MeshNodeClient::new(channel);
    let mut request = tonic::Request::new(unit);
    if let Some(deadline) = deadline {
        request.set_timeout(deadline.saturating_duration_since(Instant::now()));
    }

    let response = client
        .process(request)
        .await
        .map_err(|status| DownstreamError::Call {
            peer: peer.to_string(),
            status,
        })?;

    Ok(response.into_inner())
}
