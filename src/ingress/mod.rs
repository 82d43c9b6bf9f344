// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! HTTP ingress adapter.
//!
//! A thin front door for frontend nodes: `GET /` kicks off a call tree under
//! the default bench id, `POST /` uses the request body verbatim as the bench
//! id. The handler mints the trace id, imposes the end-to-end deadline on the
//! whole tree, and reports the measured service time back to the caller as
//! JSON. Everything else is the dispatcher's job.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use serde_json::json;

use crate::config::consts::{DEFAULT_BENCH_ID, REQUEST_DEADLINE};
use crate::config::NodeConfig;
use crate::dispatch::Dispatcher;
use crate::observability::messages::ingress::IngressRequestFailed;
use crate::observability::messages::StructuredLog;
use crate::observability::operations;
use crate::proto::WorkUnit;

/// Shared handler state: the dispatcher plus the labels echoed in responses.
#[derive(Clone)]
pub struct IngressState {
    dispatcher: Arc<Dispatcher>,
    topology: String,
    cni: String,
    deadline: Duration,
}

impl IngressState {
    pub fn new(dispatcher: Arc<Dispatcher>, config: &NodeConfig) -> Self {
        Self {
            dispatcher,
            topology: config.topology_label(),
            cni: config.cni_label(),
            deadline: REQUEST_DEADLINE,
        }
    }

    #[cfg(test)]
    fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }
}

/// Build the ingress router. Unmatched methods on `/` get 405 from the
/// method router itself.
pub fn router(state: IngressState) -> Router {
    Router::new()
        .route("/", get(handle_get).post(handle_post))
        .with_state(state)
}

/// Bind and serve the ingress until the process exits.
pub async fn serve(state: IngressState, port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "http ingress listening");
    axum::serve(listener, router(state)).await
}

async fn handle_get(State(state): State<IngressState>) -> Response {
    run_tree(state, DEFAULT_BENCH_ID.to_string()).await
}

async fn handle_post(State(state): State<IngressState>, body: Bytes) -> Response {
    let bench_id = String::from_utf8_lossy(&body).into_owned();
    run_tree(state, bench_id).await
}

async fn run_tree(state: IngressState, bench_id: String) -> Response {
    // Nanosecond wall-clock timestamps are unique enough to identify one
    // tree among concurrent benchmark requests
    let trace_id = unix_nanos().to_string();
    let tracer = state.dispatcher.tracer();
    tracer.emit(operations::HTTP_START, &bench_id, &trace_id, "");

    let unit = WorkUnit {
        origin: state.dispatcher.name().to_string(),
        bench_id: bench_id.clone(),
        trace_id: trace_id.clone(),
        depth: 0,
    };

    let started = Instant::now();
    let deadline = started + state.deadline;
    let result = tokio::time::timeout(
        state.deadline,
        state.dispatcher.process(unit, Some(deadline)),
    )
    .await;
    let service_time = started.elapsed();

    match result {
        Ok(_reply) => {
            // Only completed trees get a closing lifecycle event
            tracer.emit(operations::HTTP_END, &bench_id, &trace_id, "");
            (
                StatusCode::OK,
                Json(json!({
                    "traceId": trace_id,
                    "serviceTime": service_time.as_nanos() as u64,
                    "benchId": bench_id,
                    "topology": state.topology,
                    "cni": state.cni,
                })),
            )
                .into_response()
        }
        Err(elapsed) => {
            IngressRequestFailed {
                trace_id: &trace_id,
                bench_id: &bench_id,
                error: &elapsed,
            }
            .log();
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("request {trace_id} timed out"),
            )
                .into_response()
        }
    }
}

fn unix_nanos() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as i64
}
