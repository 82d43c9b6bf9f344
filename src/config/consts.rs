// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::time::Duration;

/// Well-known gRPC port every node listens on and dials bare peer names at
pub const DEFAULT_PEER_PORT: u16 = 50051;
/// Default HTTP ingress port for frontend nodes
pub const DEFAULT_FRONTEND_PORT: u16 = 8000;
/// Sentinel bench id for ingress requests that carry no payload
pub const DEFAULT_BENCH_ID: &str = "default";
/// End-to-end deadline for one call tree, imposed at ingress
pub const REQUEST_DEADLINE: Duration = Duration::from_secs(3);
/// Idle keep-alive ping interval for peer channels
pub const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(5 * 60);
/// How long to wait for a keep-alive ack before treating the peer as dead
pub const KEEPALIVE_TIMEOUT: Duration = Duration::from_secs(1);
/// Label substituted when topology / CNI are not configured
pub const UNKNOWN_LABEL: &str = "unknown";
