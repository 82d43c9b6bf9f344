// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod config;     // node config loading + validation
pub mod dispatch;   // call-tree dispatcher
pub mod errors;     // error handling
pub mod ingress;    // HTTP front door
pub mod observability;
pub mod proto;      // wire types and gRPC plumbing live here
pub mod registry;   // per-peer channel cache
