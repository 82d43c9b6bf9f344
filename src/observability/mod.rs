// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and lifecycle tracing.
//!
//! Two write-only outputs live here:
//!
//! * `tracer` - the lifecycle trace emitter: one structured record per
//!   dispatcher phase transition (`process_start`, `req_start`, ...),
//!   correlated by bench and trace ids. These records are the only way to
//!   observe partial fan-out failure from outside the process.
//! * `messages` - per-subsystem message types for diagnostic logging,
//!   following a struct-based pattern with `Display` and `StructuredLog`
//!   implementations to keep log text out of the hot-path code.
//!
//! Both write synchronously through `tracing`; neither retries, awaits
//! acknowledgement, or returns an error to the caller.

pub mod messages;
pub mod tracer;

#[cfg(test)]
pub(crate) mod capture;

pub use tracer::{operations, TraceEmitter, TraceEvent};
