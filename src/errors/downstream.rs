// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors for peer channel construction and downstream fan-out calls.
//!
//! Both kinds are absorbed at the dispatcher: they are logged and excluded
//! from the aggregated reply, never surfaced to the node's own caller.

use thiserror::Error;

/// The connection registry could not construct a channel to a named peer.
///
/// Construction failures are never cached; the next lookup retries.
#[derive(Debug, Error)]
pub enum ConnectError {
    /// The peer name and port did not form a dialable URI.
    #[error("invalid address for peer '{peer}': {source}")]
    InvalidAddress {
        peer: String,
        #[source]
        source: tonic::transport::Error,
    },
}

/// A fan-out call to a downstream peer failed.
#[derive(Debug, Error)]
pub enum DownstreamError {
    /// No channel could be obtained for the peer.
    #[error("could not reach peer '{peer}': {source}")]
    Connect {
        peer: String,
        #[source]
        source: ConnectError,
    },
    /// The call itself failed: transport error, deadline exceeded, or a
    /// peer-side error status.
    #[error("call to peer '{peer}' failed: {status}")]
    Call { peer: String, status: tonic::Status },
}

impl DownstreamError {
    /// Name of the peer the failed call was addressed to.
    pub fn peer(&self) -> &str {
        match self {
            DownstreamError::Connect { peer, .. } => peer,
            DownstreamError::Call { peer, .. } => peer,
        }
    }
}
