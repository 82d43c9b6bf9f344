// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Connection registry: one long-lived channel per downstream peer.
//!
//! Channels are created lazily on first use and cached for the lifetime of
//! the process; they are never evicted, replaced, or health-checked beyond
//! the transport's own HTTP/2 keep-alive. The map is read-mostly: every
//! fan-out call takes the shared-lock fast path, and only the first call for
//! an unseen peer takes the exclusive slow path. The slow path re-checks the
//! map after acquiring the write guard so concurrent first lookups construct
//! exactly one channel.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::RwLock;
use tonic::transport::{Channel, Endpoint};

use crate::config::consts::{KEEPALIVE_INTERVAL, KEEPALIVE_TIMEOUT};
use crate::errors::ConnectError;
use crate::observability::messages::registry::{
    ChannelCreated, PreconnectFailed, PreconnectSucceeded,
};
use crate::observability::messages::StructuredLog;

pub struct ConnectionRegistry {
    /// Well-known port dialed for bare peer names.
    port: u16,
    channels: RwLock<HashMap<String, Channel>>,
    /// Number of channels constructed so far; at most one per peer.
    constructed: AtomicUsize,
}

impl ConnectionRegistry {
    pub fn new(port: u16) -> Self {
        Self {
            port,
            channels: RwLock::new(HashMap::new()),
            constructed: AtomicUsize::new(0),
        }
    }

    /// Return the channel for `peer`, constructing and caching it on first
    /// use. A construction failure is returned but not cached; the next
    /// caller retries.
    pub async fn get_channel(&self, peer: &str) -> Result<Channel, ConnectError> {
        {
            let channels = self.channels.read().await;
            if let Some(channel) = channels.get(peer) {
                return Ok(channel.clone());
            }
        }

        let mut channels = self.channels.write().await;

        // Check again in case another task created the channel while we
        // waited for the write guard
        if let Some(channel) = channels.get(peer) {
            return Ok(channel.clone());
        }

        let target = self.target(peer);
        let endpoint = Endpoint::from_shared(target.clone())
            .map_err(|source| ConnectError::InvalidAddress {
                peer: peer.to_string(),
                source,
            })?
            .http2_keep_alive_interval(KEEPALIVE_INTERVAL)
            .keep_alive_timeout(KEEPALIVE_TIMEOUT)
            .keep_alive_while_idle(true);

        // Lazy connect, mirroring the transport's deferred-dial semantics:
        // transport failures surface on the first call, not here
        let channel = endpoint.connect_lazy();
        channels.insert(peer.to_string(), channel.clone());
        self.constructed.fetch_add(1, Ordering::Relaxed);

        ChannelCreated {
            peer,
            target: &target,
        }
        .log();

        Ok(channel)
    }

    /// Best-effort warm-up: build every peer's channel eagerly and log the
    /// outcome per peer. Failures here are non-fatal.
    pub async fn preconnect(&self, peers: &[String]) {
        for peer in peers {
            match self.get_channel(peer).await {
                Ok(_) => PreconnectSucceeded { peer }.log(),
                Err(error) => PreconnectFailed {
                    peer,
                    error: &error,
                }
                .log(),
            }
        }
    }

    /// Number of channels constructed over the process lifetime.
    pub fn channel_count(&self) -> usize {
        self.constructed.load(Ordering::Relaxed)
    }

    /// Dial target for a peer: bare names get the well-known port, entries
    /// that already carry `host:port` are used as-is.
    fn target(&self, peer: &str) -> String {
        if peer.contains(':') {
            format!("http://{}", peer)
        } else {
            format!("http://{}:{}", peer, self.port)
        }
    }
}

impl std::fmt::Debug for ConnectionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionRegistry")
            .field("port", &self.port)
            .field("constructed", &self.channel_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn repeated_lookups_construct_one_channel() {
        let registry = ConnectionRegistry::new(50051);

        registry.get_channel("svc-b").await.unwrap();
        registry.get_channel("svc-b").await.unwrap();
        registry.get_channel("svc-b").await.unwrap();

        assert_eq!(registry.channel_count(), 1);
    }

    #[tokio::test]
    async fn distinct_peers_get_distinct_channels() {
        let registry = ConnectionRegistry::new(50051);

        registry.get_channel("svc-b").await.unwrap();
        registry.get_channel("svc-c").await.unwrap();

        assert_eq!(registry.channel_count(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn concurrent_first_lookups_construct_exactly_once() {
        let registry = Arc::new(ConnectionRegistry::new(50051));

        let mut tasks = Vec::new();
        for _ in 0..64 {
            let registry = Arc::clone(&registry);
            tasks.push(tokio::spawn(async move {
                registry.get_channel("svc-unseen").await.unwrap();
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(registry.channel_count(), 1);
    }

    #[tokio::test]
    async fn construction_failure_is_not_cached() {
        let registry = ConnectionRegistry::new(50051);

        // A space makes the URI unparseable
        let err = registry.get_channel("bad host").await.unwrap_err();
        assert!(matches!(err, ConnectError::InvalidAddress { .. }));
        assert_eq!(registry.channel_count(), 0);

        // Retry hits the constructor again rather than a cached failure
        let err = registry.get_channel("bad host").await.unwrap_err();
        assert!(matches!(err, ConnectError::InvalidAddress { .. }));
        assert_eq!(registry.channel_count(), 0);
    }

    #[test]
    fn explicit_port_in_peer_name_overrides_default() {
        let registry = ConnectionRegistry::new(50051);
        assert_eq!(registry.target("svc-b"), "http://svc-b:50051");
        assert_eq!(registry.target("127.0.0.1:9000"), "http://127.0.0.1:9000");
    }

    #[tokio::test]
    async fn preconnect_warms_every_peer_and_tolerates_failures() {
        let registry = ConnectionRegistry::new(50051);
        let peers = vec![
            "svc-b".to_string(),
            "bad host".to_string(),
            "svc-c".to_string(),
        ];

        registry.preconnect(&peers).await;

        // The invalid peer failed but did not stop the warm-up
        assert_eq!(registry.channel_count(), 2);
    }
}
