// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::{DEFAULT_FRONTEND_PORT, DEFAULT_PEER_PORT, UNKNOWN_LABEL};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Per-process node configuration, read once at startup and immutable
/// thereafter.
///
/// Typically loaded from a YAML file emitted by the topology generator:
///
/// ```yaml
/// name: svc-a
/// peers: [svc-b, svc-c]
/// delay_ms: 10
/// frontend: true
/// topology: ring-8
/// cni: cilium
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct NodeConfig {
    /// This node's identity; used as the `origin` field of outgoing work
    /// units and as the DNS name peers dial.
    pub name: String,
    /// Downstream node names to fan out to; empty marks a leaf. An entry may
    /// carry an explicit `host:port` to override the well-known peer port.
    #[serde(default)]
    pub peers: Vec<String>,
    /// Simulated processing delay in milliseconds, applied before fan-out.
    #[serde(default)]
    pub delay_ms: u64,
    /// gRPC listen port.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,
    /// Whether this node also serves the HTTP ingress.
    #[serde(default)]
    pub frontend: bool,
    /// HTTP ingress listen port, used only when `frontend` is set.
    #[serde(default = "default_frontend_port")]
    pub frontend_port: u16,
    /// Warm the connection registry for all peers at startup.
    #[serde(default = "default_preconnect")]
    pub preconnect: bool,
    /// Opaque benchmark-topology label echoed into trace events and ingress
    /// responses. Falls back to the `BENCH_NAME` environment variable.
    #[serde(default)]
    pub topology: Option<String>,
    /// Opaque CNI label, same treatment; falls back to `CNI`.
    #[serde(default)]
    pub cni: Option<String>,
}

fn default_listen_port() -> u16 {
    DEFAULT_PEER_PORT
}

fn default_frontend_port() -> u16 {
    DEFAULT_FRONTEND_PORT
}

fn default_preconnect() -> bool {
    true
}

impl NodeConfig {
    /// Simulated processing delay as a duration.
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Topology label: config value, then `BENCH_NAME`, then `"unknown"`.
    pub fn topology_label(&self) -> String {
        self.topology
            .clone()
            .or_else(|| env::var("BENCH_NAME").ok().filter(|v| !v.is_empty()))
            .unwrap_or_else(|| UNKNOWN_LABEL.to_string())
    }

    /// CNI label: config value, then `CNI`, then `"unknown"`.
    pub fn cni_label(&self) -> String {
        self.cni
            .clone()
            .or_else(|| env::var("CNI").ok().filter(|v| !v.is_empty()))
            .unwrap_or_else(|| UNKNOWN_LABEL.to_string())
    }
}

/// Errors raised while loading or validating a node configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid config: {reason}")]
    Invalid { reason: String },
}

/// Load a node config from a YAML file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<NodeConfig, ConfigError> {
    let display = path.as_ref().display().to_string();
    let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        path: display.clone(),
        source,
    })?;
    let cfg: NodeConfig =
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: display,
            source,
        })?;
    Ok(cfg)
}

/// Load a node config and reject shapes that cannot form a working node.
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<NodeConfig, ConfigError> {
    let cfg = load_config(path)?;
    validate(&cfg)?;
    Ok(cfg)
}

fn validate(cfg: &NodeConfig) -> Result<(), ConfigError> {
    if cfg.name.trim().is_empty() {
        return Err(ConfigError::Invalid {
            reason: "node name is required".to_string(),
        });
    }
    if cfg.peers.iter().any(|p| p.trim().is_empty()) {
        return Err(ConfigError::Invalid {
            reason: "peer names must not be empty".to_string(),
        });
    }
    if cfg.peers.iter().any(|p| p == &cfg.name) {
        return Err(ConfigError::Invalid {
            reason: format!("node '{}' lists itself as a peer", cfg.name),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parse_minimal_config_applies_defaults() {
        let yaml = "name: svc-a\n";
        let cfg: NodeConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(cfg.name, "svc-a");
        assert!(cfg.peers.is_empty());
        assert_eq!(cfg.delay_ms, 0);
        assert_eq!(cfg.listen_port, DEFAULT_PEER_PORT);
        assert!(!cfg.frontend);
        assert_eq!(cfg.frontend_port, DEFAULT_FRONTEND_PORT);
        assert!(cfg.preconnect);
        assert_eq!(cfg.delay(), Duration::ZERO);
    }

    #[test]
    fn parse_full_config() {
        let yaml = r#"
name: svc-a
peers: [svc-b, svc-c]
delay_ms: 10
listen_port: 50052
frontend: true
frontend_port: 8080
preconnect: false
topology: ring-8
cni: cilium
"#;
        let cfg: NodeConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(cfg.peers, vec!["svc-b", "svc-c"]);
        assert_eq!(cfg.delay(), Duration::from_millis(10));
        assert_eq!(cfg.listen_port, 50052);
        assert!(cfg.frontend);
        assert_eq!(cfg.frontend_port, 8080);
        assert!(!cfg.preconnect);
        assert_eq!(cfg.topology_label(), "ring-8");
        assert_eq!(cfg.cni_label(), "cilium");
    }

    #[test]
    fn load_and_validate_rejects_empty_name() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "name: \"\"").unwrap();

        let err = load_and_validate_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn load_and_validate_rejects_self_peer() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "name: svc-a\npeers: [svc-a]").unwrap();

        let err = load_and_validate_config(file.path()).unwrap_err();
        assert!(err.to_string().contains("lists itself"));
    }

    #[test]
    fn load_config_reports_missing_file() {
        let err = load_config("/nonexistent/meshbench.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn load_valid_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "name: svc-a\npeers: [svc-b]\ndelay_ms: 5").unwrap();

        let cfg = load_and_validate_config(file.path()).unwrap();
        assert_eq!(cfg.name, "svc-a");
        assert_eq!(cfg.peers, vec!["svc-b"]);
        assert_eq!(cfg.delay_ms, 5);
    }
}
